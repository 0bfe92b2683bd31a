//! In-session treatment store.
//!
//! One instance per game session. The store is the single source of truth for
//! which afflictions have been treated well enough to show a prognosis.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;

use super::model::{SavedMemory, SavedRecord, TreatmentKey, TreatmentRecord, SAVE_VERSION};
use crate::core::error::{PrognosisError, Result};
use crate::core::model::{AfflictionKind, PatientId, PatientSnapshot, Tick};

/// Remembers the last qualifying treatment per (patient, affliction).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreatmentMemory {
    records: BTreeMap<TreatmentKey, TreatmentRecord>,
}

impl TreatmentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record a treatment for every given affliction on the patient.
    ///
    /// Existing records for the same key are overwritten. Returns how many
    /// records were written.
    pub fn record_treatment<'a>(
        &mut self,
        patient: &PatientId,
        level: i32,
        afflictions: impl IntoIterator<Item = &'a AfflictionKind>,
        now: Tick,
    ) -> usize {
        if patient.as_str().is_empty() {
            return 0;
        }

        let record = TreatmentRecord::new(level, now);
        let mut written = 0;
        for kind in afflictions {
            if kind.is_unspecified() {
                continue;
            }
            self.records
                .insert(TreatmentKey::new(patient.clone(), kind.clone()), record);
            written += 1;
        }

        if written > 0 {
            log::debug!(
                "Recorded treatment level {} for {} affliction(s) on {}",
                record.level,
                written,
                patient
            );
        }
        written
    }

    pub fn get(
        &self,
        patient: &PatientId,
        affliction: &AfflictionKind,
    ) -> Option<&TreatmentRecord> {
        self.records
            .get(&TreatmentKey::new(patient.clone(), affliction.clone()))
    }

    /// Gate predicate for showing a prognosis.
    ///
    /// Always passes when the gate is disabled. Otherwise the patient must be
    /// present and alive, and the affliction must carry a record of at least
    /// `required_level`.
    pub fn meets_gate(
        &self,
        patient: Option<&PatientSnapshot>,
        affliction: &AfflictionKind,
        required_level: i32,
        gate_enabled: bool,
    ) -> bool {
        if !gate_enabled {
            return true;
        }
        let Some(patient) = patient else {
            return false;
        };
        if patient.dead || affliction.is_unspecified() {
            return false;
        }

        self.get(&patient.id, affliction)
            .map(|record| record.level >= required_level)
            .unwrap_or(false)
    }

    /// Forget one record, e.g. when the affliction has resolved.
    pub fn clear_for(&mut self, patient: &PatientId, affliction: &AfflictionKind) -> bool {
        self.records
            .remove(&TreatmentKey::new(patient.clone(), affliction.clone()))
            .is_some()
    }

    /// Drop records for patients missing from `alive` and for afflictions that
    /// `still_active` reports as gone or fully resolved. Returns the number removed.
    pub fn run_periodic_cleanup<F>(
        &mut self,
        alive: &HashSet<PatientId>,
        mut still_active: F,
    ) -> usize
    where
        F: FnMut(&PatientId, &AfflictionKind) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|key, _| {
            alive.contains(&key.patient) && still_active(&key.patient, &key.affliction)
        });
        before - self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TreatmentKey, &TreatmentRecord)> {
        self.records.iter()
    }

    pub fn to_saved(&self) -> SavedMemory {
        SavedMemory {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            records: self
                .records
                .iter()
                .map(|(key, record)| SavedRecord {
                    patient: key.patient.clone(),
                    affliction: key.affliction.clone(),
                    level: record.level,
                    tick: record.recorded_at_tick,
                })
                .collect(),
        }
    }

    /// Rebuild a store from saved data. Levels are re-clamped and later
    /// duplicates of a key win.
    pub fn from_saved(saved: SavedMemory) -> Result<Self> {
        if saved.version > SAVE_VERSION {
            return Err(PrognosisError::UnsupportedSaveVersion(saved.version));
        }

        let records = saved
            .records
            .into_iter()
            .map(|r| {
                (
                    TreatmentKey::new(r.patient, r.affliction),
                    TreatmentRecord::new(r.level, r.tick),
                )
            })
            .collect();
        Ok(Self { records })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_saved())?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let saved: SavedMemory = serde_json::from_str(content)?;
        Self::from_saved(saved)
    }
}

/// Rate limiter for [`TreatmentMemory::run_periodic_cleanup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupSchedule {
    interval: Tick,
    last_run: Tick,
}

impl CleanupSchedule {
    pub fn new(interval: Tick) -> Self {
        Self {
            interval: interval.max(1),
            last_run: 0,
        }
    }

    pub fn interval(&self) -> Tick {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Tick) {
        self.interval = interval.max(1);
    }

    /// Returns true (and marks the run) once `interval` ticks have passed since
    /// the previous run.
    pub fn due(&mut self, now: Tick) -> bool {
        // Clock moved backwards: a different save was loaded.
        if now < self.last_run {
            self.last_run = now;
            return false;
        }
        if now - self.last_run < self.interval {
            return false;
        }
        self.last_run = now;
        true
    }
}

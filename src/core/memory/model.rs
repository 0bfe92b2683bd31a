//! Data model for remembered treatments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::config::MAX_SKILL_LEVEL;
use crate::core::model::{AfflictionKind, PatientId, Tick};

/// Current layout of [`SavedMemory`].
pub const SAVE_VERSION: u32 = 1;

/// Identifies one affliction on one patient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreatmentKey {
    pub patient: PatientId,
    pub affliction: AfflictionKind,
}

impl TreatmentKey {
    pub fn new(patient: PatientId, affliction: AfflictionKind) -> Self {
        Self { patient, affliction }
    }
}

/// The most recent qualifying treatment for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentRecord {
    /// Skill level of the treating agent, always within 0..=20
    pub level: i32,
    /// When the treatment concluded. Diagnostics only, records do not expire by age.
    pub recorded_at_tick: Tick,
}

impl TreatmentRecord {
    pub fn new(level: i32, recorded_at_tick: Tick) -> Self {
        Self {
            level: level.clamp(0, MAX_SKILL_LEVEL),
            recorded_at_tick,
        }
    }
}

/// One persisted entry. Keys are stored as separate fields, never joined into a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub patient: PatientId,
    pub affliction: AfflictionKind,
    pub level: i32,
    pub tick: Tick,
}

/// On-disk envelope for the whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMemory {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub records: Vec<SavedRecord>,
}

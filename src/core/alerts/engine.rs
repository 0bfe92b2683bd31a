// Alert engine - evaluates the at-risk trigger and de-duplicates letters.
//
// Each (patient, affliction) slot cycles Armed -> Fired -> Armed. Armed is
// implicit: a slot is armed whenever it is absent from the fired set.

use std::collections::HashSet;

use super::model::{AlertKey, RiskAlert};
use super::triggers::{evaluate_at_risk, TriggerContext};
use crate::core::model::{AfflictionKind, PatientSnapshot};

/// Fired-set for at-risk letters. Process-local, never persisted.
#[derive(Debug, Default)]
pub struct AlertDeduplicator {
    fired: HashSet<AlertKey>,
}

impl AlertDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fired(&self, key: &AlertKey) -> bool {
        self.fired.contains(key)
    }

    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }

    /// Re-arm a slot. Returns true if it was fired.
    pub fn reset(&mut self, key: &AlertKey) -> bool {
        let was_fired = self.fired.remove(key);
        if was_fired {
            log::debug!(
                "Re-armed risk alert for patient #{} / {}",
                key.patient,
                key.affliction
            );
        }
        was_fired
    }

    /// Evaluate every immunity track of a patient.
    ///
    /// Slots re-arm when their affliction is gone or `gate_met` rejects it.
    /// A track the host drops from `immunities` is never seen again, so its
    /// slot stays fired: hosts should keep the track after the affliction ends.
    /// Returns the letters that fired on this pass, at most one per armed slot.
    pub fn evaluate<G>(
        &mut self,
        patient: &PatientSnapshot,
        threshold: f32,
        mut gate_met: G,
    ) -> Vec<RiskAlert>
    where
        G: FnMut(&AfflictionKind) -> bool,
    {
        let mut alerts = Vec::new();

        for track in &patient.immunities {
            let key = AlertKey::new(patient.numeric_id, track.kind.clone());

            // Affliction gone: a later infection may alert again
            let Some(state) = track.affliction.as_ref() else {
                self.reset(&key);
                continue;
            };

            // Only alert where a prognosis would be shown
            if !gate_met(&track.kind) {
                self.reset(&key);
                continue;
            }

            if !state.immunizable || self.fired.contains(&key) {
                continue;
            }

            let ctx = TriggerContext {
                patient,
                track,
                state,
                threshold,
            };
            if let Some(alert) = evaluate_at_risk(&ctx) {
                log::info!("{}", alert.title);
                self.fired.insert(key);
                alerts.push(alert);
            }
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AfflictionState, ImmunityTrack, PatientId};

    fn losing_track(kind: &str, present: bool) -> ImmunityTrack {
        ImmunityTrack {
            kind: AfflictionKind::new(kind),
            label: kind.to_lowercase(),
            immunity: 0.1,
            immunity_per_day: 0.02,
            affliction: present.then(|| AfflictionState {
                severity: 0.85,
                severity_per_day: 0.3,
                immunizable: true,
                fully_immune: false,
            }),
        }
    }

    fn patient(tracks: Vec<ImmunityTrack>) -> PatientSnapshot {
        PatientSnapshot {
            id: PatientId::new("Human_1"),
            numeric_id: 1,
            label: "Ada".to_string(),
            dead: false,
            immunities: tracks,
        }
    }

    fn plague_key() -> AlertKey {
        AlertKey::new(1, AfflictionKind::new("Plague"))
    }

    #[test]
    fn test_fires_once_per_episode() {
        let mut engine = AlertDeduplicator::new();
        let sick = patient(vec![losing_track("Plague", true)]);

        let first = engine.evaluate(&sick, 0.8, |_| true);
        assert_eq!(first.len(), 1);
        assert!(engine.is_fired(&plague_key()));

        for _ in 0..5 {
            assert!(engine.evaluate(&sick, 0.8, |_| true).is_empty());
        }
    }

    #[test]
    fn test_rearms_after_affliction_clears() {
        let mut engine = AlertDeduplicator::new();
        let sick = patient(vec![losing_track("Plague", true)]);
        let recovered = patient(vec![losing_track("Plague", false)]);

        assert_eq!(engine.evaluate(&sick, 0.8, |_| true).len(), 1);
        assert!(engine.evaluate(&recovered, 0.8, |_| true).is_empty());
        assert!(!engine.is_fired(&plague_key()));

        // Recurrence is a new episode
        assert_eq!(engine.evaluate(&sick, 0.8, |_| true).len(), 1);
    }

    #[test]
    fn test_rearms_when_gate_fails() {
        let mut engine = AlertDeduplicator::new();
        let sick = patient(vec![losing_track("Plague", true)]);

        assert_eq!(engine.evaluate(&sick, 0.8, |_| true).len(), 1);
        assert!(engine.evaluate(&sick, 0.8, |_| false).is_empty());
        assert_eq!(engine.fired_count(), 0);
        assert_eq!(engine.evaluate(&sick, 0.8, |_| true).len(), 1);
    }

    #[test]
    fn test_gate_consulted_per_affliction() {
        let mut engine = AlertDeduplicator::new();
        let sick = patient(vec![losing_track("Plague", true), losing_track("Flu", true)]);

        let alerts = engine.evaluate(&sick, 0.8, |kind| kind.as_str() == "Flu");
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].affliction, AfflictionKind::new("Flu"));
    }

    #[test]
    fn test_non_immunizable_is_skipped_without_reset() {
        let mut engine = AlertDeduplicator::new();
        let sick = patient(vec![losing_track("Plague", true)]);
        assert_eq!(engine.evaluate(&sick, 0.8, |_| true).len(), 1);

        let mut odd = sick.clone();
        if let Some(state) = odd.immunities[0].affliction.as_mut() {
            state.immunizable = false;
        }
        assert!(engine.evaluate(&odd, 0.8, |_| true).is_empty());
        assert!(engine.is_fired(&plague_key()));
    }

    #[test]
    fn test_threshold_not_reached_keeps_slot_armed() {
        let mut engine = AlertDeduplicator::new();
        let sick = patient(vec![losing_track("Plague", true)]);

        assert!(engine.evaluate(&sick, 0.9, |_| true).is_empty());
        assert!(!engine.is_fired(&plague_key()));
    }
}

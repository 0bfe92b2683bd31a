// Host adapter: everything the prognosis core reads from, or hands to, the simulation.

use std::collections::HashSet;

use super::alerts::model::RiskAlert;
use super::error::HostError;
use super::model::{AfflictionKind, PatientId, PatientSnapshot, Tick};

/// Implemented by the simulation embedding the prognosis core.
///
/// All calls are made synchronously from the host's own callbacks, never
/// concurrently for one session.
pub trait Host {
    /// Current simulation tick (monotonic within a session)
    fn now(&self) -> Result<Tick, HostError>;

    /// Every living patient, wherever it is held
    fn alive_census(&self) -> Result<HashSet<PatientId>, HostError>;

    /// Snapshot of one patient, `None` if the host no longer knows it
    fn patient(&self, id: &PatientId) -> Result<Option<PatientSnapshot>, HostError>;

    /// Deliver a letter. Fire-and-forget.
    fn notify(&mut self, alert: RiskAlert) -> Result<(), HostError>;

    /// Whether the affliction is still present and not yet beaten on the patient.
    fn has_active_affliction(
        &self,
        patient: &PatientId,
        affliction: &AfflictionKind,
    ) -> Result<bool, HostError> {
        let Some(snapshot) = self.patient(patient)? else {
            return Ok(false);
        };
        if snapshot.dead {
            return Ok(false);
        }
        Ok(snapshot
            .track(affliction)
            .map(|track| track.is_active())
            .unwrap_or(false))
    }
}

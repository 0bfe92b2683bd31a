// Trigger evaluation for the at-risk alert.
//
// The trigger only decides whether the condition holds right now. Whether a
// letter actually goes out is up to the engine's fired-set.

use super::model::RiskAlert;
use crate::core::forecast::{is_at_risk, ForecastInput};
use crate::core::model::{AfflictionState, ImmunityTrack, PatientSnapshot};

/// Context provided to the trigger for one affliction
pub struct TriggerContext<'a> {
    pub patient: &'a PatientSnapshot,
    /// Immunity progress for the affliction
    pub track: &'a ImmunityTrack,
    /// The affliction itself, known to be present
    pub state: &'a AfflictionState,
    /// Severity fraction at which the alert becomes eligible
    pub threshold: f32,
}

impl TriggerContext<'_> {
    pub fn forecast_input(&self) -> ForecastInput {
        ForecastInput::new(
            self.track.immunity,
            self.track.immunity_per_day,
            self.state.severity,
            self.state.severity_per_day,
        )
    }
}

/// Returns the letter to send if the affliction is at risk and past the
/// severity threshold, None otherwise.
pub fn evaluate_at_risk(ctx: &TriggerContext) -> Option<RiskAlert> {
    if ctx.state.severity < ctx.threshold {
        return None;
    }
    if !is_at_risk(&ctx.forecast_input()) {
        return None;
    }

    Some(RiskAlert::at_risk(
        &ctx.patient.label,
        ctx.patient.id.clone(),
        ctx.track.kind.clone(),
        &ctx.track.label,
        ctx.state.severity,
    ))
}

// Session coordinator: the explicit adapter the host calls into.
//
// Every entry point swallows failures after logging them. A failing callback
// degrades to "nothing happened this pulse" and is re-evaluated next time.

use super::alerts::engine::AlertDeduplicator;
use super::config::PrognosisSettings;
use super::error::Result;
use super::forecast::{classify, ForecastInput, Verdict};
use super::host::Host;
use super::memory::store::{CleanupSchedule, TreatmentMemory};
use super::model::{AfflictionKind, PatientId, PatientSnapshot, TreatmentEvent, TreatmentOutcome};

/// Prefix of the tooltip line.
const TOOLTIP_PREFIX: &str = "Prognosis: ";

/// One game session's prognosis state.
pub struct Prognosis {
    settings: PrognosisSettings,
    memory: TreatmentMemory,
    alerts: AlertDeduplicator,
    cleanup: CleanupSchedule,
}

impl Prognosis {
    pub fn new(settings: PrognosisSettings) -> Self {
        Self::with_memory(settings, TreatmentMemory::new())
    }

    /// Resume a session from a loaded treatment memory.
    pub fn with_memory(settings: PrognosisSettings, memory: TreatmentMemory) -> Self {
        let cleanup = CleanupSchedule::new(settings.cleanup_interval());
        Self {
            settings,
            memory,
            alerts: AlertDeduplicator::new(),
            cleanup,
        }
    }

    pub fn settings(&self) -> &PrognosisSettings {
        &self.settings
    }

    /// Swap in new settings (hot-reload friendly)
    pub fn update_settings(&mut self, settings: PrognosisSettings) {
        self.cleanup.set_interval(settings.cleanup_interval());
        self.settings = settings;
    }

    pub fn memory(&self) -> &TreatmentMemory {
        &self.memory
    }

    /// End the session, handing the memory to the save facility.
    pub fn into_memory(self) -> TreatmentMemory {
        self.memory
    }

    pub fn alerts(&self) -> &AlertDeduplicator {
        &self.alerts
    }

    /// Gate predicate under the current settings.
    pub fn meets_gate(
        &self,
        patient: Option<&PatientSnapshot>,
        affliction: &AfflictionKind,
    ) -> bool {
        self.memory.meets_gate(
            patient,
            affliction,
            self.settings.required_level(),
            self.settings.require_treatment_gate,
        )
    }

    /// A treatment job ended. Returns the number of afflictions recorded, or
    /// `None` if the host failed.
    pub fn on_treatment_completed<H: Host + ?Sized>(
        &mut self,
        host: &H,
        event: &TreatmentEvent,
    ) -> Option<usize> {
        match self.record_treatment(host, event) {
            Ok(recorded) => Some(recorded),
            Err(e) => {
                log::warn!("Skipping treatment record for {}: {}", event.patient, e);
                None
            }
        }
    }

    fn record_treatment<H: Host + ?Sized>(
        &mut self,
        host: &H,
        event: &TreatmentEvent,
    ) -> Result<usize> {
        if event.outcome != TreatmentOutcome::Succeeded {
            return Ok(0);
        }
        let Some(patient) = host.patient(&event.patient)? else {
            return Ok(0);
        };

        // An agent without skills still treated the patient, at level 0
        let level = event.doctor_skill.unwrap_or(0);
        let now = host.now()?;
        Ok(self
            .memory
            .record_treatment(&patient.id, level, patient.active_kinds(), now))
    }

    /// An affliction fully resolved outside the periodic sweep.
    pub fn on_affliction_resolved(
        &mut self,
        patient: &PatientId,
        affliction: &AfflictionKind,
    ) -> bool {
        self.memory.clear_for(patient, affliction)
    }

    /// Periodic health tick for one patient: runs the at-risk alert pass.
    /// Returns how many letters fired, or `None` if the host failed.
    pub fn on_evaluation_pulse<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        patient: &PatientId,
    ) -> Option<usize> {
        match self.evaluate_alerts(host, patient) {
            Ok(fired) => Some(fired),
            Err(e) => {
                log::warn!("Skipping alert evaluation for {}: {}", patient, e);
                None
            }
        }
    }

    fn evaluate_alerts<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        patient: &PatientId,
    ) -> Result<usize> {
        if !self.settings.enable_risk_alert {
            return Ok(0);
        }
        let Some(snapshot) = host.patient(patient)? else {
            return Ok(0);
        };

        let threshold = self.settings.alert_threshold();
        let required = self.settings.required_level();
        let gate_enabled = self.settings.require_treatment_gate;
        let memory = &self.memory;

        let alerts = self.alerts.evaluate(&snapshot, threshold, |kind| {
            memory.meets_gate(Some(&snapshot), kind, required, gate_enabled)
        });

        // Slots are already marked fired, a failed delivery is not retried
        let fired = alerts.len();
        for alert in alerts {
            if let Err(e) = host.notify(alert) {
                log::warn!("Risk alert for {} was not delivered: {}", patient, e);
            }
        }
        Ok(fired)
    }

    /// Verdict for one affliction, `Verdict::None` when no prognosis may be shown.
    pub fn forecast<H: Host + ?Sized>(
        &self,
        host: &H,
        patient: &PatientId,
        affliction: &AfflictionKind,
    ) -> Verdict {
        match self.try_forecast(host, patient, affliction) {
            Ok(verdict) => verdict,
            Err(e) => {
                log::warn!("No prognosis for {} / {}: {}", patient, affliction, e);
                Verdict::None
            }
        }
    }

    fn try_forecast<H: Host + ?Sized>(
        &self,
        host: &H,
        patient: &PatientId,
        affliction: &AfflictionKind,
    ) -> Result<Verdict> {
        let snapshot = host.patient(patient)?;
        if !self.meets_gate(snapshot.as_ref(), affliction) {
            return Ok(Verdict::None);
        }
        let Some(track) = snapshot.as_ref().and_then(|p| p.track(affliction)) else {
            return Ok(Verdict::None);
        };
        let Some(state) = track.affliction.as_ref() else {
            return Ok(Verdict::None);
        };
        // Fully immune: nothing left to forecast
        if track.immunity >= 1.0 {
            return Ok(Verdict::None);
        }

        Ok(classify(&ForecastInput::new(
            track.immunity,
            track.immunity_per_day,
            state.severity,
            state.severity_per_day,
        )))
    }

    /// Tooltip line for an affliction, e.g. "Prognosis: Likely immune".
    pub fn on_render_tooltip<H: Host + ?Sized>(
        &self,
        host: &H,
        patient: &PatientId,
        affliction: &AfflictionKind,
    ) -> Option<String> {
        self.forecast(host, patient, affliction)
            .label()
            .map(|label| format!("{TOOLTIP_PREFIX}{label}"))
    }

    /// Simulation tick: sweeps the treatment memory when the schedule is due.
    /// Returns the number of records removed, or `None` if the host failed.
    pub fn on_game_tick<H: Host + ?Sized>(&mut self, host: &H) -> Option<usize> {
        match self.sweep_memory(host) {
            Ok(removed) => Some(removed),
            Err(e) => {
                log::warn!("Skipping treatment memory cleanup: {}", e);
                None
            }
        }
    }

    fn sweep_memory<H: Host + ?Sized>(&mut self, host: &H) -> Result<usize> {
        let now = host.now()?;
        if !self.cleanup.due(now) {
            return Ok(0);
        }

        let alive = host.alive_census()?;
        let removed = self.memory.run_periodic_cleanup(&alive, |patient, affliction| {
            match host.has_active_affliction(patient, affliction) {
                Ok(active) => active,
                Err(e) => {
                    // Keep the record, the next sweep will decide
                    log::warn!("Could not check {} on {}: {}", affliction, patient, e);
                    true
                }
            }
        });

        if removed > 0 {
            log::info!(
                "Treatment memory cleanup at tick {} removed {} record(s), {} left",
                now,
                removed,
                self.memory.len()
            );
        }
        Ok(removed)
    }
}

/// Append a line to an existing tooltip, newline separated.
pub fn append_tooltip_line(tooltip: &mut String, line: &str) {
    if line.is_empty() {
        return;
    }
    if !tooltip.is_empty() {
        tooltip.push('\n');
    }
    tooltip.push_str(line);
}

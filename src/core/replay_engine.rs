use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::alerts::model::RiskAlert;
use super::coordinator::Prognosis;
use super::error::{HostError, Result};
use super::host::Host;
use super::model::{AfflictionKind, PatientId, PatientSnapshot, Tick, TreatmentEvent};

/// A recorded host timeline, replayed frame by frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    pub frames: Vec<Frame>,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// World state at one tick plus the callbacks that happened on it.
///
/// `patients` is the complete set the host knows about; anyone missing is gone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    pub tick: Tick,
    #[serde(default)]
    pub patients: Vec<PatientSnapshot>,
    #[serde(default)]
    pub treatments: Vec<TreatmentEvent>,
    #[serde(default)]
    pub tooltips: Vec<TooltipRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipRequest {
    pub patient: PatientId,
    pub affliction: AfflictionKind,
}

/// Host stand-in serving the current frame.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    tick: Tick,
    patients: HashMap<PatientId, PatientSnapshot>,
    letters: Vec<RiskAlert>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_frame(&mut self, frame: &Frame) {
        self.tick = frame.tick;
        self.patients = frame
            .patients
            .iter()
            .map(|p| (p.id.clone(), p.clone()))
            .collect();
    }

    /// Letters delivered since the last call.
    pub fn take_letters(&mut self) -> Vec<RiskAlert> {
        std::mem::take(&mut self.letters)
    }

    pub fn living(&self) -> Vec<PatientId> {
        let mut ids: Vec<_> = self
            .patients
            .values()
            .filter(|p| !p.dead)
            .map(|p| p.id.clone())
            .collect();
        ids.sort();
        ids
    }
}

impl Host for ScriptedHost {
    fn now(&self) -> std::result::Result<Tick, HostError> {
        Ok(self.tick)
    }

    fn alive_census(&self) -> std::result::Result<HashSet<PatientId>, HostError> {
        Ok(self.living().into_iter().collect())
    }

    fn patient(&self, id: &PatientId) -> std::result::Result<Option<PatientSnapshot>, HostError> {
        Ok(self.patients.get(id).cloned())
    }

    fn notify(&mut self, alert: RiskAlert) -> std::result::Result<(), HostError> {
        self.letters.push(alert);
        Ok(())
    }
}

/// What happened while replaying one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub tick: Tick,
    /// Afflictions recorded by treatments on this frame
    pub recorded: usize,
    /// Records removed by the memory sweep
    pub swept: usize,
    pub alerts: Vec<RiskAlert>,
    pub tooltips: Vec<(TooltipRequest, Option<String>)>,
}

/// Drives a [`Prognosis`] session through a scenario.
pub struct ReplayEngine {
    frames: std::vec::IntoIter<Frame>,
    host: ScriptedHost,
    session: Prognosis,
}

impl ReplayEngine {
    pub fn new(scenario: Scenario, session: Prognosis) -> Self {
        Self {
            frames: scenario.frames.into_iter(),
            host: ScriptedHost::new(),
            session,
        }
    }

    pub fn session(&self) -> &Prognosis {
        &self.session
    }

    pub fn into_session(self) -> Prognosis {
        self.session
    }

    /// Replay the next frame in callback order: treatments, game tick,
    /// per-patient pulses, tooltips.
    pub fn step(&mut self) -> Option<FrameReport> {
        let frame = self.frames.next()?;
        self.host.load_frame(&frame);

        let mut report = FrameReport {
            tick: frame.tick,
            ..FrameReport::default()
        };

        for event in &frame.treatments {
            report.recorded += self
                .session
                .on_treatment_completed(&self.host, event)
                .unwrap_or(0);
        }

        report.swept = self.session.on_game_tick(&self.host).unwrap_or(0);

        for patient in self.host.living() {
            self.session.on_evaluation_pulse(&mut self.host, &patient);
        }
        report.alerts = self.host.take_letters();

        for request in frame.tooltips {
            let line = self
                .session
                .on_render_tooltip(&self.host, &request.patient, &request.affliction);
            report.tooltips.push((request, line));
        }

        Some(report)
    }
}

impl Iterator for ReplayEngine {
    type Item = FrameReport;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

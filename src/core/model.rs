use std::fmt;

use serde::{Deserialize, Serialize};

/// Simulation time, in host ticks.
pub type Tick = i64;

/// Opaque, save-stable identity of a patient (the host's unique load id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of affliction (the host's definition name, e.g. "Plague").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AfflictionKind(String);

impl AfflictionKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty kind stands for "no definition", which never passes the gate.
    pub fn is_unspecified(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AfflictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AfflictionKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

/// Live state of an affliction that is currently present on a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfflictionState {
    /// Current severity, 0..1 of the fatal maximum
    pub severity: f32,
    pub severity_per_day: f32,
    /// Whether the affliction takes part in an immunity race at all
    #[serde(default = "default_immunizable")]
    pub immunizable: bool,
    #[serde(default)]
    pub fully_immune: bool,
}

fn default_immunizable() -> bool {
    true
}

/// One entry of a patient's immunity list.
///
/// The host keeps immunity progress around after the affliction itself is gone,
/// so `affliction` is `None` once the episode has ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmunityTrack {
    pub kind: AfflictionKind,
    /// Human readable label, lower case (e.g. "flu")
    pub label: String,
    pub immunity: f32,
    pub immunity_per_day: f32,
    #[serde(default)]
    pub affliction: Option<AfflictionState>,
}

impl ImmunityTrack {
    /// Present, immunizable and not yet beaten.
    pub fn is_active(&self) -> bool {
        self.affliction
            .as_ref()
            .map(|a| a.immunizable && !a.fully_immune)
            .unwrap_or(false)
    }
}

/// Read-only view of a patient, as supplied by the host for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub id: PatientId,
    /// Per-session numeric id, used for alert bookkeeping
    pub numeric_id: u64,
    /// Short display name
    pub label: String,
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub immunities: Vec<ImmunityTrack>,
}

impl PatientSnapshot {
    pub fn track(&self, kind: &AfflictionKind) -> Option<&ImmunityTrack> {
        self.immunities.iter().find(|t| &t.kind == kind)
    }

    /// Kinds of every affliction still worth remembering a treatment for.
    pub fn active_kinds(&self) -> impl Iterator<Item = &AfflictionKind> {
        self.immunities
            .iter()
            .filter(|t| t.is_active())
            .map(|t| &t.kind)
    }
}

/// How a treatment job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreatmentOutcome {
    Succeeded,
    Incompletable,
    Interrupted,
    Errored,
}

/// A treatment action that has just concluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentEvent {
    pub patient: PatientId,
    /// Medicine skill of the treating agent. `None` when it has no skills at all.
    #[serde(default)]
    pub doctor_skill: Option<i32>,
    pub outcome: TreatmentOutcome,
}

/// Upper-cases the first character, as used for titles.
pub fn capitalize_first(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

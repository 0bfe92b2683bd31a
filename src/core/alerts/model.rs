// Alert model types for de-duplication and delivery.

use serde::{Deserialize, Serialize};

use crate::core::model::{capitalize_first, AfflictionKind, PatientId};

/// Identifies one alert episode slot. Uses the per-session numeric id, so it
/// is only meaningful within a running session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertKey {
    pub patient: u64,
    pub affliction: AfflictionKind,
}

impl AlertKey {
    pub fn new(patient: u64, affliction: AfflictionKind) -> Self {
        Self { patient, affliction }
    }
}

/// Severity category hint for the host's notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlertSeverity {
    Neutral,
    ThreatSmall,
    /// Raid-style red letter
    #[default]
    ThreatBig,
}

/// Notification request handed to the host. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub title: String,
    pub body: String,
    pub severity: AlertSeverity,
    /// Patient the letter points at
    pub subject: PatientId,
    pub affliction: AfflictionKind,
}

impl RiskAlert {
    /// Build the at-risk letter for a patient. `severity` is the current
    /// fraction of maximum severity.
    pub fn at_risk(
        patient_label: &str,
        subject: PatientId,
        affliction: AfflictionKind,
        affliction_label: &str,
        severity: f32,
    ) -> Self {
        let label = if affliction_label.is_empty() {
            "a disease"
        } else {
            affliction_label
        };
        let title_label = if affliction_label.is_empty() {
            "Disease".to_string()
        } else {
            capitalize_first(affliction_label)
        };
        let percent = (severity * 100.0) as i32;

        Self {
            title: format!("At risk: {} - {}", patient_label, title_label),
            body: format!(
                "{} is at risk from {} (severity {}%).",
                patient_label, label, percent
            ),
            severity: AlertSeverity::ThreatBig,
            subject,
            affliction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_text() {
        let alert = RiskAlert::at_risk(
            "Ada",
            PatientId::new("Human_1"),
            AfflictionKind::new("Plague"),
            "plague",
            0.837,
        );
        assert_eq!(alert.title, "At risk: Ada - Plague");
        assert_eq!(alert.body, "Ada is at risk from plague (severity 83%).");
        assert_eq!(alert.severity, AlertSeverity::ThreatBig);
    }

    #[test]
    fn test_letter_without_label() {
        let alert = RiskAlert::at_risk(
            "Bo",
            PatientId::new("Human_2"),
            AfflictionKind::new("Mystery"),
            "",
            0.9,
        );
        assert_eq!(alert.title, "At risk: Bo - Disease");
        assert!(alert.body.contains("from a disease"));
    }
}

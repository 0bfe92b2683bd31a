use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

use super::model::Tick;

/// Highest skill level the host hands out.
pub const MAX_SKILL_LEVEL: i32 = 20;

/// Prognosis settings, persisted in settings.json.
/// Every field has a serde default so files from older versions still load.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PrognosisSettings {
    /// Require a sufficiently skilled treatment before a prognosis is shown
    pub require_treatment_gate: bool,
    /// Minimum treatment skill, 0..=20
    pub required_treatment_level: i32,
    /// Send a one-time letter when a disease is at risk past the threshold
    pub enable_risk_alert: bool,
    /// Alert once severity reaches this percentage, 0..=100
    pub risk_alert_severity_percent: i32,
    /// Ticks between treatment-memory sweeps (~hourly at normal speed)
    pub cleanup_interval_ticks: Tick,
}

impl Default for PrognosisSettings {
    fn default() -> Self {
        Self {
            require_treatment_gate: true,
            required_treatment_level: 12,
            enable_risk_alert: true,
            risk_alert_severity_percent: 80,
            cleanup_interval_ticks: 2500,
        }
    }
}

impl PrognosisSettings {
    pub fn required_level(&self) -> i32 {
        self.required_treatment_level.clamp(0, MAX_SKILL_LEVEL)
    }

    /// Alert threshold as a fraction of maximum severity.
    pub fn alert_threshold(&self) -> f32 {
        self.risk_alert_severity_percent.clamp(0, 100) as f32 / 100.0
    }

    pub fn cleanup_interval(&self) -> Tick {
        self.cleanup_interval_ticks.max(1)
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    pub fn load(&self) -> PrognosisSettings {
        if self.config_path.exists() {
            match fs::read_to_string(&self.config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => return settings,
                    Err(e) => log::warn!(
                        "Ignoring malformed settings at {:?}: {}",
                        self.config_path,
                        e
                    ),
                },
                Err(e) => log::warn!("Failed to read settings at {:?}: {}", self.config_path, e),
            }
        }
        PrognosisSettings::default()
    }

    pub fn save(&self, settings: &PrognosisSettings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());

        let default = manager.load();
        assert_eq!(default, PrognosisSettings::default());

        let new_settings = PrognosisSettings {
            require_treatment_gate: false,
            required_treatment_level: 6,
            risk_alert_severity_percent: 65,
            ..PrognosisSettings::default()
        };

        manager.save(&new_settings).unwrap();
        let loaded = manager.load();

        assert!(!loaded.require_treatment_gate);
        assert_eq!(loaded.required_treatment_level, 6);
        assert_eq!(loaded.risk_alert_severity_percent, 65);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("settings.json"),
            r#"{ "enable_risk_alert": false }"#,
        )
        .unwrap();

        let loaded = ConfigManager::new(dir.path().to_path_buf()).load();
        assert!(!loaded.enable_risk_alert);
        assert!(loaded.require_treatment_gate);
        assert_eq!(loaded.cleanup_interval_ticks, 2500);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

        let loaded = ConfigManager::new(dir.path().to_path_buf()).load();
        assert_eq!(loaded, PrognosisSettings::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = PrognosisSettings {
            required_treatment_level: 35,
            risk_alert_severity_percent: -10,
            cleanup_interval_ticks: 0,
            ..PrognosisSettings::default()
        };
        assert_eq!(settings.required_level(), 20);
        assert_eq!(settings.alert_threshold(), 0.0);
        assert_eq!(settings.cleanup_interval(), 1);

        assert!((PrognosisSettings::default().alert_threshold() - 0.8).abs() < f32::EPSILON);
    }
}

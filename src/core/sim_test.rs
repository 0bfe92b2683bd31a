#[cfg(test)]
mod sim_tests {
    use crate::core::config::PrognosisSettings;
    use crate::core::coordinator::Prognosis;
    use crate::core::memory::file::MemoryFile;
    use crate::core::model::{
        AfflictionKind, AfflictionState, ImmunityTrack, PatientId, PatientSnapshot, TreatmentEvent,
        TreatmentOutcome,
    };
    use crate::core::replay_engine::{Frame, ReplayEngine, Scenario, TooltipRequest};
    use tempfile::tempdir;

    fn plague(present: bool, immunity: f32, severity: f32) -> ImmunityTrack {
        ImmunityTrack {
            kind: AfflictionKind::new("Plague"),
            label: "plague".to_string(),
            immunity,
            immunity_per_day: 0.02,
            affliction: present.then(|| AfflictionState {
                severity,
                severity_per_day: 0.3,
                immunizable: true,
                fully_immune: false,
            }),
        }
    }

    fn patient(
        id: &str,
        numeric_id: u64,
        label: &str,
        tracks: Vec<ImmunityTrack>,
    ) -> PatientSnapshot {
        PatientSnapshot {
            id: PatientId::new(id),
            numeric_id,
            label: label.to_string(),
            dead: false,
            immunities: tracks,
        }
    }

    fn treated(id: &str, skill: i32) -> TreatmentEvent {
        TreatmentEvent {
            patient: PatientId::new(id),
            doctor_skill: Some(skill),
            outcome: TreatmentOutcome::Succeeded,
        }
    }

    fn frame(tick: i64, patients: Vec<PatientSnapshot>, treatments: Vec<TreatmentEvent>) -> Frame {
        Frame {
            tick,
            patients,
            treatments,
            tooltips: vec![TooltipRequest {
                patient: PatientId::new("Human_1"),
                affliction: AfflictionKind::new("Plague"),
            }],
        }
    }

    #[test]
    fn simulate_plague_episode_and_recurrence() {
        let scenario = Scenario {
            frames: vec![
                // Sick but untreated: no prognosis, no letter
                frame(
                    100,
                    vec![patient("Human_1", 1, "Ada", vec![plague(true, 0.1, 0.85)])],
                    vec![],
                ),
                // Skilled treatment: prognosis shows, letter fires once
                frame(
                    200,
                    vec![patient("Human_1", 1, "Ada", vec![plague(true, 0.1, 0.86)])],
                    vec![treated("Human_1", 14)],
                ),
                frame(
                    300,
                    vec![patient("Human_1", 1, "Ada", vec![plague(true, 0.12, 0.9)])],
                    vec![],
                ),
                // Recovered: the slot re-arms
                frame(
                    400,
                    vec![patient("Human_1", 1, "Ada", vec![plague(false, 0.3, 0.0)])],
                    vec![],
                ),
                // Reinfected and treated again: a new episode alerts again
                frame(
                    500,
                    vec![patient("Human_1", 1, "Ada", vec![plague(true, 0.1, 0.85)])],
                    vec![treated("Human_1", 14)],
                ),
            ],
        };

        let reports: Vec<_> =
            ReplayEngine::new(scenario, Prognosis::new(PrognosisSettings::default())).collect();

        assert_eq!(reports.len(), 5);
        assert!(reports[0].alerts.is_empty());
        assert_eq!(reports[0].tooltips[0].1, None);

        assert_eq!(reports[1].alerts.len(), 1);
        assert_eq!(reports[1].alerts[0].body, "Ada is at risk from plague (severity 86%).");
        assert_eq!(reports[1].tooltips[0].1.as_deref(), Some("Prognosis: At risk"));

        assert!(reports[2].alerts.is_empty());
        assert!(reports[3].alerts.is_empty());
        assert_eq!(reports[3].tooltips[0].1, None);

        assert_eq!(reports[4].alerts.len(), 1);
    }

    #[test]
    fn simulate_save_and_resume_session() {
        let dir = tempdir().unwrap();
        let save = MemoryFile::new(dir.path().join("prognosis.json"));

        let first_half = Scenario {
            frames: vec![frame(
                100,
                vec![
                    patient("Human_1", 1, "Ada", vec![plague(true, 0.1, 0.5)]),
                    patient("Human_2", 2, "Bo", vec![plague(true, 0.1, 0.5)]),
                ],
                vec![treated("Human_1", 16), treated("Human_2", 4)],
            )],
        };
        let mut engine =
            ReplayEngine::new(first_half, Prognosis::new(PrognosisSettings::default()));
        engine.by_ref().for_each(drop);
        let memory = engine.into_session().into_memory();
        assert_eq!(memory.len(), 2);
        save.save(&memory).unwrap();

        // Reload in a new process; Bo has left the world by the first sweep
        let restored = save.load().unwrap();
        assert_eq!(restored, memory);

        let second_half = Scenario {
            frames: vec![frame(
                2600,
                vec![patient("Human_1", 7, "Ada", vec![plague(true, 0.1, 0.55)])],
                vec![],
            )],
        };
        let mut engine = ReplayEngine::new(
            second_half,
            Prognosis::with_memory(PrognosisSettings::default(), restored),
        );
        let report = engine.step().unwrap();

        assert_eq!(report.swept, 1);
        assert_eq!(report.tooltips[0].1.as_deref(), Some("Prognosis: At risk"));
        assert_eq!(engine.session().memory().len(), 1);
    }
}

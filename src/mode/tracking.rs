//! Tracking mode: whole-frame worker tally, sampled into the compliance
//! ledger once per sampling interval.
//!
//! `frame_delay` counts ticks since the last sample; when it exceeds the
//! configured interval the current worker count becomes one `LedgerRow` and
//! the counter resets. A ledger write failure is reported on the status
//! channel and never stops the session; the in-memory rows survive, so the
//! next successful write restores a complete snapshot.

use super::tally_persons;
use crate::compliance::{AlertPolicy, PersonRecord};
use crate::config::TrackingSettings;
use crate::ledger::{ComplianceLedger, LedgerRow};
use crate::render::{FramePayload, Highlight, TextLine};

/// Cross-tick state for one Tracking session.
pub struct TrackingState {
    /// Ticks accumulated since the last sample.
    pub frame_delay: u32,
    /// Samples taken this session.
    pub sample_count: u32,
    pub ledger: ComplianceLedger,
}

impl TrackingState {
    pub fn new(ledger: ComplianceLedger) -> Self {
        Self {
            frame_delay: 0,
            sample_count: 0,
            ledger,
        }
    }
}

pub(super) fn run(
    state: &mut TrackingState,
    persons: &[PersonRecord],
    policy: &AlertPolicy,
    settings: &TrackingSettings,
) -> FramePayload {
    let mut payload = FramePayload::default();
    state.frame_delay += 1;

    let (worker_count, _alert_count) = tally_persons(persons, policy, &mut payload);

    if state.frame_delay > settings.sample_interval {
        state.sample_count += 1;
        state.frame_delay = 0;
        let row = LedgerRow::new(worker_count, settings.required_workers);
        if let Err(e) = state.ledger.append(row) {
            log::warn!("ledger write failed: {:#}", e);
            payload.lines.push(TextLine {
                text: format!("Ledger write failed: {}", e),
                highlight: Highlight::Alert,
            });
        }
    }

    payload.lines.push(TextLine::pass_fail(
        format!("Number of workers: {}", worker_count),
        true,
    ));
    payload.lines.push(TextLine::neutral(format!(
        "Number of samples: {}",
        state.sample_count
    )));
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::ComplianceMap;
    use crate::detect::{BoundingBox, ObjectClass};
    use crate::ledger::WorkerState;
    use std::collections::BTreeSet;

    fn crew(size: usize) -> Vec<PersonRecord> {
        let items: BTreeSet<ObjectClass> =
            [ObjectClass::Helmet, ObjectClass::SafetyVest].into_iter().collect();
        (0..size)
            .map(|i| PersonRecord {
                bounds: BoundingBox::new(i as i32 * 100, 0, i as i32 * 100 + 50, 200),
                compliance: ComplianceMap::from_items(&items),
            })
            .collect()
    }

    fn settings(dir: &std::path::Path) -> TrackingSettings {
        TrackingSettings {
            sample_interval: 33,
            required_workers: 5,
            ledger_path: dir.join("ledger.csv"),
        }
    }

    #[test]
    fn sampling_fires_once_per_interval_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let mut state = TrackingState::new(ComplianceLedger::new(&settings.ledger_path));
        let policy = AlertPolicy::default();
        let persons = crew(5);

        for tick in 1..=33 {
            run(&mut state, &persons, &policy, &settings);
            assert_eq!(state.sample_count, 0, "no sample through tick {}", tick);
        }
        run(&mut state, &persons, &policy, &settings);
        assert_eq!(state.sample_count, 1);
        assert_eq!(state.frame_delay, 0);
        assert_eq!(state.ledger.len(), 1);
    }

    #[test]
    fn forty_tick_session_yields_exactly_one_normal_row() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let mut state = TrackingState::new(ComplianceLedger::new(&settings.ledger_path));
        let policy = AlertPolicy::default();
        let persons = crew(5);

        for _ in 0..40 {
            run(&mut state, &persons, &policy, &settings);
        }
        assert_eq!(state.sample_count, 1);
        assert_eq!(state.ledger.len(), 1);
        assert_eq!(state.ledger.rows()[0].worker_count, 5);
        assert_eq!(state.ledger.rows()[0].state, WorkerState::Normal);
        // 6 ticks accumulated since the sample at tick 34.
        assert_eq!(state.frame_delay, 6);
    }

    #[test]
    fn sampled_state_reflects_crew_size() {
        let dir = tempfile::tempdir().unwrap();
        let settings = TrackingSettings {
            sample_interval: 1,
            ..settings(dir.path())
        };
        let mut state = TrackingState::new(ComplianceLedger::new(&settings.ledger_path));
        let policy = AlertPolicy::default();

        for size in [5usize, 3, 7] {
            let persons = crew(size);
            run(&mut state, &persons, &policy, &settings);
            run(&mut state, &persons, &policy, &settings);
        }
        let states: Vec<WorkerState> = state.ledger.rows().iter().map(|r| r.state).collect();
        assert_eq!(
            states,
            vec![
                WorkerState::Normal,
                WorkerState::Missing,
                WorkerState::Redundant
            ]
        );
    }

    #[test]
    fn alert_persons_do_not_count_as_workers() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let mut state = TrackingState::new(ComplianceLedger::new(&settings.ledger_path));
        let policy = AlertPolicy::default();

        let mut persons = crew(3);
        persons.push(PersonRecord {
            bounds: BoundingBox::new(500, 0, 550, 200),
            compliance: ComplianceMap::default(),
        });

        let payload = run(&mut state, &persons, &policy, &settings);
        let worker_line = payload
            .lines
            .iter()
            .find(|l| l.text.starts_with("Number of workers"))
            .unwrap();
        assert_eq!(worker_line.text, "Number of workers: 3");
    }

    #[test]
    fn write_failure_is_reported_and_rows_survive() {
        let settings = TrackingSettings {
            sample_interval: 1,
            required_workers: 5,
            ledger_path: "/nonexistent-dir/ledger.csv".into(),
        };
        let mut state = TrackingState::new(ComplianceLedger::new(&settings.ledger_path));
        let policy = AlertPolicy::default();
        let persons = crew(5);

        run(&mut state, &persons, &policy, &settings);
        let payload = run(&mut state, &persons, &policy, &settings);
        assert!(payload
            .lines
            .iter()
            .any(|l| l.text.starts_with("Ledger write failed")));
        assert_eq!(state.sample_count, 1);
        assert_eq!(state.ledger.len(), 1);
    }
}

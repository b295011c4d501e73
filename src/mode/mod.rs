//! Operating modes and the per-tick controller.
//!
//! Four mutually exclusive modes share one preprocessing pipeline
//! (confidence filter, spatial association, compliance classification) and
//! diverge in what they do with the classified persons:
//!
//! - `Normal`: label every above-threshold detection, no compliance logic.
//! - `Detect`: whole-frame worker/alert tally, stateless across frames.
//! - `Inspection`: single checkpoint lane inside a fixed ROI, with a
//!   debounced occupant counter.
//! - `Tracking`: whole-frame worker tally sampled periodically into the
//!   compliance ledger.
//!
//! All cross-tick state lives in named fields on the per-mode state structs;
//! switching modes discards that state entirely. There are no automatic
//! transitions between modes.

mod detect;
mod inspection;
mod normal;
mod tracking;

pub use inspection::InspectionState;
pub use tracking::TrackingState;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::associate::associate;
use crate::compliance::{AlertPolicy, ComplianceMap, PersonRecord};
use crate::config::SentinelConfig;
use crate::detect::{filter_detections, Detection, Detector, ObjectClass};
use crate::frame::Frame;
use crate::ingest::{FrameRead, FrameSource};
use crate::ledger::ComplianceLedger;
use crate::render::{FramePayload, Highlight};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Detect,
    Inspection,
    Tracking,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Detect => "detect",
            Mode::Inspection => "inspection",
            Mode::Tracking => "tracking",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Mode::Normal),
            "detect" => Ok(Mode::Detect),
            "inspection" => Ok(Mode::Inspection),
            "tracking" => Ok(Mode::Tracking),
            other => Err(anyhow!("unknown mode selector: {}", other)),
        }
    }
}

/// Result of processing one tick.
pub enum TickOutput {
    /// One frame processed; hand the payload to the render sink.
    Frame(FramePayload),
    /// The stream is exhausted. The caller stops its loop and releases the
    /// source; `notices` go to the status channel.
    Stopped { notices: Vec<String> },
}

enum ModeState {
    Normal,
    Detect,
    Inspection(InspectionState),
    Tracking(TrackingState),
}

/// Session-scoped mode state machine. One tick processes one frame
/// end-to-end; mode switches reset all mode-local state.
pub struct ModeController {
    config: SentinelConfig,
    state: ModeState,
}

impl ModeController {
    pub fn new(config: SentinelConfig, mode: Mode) -> Self {
        let state = Self::fresh_state(mode, &config);
        Self { config, state }
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            ModeState::Normal => Mode::Normal,
            ModeState::Detect => Mode::Detect,
            ModeState::Inspection(_) => Mode::Inspection,
            ModeState::Tracking(_) => Mode::Tracking,
        }
    }

    /// Switch modes. All counters reset; a new Tracking session starts with
    /// an empty ledger, abandoning any partially-accumulated sample.
    pub fn select_mode(&mut self, mode: Mode) {
        self.state = Self::fresh_state(mode, &self.config);
    }

    /// Switch modes from an external selector string. An unknown selector
    /// is rejected without touching the current state.
    pub fn select_mode_str(&mut self, selector: &str) -> Result<()> {
        let mode = selector.parse::<Mode>()?;
        self.select_mode(mode);
        Ok(())
    }

    fn fresh_state(mode: Mode, config: &SentinelConfig) -> ModeState {
        match mode {
            Mode::Normal => ModeState::Normal,
            Mode::Detect => ModeState::Detect,
            Mode::Inspection => ModeState::Inspection(InspectionState::new()),
            Mode::Tracking => ModeState::Tracking(TrackingState::new(
                ComplianceLedger::new(config.tracking.ledger_path.clone()),
            )),
        }
    }

    /// Inspection occupant counter, for callers that display it.
    pub fn inspection_state(&self) -> Option<&InspectionState> {
        match &self.state {
            ModeState::Inspection(state) => Some(state),
            _ => None,
        }
    }

    pub fn tracking_state(&self) -> Option<&TrackingState> {
        match &self.state {
            ModeState::Tracking(state) => Some(state),
            _ => None,
        }
    }

    /// Acquire one frame and run one synchronous end-to-end step.
    pub fn tick(
        &mut self,
        source: &mut dyn FrameSource,
        detector: &mut dyn Detector,
    ) -> Result<TickOutput> {
        match source.next_frame()? {
            FrameRead::EndOfStream => Ok(TickOutput::Stopped {
                notices: self.stop_notices(),
            }),
            FrameRead::Frame(frame) => {
                let payload = self.process_frame(&frame, detector)?;
                Ok(TickOutput::Frame(payload))
            }
        }
    }

    /// Process an already-acquired frame (one tick minus acquisition).
    pub fn process_frame(
        &mut self,
        frame: &Frame,
        detector: &mut dyn Detector,
    ) -> Result<FramePayload> {
        match &mut self.state {
            ModeState::Normal => {
                let detections = detector.detect(frame)?;
                let filtered = filter_detections(&detections, self.config.confidence_threshold);
                Ok(normal::run(&filtered))
            }
            ModeState::Detect => {
                let detections = detector.detect(frame)?;
                let persons = analyze(&detections, self.config.confidence_threshold);
                Ok(detect::run(&persons, &self.config.alert_policy))
            }
            ModeState::Inspection(state) => {
                inspection::run(state, frame, detector, &self.config)
            }
            ModeState::Tracking(state) => {
                let detections = detector.detect(frame)?;
                let persons = analyze(&detections, self.config.confidence_threshold);
                Ok(tracking::run(
                    state,
                    &persons,
                    &self.config.alert_policy,
                    &self.config.tracking,
                ))
            }
        }
    }

    fn stop_notices(&self) -> Vec<String> {
        let mut notices = vec!["Stopped video playback".to_string()];
        if let ModeState::Tracking(state) = &self.state {
            notices.push(format!(
                "Tracking ledger saved at '{}'",
                state.ledger.path().display()
            ));
        }
        notices
    }
}

/// Shared preprocessing: filter, associate, classify.
pub fn analyze(detections: &[Detection], threshold: f32) -> Vec<PersonRecord> {
    let filtered = filter_detections(detections, threshold);
    associate(&filtered)
        .into_iter()
        .map(|assoc| PersonRecord {
            bounds: assoc.bounds,
            compliance: ComplianceMap::from_items(&assoc.items),
        })
        .collect()
}

/// Tally classified persons into worker/alert counts and overlay each one.
/// Shared by Detect and Tracking.
fn tally_persons(
    persons: &[PersonRecord],
    policy: &AlertPolicy,
    payload: &mut FramePayload,
) -> (u32, u32) {
    let mut worker_count = 0u32;
    let mut alert_count = 0u32;
    for person in persons {
        if policy.is_alert(&person.compliance) {
            alert_count += 1;
            payload.push_overlay(person.bounds, "ALERT !!!", Highlight::Alert);
        } else {
            worker_count += 1;
            payload.push_overlay(person.bounds, "Worker", Highlight::Affirmative);
        }
    }
    (worker_count, alert_count)
}

/// One-shot still-image summary: per-class detection counts above the
/// threshold, formatted for the status panel.
pub fn summarize_detections(detections: &[Detection], threshold: f32) -> Vec<String> {
    let filtered = filter_detections(detections, threshold);
    let mut counts: BTreeMap<ObjectClass, usize> = BTreeMap::new();
    for det in &filtered {
        if let Some(class) = det.object_class() {
            *counts.entry(class).or_default() += 1;
        }
    }
    let mut lines = vec!["Detect:".to_string()];
    for (class, count) in counts {
        lines.push(format!("    {}: {}", class.label(), count));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{BoundingBox, ScriptedDetector};
    use crate::ingest::{FileConfig, FileSource};

    fn person_at(x1: i32, y1: i32, x2: i32, y2: i32) -> Detection {
        Detection::new(
            BoundingBox::new(x1, y1, x2, y2),
            ObjectClass::Person.class_id(),
            0.9,
        )
    }

    fn item(class: ObjectClass, x1: i32, y1: i32, x2: i32, y2: i32) -> Detection {
        Detection::new(BoundingBox::new(x1, y1, x2, y2), class.class_id(), 0.9)
    }

    #[test]
    fn mode_parses_known_selectors_only() {
        assert_eq!("Tracking".parse::<Mode>().unwrap(), Mode::Tracking);
        assert_eq!(" normal ".parse::<Mode>().unwrap(), Mode::Normal);
        assert!("replay".parse::<Mode>().is_err());
    }

    #[test]
    fn unknown_selector_leaves_state_untouched() {
        let mut controller = ModeController::new(SentinelConfig::default(), Mode::Inspection);
        assert!(controller.select_mode_str("replay").is_err());
        assert_eq!(controller.mode(), Mode::Inspection);
        assert!(controller.inspection_state().is_some());
    }

    #[test]
    fn switching_modes_resets_counters() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SentinelConfig::default();
        config.tracking.ledger_path = dir.path().join("ledger.csv");

        let mut controller = ModeController::new(config, Mode::Tracking);
        let frame = Frame::new(Vec::new(), 640, 480);
        let mut detector = ScriptedDetector::repeating(Vec::new(), 10);
        for _ in 0..10 {
            controller.process_frame(&frame, &mut detector).unwrap();
        }
        assert_eq!(controller.tracking_state().unwrap().frame_delay, 10);

        controller.select_mode(Mode::Tracking);
        assert_eq!(controller.tracking_state().unwrap().frame_delay, 0);
        assert!(controller.tracking_state().unwrap().ledger.is_empty());
    }

    #[test]
    fn analyze_classifies_each_person() {
        let detections = vec![
            person_at(0, 0, 100, 200),
            item(ObjectClass::Helmet, 10, 0, 60, 30),
            person_at(300, 0, 400, 200),
        ];
        let persons = analyze(&detections, 0.5);
        assert_eq!(persons.len(), 2);
        assert!(persons[0]
            .compliance
            .is_present(crate::compliance::PpeCategory::Helmet));
        assert!(persons[1]
            .compliance
            .entries()
            .all(|(_, present)| !present));
    }

    #[test]
    fn tick_reports_stopped_at_end_of_stream() {
        let mut source = FileSource::new(FileConfig {
            path: "stub://end".to_string(),
            target_fps: 30,
            frame_limit: 0,
        })
        .unwrap();
        let mut detector = ScriptedDetector::new(Vec::new());
        let mut controller = ModeController::new(SentinelConfig::default(), Mode::Normal);

        match controller.tick(&mut source, &mut detector).unwrap() {
            TickOutput::Stopped { notices } => {
                assert_eq!(notices, vec!["Stopped video playback".to_string()]);
            }
            TickOutput::Frame(_) => panic!("expected end of stream"),
        }
    }

    #[test]
    fn tracking_stop_notice_names_the_ledger_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SentinelConfig::default();
        config.tracking.ledger_path = dir.path().join("ledger.csv");

        let mut source = FileSource::new(FileConfig {
            path: "stub://end".to_string(),
            target_fps: 30,
            frame_limit: 0,
        })
        .unwrap();
        let mut detector = ScriptedDetector::new(Vec::new());
        let mut controller = ModeController::new(config, Mode::Tracking);

        match controller.tick(&mut source, &mut detector).unwrap() {
            TickOutput::Stopped { notices } => {
                assert_eq!(notices.len(), 2);
                assert!(notices[1].contains("ledger.csv"));
            }
            TickOutput::Frame(_) => panic!("expected end of stream"),
        }
    }

    #[test]
    fn summary_counts_classes_above_threshold() {
        let detections = vec![
            person_at(0, 0, 10, 10),
            person_at(20, 0, 30, 10),
            item(ObjectClass::Helmet, 0, 0, 5, 5),
            Detection::new(BoundingBox::new(0, 0, 5, 5), 4, 0.3),
        ];
        let lines = summarize_detections(&detections, 0.5);
        assert_eq!(lines[0], "Detect:");
        assert!(lines.contains(&"    Helmet: 1".to_string()));
        assert!(lines.contains(&"    Person: 2".to_string()));
    }
}

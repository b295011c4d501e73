//! Inspection mode: watch one checkpoint lane inside a fixed ROI.
//!
//! A person "occupies the lane" when their box spans nearly the full ROI
//! height (top edge above `lane_top_max`, bottom edge below
//! `lane_bottom_min`, in ROI coordinates). Successive occupants get
//! sequential ids without a persistent tracker: the counter advances only on
//! the occupied-to-empty transition between consecutive ticks.

use anyhow::Result;

use super::analyze;
use crate::compliance::PersonRecord;
use crate::config::SentinelConfig;
use crate::detect::Detector;
use crate::frame::Frame;
use crate::render::{FramePayload, Highlight, TextLine};

/// Cross-tick state for one Inspection session.
#[derive(Debug)]
pub struct InspectionState {
    /// Sequential id of the current/next lane occupant. Starts at 1.
    pub person_index: u32,
    /// Whether the previous tick had a lane occupant.
    pub last_person_detected: bool,
    /// Status text currently shown on the panel, if any.
    pub active_status: Option<String>,
}

impl InspectionState {
    pub fn new() -> Self {
        Self {
            person_index: 1,
            last_person_detected: false,
            active_status: None,
        }
    }
}

impl Default for InspectionState {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn run(
    state: &mut InspectionState,
    frame: &Frame,
    detector: &mut dyn Detector,
    config: &SentinelConfig,
) -> Result<FramePayload> {
    let roi_frame = frame.crop(config.inspection.roi.bounds());
    let detections = detector.detect(&roi_frame)?;
    let persons = analyze(&detections, config.confidence_threshold);

    let mut payload = FramePayload::default();
    let mut person_detected = false;

    for person in &persons {
        if !occupies_lane(person, config) {
            continue;
        }
        person_detected = true;
        payload.clear_panel = true;
        payload.lines.clear();
        payload
            .lines
            .push(TextLine::neutral(format!("Person #{}", state.person_index)));

        let mut status_parts = Vec::new();
        for (category, present) in person.compliance.entries() {
            let mark = if present { "pass" } else { "fail" };
            status_parts.push(format!("{} {}", category.label(), mark));
            payload.lines.push(TextLine::pass_fail(
                format!("{}: {}", category.label(), mark),
                present,
            ));
        }
        payload.push_overlay(
            person.bounds,
            format!("Person #{}", state.person_index),
            Highlight::Neutral,
        );
        state.active_status = Some(status_parts.join("; "));
    }

    if !person_detected && state.active_status.is_some() {
        // Occupant left: clear the published status.
        state.active_status = None;
        payload.clear_panel = true;
    }

    // Debounce: advance the id exactly on the occupied -> empty transition.
    if !person_detected && state.last_person_detected {
        state.person_index += 1;
    }
    state.last_person_detected = person_detected;

    Ok(payload)
}

fn occupies_lane(person: &PersonRecord, config: &SentinelConfig) -> bool {
    person.bounds.y1 < config.inspection.lane_top_max
        && person.bounds.y2 > config.inspection.lane_bottom_min
}

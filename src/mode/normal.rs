//! Normal mode: label every above-threshold detection, no compliance logic
//! and no state carried across frames.

use crate::detect::Detection;
use crate::render::{FramePayload, Highlight};

pub(super) fn run(filtered: &[Detection]) -> FramePayload {
    let mut payload = FramePayload::default();
    for det in filtered {
        let label = match det.object_class() {
            Some(class) => class.label().to_uppercase(),
            None => format!("CLASS {}", det.class_id),
        };
        payload.push_overlay(det.bounds, label, Highlight::Affirmative);
    }
    payload
}

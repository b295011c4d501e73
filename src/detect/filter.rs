//! Confidence filtering of raw detections.
//!
//! The cutoff is a strict `>`: detections exactly at the threshold are
//! discarded. The filter is pure and idempotent.

use super::Detection;

/// Keep only the detections with `confidence > threshold`.
pub fn filter_detections(detections: &[Detection], threshold: f32) -> Vec<Detection> {
    detections
        .iter()
        .filter(|det| det.confidence > threshold)
        .copied()
        .collect()
}

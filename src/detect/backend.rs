//! Detector seam.
//!
//! The detection model is an external collaborator. The core only depends on
//! the `Detector` trait; real model backends live outside this crate. Two
//! in-crate implementations exist for tests and the demo daemon:
//!
//! - `ScriptedDetector`: replays a pre-built per-frame script.
//! - `SyntheticDetector`: fabricates a deterministic crew of workers.

use std::collections::VecDeque;

use anyhow::Result;

use super::{BoundingBox, Detection, ObjectClass};
use crate::frame::Frame;

/// Produces one ordered detection list per frame.
///
/// Implementations must not retain the frame beyond the call.
pub trait Detector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;
}

/// Replays scripted detection lists, one per `detect` call. Once the script
/// runs out, every further frame detects nothing.
pub struct ScriptedDetector {
    script: VecDeque<Vec<Detection>>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Vec<Detection>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// A script that repeats the same detections for `ticks` frames.
    pub fn repeating(detections: Vec<Detection>, ticks: usize) -> Self {
        Self::new(vec![detections; ticks])
    }
}

impl Detector for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

/// Deterministic stand-in for a real model: a fixed crew of persons wearing
/// helmet and vest, laid out across the frame.
pub struct SyntheticDetector {
    workers: u32,
}

impl SyntheticDetector {
    pub fn new(workers: u32) -> Self {
        Self { workers }
    }
}

impl Detector for SyntheticDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        let width = frame.width() as i32;
        let height = frame.height() as i32;
        if width == 0 || height == 0 || self.workers == 0 {
            return Ok(Vec::new());
        }

        let slot = width / self.workers as i32;
        let mut detections = Vec::new();
        for i in 0..self.workers as i32 {
            let x1 = i * slot + slot / 8;
            let x2 = x1 + slot / 2;
            let person = BoundingBox::new(x1, height / 10, x2, height - height / 10);
            detections.push(Detection::new(person, ObjectClass::Person.class_id(), 0.9));
            // Gear overlapping the person box.
            let helmet = BoundingBox::new(x1, height / 10, x2, height / 5);
            detections.push(Detection::new(helmet, ObjectClass::Helmet.class_id(), 0.8));
            let vest = BoundingBox::new(x1, height / 3, x2, height / 2);
            detections.push(Detection::new(vest, ObjectClass::SafetyVest.class_id(), 0.8));
        }
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_detector_replays_then_goes_quiet() {
        let frame = Frame::new(Vec::new(), 4, 4);
        let det = Detection::new(BoundingBox::new(0, 0, 2, 2), 5, 0.9);
        let mut scripted = ScriptedDetector::new(vec![vec![det], vec![]]);
        assert_eq!(scripted.detect(&frame).unwrap().len(), 1);
        assert!(scripted.detect(&frame).unwrap().is_empty());
        assert!(scripted.detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn synthetic_detector_emits_one_person_per_worker() {
        let frame = Frame::new(Vec::new(), 640, 480);
        let mut synthetic = SyntheticDetector::new(5);
        let detections = synthetic.detect(&frame).unwrap();
        let persons = detections.iter().filter(|d| d.is_person()).count();
        assert_eq!(persons, 5);
    }
}

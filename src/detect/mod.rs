mod backend;
mod filter;
mod result;

pub use backend::{Detector, ScriptedDetector, SyntheticDetector};
pub use filter::filter_detections;
pub use result::{BoundingBox, Detection, ObjectClass};

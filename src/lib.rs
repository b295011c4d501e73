//! PPE Sentinel
//!
//! This crate turns a stream of per-frame object detections (bounding boxes,
//! class ids, confidence scores) into stateful personal-protective-equipment
//! compliance analytics.
//!
//! # Architecture
//!
//! Data flows one frame at a time through a fixed pipeline:
//!
//! 1. **Detection filter**: drop detections at or below the confidence
//!    threshold (strict `>`).
//! 2. **Spatial association**: pair PPE-item boxes with person boxes via
//!    inclusive rectangle overlap.
//! 3. **Compliance classification**: a fixed six-category boolean record per
//!    person.
//! 4. **Mode controller**: four mutually exclusive per-frame behaviors
//!    (Normal, Detect, Inspection, Tracking); Tracking periodically samples
//!    into the persisted compliance ledger.
//!
//! Processing is single-threaded and tick-driven: each tick synchronously
//! processes exactly one frame end-to-end before the next may fire. The
//! detection model, frame acquisition, and rendering are external
//! collaborators behind the `Detector` and `FrameSource` traits and the
//! `FramePayload` output.
//!
//! # Module Structure
//!
//! - `detect`: detection types, confidence filter, detector seam
//! - `associate`: person/item spatial association
//! - `compliance`: compliance map and the worker-vs-alert policy
//! - `mode`: the four-mode state machine and per-tick controller
//! - `ledger`: the persisted, full-snapshot compliance ledger
//! - `ingest`: frame sources
//! - `render`: payload handed to the render sink
//! - `config`: file/env configuration

pub mod associate;
pub mod compliance;
pub mod config;
pub mod detect;
pub mod frame;
pub mod ingest;
pub mod ledger;
pub mod mode;
pub mod render;

pub use associate::{associate, PersonAssociation};
pub use compliance::{AlertPolicy, ComplianceMap, PersonRecord, PpeCategory};
pub use config::{RoiRect, SentinelConfig};
pub use detect::{
    filter_detections, BoundingBox, Detection, Detector, ObjectClass, ScriptedDetector,
    SyntheticDetector,
};
pub use frame::Frame;
pub use ingest::{FileConfig, FileSource, FrameRead, FrameSource};
pub use ledger::{ComplianceLedger, LedgerRow, WorkerState};
pub use mode::{analyze, summarize_detections, Mode, ModeController, TickOutput};
pub use render::{FramePayload, Highlight, Overlay, TextLine};

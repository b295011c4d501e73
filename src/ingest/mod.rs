//! Frame sources.
//!
//! Frame acquisition is an external concern; the core consumes the
//! `FrameSource` trait one frame per tick. `FileSource` covers local files
//! and ships a deterministic synthetic backend for `stub://` paths, which
//! the daemon and tests use.

pub mod file;

pub use file::{FileConfig, FileSource};

use anyhow::Result;

use crate::frame::Frame;

/// Result of asking a source for the next frame.
pub enum FrameRead {
    Frame(Frame),
    /// The stream is exhausted. Not an error: the caller stops its tick
    /// loop and releases the source.
    EndOfStream,
}

pub trait FrameSource {
    fn next_frame(&mut self) -> Result<FrameRead>;
}

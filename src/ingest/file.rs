//! Local file frame source.
//!
//! Decoding real video requires an external decoder; this crate treats that
//! as a collaborator and only ships the synthetic `stub://` backend used by
//! the daemon and tests. The synthetic backend produces a bounded number of
//! deterministic frames and then reports end of stream.

use anyhow::{anyhow, Result};

use super::{FrameRead, FrameSource};
use crate::frame::Frame;

/// Configuration for a local file source.
#[derive(Clone, Debug)]
pub struct FileConfig {
    /// Local file path or `stub://<name>` for the synthetic backend.
    pub path: String,
    /// Nominal frame rate the tick loop should run at.
    pub target_fps: u32,
    /// Synthetic backend only: frames produced before end of stream.
    pub frame_limit: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            target_fps: 30,
            frame_limit: 300,
        }
    }
}

pub struct FileSource {
    backend: FileBackend,
}

enum FileBackend {
    Synthetic(SyntheticFileSource),
}

impl FileSource {
    pub fn new(config: FileConfig) -> Result<Self> {
        if !is_local_file_path(&config.path) {
            return Err(anyhow!(
                "file ingestion only supports local paths (no URL schemes)"
            ));
        }
        if config.path.starts_with("stub://") {
            Ok(Self {
                backend: FileBackend::Synthetic(SyntheticFileSource::new(config)),
            })
        } else {
            Err(anyhow!(
                "no decoder available for {}; use an external frame source",
                config.path
            ))
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            FileBackend::Synthetic(source) => source.connect(),
        }
    }

    pub fn stats(&self) -> FileStats {
        match &self.backend {
            FileBackend::Synthetic(source) => source.stats(),
        }
    }
}

impl FrameSource for FileSource {
    fn next_frame(&mut self) -> Result<FrameRead> {
        match &mut self.backend {
            FileBackend::Synthetic(source) => source.next_frame(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FileStats {
    pub frames_produced: u64,
    pub path: String,
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://)
// ----------------------------------------------------------------------------

struct SyntheticFileSource {
    config: FileConfig,
    frame_count: u64,
}

impl SyntheticFileSource {
    fn new(config: FileConfig) -> Self {
        Self {
            config,
            frame_count: 0,
        }
    }

    fn connect(&mut self) -> Result<()> {
        log::info!("FileSource: connected to {} (synthetic)", self.config.path);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<FrameRead> {
        if self.frame_count >= self.config.frame_limit {
            return Ok(FrameRead::EndOfStream);
        }
        self.frame_count += 1;

        let pixels = self.generate_synthetic_pixels();
        Ok(FrameRead::Frame(Frame::new(pixels, 640, 480)))
    }

    fn generate_synthetic_pixels(&self) -> Vec<u8> {
        let pixel_count = (640 * 480 * 3) as usize;
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.frame_count) % 256) as u8;
        }
        pixels
    }

    fn stats(&self) -> FileStats {
        FileStats {
            frames_produced: self.frame_count,
            path: self.config.path.clone(),
        }
    }
}

fn is_local_file_path(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    if path.starts_with("stub://") {
        return true;
    }
    !path.contains("://")
}

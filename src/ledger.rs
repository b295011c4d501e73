//! Persisted compliance ledger for Tracking sessions.
//!
//! The ledger is append-only in memory. Every append rewrites the whole CSV
//! file, so the persisted table is always a complete snapshot of everything
//! sampled so far even if the process dies before the next sample. Rewrite
//! cost grows with sample count, which is fine at roughly one sample per
//! second. A failed write keeps the in-memory rows; the next successful
//! write restores a complete file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

const TIMESTAMP_FORMAT: &str = "%B %d, %Y %H:%M:%S";

/// Crew-size state relative to the configured required head count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    Normal,
    Missing,
    Redundant,
}

impl WorkerState {
    /// Pure function of worker count vs required count.
    pub fn classify(worker_count: u32, required: u32) -> Self {
        if worker_count == required {
            WorkerState::Normal
        } else if worker_count < required {
            WorkerState::Missing
        } else {
            WorkerState::Redundant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Normal => "Normal",
            WorkerState::Missing => "Missing",
            WorkerState::Redundant => "Redundant",
        }
    }
}

/// One sampled observation. Never mutated once appended.
#[derive(Clone, Debug)]
pub struct LedgerRow {
    pub timestamp: DateTime<Local>,
    pub worker_count: u32,
    pub state: WorkerState,
}

impl LedgerRow {
    pub fn new(worker_count: u32, required: u32) -> Self {
        Self::at(Local::now(), worker_count, required)
    }

    pub fn at(timestamp: DateTime<Local>, worker_count: u32, required: u32) -> Self {
        Self {
            timestamp,
            worker_count,
            state: WorkerState::classify(worker_count, required),
        }
    }
}

/// In-memory ordered sequence of samples plus its persisted CSV snapshot.
pub struct ComplianceLedger {
    rows: Vec<LedgerRow>,
    path: PathBuf,
}

impl ComplianceLedger {
    /// A fresh, empty ledger for a new Tracking session.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            rows: Vec::new(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one row and rewrite the full snapshot. On write failure the
    /// row is retained in memory and the error is surfaced to the caller.
    pub fn append(&mut self, row: LedgerRow) -> Result<()> {
        self.rows.push(row);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("cannot open ledger file {}", self.path.display()))?;
        writer.write_record(["Date time", "Number of workers", "State"])?;
        for row in &self.rows {
            writer.write_record([
                row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                row.worker_count.to_string(),
                row.state.as_str().to_string(),
            ])?;
        }
        writer
            .flush()
            .with_context(|| format!("cannot flush ledger file {}", self.path.display()))?;
        Ok(())
    }
}

//! sentineld - PPE compliance analytics daemon
//!
//! This daemon:
//! 1. Loads configuration (file via SENTINEL_CONFIG, env overrides, CLI)
//! 2. Connects a frame source and a detector backend
//! 3. Runs the selected mode's tick loop at the source frame rate
//! 4. Logs each tick's status lines; Tracking persists the ledger
//! 5. Stops on end of stream or ctrl-c

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use ppe_sentinel::{
    FileConfig, FileSource, Mode, ModeController, SentinelConfig, SyntheticDetector, TickOutput,
};

#[derive(Parser, Debug)]
#[command(name = "sentineld", about = "PPE compliance analytics daemon")]
struct Args {
    /// Operating mode: normal, detect, inspection, or tracking.
    #[arg(long, default_value = "detect")]
    mode: String,

    /// Frame source path (stub://<name> for the synthetic source).
    #[arg(long, env = "SENTINEL_SOURCE")]
    source: Option<String>,

    /// Override the tracking ledger file.
    #[arg(long, env = "SENTINEL_LEDGER_PATH")]
    ledger: Option<PathBuf>,

    /// Synthetic source only: stop after this many frames.
    #[arg(long, default_value_t = 300)]
    frame_limit: u64,

    /// Synthetic detector: how many compliant workers to fabricate.
    #[arg(long, default_value_t = 5)]
    synthetic_workers: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mode: Mode = args.mode.parse()?;

    let mut config = SentinelConfig::load()?;
    if let Some(source) = args.source {
        config.source.path = source;
    }
    if let Some(ledger) = args.ledger {
        config.tracking.ledger_path = ledger;
    }

    let mut source = FileSource::new(FileConfig {
        path: config.source.path.clone(),
        target_fps: config.source.target_fps,
        frame_limit: args.frame_limit,
    })?;
    source.connect()?;

    let mut detector = SyntheticDetector::new(args.synthetic_workers);
    let mut controller = ModeController::new(config.clone(), mode);

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })?;

    let tick_interval = Duration::from_millis(1000 / u64::from(config.source.target_fps.max(1)));
    log::info!(
        "sentineld running: mode={}, source={}, ledger={}",
        mode,
        config.source.path,
        config.tracking.ledger_path.display()
    );

    let mut tick_count = 0u64;
    while running.load(Ordering::SeqCst) {
        match controller.tick(&mut source, &mut detector)? {
            TickOutput::Frame(payload) => {
                tick_count += 1;
                for line in &payload.lines {
                    log::info!("[tick {}] {}", tick_count, line.text);
                }
            }
            TickOutput::Stopped { notices } => {
                for notice in notices {
                    log::info!("{}", notice);
                }
                break;
            }
        }
        // Ticks are strictly serialized: one frame end-to-end, then sleep.
        std::thread::sleep(tick_interval);
    }

    log::info!(
        "sentineld stopped after {} ticks ({} frames produced)",
        tick_count,
        source.stats().frames_produced
    );
    Ok(())
}

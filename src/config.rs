use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::compliance::{AlertPolicy, PpeCategory};
use crate::detect::BoundingBox;

const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
const DEFAULT_ROI: RoiRect = RoiRect {
    x1: 610,
    y1: 17,
    x2: 1235,
    y2: 1080,
};
const DEFAULT_LANE_TOP_MAX: i32 = 50;
const DEFAULT_LANE_BOTTOM_MIN: i32 = 1050;
const DEFAULT_SAMPLE_INTERVAL: u32 = 33;
const DEFAULT_REQUIRED_WORKERS: u32 = 5;
const DEFAULT_LEDGER_PATH: &str = "tracking_state.csv";
const DEFAULT_SOURCE_PATH: &str = "stub://site_camera";
const DEFAULT_SOURCE_FPS: u32 = 30;

#[derive(Debug, Deserialize, Default)]
struct SentinelConfigFile {
    confidence_threshold: Option<f32>,
    inspection: Option<InspectionConfigFile>,
    tracking: Option<TrackingConfigFile>,
    alert_policy: Option<Vec<String>>,
    source: Option<SourceConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct InspectionConfigFile {
    roi: Option<RoiRect>,
    lane_top_max: Option<i32>,
    lane_bottom_min: Option<i32>,
}

#[derive(Debug, Deserialize, Default)]
struct TrackingConfigFile {
    sample_interval: Option<u32>,
    required_workers: Option<u32>,
    ledger_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    path: Option<String>,
    target_fps: Option<u32>,
}

/// ROI rectangle in full-frame pixel coordinates.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct RoiRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RoiRect {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x1, self.y1, self.x2, self.y2)
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}

#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Hard confidence cutoff (strict `>`), applied before everything else.
    pub confidence_threshold: f32,
    pub inspection: InspectionSettings,
    pub tracking: TrackingSettings,
    pub alert_policy: AlertPolicy,
    pub source: SourceSettings,
}

#[derive(Debug, Clone)]
pub struct InspectionSettings {
    /// Checkpoint lane crop, in full-frame coordinates.
    pub roi: RoiRect,
    /// A lane occupant's top edge must sit above this ROI row.
    pub lane_top_max: i32,
    /// A lane occupant's bottom edge must sit below this ROI row.
    pub lane_bottom_min: i32,
}

#[derive(Debug, Clone)]
pub struct TrackingSettings {
    /// Ticks between ledger samples.
    pub sample_interval: u32,
    /// Expected crew size on site.
    pub required_workers: u32,
    pub ledger_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub path: String,
    pub target_fps: u32,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            inspection: InspectionSettings {
                roi: DEFAULT_ROI,
                lane_top_max: DEFAULT_LANE_TOP_MAX,
                lane_bottom_min: DEFAULT_LANE_BOTTOM_MIN,
            },
            tracking: TrackingSettings {
                sample_interval: DEFAULT_SAMPLE_INTERVAL,
                required_workers: DEFAULT_REQUIRED_WORKERS,
                ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            },
            alert_policy: AlertPolicy::default(),
            source: SourceSettings {
                path: DEFAULT_SOURCE_PATH.to_string(),
                target_fps: DEFAULT_SOURCE_FPS,
            },
        }
    }
}

impl SentinelConfig {
    /// Load from the file named by `SENTINEL_CONFIG` (if set), then apply
    /// env overrides, then validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SENTINEL_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: SentinelConfigFile) -> Result<Self> {
        let defaults = Self::default();
        let inspection = InspectionSettings {
            roi: file
                .inspection
                .as_ref()
                .and_then(|i| i.roi)
                .unwrap_or(defaults.inspection.roi),
            lane_top_max: file
                .inspection
                .as_ref()
                .and_then(|i| i.lane_top_max)
                .unwrap_or(defaults.inspection.lane_top_max),
            lane_bottom_min: file
                .inspection
                .as_ref()
                .and_then(|i| i.lane_bottom_min)
                .unwrap_or(defaults.inspection.lane_bottom_min),
        };
        let tracking = TrackingSettings {
            sample_interval: file
                .tracking
                .as_ref()
                .and_then(|t| t.sample_interval)
                .unwrap_or(defaults.tracking.sample_interval),
            required_workers: file
                .tracking
                .as_ref()
                .and_then(|t| t.required_workers)
                .unwrap_or(defaults.tracking.required_workers),
            ledger_path: file
                .tracking
                .and_then(|t| t.ledger_path)
                .unwrap_or(defaults.tracking.ledger_path),
        };
        let alert_policy = match file.alert_policy {
            Some(names) => {
                let categories = names
                    .iter()
                    .map(|name| PpeCategory::parse(name))
                    .collect::<Result<Vec<_>>>()?;
                AlertPolicy::new(categories)?
            }
            None => defaults.alert_policy,
        };
        let source = SourceSettings {
            path: file
                .source
                .as_ref()
                .and_then(|s| s.path.clone())
                .unwrap_or(defaults.source.path),
            target_fps: file
                .source
                .and_then(|s| s.target_fps)
                .unwrap_or(defaults.source.target_fps),
        };
        Ok(Self {
            confidence_threshold: file
                .confidence_threshold
                .unwrap_or(defaults.confidence_threshold),
            inspection,
            tracking,
            alert_policy,
            source,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("SENTINEL_SOURCE") {
            if !path.trim().is_empty() {
                self.source.path = path;
            }
        }
        if let Ok(path) = std::env::var("SENTINEL_LEDGER_PATH") {
            if !path.trim().is_empty() {
                self.tracking.ledger_path = PathBuf::from(path);
            }
        }
        if let Ok(required) = std::env::var("SENTINEL_REQUIRED_WORKERS") {
            let parsed: u32 = required
                .parse()
                .map_err(|_| anyhow!("SENTINEL_REQUIRED_WORKERS must be an integer"))?;
            self.tracking.required_workers = parsed;
        }
        if let Ok(interval) = std::env::var("SENTINEL_SAMPLE_INTERVAL") {
            let parsed: u32 = interval
                .parse()
                .map_err(|_| anyhow!("SENTINEL_SAMPLE_INTERVAL must be an integer tick count"))?;
            self.tracking.sample_interval = parsed;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(anyhow!("confidence_threshold must be within [0, 1]"));
        }
        let roi = &self.inspection.roi;
        if roi.x2 <= roi.x1 || roi.y2 <= roi.y1 {
            return Err(anyhow!("inspection ROI must have positive area"));
        }
        if self.inspection.lane_top_max >= self.inspection.lane_bottom_min {
            return Err(anyhow!(
                "inspection lane_top_max must be above lane_bottom_min"
            ));
        }
        if self.inspection.lane_bottom_min > roi.height() {
            return Err(anyhow!("inspection lane_bottom_min exceeds ROI height"));
        }
        if self.tracking.sample_interval == 0 {
            return Err(anyhow!("tracking sample_interval must be >= 1"));
        }
        if self.tracking.required_workers == 0 {
            return Err(anyhow!("tracking required_workers must be >= 1"));
        }
        if self.source.target_fps == 0 {
            return Err(anyhow!("source target_fps must be >= 1"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<SentinelConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

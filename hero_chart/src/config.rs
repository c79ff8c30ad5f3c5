// hero_chart/src/config.rs

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::series::WalkParams;
use crate::theme::ThemeId;

/// Bump when you change config schema.
const CONFIG_VERSION: u32 = 1;

/// Env var that overrides the platform config location.
pub const CONFIG_ENV: &str = "HERO_CHART_CONFIG";

/// Narrower candles make the buffer grow without bound on wide surfaces.
pub const MIN_CANDLE_WIDTH: f32 = 1.0;
/// Pixels per millisecond.
pub const MAX_SCROLL_SPEED: f32 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("candle_width must be finite and at least 1 px (got {0})")]
    CandleWidth(f32),
    #[error("scroll_speed must be within (0, 10] px/ms (got {0})")]
    ScrollSpeed(f32),
    #[error("body_ratio must be within (0, 1] (got {0})")]
    BodyRatio(f32),
    #[error("grid_spacing must be finite and positive (got {0})")]
    GridSpacing(f32),
    #[error("price_padding must be finite and non-negative (got {0})")]
    PricePadding(f64),
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("window size must be finite and positive (got {width}x{height})")]
    WindowSize { width: f32, height: f32 },
    #[error("steady_overscan ({steady}) must not exceed initial_overscan ({initial})")]
    Overscan { initial: usize, steady: usize },
    #[error("lower_bound ({lower}) must be below upper_bound ({upper})")]
    Bounds { lower: f64, upper: f64 },
    #[error("fallback price range {min}..{max} is empty")]
    FallbackRange { min: f64, max: f64 },
    #[error("flip_probability must be within 0..=1 (got {0})")]
    FlipProbability(f64),
    #[error("moving average periods must be non-empty and non-zero")]
    MovingAverages,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    pub version: u32,

    // --- geometry / motion ---
    pub candle_width: f32,
    /// Pixels per millisecond.
    pub scroll_speed: f32,
    pub body_ratio: f32,
    pub initial_overscan: usize,
    pub steady_overscan: usize,

    // --- grid ---
    pub grid_spacing: f32,
    pub horizontal_divisions: u32,

    // --- vertical scale ---
    pub price_padding: f64,
    pub fallback_min: f64,
    pub fallback_max: f64,

    pub ma_periods: Vec<usize>,
    pub theme: String,

    // --- price walk ---
    pub volatility: f64,
    pub bias: f64,
    pub wick_ratio: f64,
    pub flip_probability: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub start_price: f64,
    pub start_spread: f64,
    pub seed: Option<u64>,

    // --- window ---
    pub window_width_px: f32,
    pub window_height_px: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,

            candle_width: 4.0,
            scroll_speed: 0.04,
            body_ratio: 0.7,
            initial_overscan: 10,
            steady_overscan: 5,

            grid_spacing: 40.0,
            horizontal_divisions: 5,

            price_padding: 0.1,
            fallback_min: 90.0,
            fallback_max: 110.0,

            ma_periods: vec![5, 10, 20],
            theme: ThemeId::Brand.label().to_string(),

            volatility: 3.0,
            bias: 0.1,
            wick_ratio: 0.3,
            flip_probability: 0.1,
            upper_bound: 120.0,
            lower_bound: 80.0,
            start_price: 100.0,
            start_spread: 10.0,
            seed: None,

            window_width_px: 960.0,
            window_height_px: 360.0,
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.candle_width.is_finite() && self.candle_width >= MIN_CANDLE_WIDTH) {
            return Err(ConfigError::CandleWidth(self.candle_width));
        }
        if !(self.scroll_speed > 0.0 && self.scroll_speed <= MAX_SCROLL_SPEED) {
            return Err(ConfigError::ScrollSpeed(self.scroll_speed));
        }
        if !(self.body_ratio > 0.0 && self.body_ratio <= 1.0) {
            return Err(ConfigError::BodyRatio(self.body_ratio));
        }
        if !(self.grid_spacing.is_finite() && self.grid_spacing > 0.0) {
            return Err(ConfigError::GridSpacing(self.grid_spacing));
        }
        if !(self.price_padding.is_finite() && self.price_padding >= 0.0) {
            return Err(ConfigError::PricePadding(self.price_padding));
        }
        for (field, value) in [
            ("volatility", self.volatility),
            ("bias", self.bias),
            ("wick_ratio", self.wick_ratio),
            ("upper_bound", self.upper_bound),
            ("lower_bound", self.lower_bound),
            ("start_price", self.start_price),
            ("start_spread", self.start_spread),
            ("fallback_min", self.fallback_min),
            ("fallback_max", self.fallback_max),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        let (w, h) = (self.window_width_px, self.window_height_px);
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(ConfigError::WindowSize {
                width: w,
                height: h,
            });
        }
        if self.steady_overscan > self.initial_overscan {
            return Err(ConfigError::Overscan {
                initial: self.initial_overscan,
                steady: self.steady_overscan,
            });
        }
        if !(self.lower_bound < self.upper_bound) {
            return Err(ConfigError::Bounds {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        if !(self.fallback_min < self.fallback_max) {
            return Err(ConfigError::FallbackRange {
                min: self.fallback_min,
                max: self.fallback_max,
            });
        }
        if !(0.0..=1.0).contains(&self.flip_probability) {
            return Err(ConfigError::FlipProbability(self.flip_probability));
        }
        if self.ma_periods.is_empty() || self.ma_periods.contains(&0) {
            return Err(ConfigError::MovingAverages);
        }
        Ok(())
    }

    pub fn walk_params(&self) -> WalkParams {
        WalkParams {
            volatility: self.volatility,
            bias: self.bias,
            wick_ratio: self.wick_ratio,
            flip_probability: self.flip_probability,
            upper_bound: self.upper_bound,
            lower_bound: self.lower_bound,
            start_center: self.start_price,
            start_spread: self.start_spread,
        }
    }

    pub fn theme_id(&self) -> ThemeId {
        ThemeId::from_name(&self.theme)
    }

    /// Resolve the config path: `$HERO_CHART_CONFIG`, else the platform config dir.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            if !p.trim().is_empty() {
                return Ok(PathBuf::from(p));
            }
        }
        let proj = ProjectDirs::from("com", "xianhua", "hero_chart")
            .context("ProjectDirs::from returned None")?;
        Ok(proj.config_dir().join("config.json"))
    }

    /// Missing file → defaults. Corrupt file is archived, invalid values are
    /// rejected; both fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "no chart config, using defaults");
            return Self::default();
        }
        let mut cfg = match read_json::<ChartConfig>(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                archive_corrupt(path, &err);
                return Self::default();
            }
        };
        // simple migration hook
        if cfg.version == 0 {
            cfg.version = CONFIG_VERSION;
        }
        if let Err(err) = cfg.validate() {
            warn!(path = %path.display(), %err, "invalid chart config, using defaults");
            return Self::default();
        }
        cfg
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().context("config path has no parent")?;
        fs::create_dir_all(parent).with_context(|| format!("create config dir {:?}", parent))?;
        let json = serde_json::to_string_pretty(self)?;
        atomic_write(path, json.as_bytes())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("read {:?}", path))?;
    let value = serde_json::from_slice::<T>(&bytes).with_context(|| "parse json")?;
    Ok(value)
}

/// Move a corrupt config aside. Returns where it went, or `None` if it stayed.
fn archive_corrupt(path: &Path, err: &anyhow::Error) -> Option<PathBuf> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let archived = path.with_extension(format!("corrupt.{ts}.json"));
    match fs::rename(path, &archived) {
        Ok(()) => {
            warn!(error = ?err, archived = %archived.display(), "chart config corrupt; archived");
            Some(archived)
        }
        Err(rename_err) => {
            warn!(
                error = ?err,
                %rename_err,
                path = %path.display(),
                "chart config corrupt; could not archive it"
            );
            None
        }
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().context("no parent dir for config path")?;
    let tmp = dir.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    {
        let mut f = fs::File::create(&tmp).with_context(|| format!("create tmp {:?}", tmp))?;
        f.write_all(bytes).with_context(|| "write tmp")?;
        let _ = f.sync_all();
    }

    fs::rename(&tmp, path).with_context(|| format!("rename {:?} -> {:?}", tmp, path))?;
    Ok(())
}

//! Animated candlestick backdrop for the site hero banner.
//!
//! A soft-bounded random walk ([`series`]) feeds a conveyor-belt candle buffer
//! ([`state`]) that scrolls right-to-left at a wall-clock speed. [`scene`]
//! draws one frame onto any [`surface::Surface`]; [`animator`] owns the state
//! and runs the Running/Paused frame loop against a [`surface::FrameHost`].

pub mod animator;
pub mod config;
pub mod scene;
pub mod series;
pub mod state;
pub mod surface;
pub mod theme;

pub use animator::{Animator, LoopState};
pub use config::{ChartConfig, ConfigError};
pub use series::{Candle, CandleColor, PriceWalk, Trend, WalkParams};
pub use state::{moving_average, PriceRange, RenderState};
pub use surface::{FrameHost, PainterSurface, RecordingSurface, Surface};

// hero_chart/src/state.rs
//
// Render state for the hero chart: the conveyor-belt candle buffer plus the
// scroll/grid phases. Owned by exactly one animator; mutated once per frame.

use std::collections::VecDeque;

use crate::config::ChartConfig;
use crate::series::{Candle, PriceWalk};

/// Visible price window used for the vertical mapping. `span()` is never zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn span(&self) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            span
        } else {
            1.0
        }
    }

    /// Price → y pixel, top of the surface is `max`.
    pub fn to_y(&self, price: f64, height: f32) -> f32 {
        ((self.max - price) / self.span() * height as f64) as f32
    }
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    candle_width: f32,
    speed: f32,
    grid_spacing: f32,
    initial_overscan: usize,
    steady_overscan: usize,
    padding: f64,
    fallback: PriceRange,
}

#[derive(Debug, Clone)]
pub struct RenderState {
    candles: VecDeque<Candle>,
    walk: PriceWalk,
    scroll_offset: f64,
    grid_offset: f32,
    width: f32,
    height: f32,
    layout: Layout,
}

impl RenderState {
    /// Fill the buffer for a `width × height` surface: visible slots plus the
    /// initial overscan.
    pub fn new(cfg: &ChartConfig, walk: PriceWalk, width: f32, height: f32) -> Self {
        let layout = Layout {
            candle_width: cfg.candle_width,
            speed: cfg.scroll_speed,
            grid_spacing: cfg.grid_spacing,
            initial_overscan: cfg.initial_overscan,
            steady_overscan: cfg.steady_overscan,
            padding: cfg.price_padding,
            fallback: PriceRange {
                min: cfg.fallback_min,
                max: cfg.fallback_max,
            },
        };
        let mut state = Self {
            candles: VecDeque::new(),
            walk,
            scroll_offset: 0.0,
            grid_offset: 0.0,
            width: width.max(0.0),
            height: height.max(0.0),
            layout,
        };
        let target = state.visible_slots() + layout.initial_overscan;
        state.fill_to(target);
        state
    }

    pub fn candles(&self) -> &VecDeque<Candle> {
        &self.candles
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset as f32
    }

    pub fn grid_offset(&self) -> f32 {
        self.grid_offset
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn candle_width(&self) -> f32 {
        self.layout.candle_width
    }

    pub fn grid_spacing(&self) -> f32 {
        self.layout.grid_spacing
    }

    /// Candles needed to cover the surface width.
    pub fn visible_slots(&self) -> usize {
        (self.width / self.layout.candle_width).ceil() as usize
    }

    /// Buffer size maintained by the conveyor belt once warmed up.
    pub fn steady_capacity(&self) -> usize {
        self.visible_slots() + self.layout.steady_overscan
    }

    pub fn max_capacity(&self) -> usize {
        self.visible_slots() + self.layout.initial_overscan
    }

    fn fill_to(&mut self, target: usize) {
        while self.candles.len() < target {
            let c = self.walk.next_candle();
            self.candles.push_back(c);
        }
    }

    /// Advance both phases by `elapsed_ms × speed`. Negative or non-finite
    /// elapsed time counts as zero.
    pub fn scroll(&mut self, elapsed_ms: f64) {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        let dx = elapsed * self.layout.speed as f64;
        if !dx.is_finite() {
            return;
        }
        self.scroll_offset += dx;
        let spacing = self.layout.grid_spacing as f64;
        self.grid_offset = ((self.grid_offset as f64 + dx) % spacing) as f32;
    }

    /// Conveyor belt: for every whole candle width scrolled, evict the oldest
    /// candle and append a new one while below steady capacity. Leaves
    /// `scroll_offset` in `[0, candle_width)`. Returns the number of shifts.
    ///
    /// The remainder is taken in one step, and at most `max_capacity()`
    /// candles are cycled: past that every candle is new anyway.
    pub fn settle(&mut self) -> usize {
        let cw = self.layout.candle_width as f64;
        let offset = self.scroll_offset.max(0.0);
        let mut whole = (offset / cw).floor();
        let mut rem = offset % cw;
        // readers see the offset as f32; keep it strictly below one width there too
        if rem as f32 >= self.layout.candle_width {
            rem = 0.0;
            whole += 1.0;
        }
        self.scroll_offset = rem;

        // float → int casts saturate
        let shifts = whole as usize;
        for _ in 0..shifts.min(self.max_capacity()) {
            self.candles.pop_front();
            if self.candles.len() < self.steady_capacity() {
                let c = self.walk.next_candle();
                self.candles.push_back(c);
            }
        }
        shifts
    }

    /// Track a new surface size. Growing tops the buffer up to steady
    /// capacity; shrinking drops the oldest candles beyond max capacity.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let max = self.max_capacity();
        while self.candles.len() > max {
            self.candles.pop_front();
        }
        let steady = self.steady_capacity();
        self.fill_to(steady);
    }

    /// Min low / max high of the buffer, padded by a fraction of the span
    /// (1.0 when flat). Falls back to the configured range when empty.
    pub fn price_range(&self) -> PriceRange {
        if self.candles.is_empty() {
            return self.layout.fallback;
        }
        let lo = self.candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let hi = self
            .candles
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let mut pad = (hi - lo) * self.layout.padding;
        if !(pad > 0.0) {
            pad = 1.0;
        }
        PriceRange {
            min: lo - pad,
            max: hi + pad,
        }
    }

    /// Center x of the candle at `index` (oldest = 0). Newest sits at the
    /// right edge minus the in-progress scroll offset.
    pub fn candle_x(&self, index: usize) -> f32 {
        let from_right = self.candles.len().saturating_sub(1 + index) as f32;
        self.width - self.scroll_offset as f32 - from_right * self.layout.candle_width
    }

    pub fn is_visible_x(&self, x: f32) -> bool {
        let cw = self.layout.candle_width;
        x > -cw && x < self.width + cw
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

/// Trailing simple moving average over full windows; `None` until the first
/// window fills.
pub fn moving_average(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }
    let mut out = Vec::with_capacity(closes.len());
    let mut sum = 0.0;
    for (i, close) in closes.iter().enumerate() {
        sum += close;
        if i >= period {
            sum -= closes[i - period];
        }
        if i + 1 >= period {
            out.push(Some(sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

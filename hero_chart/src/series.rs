// hero_chart/src/series.rs
//
// Synthetic price series: a biased random walk that emits one candle per tick.
// The walk is soft-bounded: past either bound the trend is forced back toward
// center and the step is reflected, so the price never overshoots a bound by
// more than one step.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn sign(self) -> f64 {
        match self {
            Trend::Up => 1.0,
            Trend::Down => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Trend::Up => Trend::Down,
            Trend::Down => Trend::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleColor {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub color: CandleColor,
}

impl Candle {
    pub fn is_up(&self) -> bool {
        self.color == CandleColor::Up
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    pub volatility: f64,
    /// Drift added to the centered uniform draw, scaled by the trend sign.
    pub bias: f64,
    /// Wick jitter as a fraction of volatility.
    pub wick_ratio: f64,
    pub flip_probability: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub start_center: f64,
    pub start_spread: f64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            volatility: 3.0,
            bias: 0.1,
            wick_ratio: 0.3,
            flip_probability: 0.1,
            upper_bound: 120.0,
            lower_bound: 80.0,
            start_center: 100.0,
            start_spread: 10.0,
        }
    }
}

impl WalkParams {
    /// Largest absolute open→close move a single step can produce.
    pub fn max_step(&self) -> f64 {
        (0.5 + self.bias.abs()) * self.volatility.abs()
    }
}

/// Uniform draws in [0, 1) consumed by one step.
#[derive(Debug, Clone, Copy)]
pub struct Draws {
    pub body: f64,
    pub flip: f64,
    pub wick_high: f64,
    pub wick_low: f64,
}

impl Draws {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            body: rng.gen(),
            flip: rng.gen(),
            wick_high: rng.gen(),
            wick_low: rng.gen(),
        }
    }
}

/// One tick of the walk: `(candle, new_price, new_trend)`.
pub fn step(params: &WalkParams, price: f64, trend: Trend, draws: Draws) -> (Candle, f64, Trend) {
    let open = price;
    let above = open > params.upper_bound;
    let below = open < params.lower_bound;

    let mut delta = (draws.body - 0.5 + trend.sign() * params.bias) * params.volatility;
    if above {
        delta = -delta.abs();
    } else if below {
        delta = delta.abs();
    }
    let close = open + delta;

    let mut next_trend = if draws.flip < params.flip_probability {
        trend.flipped()
    } else {
        trend
    };
    if above {
        next_trend = Trend::Down;
    } else if below {
        next_trend = Trend::Up;
    }

    let jitter = params.volatility.abs() * params.wick_ratio.abs();
    let candle = Candle {
        open,
        high: open.max(close) + draws.wick_high * jitter,
        low: open.min(close) - draws.wick_low * jitter,
        close,
        color: if close >= open {
            CandleColor::Up
        } else {
            CandleColor::Down
        },
    };

    (candle, close, next_trend)
}

/// Stateful generator owning its RNG. Also an endless `Iterator<Item = Candle>`.
#[derive(Debug, Clone)]
pub struct PriceWalk {
    params: WalkParams,
    price: f64,
    trend: Trend,
    rng: StdRng,
}

impl PriceWalk {
    pub fn seeded(params: WalkParams, seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(params: WalkParams) -> Self {
        Self::with_rng(params, StdRng::from_entropy())
    }

    fn with_rng(params: WalkParams, mut rng: StdRng) -> Self {
        let trend = if rng.gen_bool(0.5) { Trend::Up } else { Trend::Down };
        let price = params.start_center + (rng.gen::<f64>() - 0.5) * params.start_spread;
        Self {
            params,
            price,
            trend,
            rng,
        }
    }

    pub fn next_candle(&mut self) -> Candle {
        let draws = Draws::sample(&mut self.rng);
        let (candle, price, trend) = step(&self.params, self.price, self.trend, draws);
        self.price = price;
        self.trend = trend;
        candle
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

impl Iterator for PriceWalk {
    type Item = Candle;

    fn next(&mut self) -> Option<Candle> {
        Some(self.next_candle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn draws(body: f64, flip: f64) -> Draws {
        Draws {
            body,
            flip,
            wick_high: 0.5,
            wick_low: 0.5,
        }
    }

    #[test]
    fn close_follows_biased_draw() {
        let p = WalkParams::default();
        let (c, price, trend) = step(&p, 100.0, Trend::Up, draws(0.9, 0.99));
        // (0.9 - 0.5 + 0.1) * 3 = 1.5
        assert!((c.close - 101.5).abs() < 1e-9);
        assert_eq!(price, c.close);
        assert_eq!(trend, Trend::Up);
        assert!(c.is_up());
        assert!((c.high - (101.5 + 0.45)).abs() < 1e-9);
        assert!((c.low - (100.0 - 0.45)).abs() < 1e-9);
    }

    #[test]
    fn equal_open_close_counts_as_up() {
        let p = WalkParams {
            bias: 0.0,
            ..WalkParams::default()
        };
        let (c, _, _) = step(&p, 100.0, Trend::Down, draws(0.5, 0.99));
        assert_eq!(c.close, c.open);
        assert_eq!(c.color, CandleColor::Up);
    }

    #[test]
    fn trend_flips_on_low_draw() {
        let p = WalkParams::default();
        let (_, _, trend) = step(&p, 100.0, Trend::Up, draws(0.5, 0.05));
        assert_eq!(trend, Trend::Down);
    }

    #[test]
    fn above_upper_bound_reflects_down() {
        let p = WalkParams::default();
        let (c, price, trend) = step(&p, 121.0, Trend::Up, draws(0.99, 0.99));
        assert!(price <= 121.0);
        assert_eq!(trend, Trend::Down);
        assert_eq!(c.color, CandleColor::Down);
    }

    #[test]
    fn below_lower_bound_reflects_up() {
        let p = WalkParams::default();
        let (_, price, trend) = step(&p, 79.0, Trend::Down, draws(0.0, 0.99));
        assert!(price >= 79.0);
        assert_eq!(trend, Trend::Up);
    }

    #[test]
    fn seeded_walks_are_reproducible() {
        let a: Vec<Candle> = PriceWalk::seeded(WalkParams::default(), 7).take(50).collect();
        let b: Vec<Candle> = PriceWalk::seeded(WalkParams::default(), 7).take(50).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn candles_chain_open_to_previous_close() {
        let candles: Vec<Candle> = PriceWalk::seeded(WalkParams::default(), 3).take(100).collect();
        for pair in candles.windows(2) {
            assert_eq!(pair[1].open, pair[0].close);
        }
    }

    #[test]
    fn start_price_within_spread() {
        for seed in 0..32 {
            let walk = PriceWalk::seeded(WalkParams::default(), seed);
            assert!((95.0..=105.0).contains(&walk.price()));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn wicks_enclose_body(seed in any::<u64>()) {
            for c in PriceWalk::seeded(WalkParams::default(), seed).take(500) {
                prop_assert!(c.low <= c.open.min(c.close));
                prop_assert!(c.high >= c.open.max(c.close));
            }
        }

        #[test]
        fn price_stays_within_soft_bounds(seed in any::<u64>()) {
            let params = WalkParams::default();
            let slack = params.max_step() + 1e-9;
            let mut walk = PriceWalk::seeded(params, seed);
            for _ in 0..20_000 {
                walk.next_candle();
                prop_assert!(walk.price() <= params.upper_bound + slack);
                prop_assert!(walk.price() >= params.lower_bound - slack);
            }
        }

        #[test]
        fn step_never_exceeds_max_step(
            price in 60.0f64..140.0,
            body in 0.0f64..1.0,
            flip in 0.0f64..1.0,
            up in any::<bool>(),
        ) {
            let p = WalkParams::default();
            let trend = if up { Trend::Up } else { Trend::Down };
            let (c, _, _) = step(&p, price, trend, draws(body, flip));
            prop_assert!((c.close - c.open).abs() <= p.max_step() + 1e-9);
        }
    }
}

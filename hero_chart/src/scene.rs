// hero_chart/src/scene.rs
//
// One frame of the hero chart: background, grid, candles, moving averages.
// Candles and averages share the same x mapping (`RenderState::candle_x`).

use egui::{pos2, Pos2, Rect, Stroke};

use crate::config::ChartConfig;
use crate::series::Candle;
use crate::state::{moving_average, PriceRange, RenderState};
use crate::surface::Surface;
use crate::theme::{theme_from_id, Theme};

#[derive(Debug, Clone)]
pub struct Scene {
    theme: Theme,
    body_ratio: f32,
    horizontal_divisions: u32,
    ma_periods: Vec<usize>,
}

impl Scene {
    pub fn new(cfg: &ChartConfig) -> Self {
        Self {
            theme: theme_from_id(cfg.theme_id()),
            body_ratio: cfg.body_ratio,
            horizontal_divisions: cfg.horizontal_divisions,
            ma_periods: cfg.ma_periods.clone(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn draw<S: Surface + ?Sized>(&self, state: &RenderState, surface: &mut S) {
        let (w, h) = (state.width(), state.height());

        surface.vertical_gradient(
            Rect::from_min_max(Pos2::ZERO, pos2(w, h)),
            self.theme.bg_top,
            self.theme.bg_bottom,
        );
        self.draw_grid(state, surface);

        let range = state.price_range();
        for (i, c) in state.candles().iter().enumerate() {
            let x = state.candle_x(i);
            if state.is_visible_x(x) {
                self.draw_candle(surface, c, x, state.candle_width(), h, &range);
            }
        }

        let closes = state.closes();
        for (slot, &period) in self.ma_periods.iter().enumerate() {
            if closes.len() < period {
                continue;
            }
            let points: Vec<Pos2> = moving_average(&closes, period)
                .into_iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|ma| pos2(state.candle_x(i), range.to_y(ma, h))))
                .collect();
            if points.len() >= 2 {
                surface.polyline(
                    points,
                    Stroke::new(self.theme.average_width, self.theme.average_color(slot)),
                );
            }
        }
    }

    fn draw_grid<S: Surface + ?Sized>(&self, state: &RenderState, surface: &mut S) {
        let (w, h) = (state.width(), state.height());
        let stroke = Stroke::new(1.0, self.theme.grid);

        // horizontal: fixed
        let div = self.horizontal_divisions.max(1);
        for i in 1..div {
            let y = h / div as f32 * i as f32;
            surface.line(pos2(0.0, y), pos2(w, y), stroke);
        }

        // vertical: scroll with the grid phase
        let spacing = state.grid_spacing();
        let offset = state.grid_offset() % spacing;
        let count = (w / spacing).ceil() as i32;
        for i in -1..count + 1 {
            let x = i as f32 * spacing - offset;
            surface.line(pos2(x, 0.0), pos2(x, h), stroke);
        }
    }

    fn draw_candle<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        c: &Candle,
        x: f32,
        width: f32,
        height: f32,
        range: &PriceRange,
    ) {
        let color = if c.is_up() {
            self.theme.bull
        } else {
            self.theme.bear
        };
        let open_y = range.to_y(c.open, height);
        let close_y = range.to_y(c.close, height);

        surface.line(
            pos2(x, range.to_y(c.high, height)),
            pos2(x, range.to_y(c.low, height)),
            Stroke::new(self.theme.wick_width, color),
        );

        let body_w = width * self.body_ratio;
        let top = open_y.min(close_y);
        let body_h = (close_y - open_y).abs().max(1.0);
        surface.fill_rect(
            Rect::from_min_size(pos2(x - body_w / 2.0, top), egui::vec2(body_w, body_h)),
            color,
        );
    }
}

// hero_chart/src/main.rs
//
// Desktop preview of the hero banner chart.
//
// Run:
//   cargo run -p hero_chart
//
//   # custom config (JSON, any subset of ChartConfig fields):
//   HERO_CHART_CONFIG=./hero.json cargo run -p hero_chart
//
// The chart pauses while the window is minimized and resumes without a jump.

use eframe::egui;
use egui::{Color32, Sense};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use hero_chart::{Animator, ChartConfig, PainterSurface};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = load_config();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("显化交易学院 · Hero Chart")
            .with_inner_size([cfg.window_width_px, cfg.window_height_px]),
        ..Default::default()
    };
    eframe::run_native(
        "hero_chart",
        native_options,
        Box::new(move |_cc| Box::new(HeroApp::new(cfg))),
    )
}

fn load_config() -> ChartConfig {
    let path = match ChartConfig::default_path() {
        Ok(p) => p,
        Err(err) => {
            warn!(error = ?err, "no config location, using defaults");
            return ChartConfig::default();
        }
    };
    let existed = path.exists();
    let cfg = ChartConfig::load_from(&path);
    if !existed {
        if let Err(err) = cfg.save_to(&path) {
            warn!(error = ?err, path = %path.display(), "could not write default config");
        }
    }
    cfg
}

struct HeroApp {
    cfg: ChartConfig,
    animator: Option<Animator>,
    mounted: bool,
}

impl HeroApp {
    fn new(cfg: ChartConfig) -> Self {
        Self {
            cfg,
            animator: None,
            mounted: false,
        }
    }
}

impl eframe::App for HeroApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let hidden = ctx.input(|i| i.viewport().minimized.unwrap_or(false));
        let now_ms = ctx.input(|i| i.time) * 1000.0;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_rgb(5, 10, 20)))
            .show(ctx, |ui| {
                let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
                let painter = ui.painter_at(rect);
                let mut surface = PainterSurface::new(&painter, rect);

                if !self.mounted {
                    self.animator = Animator::mount(&self.cfg, Some(&surface));
                    self.mounted = true;
                }
                if let Some(animator) = self.animator.as_mut() {
                    animator.set_hidden(hidden, ctx);
                    animator.frame(now_ms, &mut surface, ctx);
                }
            });
    }
}

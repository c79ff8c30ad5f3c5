// hero_chart/src/animator.rs
//
// Frame loop for the hero chart. Running → Paused on visibility loss,
// Paused → Running on restore with the frame clock reset, so the first frame
// after a resume advances by zero.

use tracing::{debug, info, warn};

use crate::config::ChartConfig;
use crate::scene::Scene;
use crate::series::PriceWalk;
use crate::state::RenderState;
use crate::surface::{FrameHost, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
}

#[derive(Debug, Clone)]
pub struct Animator {
    state: RenderState,
    scene: Scene,
    loop_state: LoopState,
    last_timestamp: Option<f64>,
}

impl Animator {
    /// Build the render state for `surface`. No surface or an invalid config
    /// → `None`, and the caller has nothing to drive.
    pub fn mount<S: Surface + ?Sized>(cfg: &ChartConfig, surface: Option<&S>) -> Option<Self> {
        let Some(surface) = surface else {
            debug!("hero chart: no drawing surface, skipping");
            return None;
        };
        if let Err(err) = cfg.validate() {
            warn!(%err, "hero chart: invalid config, not mounting");
            return None;
        }
        let size = surface.size();
        let walk = match cfg.seed {
            Some(seed) => PriceWalk::seeded(cfg.walk_params(), seed),
            None => PriceWalk::from_entropy(cfg.walk_params()),
        };
        let state = RenderState::new(cfg, walk, size.x, size.y);
        info!(
            width = size.x,
            height = size.y,
            candles = state.candles().len(),
            theme = cfg.theme_id().label(),
            "hero chart mounted"
        );
        debug!(sample = ?state.candles().front(), "first candle");
        Some(Self {
            state,
            scene: Scene::new(cfg),
            loop_state: LoopState::Running,
            last_timestamp: None,
        })
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Feed the host's hidden/visible signal. Only transitions act.
    pub fn set_hidden<H: FrameHost + ?Sized>(&mut self, hidden: bool, host: &H) {
        match (self.loop_state, hidden) {
            (LoopState::Running, true) => {
                self.loop_state = LoopState::Paused;
                debug!("hero chart paused");
                host.request_idle_poll();
            }
            (LoopState::Paused, false) => {
                self.loop_state = LoopState::Running;
                self.last_timestamp = None;
                debug!("hero chart resumed");
                host.request_frame();
            }
            (LoopState::Paused, true) => host.request_idle_poll(),
            (LoopState::Running, false) => {}
        }
    }

    /// One frame at `timestamp_ms` (host clock). Paused frames draw nothing
    /// and do not re-arm.
    pub fn frame<S, H>(&mut self, timestamp_ms: f64, surface: &mut S, host: &H)
    where
        S: Surface + ?Sized,
        H: FrameHost + ?Sized,
    {
        if self.loop_state == LoopState::Paused {
            return;
        }

        let size = surface.size();
        if size.x != self.state.width() || size.y != self.state.height() {
            self.state.resize(size.x, size.y);
        }

        let elapsed = match self.last_timestamp {
            Some(last) => timestamp_ms - last,
            None => 0.0,
        };
        self.state.scroll(elapsed);
        self.scene.draw(&self.state, surface);
        self.state.settle();

        self.last_timestamp = Some(timestamp_ms);
        host.request_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingHost {
        frames: Cell<usize>,
        polls: Cell<usize>,
    }

    impl FrameHost for CountingHost {
        fn request_frame(&self) {
            self.frames.set(self.frames.get() + 1);
        }

        fn request_idle_poll(&self) {
            self.polls.set(self.polls.get() + 1);
        }
    }

    fn cfg() -> ChartConfig {
        ChartConfig {
            seed: Some(99),
            ..ChartConfig::default()
        }
    }

    #[test]
    fn mount_without_surface_is_noop() {
        assert!(Animator::mount::<RecordingSurface>(&cfg(), None).is_none());
    }

    #[test]
    fn mount_refuses_invalid_config() {
        let surface = RecordingSurface::new(320.0, 180.0);
        let bad = ChartConfig {
            scroll_speed: 3.0e38,
            ..cfg()
        };
        assert!(Animator::mount(&bad, Some(&surface)).is_none());
    }

    #[test]
    fn long_stall_frame_returns_with_offset_in_range() {
        let mut surface = RecordingSurface::new(320.0, 180.0);
        let host = CountingHost::default();
        let mut anim = Animator::mount(&cfg(), Some(&surface)).unwrap();
        anim.frame(0.0, &mut surface, &host);
        // a tab left in the background for weeks without a visibility signal
        anim.frame(3.0e9, &mut surface, &host);
        let st = anim.state();
        assert!(st.scroll_offset() < st.candle_width());
        assert_eq!(st.candles().len(), st.steady_capacity());
    }

    #[test]
    fn starts_running_and_rearms_each_frame() {
        let mut surface = RecordingSurface::new(320.0, 180.0);
        let host = CountingHost::default();
        let mut anim = Animator::mount(&cfg(), Some(&surface)).unwrap();
        assert_eq!(anim.loop_state(), LoopState::Running);
        anim.frame(0.0, &mut surface, &host);
        anim.frame(16.0, &mut surface, &host);
        assert_eq!(host.frames.get(), 2);
    }

    #[test]
    fn first_frame_does_not_move() {
        let mut surface = RecordingSurface::new(320.0, 180.0);
        let host = CountingHost::default();
        let mut anim = Animator::mount(&cfg(), Some(&surface)).unwrap();
        anim.frame(123_456.0, &mut surface, &host);
        assert_eq!(anim.state().scroll_offset(), 0.0);
    }

    #[test]
    fn movement_follows_wall_clock_not_frame_count() {
        let host = CountingHost::default();

        let mut s1 = RecordingSurface::new(320.0, 180.0);
        let mut a = Animator::mount(&cfg(), Some(&s1)).unwrap();
        a.frame(0.0, &mut s1, &host);
        a.frame(50.0, &mut s1, &host);

        let mut s2 = RecordingSurface::new(320.0, 180.0);
        let mut b = Animator::mount(&cfg(), Some(&s2)).unwrap();
        b.frame(0.0, &mut s2, &host);
        for t in 1..=10 {
            b.frame(t as f64 * 5.0, &mut s2, &host);
        }

        assert!((a.state().scroll_offset() - b.state().scroll_offset()).abs() < 1e-4);
    }

    #[test]
    fn paused_frames_draw_nothing() {
        let mut surface = RecordingSurface::new(320.0, 180.0);
        let host = CountingHost::default();
        let mut anim = Animator::mount(&cfg(), Some(&surface)).unwrap();
        anim.frame(0.0, &mut surface, &host);
        surface.take_frame();

        anim.set_hidden(true, &host);
        assert_eq!(anim.loop_state(), LoopState::Paused);
        assert_eq!(host.polls.get(), 1);
        let frames_before = host.frames.get();
        anim.frame(1_000.0, &mut surface, &host);
        assert!(surface.ops().is_empty());
        assert_eq!(host.frames.get(), frames_before);
    }

    #[test]
    fn resume_rearms_and_skips_hidden_time() {
        let mut surface = RecordingSurface::new(320.0, 180.0);
        let host = CountingHost::default();
        let mut anim = Animator::mount(&cfg(), Some(&surface)).unwrap();
        anim.frame(0.0, &mut surface, &host);
        anim.frame(30.0, &mut surface, &host);
        let before = anim.state().scroll_offset();

        anim.set_hidden(true, &host);
        anim.set_hidden(false, &host);
        assert_eq!(anim.loop_state(), LoopState::Running);
        anim.frame(60_000.0, &mut surface, &host);
        assert_eq!(anim.state().scroll_offset(), before);
    }

    #[test]
    fn repeated_visible_signal_is_ignored() {
        let surface = RecordingSurface::new(320.0, 180.0);
        let host = CountingHost::default();
        let mut anim = Animator::mount(&cfg(), Some(&surface)).unwrap();
        anim.set_hidden(false, &host);
        assert_eq!(host.frames.get(), 0);
        assert_eq!(host.polls.get(), 0);
    }

    #[test]
    fn surface_resize_is_picked_up() {
        let mut surface = RecordingSurface::new(320.0, 180.0);
        let host = CountingHost::default();
        let mut anim = Animator::mount(&cfg(), Some(&surface)).unwrap();
        surface.set_size(640.0, 240.0);
        anim.frame(0.0, &mut surface, &host);
        assert_eq!(anim.state().width(), 640.0);
        assert!(anim.state().candles().len() >= anim.state().visible_slots());
    }
}

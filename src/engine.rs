//! The fireworks display engine.
//!
//! [`Fireworks`] owns the visible canvas, an off-screen canvas the bursts
//! are drawn into each frame, and two loops: a spawn loop that keeps the
//! number of live bursts topped up at randomized intervals, and a render
//! loop that repaints once per frame. The host drives both by calling
//! [`Fireworks::advance`] once per repaint with the elapsed time.

use std::time::Duration;

use fastrand::Rng;
use tracing::{debug, info};

use crate::canvas::{BlendMode, Canvas, Rect, Surface};
use crate::color::Rgba;
use crate::config::{Config, Options};
use crate::error::{Error, Result};
use crate::firework::Firework;
use crate::schedule::{LoopSlot, Trigger};

/// Translucent black painted over the visible canvas every frame, leaving
/// fading trails behind moving particles.
const TRAIL_COLOR: Rgba = Rgba::new(0, 0, 0, 0.05);

/// Bursts are placed within this fraction of the surface edges.
const EDGE_MARGIN: f32 = 0.1;

const MIN_PARTICLES: usize = 80;
const MAX_PARTICLES: usize = 100;

/// Where the display draws.
#[derive(Debug)]
pub enum Container {
    /// An existing canvas, drawn into directly.
    Canvas(Canvas),
    /// A region to create a new canvas for.
    Area { width: usize, height: usize },
}

impl Container {
    fn into_canvas(self) -> Result<Canvas> {
        let canvas = match self {
            Container::Canvas(canvas) => canvas,
            Container::Area { width, height } => Canvas::new(width, height),
        };
        if canvas.width() == 0 || canvas.height() == 0 {
            return Err(Error::EmptyContainer {
                width: canvas.width(),
                height: canvas.height(),
            });
        }
        Ok(canvas)
    }
}

/// A fireworks display together with the two loops that animate it.
pub struct Fireworks {
    config: Config,
    canvas: Canvas,
    off_screen: Canvas,
    fireworks: Vec<Firework>,
    spawn_slot: LoopSlot,
    render_slot: LoopSlot,
    rng: Rng,
    launched: u64,
}

impl Fireworks {
    pub fn new(container: Container, options: Options) -> Result<Self> {
        Self::with_rng(container, options, Rng::new())
    }

    /// Like [`Fireworks::new`] with a deterministic random sequence.
    pub fn with_seed(container: Container, options: Options, seed: u64) -> Result<Self> {
        Self::with_rng(container, options, Rng::with_seed(seed))
    }

    fn with_rng(container: Container, options: Options, rng: Rng) -> Result<Self> {
        let canvas = container.into_canvas()?;
        let off_screen = Canvas::new(canvas.width(), canvas.height());
        let config = Config::resolve(options);

        info!(
            width = canvas.width(),
            height = canvas.height(),
            fps = config.fps,
            firework_count = config.firework_count,
            interval_ms = config.firework_interval.as_millis() as u64,
            "fireworks display ready"
        );

        Ok(Self {
            config,
            canvas,
            off_screen,
            fireworks: Vec::new(),
            spawn_slot: LoopSlot::new(),
            render_slot: LoopSlot::new(),
            rng,
            launched: 0,
        })
    }

    /// Launches a burst. Missing coordinates are picked within the inner
    /// 80% of the surface, a missing color from the palette.
    pub fn create_firework(&mut self, x: Option<f32>, y: Option<f32>, color: Option<Rgba>) {
        let width = self.canvas.width() as f32;
        let height = self.canvas.height() as f32;
        let x = x.unwrap_or_else(|| {
            self.random_between(width * EDGE_MARGIN, width * (1.0 - EDGE_MARGIN))
        });
        let y = y.unwrap_or_else(|| {
            self.random_between(height * EDGE_MARGIN, height * (1.0 - EDGE_MARGIN))
        });
        let color = color.unwrap_or_else(|| self.random_color());
        let particle_count = self.rng.usize(MIN_PARTICLES..=MAX_PARTICLES);

        let firework = Firework::new(
            &mut self.rng,
            x,
            y,
            color,
            particle_count,
            &self.config.particle,
        );
        self.fireworks.push(firework);
        self.launched += 1;

        debug!(x, y, %color, particle_count, active = self.fireworks.len(), "firework launched");
    }

    fn random_between(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.rng.f32() * (hi - lo)
    }

    fn random_color(&mut self) -> Rgba {
        let palette = &self.config.firework_colors;
        if palette.is_empty() {
            return self.config.particle.color;
        }
        palette[self.rng.usize(0..palette.len())]
    }

    /// Drops bursts whose particles have all burned off.
    fn check_fireworks(&mut self) {
        let before = self.fireworks.len();
        self.fireworks.retain(|f| !f.is_burn_off());
        let retired = before - self.fireworks.len();
        if retired > 0 {
            debug!(retired, active = self.fireworks.len(), "fireworks burned off");
        }
    }

    fn spawn_delay(&mut self) -> Duration {
        // jittered between half and the full interval so launches do not look mechanical
        self.config.firework_interval.mul_f64(0.5 + self.rng.f64() * 0.5)
    }

    fn render_trigger(&self) -> Trigger {
        if self.config.uses_frame_callback() {
            Trigger::Frame
        } else {
            Trigger::Delay(self.config.frame_interval())
        }
    }

    fn spawn_tick(&mut self) {
        self.check_fireworks();
        if self.fireworks.len() < self.config.firework_count {
            self.create_firework(None, None, None);
        }

        let delay = self.spawn_delay();
        self.spawn_slot.arm(Trigger::Delay(delay));
    }

    fn render_tick(&mut self) {
        let full = Rect::new(
            0.0,
            0.0,
            self.canvas.width() as f32,
            self.canvas.height() as f32,
        );

        self.canvas.fill_rect(full, TRAIL_COLOR);
        self.off_screen.clear();

        for firework in &mut self.fireworks {
            firework.render(&mut self.rng, &mut self.off_screen);
        }

        self.canvas.draw_canvas(&self.off_screen, BlendMode::Lighter);

        let trigger = self.render_trigger();
        self.render_slot.arm(trigger);
    }

    /// Runs whichever loops are due after `elapsed`. Each loop fires at most
    /// once per call. Returns whether a frame was rendered.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if self.spawn_slot.poll(elapsed) {
            self.spawn_tick();
        }

        if self.render_slot.poll(elapsed) {
            self.render_tick();
            return true;
        }
        false
    }

    /// Starts both loops. Loops that are already running keep their schedule.
    pub fn start(&mut self) {
        if !self.spawn_slot.is_armed() {
            let delay = self.spawn_delay();
            self.spawn_slot.arm(Trigger::Delay(delay));
        }
        if !self.render_slot.is_armed() {
            let trigger = self.render_trigger();
            self.render_slot.arm(trigger);
        }
        info!(active = self.fireworks.len(), "fireworks started");
    }

    /// Cancels both loops, keeping every burst where it is.
    pub fn pause(&mut self) {
        let spawn = self.spawn_slot.cancel();
        let render = self.render_slot.cancel();
        if spawn || render {
            info!(active = self.fireworks.len(), "fireworks paused");
        }
    }

    /// Pauses, drops every burst and blanks the visible canvas.
    pub fn stop(&mut self) {
        self.pause();
        self.fireworks.clear();
        self.canvas.clear();
        self.off_screen.clear();
        info!("fireworks stopped");
    }

    pub fn is_running(&self) -> bool {
        self.spawn_slot.is_armed() || self.render_slot.is_armed()
    }

    /// The visible canvas.
    pub fn surface(&self) -> &Canvas {
        &self.canvas
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Total bursts created since construction.
    pub fn launched(&self) -> u64 {
        self.launched
    }
}

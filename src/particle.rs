use std::f32::consts::{FRAC_PI_2, TAU};

use fastrand::Rng;

use crate::canvas::{RadialGradient, Rect, Surface};
use crate::color::Rgba;
use crate::config::ParticleConfig;

/// Particles smaller than this are no longer visible.
pub const BURN_OFF_SIZE: f32 = 1.0;

/// White-tinted glow at the heart of every particle.
const CORE_COLOR: Rgba = Rgba::new(255, 255, 255, 0.3);
const SHADOW_ALPHA: f32 = 0.1;

/// A single glowing spark.
#[derive(Debug, Clone)]
pub struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    size: f32,
    color: Rgba,
    shadow_color: Rgba,
    gravity: f32,
    power: f32,
    shrink: f32,
    jitter: f32,
}

impl Particle {
    /// Creates a particle at `(x, y)` flying off in a random direction.
    pub fn new(
        rng: &mut Rng,
        x: f32,
        y: f32,
        size: f32,
        color: Rgba,
        physics: &ParticleConfig,
    ) -> Self {
        let angle = rng.f32() * TAU;
        // cos over a quarter turn favours fast sparks with a soft tail of slow ones
        let speed = (rng.f32() * FRAC_PI_2).cos() * physics.speed;

        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            size,
            color,
            shadow_color: color.with_alpha(SHADOW_ALPHA),
            gravity: physics.gravity,
            power: physics.power,
            shrink: physics.shrink,
            jitter: physics.jitter,
        }
    }

    /// Advances one simulation step. Burned off particles stay put.
    pub fn update(&mut self, rng: &mut Rng) {
        if self.is_burn_off() {
            return;
        }

        self.vx *= self.power;
        self.vy *= self.power;
        self.vy += self.gravity;

        let jitter = (rng.f32() * 2.0 - 1.0) * self.jitter;
        self.x += self.vx + jitter;
        self.y += self.vy + jitter;

        self.size *= self.shrink;
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.is_burn_off() {
            return;
        }

        let mut gradient = RadialGradient::new(self.x, self.y, self.size / 2.0);
        gradient.add_color_stop(0.1, CORE_COLOR);
        gradient.add_color_stop(0.6, self.color);
        gradient.add_color_stop(1.0, self.shadow_color);

        surface.fill_rect_gradient(Rect::centered(self.x, self.y, self.size), &gradient);
    }

    pub fn is_burn_off(&self) -> bool {
        self.size.is_nan() || self.size < BURN_OFF_SIZE
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn shadow_color(&self) -> Rgba {
        self.shadow_color
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records draw calls instead of rasterizing them.
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub gradients: Vec<(Rect, RadialGradient)>,
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> usize {
            100
        }

        fn height(&self) -> usize {
            100
        }

        fn fill_rect(&mut self, _rect: Rect, _color: Rgba) {}

        fn fill_rect_gradient(&mut self, rect: Rect, gradient: &RadialGradient) {
            self.gradients.push((rect, gradient.clone()));
        }

        fn clear_rect(&mut self, _rect: Rect) {}
    }

    fn physics() -> ParticleConfig {
        ParticleConfig {
            jitter: 0.0,
            ..ParticleConfig::default()
        }
    }

    #[test]
    fn launch_speed_never_exceeds_configured_speed() {
        let mut rng = Rng::with_seed(7);
        let physics = physics();
        for _ in 0..500 {
            let p = Particle::new(&mut rng, 0.0, 0.0, 10.0, Rgba::WHITE, &physics);
            let (vx, vy) = p.velocity();
            assert!((vx * vx + vy * vy).sqrt() <= physics.speed + 1e-3);
        }
    }

    #[test]
    fn shadow_is_translucent_color() {
        let mut rng = Rng::with_seed(1);
        let color = Rgba::rgb(255, 140, 0);
        let p = Particle::new(&mut rng, 0.0, 0.0, 10.0, color, &physics());
        assert_eq!(p.shadow_color(), color.with_alpha(0.1));
    }

    #[test]
    fn update_applies_decay_then_gravity() {
        let mut rng = Rng::with_seed(3);
        let physics = physics();
        let mut p = Particle::new(&mut rng, 50.0, 50.0, 10.0, Rgba::WHITE, &physics);
        let (vx, vy) = p.velocity();

        p.update(&mut rng);

        let (nvx, nvy) = p.velocity();
        assert!((nvx - vx * physics.power).abs() < 1e-5);
        assert!((nvy - (vy * physics.power + physics.gravity)).abs() < 1e-5);
        let (x, y) = p.position();
        assert!((x - (50.0 + nvx)).abs() < 1e-4);
        assert!((y - (50.0 + nvy)).abs() < 1e-4);
        assert!((p.size() - 10.0 * physics.shrink).abs() < 1e-5);
    }

    #[test]
    fn jitter_moves_both_axes_equally() {
        let mut rng = Rng::with_seed(11);
        let physics = ParticleConfig {
            speed: 0.0,
            gravity: 0.0,
            jitter: 2.0,
            ..ParticleConfig::default()
        };
        let mut p = Particle::new(&mut rng, 10.0, 20.0, 10.0, Rgba::WHITE, &physics);
        p.update(&mut rng);

        let (x, y) = p.position();
        assert!((x - 10.0 - (y - 20.0)).abs() < 1e-5);
        assert!((x - 10.0).abs() <= 2.0);
    }

    #[test]
    fn renders_centered_gradient() {
        let mut rng = Rng::with_seed(5);
        let color = Rgba::rgb(0, 255, 100);
        let p = Particle::new(&mut rng, 40.0, 30.0, 12.0, color, &physics());

        let mut surface = RecordingSurface::default();
        p.render(&mut surface);

        let (rect, gradient) = &surface.gradients[0];
        assert_eq!(*rect, Rect::new(34.0, 24.0, 12.0, 12.0));
        assert_eq!((gradient.cx, gradient.cy, gradient.radius), (40.0, 30.0, 6.0));
        assert_eq!(
            gradient.stops(),
            &[(0.1, CORE_COLOR), (0.6, color), (1.0, color.with_alpha(0.1))]
        );
    }

    #[test]
    fn burned_off_particles_are_inert() {
        let mut rng = Rng::with_seed(9);
        let mut p = Particle::new(&mut rng, 0.0, 0.0, 0.5, Rgba::WHITE, &physics());
        assert!(p.is_burn_off());

        let before = p.position();
        p.update(&mut rng);
        assert_eq!(p.position(), before);
        assert_eq!(p.size(), 0.5);

        let mut surface = RecordingSurface::default();
        p.render(&mut surface);
        assert!(surface.gradients.is_empty());
    }

    #[test]
    fn negative_size_burns_off_immediately() {
        let mut rng = Rng::with_seed(2);
        let p = Particle::new(&mut rng, 0.0, 0.0, -4.0, Rgba::WHITE, &physics());
        assert!(p.is_burn_off());
    }
}

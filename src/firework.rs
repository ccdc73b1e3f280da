use fastrand::Rng;

use crate::canvas::Surface;
use crate::color::Rgba;
use crate::config::ParticleConfig;
use crate::particle::Particle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Init,
    Completed,
}

/// One burst: a cloud of particles sharing an origin and a color.
#[derive(Debug, Clone)]
pub struct Firework {
    x: f32,
    y: f32,
    color: Rgba,
    particle_count: usize,
    particles: Vec<Particle>,
    status: Status,
}

impl Firework {
    /// Spawns `particle_count` particles at `(x, y)`, each sized within
    /// +/-50% of the configured base size.
    pub fn new(
        rng: &mut Rng,
        x: f32,
        y: f32,
        color: Rgba,
        particle_count: usize,
        physics: &ParticleConfig,
    ) -> Self {
        let base = physics.size;
        let particles = (0..particle_count)
            .map(|_| {
                let size = base + (rng.f32() - 0.5) * base;
                Particle::new(rng, x, y, size, color, physics)
            })
            .collect();

        Self {
            x,
            y,
            color,
            particle_count,
            particles,
            status: Status::Init,
        }
    }

    /// Advances every particle one step and drops the burned off ones.
    fn update_particles(&mut self, rng: &mut Rng) {
        for particle in &mut self.particles {
            particle.update(rng);
        }
        self.particles.retain(|p| !p.is_burn_off());

        if self.particles.is_empty() {
            self.status = Status::Completed;
        }
    }

    /// Steps the simulation, then draws what is still visible.
    pub fn render<S: Surface + ?Sized>(&mut self, rng: &mut Rng, surface: &mut S) {
        self.update_particles(rng);
        if self.is_burn_off() {
            return;
        }

        for particle in &self.particles {
            particle.render(surface);
        }
    }

    pub fn is_burn_off(&self) -> bool {
        self.status == Status::Completed
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn origin(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Number of particles the burst started with.
    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::tests::RecordingSurface;

    fn physics() -> ParticleConfig {
        ParticleConfig {
            size: 10.0,
            ..ParticleConfig::default()
        }
    }

    #[test]
    fn spawns_requested_particles_at_origin() {
        let mut rng = Rng::with_seed(42);
        let color = Rgba::rgb(255, 220, 0);
        let firework = Firework::new(&mut rng, 30.0, 40.0, color, 90, &physics());

        assert_eq!(firework.particles().len(), 90);
        assert_eq!(firework.particle_count(), 90);
        assert_eq!(firework.status(), Status::Init);
        for p in firework.particles() {
            assert_eq!(p.position(), (30.0, 40.0));
            assert_eq!(p.color(), color);
            assert!((5.0..=15.0).contains(&p.size()));
        }
    }

    #[test]
    fn render_draws_every_live_particle() {
        let mut rng = Rng::with_seed(1);
        let mut firework = Firework::new(&mut rng, 50.0, 50.0, Rgba::WHITE, 80, &physics());
        let mut surface = RecordingSurface::default();

        firework.render(&mut rng, &mut surface);

        assert_eq!(surface.gradients.len(), firework.particles().len());
        assert!(!firework.is_burn_off());
    }

    #[test]
    fn completes_once_every_particle_burns_off() {
        let mut rng = Rng::with_seed(8);
        let mut firework = Firework::new(&mut rng, 50.0, 50.0, Rgba::WHITE, 85, &physics());
        let mut surface = RecordingSurface::default();

        let mut steps = 0;
        while !firework.is_burn_off() {
            let drawn_before = surface.gradients.len();
            firework.render(&mut rng, &mut surface);
            steps += 1;

            // never draws a particle that burned off during the same step
            let drawn = surface.gradients.len() - drawn_before;
            assert_eq!(drawn, firework.particles().len());
            assert!(steps < 200, "burst never finished");
        }

        assert!(firework.particles().is_empty());
        assert_eq!(firework.status(), Status::Completed);

        // 15 * 0.97^n < 1 needs n = 89 at most
        assert!(steps <= 89);
    }

    #[test]
    fn zero_sized_particles_complete_on_first_render() {
        let mut rng = Rng::with_seed(4);
        let physics = ParticleConfig {
            size: 0.0,
            ..ParticleConfig::default()
        };
        let mut firework = Firework::new(&mut rng, 0.0, 0.0, Rgba::WHITE, 80, &physics);
        assert!(!firework.is_burn_off());

        let mut surface = RecordingSurface::default();
        firework.render(&mut rng, &mut surface);
        assert!(firework.is_burn_off());
        assert!(surface.gradients.is_empty());
    }
}

//! Looping fireworks animation rendered into a software canvas.
//!
//! A [`Fireworks`] engine spawns bursts at randomized positions and
//! intervals; each burst is a cloud of particles that slow down, fall and
//! shrink until they burn off. The engine draws into a [`Canvas`], which the
//! binary presents in a terminal with 24-bit color half blocks.

pub mod canvas;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod firework;
pub mod logging;
pub mod particle;
pub mod present;
pub mod schedule;

pub use canvas::{BlendMode, Canvas, RadialGradient, Rect, Surface};
pub use color::{DEFAULT_PALETTE, Rgba};
pub use config::{Config, Options, ParticleConfig, ParticleOptions};
pub use engine::{Container, Fireworks};
pub use error::{Error, Result};
pub use firework::{Firework, Status};
pub use particle::Particle;

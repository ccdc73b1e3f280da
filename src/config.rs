//! Display configuration.
//!
//! Callers supply partial [`Options`] (from code, a TOML file or the command
//! line). Layers are combined with [`Options::merge`] and resolved against
//! the defaults into an immutable [`Config`] once, when the engine is built.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::color::{DEFAULT_PALETTE, Rgba};
use crate::error::{Error, Result};

/// Lowest frame rate a display runs at.
pub const MIN_FPS: f32 = 1.0;

/// Partial particle physics settings; unset fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleOptions {
    pub size: Option<f32>,
    pub speed: Option<f32>,
    pub gravity: Option<f32>,
    pub power: Option<f32>,
    pub shrink: Option<f32>,
    pub jitter: Option<f32>,
    pub color: Option<Rgba>,
}

/// Partial display settings; unset fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub fps: Option<f32>,
    pub firework_count: Option<usize>,
    /// Spawn interval in milliseconds
    pub firework_interval: Option<u64>,
    pub firework_colors: Option<Vec<Rgba>>,
    pub particle: ParticleOptions,
}

impl ParticleOptions {
    /// Field-wise merge where `over` wins.
    pub fn merge(self, over: ParticleOptions) -> ParticleOptions {
        ParticleOptions {
            size: over.size.or(self.size),
            speed: over.speed.or(self.speed),
            gravity: over.gravity.or(self.gravity),
            power: over.power.or(self.power),
            shrink: over.shrink.or(self.shrink),
            jitter: over.jitter.or(self.jitter),
            color: over.color.or(self.color),
        }
    }
}

impl Options {
    /// Field-wise merge where `over` wins.
    pub fn merge(self, over: Options) -> Options {
        Options {
            fps: over.fps.or(self.fps),
            firework_count: over.firework_count.or(self.firework_count),
            firework_interval: over.firework_interval.or(self.firework_interval),
            firework_colors: over.firework_colors.or(self.firework_colors),
            particle: self.particle.merge(over.particle),
        }
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Options, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads options from a TOML file.
    pub fn load(path: &Path) -> Result<Options> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved particle physics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleConfig {
    /// Base diameter in pixels; each particle is perturbed within +/-50%
    pub size: f32,
    /// Peak launch speed in pixels per frame
    pub speed: f32,
    /// Added to vertical velocity every step
    pub gravity: f32,
    /// Velocity decay factor per step
    pub power: f32,
    /// Size decay factor per step
    pub shrink: f32,
    /// Scale of the random positional wobble per step
    pub jitter: f32,
    pub color: Rgba,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            size: 15.0,
            speed: 15.0,
            gravity: 0.08,
            power: 0.93,
            shrink: 0.97,
            jitter: 1.0,
            color: Rgba::from_hsla(210.0, 1.0, 0.5, 1.0),
        }
    }
}

/// Resolved display settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub fps: f32,
    pub firework_count: usize,
    pub firework_interval: Duration,
    pub firework_colors: Vec<Rgba>,
    pub particle: ParticleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60.0,
            firework_count: 8,
            firework_interval: Duration::from_millis(400),
            firework_colors: DEFAULT_PALETTE.to_vec(),
            particle: ParticleConfig::default(),
        }
    }
}

impl Config {
    /// Builds a fresh config from `options` layered over the defaults.
    pub fn resolve(options: Options) -> Config {
        let defaults = Config::default();
        let p = options.particle;
        let particle = ParticleConfig {
            size: p.size.unwrap_or(defaults.particle.size),
            speed: p.speed.unwrap_or(defaults.particle.speed),
            gravity: p.gravity.unwrap_or(defaults.particle.gravity),
            power: p.power.unwrap_or(defaults.particle.power),
            shrink: p.shrink.unwrap_or(defaults.particle.shrink),
            jitter: p.jitter.unwrap_or(defaults.particle.jitter),
            color: p.color.unwrap_or(defaults.particle.color),
        };

        let mut fps = options.fps.unwrap_or(defaults.fps);
        if !fps.is_finite() || fps < MIN_FPS {
            warn!(fps, min = MIN_FPS, "frame rate out of range, clamping");
            fps = MIN_FPS;
        }

        Config {
            fps,
            firework_count: options.firework_count.unwrap_or(defaults.firework_count),
            firework_interval: options
                .firework_interval
                .map(Duration::from_millis)
                .unwrap_or(defaults.firework_interval),
            firework_colors: options.firework_colors.unwrap_or(defaults.firework_colors),
            particle,
        }
    }

    /// Frame-callback driven rendering applies at 60 fps and above.
    pub fn uses_frame_callback(&self) -> bool {
        self.fps >= 60.0
    }

    /// Timer delay between renders when not frame driven.
    pub fn frame_interval(&self) -> Duration {
        let fps = self.fps.max(MIN_FPS) as f64;
        Duration::try_from_secs_f64(16.67 * (60.0 / fps) / 1000.0)
            .unwrap_or(Duration::from_millis(1000))
    }
}

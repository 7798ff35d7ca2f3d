//! Wind particles drawn over the map.
//!
//! Each tick every particle is pushed along the shared wind direction,
//! damped, moved and aged. A particle that runs out of life or leaves the
//! canvas is respawned at a random spot in the same tick, so nothing is
//! ever drawn expired or off-screen.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ParticleConfig;
use crate::surface::DrawSurface;
use crate::wind::{Direction, WindVector};

pub const PARTICLE_COLOR: &str = "#ff6b6b";

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub remaining_life: u32,
    pub max_life: u32,
    pub size: f64,
}

impl Particle {
    /// Advances one tick without any bounds handling.
    pub fn step(&mut self, wind: Direction, coupling: f64, damping: f64) {
        self.vx = (self.vx + wind.x * coupling) * damping;
        self.vy = (self.vy + wind.y * coupling) * damping;
        self.x += self.vx;
        self.y += self.vy;
        self.remaining_life = self.remaining_life.saturating_sub(1);
    }

    pub fn is_expired(&self, (width, height): (f64, f64)) -> bool {
        self.remaining_life == 0
            || !(0.0..=width).contains(&self.x)
            || !(0.0..=height).contains(&self.y)
    }

    pub fn alpha(&self, base_opacity: f64) -> f64 {
        if self.max_life == 0 {
            return 0.0;
        }
        f64::from(self.remaining_life) / f64::from(self.max_life) * base_opacity
    }
}

pub struct ParticleField {
    particles: Vec<Particle>,
    config: ParticleConfig,
    rng: ChaCha8Rng,
}

impl ParticleField {
    /// Seeds `config.count` particles uniformly over a `bounds` canvas.
    pub fn new(config: ParticleConfig, bounds: (f64, f64), seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let particles = (0..config.count)
            .map(|_| spawn(&mut rng, &config, bounds))
            .collect();
        Self { particles, config, rng }
    }

    /// Field over an explicit pool, for callers that place particles themselves.
    pub fn from_particles(particles: Vec<Particle>, config: ParticleConfig, seed: u64) -> Self {
        Self { particles, config, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// One tick against the current canvas `bounds`. Returns how many
    /// particles were respawned.
    pub fn update(&mut self, wind: &WindVector, bounds: (f64, f64)) -> usize {
        let ParticleConfig { wind_coupling, damping, .. } = self.config;
        let mut respawned = 0;
        for p in &mut self.particles {
            p.step(wind.direction, wind_coupling, damping);
            if p.is_expired(bounds) {
                respawn(&mut self.rng, p, bounds);
                respawned += 1;
            }
        }
        respawned
    }

    /// Clears the surface and draws every particle. A zero-area surface is
    /// left untouched.
    pub fn draw<D: DrawSurface>(&self, surface: &mut D) {
        let (width, height) = surface.size();
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        surface.clear();
        for p in &self.particles {
            surface.draw_circle((p.x, p.y), p.size, PARTICLE_COLOR, p.alpha(self.config.base_opacity));
        }
    }
}

fn random_point(rng: &mut ChaCha8Rng, (width, height): (f64, f64)) -> (f64, f64) {
    (rng.gen::<f64>() * width.max(0.0), rng.gen::<f64>() * height.max(0.0))
}

fn spawn(rng: &mut ChaCha8Rng, config: &ParticleConfig, bounds: (f64, f64)) -> Particle {
    let (x, y) = random_point(rng, bounds);
    let max_life = config.max_life.max(1);
    Particle {
        x,
        y,
        vx: (rng.gen::<f64>() * 2.0 - 1.0) * config.initial_speed,
        vy: (rng.gen::<f64>() * 2.0 - 1.0) * config.initial_speed,
        remaining_life: rng.gen_range(1..=max_life),
        max_life,
        size: config.min_size + rng.gen::<f64>() * (config.max_size - config.min_size),
    }
}

// Velocity carries over so streaks keep their heading.
fn respawn(rng: &mut ChaCha8Rng, p: &mut Particle, bounds: (f64, f64)) {
    let (x, y) = random_point(rng, bounds);
    p.x = x;
    p.y = y;
    p.remaining_life = p.max_life;
}

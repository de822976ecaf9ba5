//! Particle simulator - decorative bursts on line clear
//!
//! Particles live in pixel-equivalent units (one cell = `CELL_PX`). Each frame
//! they move by their velocity, fall under a constant acceleration and lose a
//! fixed slice of life; they are dropped once life reaches zero.

use crate::rng::PieceGenerator;
use crate::types::{
    BOARD_WIDTH, CELL_PX, PARTICLES_PER_ROW, PARTICLE_GRAVITY, PARTICLE_LIFE_DECAY,
};

/// Particle colour as HSL; saturation and lightness are fixed per burst style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Degrees in `[0, 360)`
    pub hue: f32,
    /// Fraction in `[0, 1]`
    pub saturation: f32,
    /// Fraction in `[0, 1]`
    pub lightness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life in `[0, 1]`
    pub life: f32,
    pub color: Hsl,
}

impl Particle {
    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += PARTICLE_GRAVITY;
        self.life -= PARTICLE_LIFE_DECAY;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// The live particle set
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    next_id: u64,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one burst along board row `row`
    pub fn spawn_burst(&mut self, row: usize, rng: &mut PieceGenerator) {
        let y = row as f32 * CELL_PX;
        self.particles.reserve(PARTICLES_PER_ROW);
        for _ in 0..PARTICLES_PER_ROW {
            let particle = Particle {
                id: self.next_id,
                x: rng.unit() * BOARD_WIDTH as f32 * CELL_PX,
                y,
                vx: (rng.unit() - 0.5) * 4.0,
                vy: -(rng.unit() * 2.0) - 1.0,
                life: 1.0,
                color: Hsl {
                    hue: rng.unit() * 360.0,
                    saturation: 0.7,
                    lightness: 0.6,
                },
            };
            self.next_id = self.next_id.wrapping_add(1);
            self.particles.push(particle);
        }
    }

    /// Advance every particle by one frame and discard the expired ones
    pub fn tick(&mut self) {
        for particle in &mut self.particles {
            particle.step();
        }
        self.particles.retain(Particle::is_alive);
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

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

//! Particle bursts thrown off by popped bubbles
//!
//! Purely visual: particles never affect gameplay state. Emission is
//! parameterized by the caller's RNG so bursts are reproducible in tests.

use glam::Vec2;
use rand::Rng;

use crate::tuning::Tuning;

/// A short-lived fleck from a popped bubble
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current draw size; shrinks every frame, dead at <= 0
    pub size: f32,
    /// Frames remaining; dead at <= 0
    pub life: i32,
    /// Color tag inherited from the popped bubble's polarity
    pub good: bool,
}

/// Emit one burst of particles at `origin`
pub fn burst<R: Rng>(
    rng: &mut R,
    particles: &mut Vec<Particle>,
    origin: Vec2,
    good: bool,
    tuning: &Tuning,
) {
    let spread = tuning.particle_spread;
    for _ in 0..tuning.burst_count {
        particles.push(Particle {
            pos: origin,
            vel: Vec2::new(
                rng.random_range(-spread..spread),
                rng.random_range(-spread..spread) + tuning.particle_kick,
            ),
            size: rng.random_range(tuning.particle_size_min..tuning.particle_size_max),
            life: tuning.particle_life,
            good,
        });
    }
}

/// Advance all particles one frame and drop the exhausted ones
pub fn step(particles: &mut Vec<Particle>, tuning: &Tuning) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += tuning.particle_gravity;
        p.size -= tuning.particle_decay;
        p.life -= 1;
    }
    particles.retain(|p| p.life > 0 && p.size > 0.0);
}

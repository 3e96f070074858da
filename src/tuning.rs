//! Data-driven game balance
//!
//! Every gameplay number that is a design choice rather than a geometric
//! fact lives here, so rounds can be constructed with alternate balance in
//! tests or future difficulty modes.

use serde::{Deserialize, Serialize};

/// Gameplay tunables for both mini-games
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    // === Bubble spawner ===
    /// Per-mill spawn chance base for good bubbles (per frame)
    pub good_spawn_base: u32,
    /// Per-mill spawn chance base for bad bubbles (per frame).
    /// Deliberately much higher than the good base: resisting the frequent
    /// bad bubbles is the impulse-control challenge.
    pub bad_spawn_base: u32,
    /// Bubble radius (constant for a bubble's lifetime)
    pub bubble_radius: f32,
    /// Horizontal drift half-range; vx is sampled from [-drift, drift)
    pub bubble_drift: f32,
    /// Upward speed range; vy is sampled from [-rise_max, -rise_min)
    pub bubble_rise_min: f32,
    pub bubble_rise_max: f32,

    // === Round ===
    /// Lives at round start
    pub starting_lives: u32,
    /// Round time budget in milliseconds
    pub round_ms: f64,

    // === Particle bursts ===
    /// Particles per burst
    pub burst_count: usize,
    /// Initial particle size range [min, max)
    pub particle_size_min: f32,
    pub particle_size_max: f32,
    /// Velocity component half-range; vx/vy sampled from [-spread, spread)
    pub particle_spread: f32,
    /// Constant upward bias added to vy at emission
    pub particle_kick: f32,
    /// Downward acceleration per frame
    pub particle_gravity: f32,
    /// Size shrink per frame
    pub particle_decay: f32,
    /// Frames a particle lives at most
    pub particle_life: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            good_spawn_base: 40,
            bad_spawn_base: 95,
            bubble_radius: 40.0,
            bubble_drift: 1.0,
            bubble_rise_min: 2.0,
            bubble_rise_max: 5.0,

            starting_lives: 3,
            round_ms: 60_000.0,

            burst_count: 15,
            particle_size_min: 4.0,
            particle_size_max: 9.0,
            particle_spread: 4.0,
            particle_kick: -2.0,
            particle_gravity: 0.2,
            particle_decay: 0.3,
            particle_life: 25,
        }
    }
}

impl Tuning {
    /// Per-mill good-bubble spawn chance at the given difficulty level.
    /// The base shrinks as level climbs but never reaches zero, so the
    /// chance is capped strictly below certainty and above impossibility.
    pub fn good_spawn_per_mill(&self, level: u32) -> u32 {
        self.good_spawn_base - level.min(self.good_spawn_base.saturating_sub(1))
    }

    /// Per-mill bad-bubble spawn chance at the given difficulty level
    pub fn bad_spawn_per_mill(&self, level: u32) -> u32 {
        self.bad_spawn_base - level.min(self.bad_spawn_base.saturating_sub(1))
    }

    /// Horizontal spawn inset from either edge of the play-field
    pub fn spawn_inset(&self) -> f32 {
        self.bubble_radius + 20.0
    }
}

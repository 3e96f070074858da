//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time enters as explicit `now_ms` arguments, never from a clock
//! - One integration step per frame call
//! - No rendering or platform dependencies

pub mod bubble;
pub mod garden;
pub mod particles;

pub use bubble::{Bubble, BubblePhase, BubbleRound, GameEvent, RoundStats};
pub use garden::{Bowl, GardenPhase, GardenRound, Stone, StoneKind, WrongDrop};
pub use particles::Particle;

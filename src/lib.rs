//! Zen Arcade - two calming canvas mini-games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, hit-testing, scoring)
//! - `render`: Canvas2D rendering (wasm only)
//! - `audio`: Procedurally synthesized sound cues (wasm only, best-effort)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Bubble Pop play-field (logical pixels)
    pub const BUBBLE_WIDTH: f32 = 700.0;
    pub const BUBBLE_HEIGHT: f32 = 450.0;

    /// Zen Sorting play-field (logical pixels)
    pub const GARDEN_WIDTH: f32 = 800.0;
    pub const GARDEN_HEIGHT: f32 = 550.0;

    /// Bubbles spawn this far below the bottom edge
    pub const BUBBLE_SPAWN_MARGIN: f32 = 80.0;
    /// Bubbles are removed once this far above the top edge
    pub const BUBBLE_EXIT_MARGIN: f32 = 70.0;

    /// Stone and bowl sizes for the sorting garden
    pub const STONE_RADIUS: f32 = 22.0;
    pub const BOWL_RADIUS: f32 = 45.0;

    /// Wrong-bowl highlight duration (ms)
    pub const WRONG_FLASH_MS: f64 = 1200.0;
}

/// Squared distance between two points
#[inline]
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    (a - b).length_squared()
}

/// True if `point` lies strictly inside the circle at `center` with `radius`
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, point: Vec2) -> bool {
    dist_sq(center, point) < radius * radius
}

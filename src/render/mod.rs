//! Canvas2D rendering
//!
//! One draw pass per frame per game. Rendering reads simulation state and
//! never mutates it; everything here is presentation.

mod bubble;
mod garden;

pub use bubble::draw_bubble_frame;
pub use garden::draw_garden_frame;

/// Good-bubble fill and good-burst particle color
pub const BLUE: &str = "#82beff";
/// Bad-bubble fill and bad-burst particle color
pub const RED: &str = "#ff7878";

//! Bubble Pop draw pass

use std::f64::consts::{PI, TAU};

use web_sys::CanvasRenderingContext2d;

use super::{BLUE, RED};
use crate::consts::{BUBBLE_HEIGHT, BUBBLE_WIDTH};
use crate::sim::{Bubble, BubbleRound};

/// Draw one full frame: background, bubbles, particles, HUD or end panel
pub fn draw_bubble_frame(ctx: &CanvasRenderingContext2d, round: &BubbleRound, now_ms: f64) {
    draw_background(ctx);

    for bubble in &round.bubbles {
        draw_bubble(ctx, bubble);
    }

    for p in &round.particles {
        ctx.set_fill_style_str(if p.good { BLUE } else { RED });
        ctx.begin_path();
        ctx.arc(
            f64::from(p.pos.x),
            f64::from(p.pos.y),
            f64::from(p.size.max(0.0)),
            0.0,
            TAU,
        )
        .ok();
        ctx.fill();
    }

    if let Some(stats) = round.stats() {
        draw_end_panel(ctx, stats.score, stats.accuracy, stats.avg_reaction_secs);
    } else {
        draw_hud(ctx, round, now_ms);
    }
}

/// Soft three-stop vertical gradient behind everything
fn draw_background(ctx: &CanvasRenderingContext2d) {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, f64::from(BUBBLE_HEIGHT));
    gradient.add_color_stop(0.0, "#fef3c7").ok();
    gradient.add_color_stop(0.5, "#fbdfe8").ok();
    gradient.add_color_stop(1.0, "#bfdbfe").ok();
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(
        0.0,
        0.0,
        f64::from(BUBBLE_WIDTH),
        f64::from(BUBBLE_HEIGHT),
    );
}

/// A bubble with a simple face; good bubbles get a smile
fn draw_bubble(ctx: &CanvasRenderingContext2d, bubble: &Bubble) {
    let (x, y) = (f64::from(bubble.pos.x), f64::from(bubble.pos.y));
    let r = f64::from(bubble.radius);

    ctx.set_fill_style_str(if bubble.good { BLUE } else { RED });
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU).ok();
    ctx.fill();

    // Eyes
    ctx.set_fill_style_str("#ffffff");
    for dx in [-12.0, 12.0] {
        ctx.begin_path();
        ctx.arc(x + dx, y - 8.0, 5.0, 0.0, TAU).ok();
        ctx.fill();
    }
    // Pupils
    ctx.set_fill_style_str("#000000");
    for dx in [-12.0, 12.0] {
        ctx.begin_path();
        ctx.arc(x + dx, y - 8.0, 2.0, 0.0, TAU).ok();
        ctx.fill();
    }

    if bubble.good {
        ctx.set_stroke_style_str("#000000");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.arc(x, y + 5.0, 10.0, 0.0, PI).ok();
        ctx.stroke();
    }
}

fn draw_hud(ctx: &CanvasRenderingContext2d, round: &BubbleRound, now_ms: f64) {
    ctx.set_fill_style_str("#000000");
    ctx.set_font("bold 28px Arial");
    ctx.fill_text(&format!("Score: {}", round.score), 20.0, 40.0)
        .ok();
    ctx.fill_text(&format!("Lives: {}", round.lives), 20.0, 75.0)
        .ok();
    ctx.fill_text(&format!("Time: {}", round.remaining_secs(now_ms)), 20.0, 110.0)
        .ok();
}

fn draw_end_panel(ctx: &CanvasRenderingContext2d, score: u32, accuracy: f64, avg_reaction: f64) {
    ctx.set_fill_style_str("rgba(255,255,255,0.85)");
    ctx.fill_rect(110.0, 90.0, 480.0, 270.0);

    ctx.set_text_align("center");
    let cx = f64::from(BUBBLE_WIDTH) / 2.0;

    ctx.set_fill_style_str("#333333");
    ctx.set_font("bold 36px Arial");
    ctx.fill_text("Game Over!", cx, 150.0).ok();

    ctx.set_font("bold 26px Arial");
    ctx.fill_text(&format!("Final Score: {}", score), cx, 210.0)
        .ok();
    ctx.fill_text(&format!("Accuracy: {:.1}%", accuracy), cx, 250.0)
        .ok();
    ctx.fill_text(&format!("Avg Reaction: {:.2}s", avg_reaction), cx, 290.0)
        .ok();

    ctx.set_font("18px Arial");
    ctx.fill_text("Press restart to play again", cx, 335.0).ok();
    ctx.set_text_align("left");
}

//! Zen Sorting draw pass

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use crate::consts::{GARDEN_HEIGHT, GARDEN_WIDTH};
use crate::sim::{GardenRound, StoneKind};

const BG_COLOR: &str = "#efefef";
const RED_FEEDBACK: &str = "#c85050";
const GREEN_FEEDBACK: &str = "#8cc8a0";
const BOWL_OUTLINE: &str = "#969696";

/// Pastel fill for a stone/bowl category
fn kind_color(kind: StoneKind) -> &'static str {
    match kind {
        StoneKind::Blue => "#aac8dc",
        StoneKind::Green => "#b4d7be",
        StoneKind::Pink => "#ddb4c8",
    }
}

/// Draw one full frame: bowls (with wrong-drop highlight), stones, text
pub fn draw_garden_frame(ctx: &CanvasRenderingContext2d, round: &GardenRound, now_ms: f64) {
    ctx.set_fill_style_str(BG_COLOR);
    ctx.fill_rect(
        0.0,
        0.0,
        f64::from(GARDEN_WIDTH),
        f64::from(GARDEN_HEIGHT),
    );

    let flagged = round.wrong_bowl(now_ms);
    for (i, bowl) in round.bowls.iter().enumerate() {
        let (x, y) = (f64::from(bowl.pos.x), f64::from(bowl.pos.y));
        let r = f64::from(bowl.radius);

        ctx.set_fill_style_str(kind_color(bowl.kind));
        ctx.begin_path();
        ctx.arc(x, y, r, 0.0, TAU).ok();
        ctx.fill();

        let highlighted = flagged == Some(i);
        ctx.set_stroke_style_str(if highlighted { RED_FEEDBACK } else { BOWL_OUTLINE });
        ctx.set_line_width(if highlighted { 4.0 } else { 2.0 });
        ctx.begin_path();
        ctx.arc(x, y, r, 0.0, TAU).ok();
        ctx.stroke();
    }

    for stone in &round.stones {
        let (x, y) = (f64::from(stone.pos.x), f64::from(stone.pos.y));
        ctx.set_fill_style_str(kind_color(stone.kind));
        ctx.begin_path();
        ctx.arc(x, y, f64::from(stone.radius), 0.0, TAU).ok();
        ctx.fill();

        ctx.set_stroke_style_str("rgba(0,0,0,0.2)");
        ctx.set_line_width(2.0);
        ctx.stroke();
    }

    if round.is_complete() {
        draw_complete_banner(ctx);
    } else {
        draw_instructions(ctx);
    }
}

fn draw_instructions(ctx: &CanvasRenderingContext2d) {
    ctx.set_fill_style_str("#464646");
    ctx.set_font("bold 22px Arial");
    ctx.fill_text("Zen Sorting Garden", 20.0, 30.0).ok();

    ctx.set_font("16px Arial");
    ctx.fill_text("Drag each stone into a bowl of the same color.", 20.0, 60.0)
        .ok();
    ctx.fill_text("Red outline = wrong bowl. Green message = all correct!", 20.0, 85.0)
        .ok();
    ctx.fill_text("No rush. No penalties.", 20.0, 110.0).ok();
}

fn draw_complete_banner(ctx: &CanvasRenderingContext2d) {
    let w = f64::from(GARDEN_WIDTH);
    let h = f64::from(GARDEN_HEIGHT);

    ctx.set_global_alpha(0.9);
    ctx.set_fill_style_str(GREEN_FEEDBACK);
    ctx.fill_rect(0.0, h - 70.0, w, 70.0);
    ctx.set_global_alpha(1.0);

    ctx.set_fill_style_str("#284632");
    ctx.set_font("bold 20px Arial");
    ctx.set_text_align("center");
    ctx.fill_text("All stones correctly placed! Take a calm breath", w / 2.0, h - 35.0)
        .ok();
    ctx.set_text_align("left");
}

//! Canvas rendering of board, tray and the tile in motion.

use rand::Rng;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::controller::{DragState, Feedback, PuzzleController};
use crate::grid::Tile;
use crate::layout::{Point, Rect};
use crate::session::Container;

/// Canvas side before the first game.
pub(super) const IDLE_CANVAS_PX: u32 = 300;

const BACKGROUND: &str = "#181818";
const BOARD_FILL: &str = "#242424";
const TRAY_FILL: &str = "#1f1f1f";
const GRID_LINE: &str = "#3a3a3a";
const HOVER_OUTLINE: &str = "rgba(255,240,150,0.85)";
const SOLVED_OUTLINE: &str = "#f5c542";
const ORIGIN_ALPHA: f64 = 0.35;
const MOTION_ALPHA: f64 = 0.8;

pub(super) fn draw<F: Feedback, R: Rng>(
    ctx: &CanvasRenderingContext2d,
    canvas: &HtmlCanvasElement,
    controller: &PuzzleController<F, R>,
    picture: Option<&HtmlImageElement>,
) -> Result<(), JsValue> {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, width, height);

    let (Some(session), Some(layout)) = (controller.session(), controller.layout()) else {
        ctx.set_fill_style_str("#bbbbbb");
        ctx.set_font("16px sans-serif");
        ctx.set_text_align("center");
        ctx.fill_text("Upload an image to begin", width / 2.0, height / 2.0)?;
        return Ok(());
    };

    let active = match controller.drag() {
        DragState::Dragging(active) => Some(*active),
        DragState::Idle => None,
    };

    ctx.set_fill_style_str(BOARD_FILL);
    fill(ctx, layout.board);
    ctx.set_fill_style_str(TRAY_FILL);
    fill(ctx, layout.tray);

    ctx.set_stroke_style_str(GRID_LINE);
    ctx.set_line_width(1.0);
    for slot in session.slots() {
        let r = layout.slot_rect(slot.coord);
        ctx.stroke_rect(r.x + 0.5, r.y + 0.5, r.w - 1.0, r.h - 1.0);
        if let Some(tile) = slot.occupant.and_then(|id| session.tile(id)) {
            let picked = active.is_some_and(|a| a.origin == Container::Slot(slot.coord));
            draw_tile(ctx, picture, tile, r.origin(), layout.tile_px, picked)?;
        }
    }

    for (idx, &id) in session.tray().iter().enumerate() {
        let Some(tile) = session.tile(id) else {
            continue;
        };
        let picked = active.is_some_and(|a| a.origin == Container::Tray(idx));
        let r = layout.tray_cell_rect(idx);
        draw_tile(ctx, picture, tile, r.origin(), layout.tile_px, picked)?;
    }

    if let Some(coord) = active.and_then(|a| a.hovered) {
        let r = layout.slot_rect(coord);
        ctx.set_stroke_style_str(HOVER_OUTLINE);
        ctx.set_line_width(3.0);
        ctx.stroke_rect(r.x + 1.5, r.y + 1.5, r.w - 3.0, r.h - 3.0);
    }

    if session.completion_signalled() {
        let b = layout.board;
        ctx.set_stroke_style_str(SOLVED_OUTLINE);
        ctx.set_line_width(4.0);
        ctx.stroke_rect(b.x + 2.0, b.y + 2.0, b.w - 4.0, b.h - 4.0);
    }

    if let Some(a) = active {
        if let Some(tile) = session.tile(a.tile) {
            ctx.set_global_alpha(MOTION_ALPHA);
            draw_tile(ctx, picture, tile, a.position, layout.tile_px, false)?;
            ctx.set_global_alpha(1.0);
        }
    }
    Ok(())
}

fn fill(ctx: &CanvasRenderingContext2d, r: Rect) {
    ctx.fill_rect(r.x, r.y, r.w, r.h);
}

fn draw_tile(
    ctx: &CanvasRenderingContext2d,
    picture: Option<&HtmlImageElement>,
    tile: &Tile,
    at: Point,
    size: f64,
    faded: bool,
) -> Result<(), JsValue> {
    if faded {
        ctx.set_global_alpha(ORIGIN_ALPHA);
    }
    match picture {
        Some(img) => {
            let src = tile.region;
            ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                img, src.x, src.y, src.width, src.height, at.x, at.y, size, size,
            )?;
        }
        None => {
            // Picture not attached yet; show the coordinate instead.
            ctx.set_fill_style_str("#555555");
            ctx.fill_rect(at.x, at.y, size, size);
            ctx.set_fill_style_str("#eeeeee");
            ctx.set_font("14px monospace");
            ctx.set_text_align("center");
            let label = format!("{},{}", tile.coord.row, tile.coord.col);
            ctx.fill_text(&label, at.x + size / 2.0, at.y + size / 2.0)?;
        }
    }
    if faded {
        ctx.set_global_alpha(1.0);
    }
    Ok(())
}

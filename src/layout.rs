//! Canvas geometry: the square board on top, the tray below it, and
//! hit-testing of input points against both.

use crate::config::{MIN_BOARD_PX, PuzzleConfig};
use crate::error::InputProtocolViolation;
use crate::grid::{Coord, GridSize};

/// Canvas-local position in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Checks the position carried by a drop event.
    pub fn validate(point: Option<Point>) -> Result<Point, InputProtocolViolation> {
        match point {
            None => Err(InputProtocolViolation::MissingPoint),
            Some(p) if !p.is_finite() => Err(InputProtocolViolation::NonFinitePoint),
            Some(p) => Ok(p),
        }
    }

    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    /// Maps a viewport (client) position into canvas pixels. `bounds` is the
    /// canvas' on-screen box and `backing` its pixel width and height, which
    /// differ when page CSS stretches the element.
    pub fn from_client(client: Point, bounds: Rect, backing: (f64, f64)) -> Point {
        let scale = |pixels: f64, css: f64| {
            if css > 0.0 && css.is_finite() && pixels > 0.0 {
                pixels / css
            } else {
                1.0
            }
        };
        let local = client.offset_from(bounds.origin());
        Point::new(
            local.x * scale(backing.0, bounds.w),
            local.y * scale(backing.1, bounds.h),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Edges are inclusive, so neighbouring cells share their border.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub size: GridSize,
    pub tile_px: f64,
    pub board: Rect,
    pub tray: Rect,
}

impl Layout {
    /// Board side is `min(max_board_px, viewport_width - padding)`; the tray
    /// has the same width with one column per grid column.
    pub fn new(size: GridSize, viewport_width: f64, config: &PuzzleConfig) -> Self {
        let available = if viewport_width.is_finite() {
            viewport_width - config.viewport_padding_px
        } else {
            config.max_board_px
        };
        let board_px = config.max_board_px.min(available).max(MIN_BOARD_PX);
        let tile_px = board_px / size.get() as f64;
        let rows = size.tile_count().div_ceil(size.get() as usize);
        let tray_top = board_px + config.tray_gap_px;
        Self {
            size,
            tile_px,
            board: Rect::new(0.0, 0.0, board_px, board_px),
            tray: Rect::new(0.0, tray_top, board_px, rows as f64 * tile_px),
        }
    }

    /// Width and height the canvas needs to show board and tray.
    pub fn canvas_size(&self) -> (f64, f64) {
        (self.board.w, self.tray.y + self.tray.h)
    }

    pub fn slot_rect(&self, coord: Coord) -> Rect {
        Rect::new(
            self.board.x + coord.col as f64 * self.tile_px,
            self.board.y + coord.row as f64 * self.tile_px,
            self.tile_px,
            self.tile_px,
        )
    }

    /// First slot in row-major order whose bounds contain `p`.
    pub fn slot_at(&self, p: Point) -> Option<Coord> {
        if !p.is_finite() {
            return None;
        }
        self.size.coords().find(|&c| self.slot_rect(c).contains(p))
    }

    pub fn tray_cell_rect(&self, index: usize) -> Rect {
        let cols = self.size.get() as usize;
        let col = index % cols;
        let row = index / cols;
        Rect::new(
            self.tray.x + col as f64 * self.tile_px,
            self.tray.y + row as f64 * self.tile_px,
            self.tile_px,
            self.tile_px,
        )
    }

    /// First tray cell (in tray order) containing `p`, among the first `len`.
    pub fn tray_index_at(&self, p: Point, len: usize) -> Option<usize> {
        if !p.is_finite() || !self.tray.contains(p) {
            return None;
        }
        (0..len).find(|&i| self.tray_cell_rect(i).contains(p))
    }
}

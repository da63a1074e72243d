//! Picture Puzzle core crate.
//!
//! An uploaded picture is cut into an NxN grid of tiles, the tiles are
//! shuffled into a tray, and the player drags each one back onto its slot.
//! Everything except the `web` shell is platform independent and tested
//! natively; the shell binds the controller to the page when `start_game()`
//! is called from JS.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod input;
pub mod layout;
pub mod session;
pub mod shuffle;
pub mod timer;

mod web;

pub use config::PuzzleConfig;
pub use controller::{DragState, DropOutcome, Feedback, InputOutcome, NoFeedback, PuzzleController};
pub use error::{ConfigurationError, DecodeError, InputProtocolViolation, PuzzleError};
pub use grid::{Coord, GridSize, SourceImage, TileId};
pub use input::{InputEvent, InputEventKind, PointerId, PointerKind, TouchPoint};
pub use layout::{Layout, Point};
pub use session::{Completion, Container, GameSession};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Mounts the puzzle on the current page. `config_json` overrides
/// [`PuzzleConfig`] fields when the crate is built with `serde_json`.
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    web::mount(config_json)
}

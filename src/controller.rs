//! Interaction controller.
//!
//! Owns the single active [`GameSession`] and resolves drag gestures against
//! it. Input arrives as [`InputEvent`]s (mouse and touch alike) and drives a
//! two-state machine: `Idle` and `Dragging`. A dragged tile keeps belonging
//! to its origin container until the drop is resolved, so cancelling a
//! gesture needs no bookkeeping beyond clearing the drag.

use rand::Rng;
use rand::rngs::StdRng;

use crate::config::PuzzleConfig;
use crate::error::{ConfigurationError, DecodeError, InputProtocolViolation, PuzzleError};
use crate::grid::{Coord, GridSize, SourceImage, TileId};
use crate::input::{InputEvent, InputEventKind, PointerId};
use crate::layout::{Layout, Point};
use crate::session::{Completion, Container, GameSession};

/// Fire-and-forget cues. Implementations must not fail back into the game.
pub trait Feedback {
    fn new_game(&mut self) {}
    fn correct_placement(&mut self, _coord: Coord) {}
    fn completed(&mut self, _completion: Completion) {}
}

/// Feedback sink that ignores every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {}

/// The tile currently following the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveDrag {
    pub tile: TileId,
    pub pointer: PointerId,
    pub origin: Container,
    /// Pointer position relative to the tile's top-left corner at grab time.
    pub grab_offset: Point,
    /// Where the tile is drawn while in motion (top-left corner).
    pub position: Point,
    /// Slot currently under the pointer, highlighted by the renderer.
    pub hovered: Option<Coord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// How a drop was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Tile landed on its own slot.
    Placed {
        tile: TileId,
        coord: Coord,
        completion: Option<Completion>,
    },
    /// Dropped on another tile's slot (occupied or not); back to the tray.
    Misplaced { tile: TileId, slot: Coord },
    /// Dropped outside the board; back to the tray.
    Returned { tile: TileId },
    /// Drop event was unusable; treated as a drop outside the board.
    Rejected {
        tile: TileId,
        violation: InputProtocolViolation,
    },
}

impl DropOutcome {
    pub fn completion(&self) -> Option<Completion> {
        match *self {
            DropOutcome::Placed { completion, .. } => completion,
            _ => None,
        }
    }
}

/// Result of feeding one [`InputEvent`] to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    DragStarted { tile: TileId },
    Moved { hovered: Option<Coord> },
    Dropped(DropOutcome),
    Cancelled { tile: TileId },
}

pub struct PuzzleController<F: Feedback, R: Rng = StdRng> {
    config: PuzzleConfig,
    grid_size: GridSize,
    viewport_width: f64,
    image: Option<SourceImage>,
    session: Option<GameSession>,
    layout: Option<Layout>,
    drag: DragState,
    feedback: F,
    rng: R,
}

impl<F: Feedback, R: Rng> PuzzleController<F, R> {
    pub fn new(config: PuzzleConfig, feedback: F, rng: R) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let grid_size = config.default_grid_size()?;
        let viewport_width = config.max_board_px + config.viewport_padding_px;
        Ok(Self {
            config,
            grid_size,
            viewport_width,
            image: None,
            session: None,
            layout: None,
            drag: DragState::Idle,
            feedback,
            rng,
        })
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(GameSession::is_running)
    }

    /// Width used for the next layout. Takes effect on the next start.
    pub fn set_viewport_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.viewport_width = width;
        }
    }

    /// Stores a freshly decoded image and starts a game with it. A zero-sized
    /// image is rejected without touching the current session.
    pub fn load_image(&mut self, image: SourceImage) -> Result<(), PuzzleError> {
        if image.width == 0 || image.height == 0 {
            return Err(DecodeError::EmptyImage.into());
        }
        self.image = Some(image);
        self.start_game()?;
        Ok(())
    }

    /// Discards any previous session and starts a fresh one at the current
    /// grid size. Without an image nothing changes.
    pub fn start_game(&mut self) -> Result<(), ConfigurationError> {
        let session = GameSession::start(self.grid_size, self.image.as_ref(), &mut self.rng)?;
        if let Some(old) = self.session.as_mut() {
            old.stop();
        }
        self.layout = Some(Layout::new(self.grid_size, self.viewport_width, &self.config));
        self.session = Some(session);
        self.drag = DragState::Idle;
        self.feedback.new_game();
        Ok(())
    }

    /// Applies the difficulty selector's value. Restarts the game once one
    /// has been started, finished or not; returns whether it did.
    pub fn set_difficulty(&mut self, raw: &str) -> Result<bool, ConfigurationError> {
        let size = self.config.difficulty(GridSize::parse(raw)?)?;
        self.grid_size = size;
        if self.session.is_some() {
            self.start_game()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// One second of wall clock. Returns the new elapsed value if it changed.
    pub fn tick(&mut self) -> Option<u32> {
        let session = self.session.as_mut()?;
        session.tick().then(|| session.timer().elapsed())
    }

    /// Tile under `p`, looking at the board first and then the tray.
    pub fn tile_at(&self, p: Point) -> Option<TileId> {
        let session = self.session.as_ref()?;
        let layout = self.layout.as_ref()?;
        if let Some(coord) = layout.slot_at(p) {
            if let Some(id) = session.slot(coord).and_then(|s| s.occupant) {
                return Some(id);
            }
        }
        layout
            .tray_index_at(p, session.tray().len())
            .map(|idx| session.tray()[idx])
    }

    fn container_rect_origin(&self, container: Container) -> Option<Point> {
        let layout = self.layout.as_ref()?;
        Some(match container {
            Container::Tray(idx) => layout.tray_cell_rect(idx).origin(),
            Container::Slot(coord) => layout.slot_rect(coord).origin(),
        })
    }

    /// Picks up `tile` under `pointer`. Ignored while another drag is active
    /// or when no session is running.
    pub fn begin_drag(&mut self, tile: TileId, pointer: PointerId, point: Point) -> bool {
        if matches!(self.drag, DragState::Dragging(_)) || !point.is_finite() {
            return false;
        }
        let Some(session) = self.session.as_ref().filter(|s| s.is_running()) else {
            return false;
        };
        let Some(origin) = session.container_of(tile) else {
            return false;
        };
        let Some(top_left) = self.container_rect_origin(origin) else {
            return false;
        };
        let hovered = self.layout.as_ref().and_then(|l| l.slot_at(point));
        self.drag = DragState::Dragging(ActiveDrag {
            tile,
            pointer,
            origin,
            grab_offset: point.offset_from(top_left),
            position: top_left,
            hovered,
        });
        true
    }

    /// Moves the dragged tile under `point` and updates the hovered slot.
    pub fn track_motion(&mut self, point: Point) -> Option<Coord> {
        if !point.is_finite() {
            return None;
        }
        let hovered = self.layout.as_ref().and_then(|l| l.slot_at(point));
        let DragState::Dragging(active) = &mut self.drag else {
            return None;
        };
        active.position = point.offset_from(active.grab_offset);
        active.hovered = hovered;
        hovered
    }

    /// Resolves the drop of the active drag at `point`. Returns `None` when
    /// nothing was being dragged.
    pub fn end_drag(&mut self, point: Option<Point>) -> Option<DropOutcome> {
        let DragState::Dragging(active) = std::mem::take(&mut self.drag) else {
            return None;
        };
        let tile = active.tile;
        let layout = self.layout?;
        let session = self.session.as_mut()?;

        let point = match Point::validate(point) {
            Ok(p) => p,
            Err(violation) => {
                session.return_to_tray(tile);
                return Some(DropOutcome::Rejected { tile, violation });
            }
        };
        let Some(slot) = layout.slot_at(point) else {
            session.return_to_tray(tile);
            return Some(DropOutcome::Returned { tile });
        };
        if !session.place(tile, slot) {
            session.return_to_tray(tile);
            return Some(DropOutcome::Misplaced { tile, slot });
        }
        self.feedback.correct_placement(slot);
        let completion = session.check_completion();
        if let Some(done) = completion {
            self.feedback.completed(done);
        }
        Some(DropOutcome::Placed {
            tile,
            coord: slot,
            completion,
        })
    }

    /// Abandons the active drag; the tile stays where it was picked up.
    pub fn cancel_drag(&mut self) -> Option<TileId> {
        match std::mem::take(&mut self.drag) {
            DragState::Dragging(active) => Some(active.tile),
            DragState::Idle => None,
        }
    }

    /// Routes one input event through the drag state machine.
    pub fn handle_input(&mut self, event: InputEvent) -> InputOutcome {
        let active_pointer = match &self.drag {
            DragState::Dragging(active) => Some(active.pointer),
            DragState::Idle => None,
        };
        if active_pointer.is_some_and(|p| p != event.pointer) {
            return InputOutcome::Ignored;
        }
        match event.kind {
            InputEventKind::Down => {
                let Some(point) = event.point.filter(Point::is_finite) else {
                    return InputOutcome::Ignored;
                };
                match self.tile_at(point) {
                    Some(tile) if self.begin_drag(tile, event.pointer, point) => {
                        InputOutcome::DragStarted { tile }
                    }
                    _ => InputOutcome::Ignored,
                }
            }
            InputEventKind::Move => match (event.point, active_pointer) {
                (Some(point), Some(_)) if point.is_finite() => InputOutcome::Moved {
                    hovered: self.track_motion(point),
                },
                _ => InputOutcome::Ignored,
            },
            InputEventKind::Up => self
                .end_drag(event.point)
                .map_or(InputOutcome::Ignored, InputOutcome::Dropped),
            InputEventKind::Cancel => self
                .cancel_drag()
                .map_or(InputOutcome::Ignored, |tile| InputOutcome::Cancelled { tile }),
        }
    }
}

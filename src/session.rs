//! One game in progress: board, tray, timer and the completion latch.
//!
//! Every tile is owned by exactly one container, the tray or a slot. Moves
//! detach a tile from its current container before attaching it elsewhere,
//! so there is no observable state where a tile is in both or neither.

use rand::Rng;

use crate::error::ConfigurationError;
use crate::grid::{Coord, GridSize, Slot, SourceImage, Tile, TileId, build_grid};
use crate::shuffle::shuffle;
use crate::timer::Timer;

/// Where a tile currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    /// Position inside the tray order.
    Tray(usize),
    Slot(Coord),
}

/// Raised once when the last correct tile lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub elapsed_secs: u32,
}

#[derive(Clone, Debug)]
pub struct GameSession {
    size: GridSize,
    tiles: Vec<Tile>,
    slots: Vec<Slot>,
    tray: Vec<TileId>,
    timer: Timer,
    running: bool,
    completion_signalled: bool,
}

impl GameSession {
    /// Builds the grid, shuffles every tile into the tray and starts the timer.
    pub fn start<R: Rng + ?Sized>(
        size: GridSize,
        image: Option<&SourceImage>,
        rng: &mut R,
    ) -> Result<Self, ConfigurationError> {
        let grid = build_grid(size, image)?;
        let mut tray: Vec<TileId> = (0..grid.tiles.len()).map(TileId).collect();
        shuffle(&mut tray, rng);
        let mut timer = Timer::new();
        timer.restart();
        Ok(Self {
            size: grid.size,
            tiles: grid.tiles,
            slots: grid.slots,
            tray,
            timer,
            running: true,
            completion_signalled: false,
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, coord: Coord) -> Option<&Slot> {
        if !self.size.contains(coord) {
            return None;
        }
        self.slots.get(self.size.index_of(coord))
    }

    pub fn tray(&self) -> &[TileId] {
        &self.tray
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completion_signalled(&self) -> bool {
        self.completion_signalled
    }

    /// One clock second. No-op once the session has stopped.
    pub fn tick(&mut self) -> bool {
        self.running && self.timer.tick()
    }

    /// Ends the session without completing it.
    pub fn stop(&mut self) {
        self.running = false;
        self.timer.stop();
    }

    pub fn container_of(&self, id: TileId) -> Option<Container> {
        if let Some(pos) = self.tray.iter().position(|&t| t == id) {
            return Some(Container::Tray(pos));
        }
        self.slots
            .iter()
            .find(|s| s.occupant == Some(id))
            .map(|s| Container::Slot(s.coord))
    }

    fn detach(&mut self, id: TileId) {
        match self.container_of(id) {
            Some(Container::Tray(pos)) => {
                self.tray.remove(pos);
            }
            Some(Container::Slot(coord)) => {
                let idx = self.size.index_of(coord);
                self.slots[idx].occupant = None;
            }
            None => {}
        }
    }

    /// Attaches `id` to the slot at `coord` when the coordinates match and
    /// the slot is free (or already holds `id`). Returns false and leaves
    /// everything untouched otherwise.
    pub fn place(&mut self, id: TileId, coord: Coord) -> bool {
        let Some(tile) = self.tiles.get(id.0) else {
            return false;
        };
        if tile.coord != coord || !self.size.contains(coord) {
            return false;
        }
        let idx = self.size.index_of(coord);
        match self.slots[idx].occupant {
            Some(other) if other != id => return false,
            _ => {}
        }
        self.detach(id);
        self.slots[idx].occupant = Some(id);
        self.tiles[id.0].placed = true;
        true
    }

    /// Moves `id` to the end of the tray and clears its placed marker.
    pub fn return_to_tray(&mut self, id: TileId) {
        if id.0 >= self.tiles.len() {
            return;
        }
        self.detach(id);
        self.tray.push(id);
        self.tiles[id.0].placed = false;
    }

    /// Whether every slot holds the tile that belongs there.
    pub fn is_solved(&self) -> bool {
        self.slots.iter().all(|slot| {
            slot.occupant
                .and_then(|id| self.tiles.get(id.0))
                .is_some_and(|tile| tile.coord == slot.coord)
        })
    }

    /// Completion checker. Stops the timer and returns the completion the
    /// first time the board is solved; `None` on every other call.
    pub fn check_completion(&mut self) -> Option<Completion> {
        if self.completion_signalled || !self.is_solved() {
            return None;
        }
        self.completion_signalled = true;
        self.stop();
        Some(Completion {
            elapsed_secs: self.timer.elapsed(),
        })
    }

    /// Tray length plus occupied slots equals the tile count and no tile is
    /// held twice.
    pub fn ownership_is_consistent(&self) -> bool {
        let mut seen = vec![false; self.tiles.len()];
        let held = self
            .tray
            .iter()
            .copied()
            .chain(self.slots.iter().filter_map(|s| s.occupant));
        for id in held {
            match seen.get_mut(id.0) {
                Some(flag) if !*flag => *flag = true,
                _ => return false,
            }
        }
        seen.iter().all(|&f| f)
    }
}

//! Grid model: tiles and slots of an NxN puzzle, both in row-major order.

use crate::error::ConfigurationError;

pub const MAX_GRID_SIZE: u8 = 16;

/// Board position of a tile or slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Number of rows (and columns) of the puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize(u8);

impl GridSize {
    pub fn new(n: i64) -> Result<Self, ConfigurationError> {
        if n < 1 || n > MAX_GRID_SIZE as i64 {
            return Err(ConfigurationError::InvalidGridSize(n));
        }
        Ok(Self(n as u8))
    }

    /// Parses the difficulty selector's value ("3", "4", ...).
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let trimmed = raw.trim();
        let n: i64 = trimmed
            .parse()
            .map_err(|_| ConfigurationError::UnparsableGridSize(trimmed.to_string()))?;
        Self::new(n)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn tile_count(self) -> usize {
        self.0 as usize * self.0 as usize
    }

    pub fn index_of(self, coord: Coord) -> usize {
        coord.row as usize * self.0 as usize + coord.col as usize
    }

    pub fn contains(self, coord: Coord) -> bool {
        coord.row < self.0 && coord.col < self.0
    }

    /// All coordinates, row-major.
    pub fn coords(self) -> impl Iterator<Item = Coord> {
        let n = self.0;
        (0..n).flat_map(move |row| (0..n).map(move |col| Coord::new(row, col)))
    }
}

/// Pixel dimensions of the decoded source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
}

/// Sub-rectangle of the source image, in image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Index into the session's tile list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub coord: Coord,
    pub region: Region,
    /// Set while the tile sits on its own slot.
    pub placed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub coord: Coord,
    pub occupant: Option<TileId>,
}

#[derive(Clone, Debug)]
pub struct Grid {
    pub size: GridSize,
    pub tiles: Vec<Tile>,
    pub slots: Vec<Slot>,
}

/// Cuts `image` into `size`² tiles and creates the matching empty slots.
pub fn build_grid(size: GridSize, image: Option<&SourceImage>) -> Result<Grid, ConfigurationError> {
    let image = image.ok_or(ConfigurationError::MissingImage)?;
    let n = size.get() as f64;
    let tile_w = image.width as f64 / n;
    let tile_h = image.height as f64 / n;
    let tiles = size
        .coords()
        .map(|coord| Tile {
            coord,
            region: Region {
                x: coord.col as f64 * tile_w,
                y: coord.row as f64 * tile_h,
                width: tile_w,
                height: tile_h,
            },
            placed: false,
        })
        .collect();
    let slots = size
        .coords()
        .map(|coord| Slot {
            coord,
            occupant: None,
        })
        .collect();
    Ok(Grid { size, tiles, slots })
}

//! Error taxonomy. Configuration and decode errors are shown to the player;
//! input protocol violations are logged and absorbed as a no-op drop.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Start/difficulty requests that cannot produce a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Please upload an image first!")]
    MissingImage,
    #[error("invalid grid size {0}: expected 1..={max}", max = crate::grid::MAX_GRID_SIZE)]
    InvalidGridSize(i64),
    #[error("grid size {0:?} is not a number")]
    UnparsableGridSize(String),
    #[error("grid size {0} is not one of the offered difficulties")]
    UnsupportedDifficulty(u8),
    #[error("puzzle config has no difficulties")]
    NoDifficulties,
    #[error("puzzle config invalid: {0}")]
    Malformed(String),
}

/// The uploaded file could not be turned into a drawable bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("could not read image {0:?}")]
    Unreadable(String),
    #[error("image has no pixels")]
    EmptyImage,
}

/// Drop event that carried no usable position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputProtocolViolation {
    #[error("drop event carried no coordinates")]
    MissingPoint,
    #[error("drop event carried non-finite coordinates")]
    NonFinitePoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    InputProtocol(#[from] InputProtocolViolation),
}

impl From<PuzzleError> for JsValue {
    fn from(err: PuzzleError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<ConfigurationError> for JsValue {
    fn from(err: ConfigurationError) -> Self {
        PuzzleError::from(err).into()
    }
}

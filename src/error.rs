//! Setup errors
//!
//! Level construction either yields a consistent simulation or one of these.
//! Nothing inside a running step can fail.

/// Error raised while building a level, grid or session
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// Play field has no area
    EmptyField { width: u32, height: u32 },
    /// Play field cannot hold the start zone, pot and ingredients
    FieldTooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },
    /// Grid layout has no rows or no columns
    EmptyGrid,
    /// Grid row length differs from the first row
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Grid contains a code with no cell kind
    UnknownCell { row: usize, col: usize, code: u8 },
    /// Tuning rejected by validation
    InvalidTuning(String),
    /// Session was stopped and cannot start another level
    SessionStopped,
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::EmptyField { width, height } => {
                write!(f, "play field has no area ({}x{})", width, height)
            }
            LevelError::FieldTooSmall {
                width,
                height,
                min_width,
                min_height,
            } => write!(
                f,
                "play field {}x{} is smaller than the minimum {}x{}",
                width, height, min_width, min_height
            ),
            LevelError::EmptyGrid => write!(f, "grid layout is empty"),
            LevelError::RaggedGrid {
                row,
                expected,
                found,
            } => write!(
                f,
                "grid row {} has {} cells, expected {}",
                row, found, expected
            ),
            LevelError::UnknownCell { row, col, code } => {
                write!(f, "unknown cell code {} at ({}, {})", code, row, col)
            }
            LevelError::InvalidTuning(reason) => write!(f, "invalid tuning: {}", reason),
            LevelError::SessionStopped => write!(f, "session has been stopped"),
        }
    }
}

impl std::error::Error for LevelError {}

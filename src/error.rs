use thiserror::Error;

/// Every recoverable failure the engine can report. Each variant carries the
/// structured data a host needs to render an actionable message; the grid is
/// always left unchanged when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeatingError {
    #[error("grid dimensions {rows}x{cols} outside allowed range 1..={max_rows} x 1..={max_cols}")]
    InvalidDimension {
        rows: usize,
        cols: usize,
        max_rows: usize,
        max_cols: usize,
    },

    #[error("seat ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("student {student_id} is already seated at ({row}, {col})")]
    DuplicateOccupant {
        student_id: String,
        row: usize,
        col: usize,
    },

    #[error("seat ({row}, {col}) is pinned")]
    PinnedSeatConflict { row: usize, col: usize },

    #[error("cannot form groups: {required} seats required, {available} available")]
    InsufficientSeats { required: usize, available: usize },

    #[error("a conference is in progress; only presence marking is allowed")]
    ConferenceInProgress,

    #[error("a layout named {name:?} already exists")]
    NameConflict { name: String },

    #[error("no layout named {name:?}")]
    NotFound { name: String },

    #[error("operation aborted by the host")]
    Aborted,

    #[error("layout store unavailable: {0}")]
    StorageUnavailable(String),
}

pub type Result<T> = std::result::Result<T, SeatingError>;

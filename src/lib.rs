//! Classroom seating/grouping engine: a rectangular seat grid, named
//! arrangement templates, auto-fill of unplaced students, edit/swap
//! interaction modes, attendance verification, and named layout persistence.
//! The host owns the roster and the rendering; this crate owns the state.

pub mod assign;
pub mod conference;
pub mod error;
pub mod exchange;
pub mod grid;
pub mod roster;
pub mod session;
pub mod store;
pub mod template;

pub use assign::{auto_fill, AutoFillOutcome};
pub use conference::{AttendanceEntry, AttendanceRecord, ConferenceOutcome};
pub use error::{Result, SeatingError};
pub use grid::{Grid, GridBounds, Seat, MIN_COLS, MIN_ROWS};
pub use roster::Student;
pub use session::{Mode, SelectOutcome, Session, SessionEvent};
pub use store::{
    delete_layout, list_layouts, load_layout, save_layout, LayoutSnapshot, LayoutStore,
    MemoryStore, SqliteStore,
};
pub use template::{apply_template, GroupSpec, Template, DEFAULT_CIRCLE_TOLERANCE};

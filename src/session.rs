use std::collections::VecDeque;

use uuid::Uuid;

use crate::assign::{auto_fill, AutoFillOutcome};
use crate::conference::{AttendanceRecord, ConferenceOutcome};
use crate::error::{Result, SeatingError};
use crate::grid::{Grid, GridBounds};
use crate::roster::Student;
use crate::template::Template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Editing,
    Swapping,
}

/// Notifications for the host UI, delivered in order through `take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    GridChanged(Grid),
    ModeChanged(Mode),
    ConferenceUpdated(AttendanceRecord),
}

/// What a `select_seat` call did while in swap mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// First of a pair: selection is now pending.
    Selected { row: usize, col: usize },
    /// Same seat selected twice: pending selection dropped.
    Cancelled,
    /// Second of a pair: occupants exchanged.
    Swapped,
    /// Not in swap mode; nothing happened.
    Ignored,
}

/// One editing session over one active grid. The host creates a session when
/// a class opens and drops it when the class closes; there is no hidden
/// global. All calls must come from a single thread of control; the session
/// has no interior locking.
pub struct Session {
    id: Uuid,
    bounds: GridBounds,
    grid: Grid,
    mode: Mode,
    pending: Option<(usize, usize)>,
    conference: Option<AttendanceRecord>,
    events: VecDeque<SessionEvent>,
}

impl Session {
    pub fn new(rows: usize, cols: usize, bounds: GridBounds) -> Result<Session> {
        let grid = Grid::new(rows, cols, bounds)?;
        let id = Uuid::new_v4();
        tracing::info!(session = %id, rows, cols, "session opened");
        Ok(Session {
            id,
            bounds,
            grid,
            mode: Mode::Idle,
            pending: None,
            conference: None,
            events: VecDeque::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn conference(&self) -> Option<&AttendanceRecord> {
        self.conference.as_ref()
    }

    pub fn pending_selection(&self) -> Option<(usize, usize)> {
        self.pending
    }

    /// Drain queued host notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    fn guard_conference(&self) -> Result<()> {
        if self.conference.is_some() {
            return Err(SeatingError::ConferenceInProgress);
        }
        Ok(())
    }

    fn commit_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.events
            .push_back(SessionEvent::GridChanged(self.grid.clone()));
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.events.push_back(SessionEvent::ModeChanged(mode));
    }

    // ----- grid operations -------------------------------------------------

    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        self.guard_conference()?;
        let next = self.grid.resize(rows, cols, self.bounds)?;
        self.pending = None;
        self.commit_grid(next);
        Ok(())
    }

    pub fn set_occupant(&mut self, row: usize, col: usize, occupant: Option<&str>) -> Result<()> {
        self.guard_conference()?;
        let next = self.grid.set_occupant(row, col, occupant)?;
        self.commit_grid(next);
        Ok(())
    }

    pub fn toggle_pin(&mut self, row: usize, col: usize) -> Result<()> {
        self.guard_conference()?;
        let next = self.grid.toggle_pin(row, col)?;
        self.commit_grid(next);
        Ok(())
    }

    pub fn apply_template(&mut self, template: Template, roster: &[Student]) -> Result<()> {
        self.guard_conference()?;
        let next = crate::template::apply_template(&self.grid, template, roster)?;
        self.commit_grid(next);
        Ok(())
    }

    pub fn auto_fill(&mut self, roster: &[Student]) -> Result<AutoFillOutcome> {
        self.guard_conference()?;
        let outcome = auto_fill(&self.grid, roster)?;
        self.commit_grid(outcome.grid.clone());
        Ok(outcome)
    }

    /// Replace the active grid wholesale, e.g. after loading a snapshot.
    pub fn replace_grid(&mut self, grid: Grid) -> Result<()> {
        self.guard_conference()?;
        self.pending = None;
        self.commit_grid(grid);
        Ok(())
    }

    // ----- interaction modes ----------------------------------------------

    /// Enter edit mode. Coming from swap mode this first runs the swap exit
    /// path, so observers see `ModeChanged(Idle)` then `ModeChanged(Editing)`
    /// from the one call; the two modes are never active together.
    pub fn enter_edit(&mut self) {
        match self.mode {
            Mode::Editing => {}
            Mode::Swapping => {
                self.exit_swap();
                self.set_mode(Mode::Editing);
            }
            Mode::Idle => self.set_mode(Mode::Editing),
        }
    }

    pub fn enter_swap(&mut self) {
        match self.mode {
            Mode::Swapping => {}
            Mode::Editing => {
                self.exit_edit();
                self.set_mode(Mode::Swapping);
            }
            Mode::Idle => self.set_mode(Mode::Swapping),
        }
    }

    pub fn exit_edit(&mut self) {
        if self.mode == Mode::Editing {
            self.set_mode(Mode::Idle);
        }
    }

    pub fn exit_swap(&mut self) {
        if self.mode == Mode::Swapping {
            self.pending = None;
            self.set_mode(Mode::Idle);
        }
    }

    /// Swap-mode seat picking. The first pick records a pending selection,
    /// picking the same seat again cancels it, and a second distinct pick
    /// exchanges the two occupants (either seat may be empty). A pin on
    /// either seat rejects the swap, leaves both seats unchanged, and drops
    /// the pending selection.
    pub fn select_seat(&mut self, row: usize, col: usize) -> Result<SelectOutcome> {
        if self.mode != Mode::Swapping {
            return Ok(SelectOutcome::Ignored);
        }
        self.guard_conference()?;
        self.grid.seat(row, col)?;

        match self.pending {
            None => {
                self.pending = Some((row, col));
                Ok(SelectOutcome::Selected { row, col })
            }
            Some(first) if first == (row, col) => {
                self.pending = None;
                Ok(SelectOutcome::Cancelled)
            }
            Some(first) => {
                self.pending = None;
                let next = self.grid.swap_occupants(first, (row, col))?;
                self.commit_grid(next);
                Ok(SelectOutcome::Swapped)
            }
        }
    }

    // ----- conference mode -------------------------------------------------

    /// Begin roll-call against the current occupancy. Until the conference
    /// finishes, every grid write other than presence marking fails with
    /// `ConferenceInProgress`.
    pub fn start_conference(&mut self) -> Result<AttendanceRecord> {
        self.guard_conference()?;
        let record = AttendanceRecord::start(&self.grid);
        self.events
            .push_back(SessionEvent::ConferenceUpdated(record.clone()));
        tracing::info!(session = %self.id, "conference started");
        self.conference = Some(record.clone());
        Ok(record)
    }

    /// Mark one seat present or absent. Returns `Ok(false)` when no
    /// conference is active (nothing to mark).
    pub fn mark_present(&mut self, row: usize, col: usize, present: bool) -> Result<bool> {
        let Some(record) = self.conference.as_ref() else {
            return Ok(false);
        };
        let updated = record.mark_present(row, col, present)?;
        self.events
            .push_back(SessionEvent::ConferenceUpdated(updated.clone()));
        self.conference = Some(updated);
        Ok(true)
    }

    /// Close the roll-call and discard the overlay. Returns `Ok(None)` when
    /// no conference is active. With `clear_absent` the returned (and
    /// committed) grid has absentee seats cleared, pinned seats excepted.
    pub fn finish_conference(
        &mut self,
        roster: &[Student],
        clear_absent: bool,
    ) -> Result<Option<ConferenceOutcome>> {
        let Some(record) = self.conference.take() else {
            return Ok(None);
        };
        let outcome = record.finish(&self.grid, roster, clear_absent)?;
        if outcome.grid != self.grid {
            self.commit_grid(outcome.grid.clone());
        }
        Ok(Some(outcome))
    }
}

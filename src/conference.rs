use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::{Result, SeatingError};
use crate::grid::{Grid, Seat};
use crate::roster::Student;

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceEntry {
    pub expected_occupant_id: Option<String>,
    /// `None` until the host marks the seat one way or the other.
    pub present: Option<bool>,
}

/// Roll-call overlay captured when conference mode starts. The expected
/// occupancy is frozen at start time; marking presence never touches the
/// grid until `finish` commits the result. Never persisted as a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    rows: usize,
    cols: usize,
    started_at: DateTime<Utc>,
    entries: BTreeMap<(usize, usize), AttendanceEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConferenceOutcome {
    pub grid: Grid,
    /// Expected occupants marked absent or never confirmed.
    pub absentees: Vec<Student>,
    /// Seats confirmed present where nobody was expected.
    pub unexpected: Vec<Seat>,
}

impl AttendanceRecord {
    /// Snapshot current occupancy as "expected", presence unknown everywhere.
    pub fn start(grid: &Grid) -> AttendanceRecord {
        let entries = grid
            .seats()
            .map(|s| {
                (
                    (s.row, s.col),
                    AttendanceEntry {
                        expected_occupant_id: s.occupant_id.clone(),
                        present: None,
                    },
                )
            })
            .collect();
        AttendanceRecord {
            rows: grid.rows(),
            cols: grid.cols(),
            started_at: Utc::now(),
            entries,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn entry(&self, row: usize, col: usize) -> Option<&AttendanceEntry> {
        self.entries.get(&(row, col))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&(usize, usize), &AttendanceEntry)> {
        self.entries.iter()
    }

    pub fn mark_present(&self, row: usize, col: usize, present: bool) -> Result<AttendanceRecord> {
        if !self.entries.contains_key(&(row, col)) {
            return Err(SeatingError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let mut next = self.clone();
        if let Some(entry) = next.entries.get_mut(&(row, col)) {
            entry.present = Some(present);
        }
        Ok(next)
    }

    /// Close the roll-call. Absentees are expected occupants marked absent or
    /// left unconfirmed; with `clear_absent` their seats are cleared in the
    /// returned grid, except pinned seats, which keep their occupants and are
    /// still reported.
    pub fn finish(
        &self,
        grid: &Grid,
        roster: &[Student],
        clear_absent: bool,
    ) -> Result<ConferenceOutcome> {
        let mut absentees = Vec::new();
        let mut unexpected = Vec::new();
        let mut next = grid.clone();

        for (&(row, col), entry) in &self.entries {
            match (&entry.expected_occupant_id, entry.present) {
                (Some(_), Some(true)) => {}
                (Some(id), _) => {
                    absentees.push(resolve_student(roster, id));
                    if clear_absent {
                        let pinned = next.get(row, col).map(|s| s.pinned).unwrap_or(false);
                        let still_there =
                            next.get(row, col).and_then(|s| s.occupant_id.as_deref())
                                == Some(id.as_str());
                        if !pinned && still_there {
                            next = next.set_occupant(row, col, None)?;
                        }
                    }
                }
                (None, Some(true)) => {
                    if let Some(seat) = grid.get(row, col) {
                        unexpected.push(seat.clone());
                    }
                }
                (None, _) => {}
            }
        }

        tracing::info!(
            absent = absentees.len(),
            unexpected = unexpected.len(),
            clear_absent,
            "conference finished"
        );
        Ok(ConferenceOutcome {
            grid: next,
            absentees,
            unexpected,
        })
    }
}

fn resolve_student(roster: &[Student], id: &str) -> Student {
    roster
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .unwrap_or_else(|| Student::new(id, id))
}

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// A roster entry as supplied by the enrollment collaborator. The engine
/// never mutates students; it only references ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Student {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Roster members not currently seated anywhere on the grid, roster order.
pub fn unseated<'a>(roster: &'a [Student], grid: &Grid) -> Vec<&'a Student> {
    roster
        .iter()
        .filter(|s| grid.seat_of(&s.id).is_none())
        .collect()
}

use seating_core::{Grid, GridBounds, SeatingError};

fn bounds() -> GridBounds {
    GridBounds::default()
}

#[test]
fn resize_roundtrip_restores_pinned_seats_only() {
    let grid = Grid::new(4, 4, bounds()).expect("grid");
    let grid = grid.set_occupant(3, 3, Some("corner")).expect("seat corner");
    let grid = grid.set_occupant(1, 1, Some("inner")).expect("seat inner");
    let grid = grid.toggle_pin(1, 1).expect("pin inner");

    // corner sits on an unpinned removed cell: evicted, documented lossy
    let shrunk = grid.resize(2, 2, bounds()).expect("shrink");
    assert!(shrunk.seat_of("corner").is_none());
    assert_eq!(
        shrunk.seat(1, 1).expect("seat").occupant_id.as_deref(),
        Some("inner")
    );

    let back = shrunk.resize(4, 4, bounds()).expect("grow back");
    assert_eq!(back.rows(), 4);
    assert_eq!(back.cols(), 4);
    let inner = back.seat(1, 1).expect("seat");
    assert_eq!(inner.occupant_id.as_deref(), Some("inner"));
    assert!(inner.pinned);
    // the evicted occupant does not come back
    assert!(back.seat_of("corner").is_none());
    assert!(back.seat(3, 3).expect("seat").is_empty());
}

#[test]
fn shrink_over_pinned_occupied_cell_rejected_whole() {
    let grid = Grid::new(3, 3, bounds()).expect("grid");
    let grid = grid.set_occupant(2, 0, Some("stay")).expect("seat");
    let grid = grid.toggle_pin(2, 0).expect("pin");
    let grid = grid.set_occupant(0, 2, Some("go")).expect("seat");

    let err = grid.resize(2, 3, bounds()).unwrap_err();
    assert_eq!(err, SeatingError::PinnedSeatConflict { row: 2, col: 0 });
    // nothing changed: the mutator is pure and the failure returned early
    assert_eq!(grid.seat_of("go").map(|s| (s.row, s.col)), Some((0, 2)));

    // pinned-but-empty removed cells do not block the shrink
    let grid = grid.set_occupant(2, 0, None).expect("clear");
    let shrunk = grid.resize(2, 3, bounds()).expect("shrink");
    assert_eq!(shrunk.rows(), 2);
}

#[test]
fn grow_adds_empty_unpinned_seats() {
    let grid = Grid::new(2, 2, bounds()).expect("grid");
    let grown = grid.resize(3, 5, bounds()).expect("grow");
    assert_eq!(grown.seat_count(), 15);
    assert_eq!(grown.empty_unpinned().len(), 15);
}

#[test]
fn resize_outside_host_bounds_rejected() {
    let tight = GridBounds::new(4, 4);
    let grid = Grid::new(4, 4, tight).expect("grid");
    let err = grid.resize(5, 4, tight).unwrap_err();
    assert_eq!(
        err,
        SeatingError::InvalidDimension {
            rows: 5,
            cols: 4,
            max_rows: 4,
            max_cols: 4,
        }
    );
    assert!(grid.resize(1, 1, tight).is_ok());
}

use seating_core::{Grid, GridBounds, Mode, SelectOutcome, SeatingError, Session};

fn seated_session() -> Session {
    let mut s = Session::new(3, 3, GridBounds::default()).expect("session");
    s.set_occupant(0, 0, Some("a")).expect("seat a");
    s.set_occupant(2, 2, Some("b")).expect("seat b");
    s
}

fn swap(s: &mut Session, first: (usize, usize), second: (usize, usize)) {
    assert_eq!(
        s.select_seat(first.0, first.1).expect("first pick"),
        SelectOutcome::Selected {
            row: first.0,
            col: first.1
        }
    );
    assert_eq!(
        s.select_seat(second.0, second.1).expect("second pick"),
        SelectOutcome::Swapped
    );
}

#[test]
fn swapping_twice_is_the_identity() {
    let mut s = seated_session();
    s.enter_swap();
    let before = s.grid().clone();

    swap(&mut s, (0, 0), (2, 2));
    assert_eq!(s.grid().seat(0, 0).unwrap().occupant_id.as_deref(), Some("b"));
    swap(&mut s, (0, 0), (2, 2));
    assert_eq!(s.grid(), &before);
}

#[test]
fn occupied_to_empty_swap_moves_the_student() {
    let mut s = seated_session();
    s.enter_swap();
    swap(&mut s, (0, 0), (1, 1));
    assert!(s.grid().seat(0, 0).unwrap().is_empty());
    assert_eq!(s.grid().seat(1, 1).unwrap().occupant_id.as_deref(), Some("a"));

    // and back again: involution holds for occupied<->empty too
    swap(&mut s, (0, 0), (1, 1));
    assert_eq!(s.grid().seat(0, 0).unwrap().occupant_id.as_deref(), Some("a"));
    assert!(s.grid().seat(1, 1).unwrap().is_empty());
}

#[test]
fn pinned_seat_rejects_swap_in_both_directions() {
    let mut s = seated_session();
    s.toggle_pin(2, 2).expect("pin b");
    s.enter_swap();

    s.select_seat(0, 0).expect("pick a");
    let err = s.select_seat(2, 2).unwrap_err();
    assert_eq!(err, SeatingError::PinnedSeatConflict { row: 2, col: 2 });
    assert_eq!(s.grid().seat(0, 0).unwrap().occupant_id.as_deref(), Some("a"));
    assert_eq!(s.grid().seat(2, 2).unwrap().occupant_id.as_deref(), Some("b"));

    s.select_seat(2, 2).expect("pick pinned first");
    let err = s.select_seat(0, 0).unwrap_err();
    assert_eq!(err, SeatingError::PinnedSeatConflict { row: 2, col: 2 });
}

#[test]
fn pinned_empty_seat_also_rejects_swap_with_accurate_message() {
    let grid = Grid::new(2, 2, GridBounds::default()).expect("grid");
    let grid = grid.set_occupant(0, 0, Some("a")).expect("seat");
    // the pinned seat is empty; the pin alone blocks the swap
    let grid = grid.toggle_pin(1, 1).expect("pin empty seat");
    let err = grid.swap_occupants((0, 0), (1, 1)).unwrap_err();
    assert_eq!(err, SeatingError::PinnedSeatConflict { row: 1, col: 1 });
    // the rendered text must not claim the seat is occupied
    assert_eq!(err.to_string(), "seat (1, 1) is pinned");
}

#[test]
fn direct_grid_swap_is_pure() {
    let grid = Grid::new(2, 2, GridBounds::default()).expect("grid");
    let grid = grid.set_occupant(0, 0, Some("a")).expect("seat");
    let swapped = grid.swap_occupants((0, 0), (1, 1)).expect("swap");
    // the original is untouched
    assert_eq!(grid.seat(0, 0).unwrap().occupant_id.as_deref(), Some("a"));
    assert_eq!(swapped.seat(1, 1).unwrap().occupant_id.as_deref(), Some("a"));
}

#[test]
fn leaving_swap_mode_clears_pending_selection() {
    let mut s = seated_session();
    s.enter_swap();
    s.select_seat(0, 0).expect("pick");
    s.exit_swap();
    assert_eq!(s.mode(), Mode::Idle);
    assert_eq!(s.pending_selection(), None);
    // re-entering swap starts from a clean pair
    s.enter_swap();
    assert_eq!(
        s.select_seat(2, 2).expect("pick"),
        SelectOutcome::Selected { row: 2, col: 2 }
    );
}

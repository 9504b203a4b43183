use seating_core::{
    delete_layout, list_layouts, load_layout, save_layout, Grid, GridBounds, LayoutStore,
    MemoryStore, SeatingError, Session, SqliteStore,
};

fn bounds() -> GridBounds {
    GridBounds::default()
}

fn arranged_grid() -> Grid {
    let grid = Grid::new(3, 4, bounds()).expect("grid");
    let grid = grid.set_occupant(0, 0, Some("s1")).expect("seat");
    let grid = grid.set_occupant(2, 3, Some("s2")).expect("seat");
    let grid = grid.toggle_pin(2, 3).expect("pin");
    grid.toggle_pin(1, 1).expect("pin empty seat")
}

fn roundtrip_on(store: &mut dyn LayoutStore) {
    let grid = arranged_grid();
    save_layout(store, "period 3", &grid, false).expect("save");
    let loaded = load_layout(store, "period 3", bounds()).expect("load");
    assert_eq!(loaded.grid, grid);
    assert_eq!(loaded.name, "period 3");
}

#[test]
fn memory_store_roundtrip_is_deep_equal() {
    let mut store = MemoryStore::new();
    roundtrip_on(&mut store);
}

#[test]
fn sqlite_store_roundtrip_is_deep_equal() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    roundtrip_on(&mut store);
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let workspace = std::env::temp_dir().join(format!(
        "seating-store-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    let grid = arranged_grid();
    {
        let mut store = SqliteStore::open(&workspace).expect("open");
        save_layout(&mut store, "saved", &grid, false).expect("save");
    }
    let store = SqliteStore::open(&workspace).expect("reopen");
    let loaded = load_layout(&store, "saved", bounds()).expect("load");
    assert_eq!(loaded.grid, grid);
    std::fs::remove_dir_all(&workspace).expect("cleanup");
}

#[test]
fn lifecycle_save_list_delete() {
    let mut store = MemoryStore::new();
    let grid = arranged_grid();
    save_layout(&mut store, "b", &grid, false).expect("save b");
    save_layout(&mut store, "a", &grid, false).expect("save a");
    assert_eq!(list_layouts(&store).expect("list"), vec!["a", "b"]);

    delete_layout(&mut store, "a").expect("delete");
    assert_eq!(list_layouts(&store).expect("list"), vec!["b"]);
    assert_eq!(
        load_layout(&store, "a", bounds()).unwrap_err(),
        SeatingError::NotFound { name: "a".to_string() }
    );
}

#[test]
fn overwrite_requires_host_confirmation() {
    let mut store = MemoryStore::new();
    let grid = arranged_grid();
    save_layout(&mut store, "plan", &grid, false).expect("save");

    let edited = grid.set_occupant(0, 1, Some("s3")).expect("edit");
    assert_eq!(
        save_layout(&mut store, "plan", &edited, false).unwrap_err(),
        SeatingError::NameConflict { name: "plan".to_string() }
    );
    // the stored snapshot was not touched by the refused save
    assert_eq!(load_layout(&store, "plan", bounds()).expect("load").grid, grid);

    save_layout(&mut store, "plan", &edited, true).expect("confirmed");
    assert_eq!(load_layout(&store, "plan", bounds()).expect("load").grid, edited);
}

#[test]
fn editing_the_active_grid_never_mutates_a_snapshot() {
    let mut store = MemoryStore::new();
    let mut session = Session::new(3, 4, bounds()).expect("session");
    session.set_occupant(0, 0, Some("s1")).expect("seat");
    save_layout(&mut store, "before", session.grid(), false).expect("save");

    session.set_occupant(0, 1, Some("s2")).expect("keep editing");
    session.resize(2, 2).expect("shrink");

    let snapshot = load_layout(&store, "before", bounds()).expect("load");
    assert_eq!(snapshot.grid.rows(), 3);
    assert_eq!(snapshot.grid.seat(0, 0).unwrap().occupant_id.as_deref(), Some("s1"));
    assert!(snapshot.grid.seat(0, 1).unwrap().is_empty());
}

#[test]
fn load_replaces_the_active_grid_wholesale() {
    let mut store = MemoryStore::new();
    let grid = arranged_grid();
    save_layout(&mut store, "plan", &grid, false).expect("save");

    let mut session = Session::new(2, 2, bounds()).expect("session");
    session.set_occupant(0, 0, Some("x")).expect("seat");
    let snapshot = load_layout(&store, "plan", session.bounds()).expect("load");
    session.replace_grid(snapshot.grid.clone()).expect("replace");
    assert_eq!(session.grid(), &snapshot.grid);
    assert!(session.grid().seat_of("x").is_none());
}

#[test]
fn snapshot_larger_than_host_bounds_rejected_on_load() {
    let mut store = MemoryStore::new();
    let grid = Grid::new(6, 6, bounds()).expect("grid");
    save_layout(&mut store, "big", &grid, false).expect("save");

    let tight = GridBounds::new(4, 4);
    let err = load_layout(&store, "big", tight).unwrap_err();
    assert!(matches!(err, SeatingError::InvalidDimension { rows: 6, cols: 6, .. }));
}

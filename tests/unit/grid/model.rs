use super::*;

#[test]
fn new_rejects_degenerate_and_oversized_grids() {
    assert!(Grid::new(0, 5).is_err());
    assert!(Grid::new(5, 0).is_err());
    assert!(Grid::new(21, 40).is_err()); // 840 > MAX_CELLS
    assert!(Grid::new(20, 40).is_ok()); // exactly MAX_CELLS
}

#[test]
fn set_start_replaces_previous_and_clears_walls() {
    let mut grid = Grid::new(4, 4).unwrap();
    let p = Pos::new(1, 1);
    grid.toggle_wall(p).unwrap();
    assert!(grid.cell_at(p).unwrap().is_wall);

    grid.set_start(p).unwrap();
    let cell = grid.cell_at(p).unwrap();
    assert!(cell.is_start);
    assert!(!cell.is_wall);

    grid.set_start(Pos::new(2, 2)).unwrap();
    assert!(!grid.cell_at(p).unwrap().is_start);
    assert_eq!(grid.start(), Some(Pos::new(2, 2)));
}

#[test]
fn start_and_end_must_differ() {
    let mut grid = Grid::new(4, 4).unwrap();
    grid.set_start(Pos::new(0, 0)).unwrap();
    assert!(grid.set_end(Pos::new(0, 0)).is_err());
    grid.set_end(Pos::new(3, 3)).unwrap();
    assert!(grid.set_start(Pos::new(3, 3)).is_err());
}

#[test]
fn toggle_wall_is_a_noop_on_designated_cells() {
    let mut grid = Grid::new(4, 4).unwrap();
    grid.set_start(Pos::new(0, 0)).unwrap();
    assert_eq!(grid.toggle_wall(Pos::new(0, 0)).unwrap(), false);
    assert!(!grid.cell_at(Pos::new(0, 0)).unwrap().is_wall);

    assert!(grid.toggle_wall(Pos::new(9, 9)).is_err());
    assert_eq!(grid.toggle_wall(Pos::new(1, 1)).unwrap(), true);
    assert_eq!(grid.toggle_wall(Pos::new(1, 1)).unwrap(), false);
}

#[test]
fn neighbors_run_up_down_left_right_and_skip_walls() {
    let mut grid = Grid::new(3, 3).unwrap();
    let center = grid.index_of(Pos::new(1, 1)).unwrap();

    let order: Vec<Pos> = grid.neighbors(center).iter().map(|&i| grid.cell(i).pos).collect();
    assert_eq!(
        order,
        vec![
            Pos::new(0, 1),
            Pos::new(2, 1),
            Pos::new(1, 0),
            Pos::new(1, 2)
        ]
    );

    grid.toggle_wall(Pos::new(0, 1)).unwrap();
    let filtered: Vec<Pos> = grid.neighbors(center).iter().map(|&i| grid.cell(i).pos).collect();
    assert_eq!(
        filtered,
        vec![Pos::new(2, 1), Pos::new(1, 0), Pos::new(1, 2)]
    );

    // Corner cell only has two neighbors.
    let corner = grid.index_of(Pos::new(0, 0)).unwrap();
    assert_eq!(grid.neighbors(corner).len(), 2);
}

#[test]
fn reset_search_state_keeps_flags() {
    let mut grid = Grid::new(4, 4).unwrap();
    grid.set_start(Pos::new(0, 0)).unwrap();
    grid.set_end(Pos::new(3, 3)).unwrap();
    grid.toggle_wall(Pos::new(1, 1)).unwrap();

    let idx = grid.index_of(Pos::new(2, 2)).unwrap();
    grid.cell_mut(idx).visited = true;
    grid.cell_mut(idx).distance = 7;
    grid.cell_mut(idx).predecessor = Some(CellIdx(0));

    grid.reset_search_state();
    let cell = grid.cell_at(Pos::new(2, 2)).unwrap();
    assert!(!cell.visited());
    assert_eq!(cell.distance(), None);
    assert!(grid.cell_at(Pos::new(1, 1)).unwrap().is_wall);
    assert_eq!(grid.start(), Some(Pos::new(0, 0)));
    assert_eq!(grid.end(), Some(Pos::new(3, 3)));
}

#[test]
fn maze_generation_is_seeded_and_spares_designations() {
    let mut a = Grid::new(20, 40).unwrap();
    a.set_start(Pos::new(10, 5)).unwrap();
    a.set_end(Pos::new(10, 35)).unwrap();
    let mut b = a.clone();

    a.generate_maze(7);
    b.generate_maze(7);
    assert_eq!(GridSpec::from_grid(&a).walls, GridSpec::from_grid(&b).walls);

    assert!(!a.cell_at(Pos::new(10, 5)).unwrap().is_wall);
    assert!(!a.cell_at(Pos::new(10, 35)).unwrap().is_wall);

    let mut c = a.clone();
    c.generate_maze(8);
    assert_ne!(GridSpec::from_grid(&a).walls, GridSpec::from_grid(&c).walls);

    // Roughly three in ten cells become walls.
    let walls = GridSpec::from_grid(&a).walls.len();
    let total = a.cell_count();
    let fraction = walls as f64 / total as f64;
    assert!((0.15..0.45).contains(&fraction), "fraction {fraction}");
}

#[test]
fn clear_all_drops_walls_and_designations() {
    let mut grid = Grid::new(4, 4).unwrap();
    grid.set_start(Pos::new(0, 0)).unwrap();
    grid.set_end(Pos::new(3, 3)).unwrap();
    grid.toggle_wall(Pos::new(1, 1)).unwrap();

    grid.clear_all();
    assert_eq!(grid.start(), None);
    assert_eq!(grid.end(), None);
    assert!(grid.cells().all(|c| !c.is_wall && !c.is_start && !c.is_end));
}

#[test]
fn grid_spec_roundtrips_through_json() {
    let mut grid = Grid::new(5, 5).unwrap();
    grid.set_start(Pos::new(0, 0)).unwrap();
    grid.set_end(Pos::new(4, 4)).unwrap();
    grid.toggle_wall(Pos::new(2, 2)).unwrap();
    grid.toggle_wall(Pos::new(2, 3)).unwrap();

    let spec = GridSpec::from_grid(&grid);
    let json = serde_json::to_string(&spec).unwrap();
    let parsed: GridSpec = serde_json::from_str(&json).unwrap();
    let rebuilt = parsed.to_grid().unwrap();

    assert_eq!(GridSpec::from_grid(&rebuilt).walls, spec.walls);
    assert_eq!(rebuilt.start(), Some(Pos::new(0, 0)));
    assert_eq!(rebuilt.end(), Some(Pos::new(4, 4)));
}

#[test]
fn grid_spec_rejects_out_of_bounds_positions() {
    let spec = GridSpec {
        rows: 3,
        cols: 3,
        walls: vec![Pos::new(5, 5)],
        start: None,
        end: None,
    };
    assert!(spec.to_grid().is_err());
}

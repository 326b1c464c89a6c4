use crate::foundation::error::{StepvizError, StepvizResult};
use crate::foundation::math::seeded_unit;

/// Upper bound on `rows * cols`.
///
/// Keeps the deliberately quadratic Dijkstra scan (no priority queue) inside
/// an acceptable budget.
pub const MAX_CELLS: usize = 800;

/// Probability that maze generation turns a free cell into a wall.
const WALL_PROBABILITY: f64 = 0.3;

/// Sentinel for "not yet relaxed" distances.
pub(crate) const INF: u32 = u32::MAX;

/// A cell position as `(row, col)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Pos {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

impl Pos {
    /// Build a position value.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another position.
    pub fn manhattan(self, other: Pos) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }
}

/// Arena index of a cell within its grid.
///
/// Predecessor links are stored as arena indices, never as owning pointers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CellIdx(pub u32);

/// One grid cell: persistent flags plus per-run search state.
///
/// Flags survive across runs until toggled or the grid is cleared; search
/// state is reset before every run.
#[derive(Clone, Debug)]
pub struct Cell {
    /// Cell position.
    pub pos: Pos,
    /// Walls block traversal; never set on start/end cells.
    pub is_wall: bool,
    /// Search origin flag.
    pub is_start: bool,
    /// Search goal flag.
    pub is_end: bool,

    pub(crate) visited: bool,
    pub(crate) distance: u32,
    pub(crate) heuristic: u32,
    pub(crate) predecessor: Option<CellIdx>,
}

impl Cell {
    fn new(pos: Pos) -> Self {
        Self {
            pos,
            is_wall: false,
            is_start: false,
            is_end: false,
            visited: false,
            distance: INF,
            heuristic: 0,
            predecessor: None,
        }
    }

    /// Whether the last run finalized this cell.
    pub fn visited(&self) -> bool {
        self.visited
    }

    /// Shortest known distance from the start, if any run relaxed this cell.
    pub fn distance(&self) -> Option<u32> {
        (self.distance != INF).then_some(self.distance)
    }

    fn reset_search_state(&mut self) {
        self.visited = false;
        self.distance = INF;
        self.heuristic = 0;
        self.predecessor = None;
    }
}

/// A fixed-size 2D mesh of cells with wall/start/end flags.
///
/// At most one start and one end are designated at any time; both are
/// required before a search may run. A cell is never simultaneously a wall
/// and start/end.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: Option<CellIdx>,
    end: Option<CellIdx>,
}

impl Grid {
    /// Create an all-open grid.
    pub fn new(rows: usize, cols: usize) -> StepvizResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(StepvizError::validation("grid rows/cols must be > 0"));
        }
        if rows.saturating_mul(cols) > MAX_CELLS {
            return Err(StepvizError::validation(format!(
                "grid must have at most {MAX_CELLS} cells"
            )));
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(Pos::new(row, col)));
            }
        }
        Ok(Self {
            rows,
            cols,
            cells,
            start: None,
            end: None,
        })
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cell count.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Designated start position, if any.
    pub fn start(&self) -> Option<Pos> {
        self.start.map(|i| self.cell(i).pos)
    }

    /// Designated end position, if any.
    pub fn end(&self) -> Option<Pos> {
        self.end.map(|i| self.cell(i).pos)
    }

    /// Cell at a position, `None` when out of bounds.
    pub fn cell_at(&self, pos: Pos) -> Option<&Cell> {
        self.index_of(pos).map(|i| self.cell(i))
    }

    pub(crate) fn start_idx(&self) -> Option<CellIdx> {
        self.start
    }

    pub(crate) fn end_idx(&self) -> Option<CellIdx> {
        self.end
    }

    pub(crate) fn cell(&self, idx: CellIdx) -> &Cell {
        &self.cells[idx.0 as usize]
    }

    pub(crate) fn cell_mut(&mut self, idx: CellIdx) -> &mut Cell {
        &mut self.cells[idx.0 as usize]
    }

    fn index_of(&self, pos: Pos) -> Option<CellIdx> {
        (pos.row < self.rows && pos.col < self.cols)
            .then(|| CellIdx((pos.row * self.cols + pos.col) as u32))
    }

    /// Designate the start cell, replacing any previous designation.
    ///
    /// The target cell loses its wall flag; designating the current end cell
    /// is a validation error.
    pub fn set_start(&mut self, pos: Pos) -> StepvizResult<()> {
        let idx = self
            .index_of(pos)
            .ok_or_else(|| StepvizError::validation("start position out of bounds"))?;
        if self.end == Some(idx) {
            return Err(StepvizError::validation("start and end must differ"));
        }
        if let Some(prev) = self.start.take() {
            self.cell_mut(prev).is_start = false;
        }
        let cell = self.cell_mut(idx);
        cell.is_start = true;
        cell.is_wall = false;
        self.start = Some(idx);
        Ok(())
    }

    /// Designate the end cell, replacing any previous designation.
    pub fn set_end(&mut self, pos: Pos) -> StepvizResult<()> {
        let idx = self
            .index_of(pos)
            .ok_or_else(|| StepvizError::validation("end position out of bounds"))?;
        if self.start == Some(idx) {
            return Err(StepvizError::validation("start and end must differ"));
        }
        if let Some(prev) = self.end.take() {
            self.cell_mut(prev).is_end = false;
        }
        let cell = self.cell_mut(idx);
        cell.is_end = true;
        cell.is_wall = false;
        self.end = Some(idx);
        Ok(())
    }

    /// Remove the start designation.
    pub fn clear_start(&mut self) {
        if let Some(idx) = self.start.take() {
            self.cell_mut(idx).is_start = false;
        }
    }

    /// Remove the end designation.
    pub fn clear_end(&mut self) {
        if let Some(idx) = self.end.take() {
            self.cell_mut(idx).is_end = false;
        }
    }

    /// Toggle the wall flag at a position; returns the new wall state.
    ///
    /// Start/end cells never become walls; the call is a no-op there.
    pub fn toggle_wall(&mut self, pos: Pos) -> StepvizResult<bool> {
        let idx = self
            .index_of(pos)
            .ok_or_else(|| StepvizError::validation("wall position out of bounds"))?;
        let cell = self.cell_mut(idx);
        if cell.is_start || cell.is_end {
            return Ok(false);
        }
        cell.is_wall = !cell.is_wall;
        Ok(cell.is_wall)
    }

    /// Non-wall orthogonal neighbors, in up/down/left/right order.
    pub(crate) fn neighbors(&self, idx: CellIdx) -> Vec<CellIdx> {
        let Pos { row, col } = self.cell(idx).pos;
        let mut out = Vec::with_capacity(4);

        if row > 0 {
            out.push(CellIdx(idx.0 - self.cols as u32));
        }
        if row < self.rows - 1 {
            out.push(CellIdx(idx.0 + self.cols as u32));
        }
        if col > 0 {
            out.push(CellIdx(idx.0 - 1));
        }
        if col < self.cols - 1 {
            out.push(CellIdx(idx.0 + 1));
        }

        out.retain(|&n| !self.cell(n).is_wall);
        out
    }

    /// Reset per-run search state; wall/start/end flags persist.
    pub fn reset_search_state(&mut self) {
        for cell in &mut self.cells {
            cell.reset_search_state();
        }
    }

    /// Remove every wall; flags and search state otherwise untouched.
    pub fn clear_walls(&mut self) {
        for cell in &mut self.cells {
            cell.is_wall = false;
        }
    }

    /// Clear walls, designations and search state.
    pub fn clear_all(&mut self) {
        self.start = None;
        self.end = None;
        for cell in &mut self.cells {
            *cell = Cell::new(cell.pos);
        }
    }

    /// Seed walls: each non-start/non-end cell independently becomes a wall
    /// with probability 0.3, deterministically per seed.
    ///
    /// Existing walls and search state are cleared first; start/end persist.
    pub fn generate_maze(&mut self, seed: u64) {
        self.clear_walls();
        self.reset_search_state();
        for cell in &mut self.cells {
            if cell.is_start || cell.is_end {
                continue;
            }
            let roll = seeded_unit(seed, &[cell.pos.row as u64, cell.pos.col as u64]);
            cell.is_wall = roll < WALL_PROBABILITY;
        }
    }
}

/// Serializable grid description.
///
/// The persistent part of a grid (dimensions, walls, designations) as a pure
/// data model; search state never serializes.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GridSpec {
    /// Row count.
    pub rows: usize,
    /// Column count.
    pub cols: usize,
    /// Wall positions.
    #[serde(default)]
    pub walls: Vec<Pos>,
    /// Start designation, if any.
    pub start: Option<Pos>,
    /// End designation, if any.
    pub end: Option<Pos>,
}

impl GridSpec {
    /// Materialize the spec into a grid, validating every position.
    pub fn to_grid(&self) -> StepvizResult<Grid> {
        let mut grid = Grid::new(self.rows, self.cols)?;
        if let Some(start) = self.start {
            grid.set_start(start)?;
        }
        if let Some(end) = self.end {
            grid.set_end(end)?;
        }
        for &pos in &self.walls {
            let idx = grid
                .index_of(pos)
                .ok_or_else(|| StepvizError::validation("wall position out of bounds"))?;
            let cell = grid.cell_mut(idx);
            if !cell.is_start && !cell.is_end {
                cell.is_wall = true;
            }
        }
        Ok(grid)
    }

    /// Capture a grid's persistent state.
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            walls: grid
                .cells()
                .filter(|c| c.is_wall)
                .map(|c| c.pos)
                .collect(),
            start: grid.start(),
            end: grid.end(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/model.rs"]
mod tests;

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use crate::foundation::error::{StepvizError, StepvizResult};
use crate::grid::model::{CellIdx, Grid, INF, Pos};
use crate::trace::event::{Trace, TraceEvent};

/// Graph-search algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    /// Heuristic-guided best-first; shortest path under the admissible
    /// Manhattan heuristic.
    AStar,
    /// Uniform-cost expansion via a full-grid minimum scan per iteration.
    Dijkstra,
    /// FIFO frontier; shortest path under unit edge cost.
    Bfs,
    /// LIFO frontier; finds a valid path, not necessarily the shortest.
    Dfs,
}

/// Result of one search run.
#[derive(Clone, Debug)]
pub struct SearchRun {
    /// Visit and path-mark events in production order.
    pub trace: Trace,
    /// Full start-to-goal cell list (start and end included); empty when the
    /// goal was unreachable.
    pub path: Vec<Pos>,
    /// Number of counted `Visit` events (start/end excluded).
    pub visited: usize,
}

/// Run one search over the grid, recording a trace.
///
/// Search state is reset first, so re-running over identical flags
/// reproduces an identical trace. An unreachable goal is not an error: the
/// run completes with an empty path and full visitation statistics.
#[tracing::instrument(skip(grid))]
pub fn search(grid: &mut Grid, algorithm: SearchAlgorithm) -> StepvizResult<SearchRun> {
    let (Some(start), Some(end)) = (grid.start_idx(), grid.end_idx()) else {
        return Err(StepvizError::search(
            "search requires both a start and an end cell",
        ));
    };

    grid.reset_search_state();
    let mut trace = Trace::new();

    let goal_reached = match algorithm {
        SearchAlgorithm::AStar => astar(grid, start, end, &mut trace),
        SearchAlgorithm::Dijkstra => dijkstra(grid, start, end, &mut trace),
        SearchAlgorithm::Bfs => bfs(grid, start, end, &mut trace),
        SearchAlgorithm::Dfs => dfs(grid, start, end, &mut trace),
    };

    let visited = trace
        .events()
        .iter()
        .filter(|e| matches!(e, TraceEvent::Visit(_)))
        .count();

    let path = if goal_reached {
        reconstruct_path(grid, start, end, &mut trace)
    } else {
        Vec::new()
    };

    tracing::debug!(?algorithm, visited, path_len = path.len(), "search done");
    Ok(SearchRun {
        trace,
        path,
        visited,
    })
}

fn mark_visited(grid: &mut Grid, idx: CellIdx, start: CellIdx, end: CellIdx, trace: &mut Trace) {
    grid.cell_mut(idx).visited = true;
    if idx != start && idx != end {
        trace.push(TraceEvent::Visit(grid.cell(idx).pos));
    }
}

/// Frontier keyed by `distance + heuristic`, ties broken by insertion
/// sequence so traces are identical on every platform.
fn astar(grid: &mut Grid, start: CellIdx, end: CellIdx, trace: &mut Trace) -> bool {
    let end_pos = grid.cell(end).pos;
    let mut frontier: BinaryHeap<Reverse<(u32, u64, u32)>> = BinaryHeap::new();
    let mut seq = 0u64;

    {
        let cell = grid.cell_mut(start);
        cell.distance = 0;
        cell.heuristic = cell.pos.manhattan(end_pos);
        frontier.push(Reverse((cell.heuristic, seq, start.0)));
    }

    while let Some(Reverse((_, _, raw))) = frontier.pop() {
        let current = CellIdx(raw);
        if grid.cell(current).visited {
            // Lazy deletion: a better entry already finalized this cell.
            continue;
        }
        mark_visited(grid, current, start, end, trace);
        if current == end {
            return true;
        }

        let next = grid.cell(current).distance + 1;
        for n in grid.neighbors(current) {
            let cell = grid.cell_mut(n);
            if next < cell.distance {
                cell.distance = next;
                cell.heuristic = cell.pos.manhattan(end_pos);
                cell.predecessor = Some(current);
                seq += 1;
                frontier.push(Reverse((next + cell.heuristic, seq, n.0)));
            }
        }
    }
    false
}

/// Full-grid minimum scan each iteration; O(V²) on purpose, bounded by
/// [`crate::grid::model::MAX_CELLS`]. Row-major scan order makes
/// equal-distance ties deterministic.
fn dijkstra(grid: &mut Grid, start: CellIdx, end: CellIdx, trace: &mut Trace) -> bool {
    grid.cell_mut(start).distance = 0;

    loop {
        let mut current: Option<CellIdx> = None;
        let mut best = INF;
        for i in 0..grid.cell_count() {
            let idx = CellIdx(i as u32);
            let cell = grid.cell(idx);
            if !cell.visited && cell.distance < best {
                best = cell.distance;
                current = Some(idx);
            }
        }
        // Every unfinalized cell is unreachable.
        let Some(current) = current else {
            return false;
        };

        mark_visited(grid, current, start, end, trace);
        if current == end {
            return true;
        }

        let next = best + 1;
        for n in grid.neighbors(current) {
            let cell = grid.cell_mut(n);
            if next < cell.distance {
                cell.distance = next;
                cell.predecessor = Some(current);
            }
        }
    }
}

fn bfs(grid: &mut Grid, start: CellIdx, end: CellIdx, trace: &mut Trace) -> bool {
    let mut queue = VecDeque::new();
    // Visited marks on enqueue, so a cell is never enqueued twice.
    grid.cell_mut(start).visited = true;
    grid.cell_mut(start).distance = 0;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current != start && current != end {
            trace.push(TraceEvent::Visit(grid.cell(current).pos));
        }
        if current == end {
            return true;
        }

        let next = grid.cell(current).distance + 1;
        for n in grid.neighbors(current) {
            let cell = grid.cell_mut(n);
            if !cell.visited {
                cell.visited = true;
                cell.distance = next;
                cell.predecessor = Some(current);
                queue.push_back(n);
            }
        }
    }
    false
}

fn dfs(grid: &mut Grid, start: CellIdx, end: CellIdx, trace: &mut Trace) -> bool {
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if grid.cell(current).visited {
            // Reached via multiple parents; discard the stale stack entry.
            continue;
        }
        mark_visited(grid, current, start, end, trace);
        if current == end {
            return true;
        }

        for n in grid.neighbors(current) {
            let cell = grid.cell_mut(n);
            if !cell.visited {
                cell.predecessor = Some(current);
                stack.push(n);
            }
        }
    }
    false
}

/// Unwind predecessor links from the goal and emit `PathMark` events in
/// root-to-leaf order.
fn reconstruct_path(grid: &Grid, start: CellIdx, end: CellIdx, trace: &mut Trace) -> Vec<Pos> {
    let mut chain = Vec::new();
    let mut cursor = Some(end);
    while let Some(idx) = cursor {
        chain.push(idx);
        cursor = grid.cell(idx).predecessor;
    }
    chain.reverse();

    for &idx in &chain {
        if idx != start && idx != end {
            trace.push(TraceEvent::PathMark(grid.cell(idx).pos));
        }
    }
    chain.iter().map(|&idx| grid.cell(idx).pos).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/search/engine.rs"]
mod tests;

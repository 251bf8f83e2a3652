//! Exact Hamiltonian path search by depth-first branch and bound.
//!
//! The search runs on the unit-step graph (pixel adjacencies), so every
//! remaining node costs at least one unit. That gives the lower bound; the
//! dead-end check rejects moves that leave some neighbor with too few ways in
//! and out.

use std::time::{Duration, Instant};

use super::triangulate::ProximityGraph;
use crate::config::SearchConfig;

const EPS: f64 = 1e-9;

/// Deadline polling interval, in expansions.
const CLOCK_STRIDE: u64 = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Best complete path from start to end, as node indices.
    pub path: Option<Vec<usize>>,
    pub cost: f64,
    pub steps: u64,
    /// The step or time budget cut the search short.
    pub exhausted: bool,
}

/// Shortest path from `start` to `end` visiting every node exactly once.
///
/// Returns the best path found before the budget ran out, which is optimal
/// unless `exhausted` is set.
pub fn hamiltonian_path(
    graph: &ProximityGraph,
    start: usize,
    end: usize,
    budget: &SearchConfig,
) -> SearchOutcome {
    let n = graph.len();
    let mut outcome = SearchOutcome {
        path: None,
        cost: f64::INFINITY,
        steps: 0,
        exhausted: false,
    };
    if n == 0 || start >= n || end >= n || start == end {
        return outcome;
    }

    let deadline = Instant::now() + Duration::from_millis(budget.max_millis);
    let optimum = (n - 1) as f64;

    let mut visited = vec![false; n];
    let mut path = vec![start];
    let mut weights: Vec<f64> = Vec::with_capacity(n);
    let mut cursors = vec![0usize];
    let mut cost = 0.0;
    visited[start] = true;

    'search: while let Some(cursor) = cursors.last_mut() {
        let cur = path[path.len() - 1];

        if path.len() == n {
            if cost < outcome.cost - EPS {
                outcome.cost = cost;
                outcome.path = Some(path.clone());
                if cost <= optimum + EPS {
                    break 'search;
                }
            }
        } else {
            let nbrs = graph.neighbors(cur);
            let last_slot = path.len() == n - 1;
            let remaining = (n - path.len() - 1) as f64;

            while *cursor < nbrs.len() {
                let (next, w) = nbrs[*cursor];
                *cursor += 1;

                if visited[next] || (next == end) != last_slot {
                    continue;
                }
                // Neighbors come sorted by weight, so nothing later can do better.
                if cost + w + remaining >= outcome.cost - EPS {
                    break;
                }
                if !last_slot && strands_neighbor(graph, &visited, cur, next, end) {
                    continue;
                }

                outcome.steps += 1;
                if outcome.steps > budget.max_steps
                    || (outcome.steps % CLOCK_STRIDE == 0 && Instant::now() >= deadline)
                {
                    outcome.exhausted = true;
                    break 'search;
                }

                visited[next] = true;
                path.push(next);
                weights.push(w);
                cost += w;
                cursors.push(0);
                continue 'search;
            }
        }

        // Backtrack.
        cursors.pop();
        if path.len() > 1 {
            if let Some(node) = path.pop() {
                visited[node] = false;
            }
            cost -= weights.pop().unwrap_or(0.0);
        }
    }

    outcome
}

/// Whether stepping `cur -> next` leaves an unvisited neighbor of `cur`
/// without enough free neighbors to be passed through (or, for `end`,
/// entered).
fn strands_neighbor(
    graph: &ProximityGraph,
    visited: &[bool],
    cur: usize,
    next: usize,
    end: usize,
) -> bool {
    graph.neighbors(cur).iter().any(|&(y, _)| {
        if y == next || visited[y] {
            return false;
        }
        let need = if y == end { 1 } else { 2 };
        let free = graph
            .neighbors(y)
            .iter()
            .filter(|&&(z, _)| z == next || !visited[z])
            .count();
        free < need
    })
}

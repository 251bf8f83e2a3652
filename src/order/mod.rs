//! Path ordering: turn an edge's unordered pixel set into a walk from one
//! end vertex to the other.
//!
//! The pipeline per edge:
//! 1. Closed edges are cut open next to their vertex
//! 2. Delaunay triangulation gives the proximity graph
//! 3. Colinear sets are sorted along their dominant axis
//! 4. Otherwise an exact Hamiltonian path search runs on the unit-step graph
//! 5. Nearest-neighbor + 2-opt covers search failure

pub mod heuristic;
pub mod search;
pub mod triangulate;

use std::f64::consts::SQRT_2;

use serde::Serialize;

use crate::config::SearchConfig;
use crate::edges::Edge;
use crate::skeleton::Pixel;

pub use triangulate::{triangulate, ProximityGraph};

/// How an ordering was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Three points or fewer; the input order is already a walk.
    Trivial,
    /// Colinear points sorted along their spread.
    Degenerate,
    /// Exact search found a shortest unit-step walk.
    Exact,
    /// Nearest-neighbor chain improved by 2-opt.
    Heuristic { budget_exceeded: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderedPath {
    /// First and last points are the edge's two vertex pixels.
    pub points: Vec<Pixel>,
    pub strategy: Strategy,
    pub length: f64,
}

impl OrderedPath {
    fn new(points: Vec<Pixel>, strategy: Strategy) -> Self {
        let length = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        Self {
            points,
            strategy,
            length,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }
}

pub fn order_edge(edge: &Edge, config: &SearchConfig) -> OrderedPath {
    order_path(&edge.chain, config)
}

/// Order `[first, interior..., last]` into a walk from `first` to `last`.
/// When `first == last` the result is a closed walk through every interior
/// point.
pub fn order_path(points: &[Pixel], config: &SearchConfig) -> OrderedPath {
    let n = points.len();
    if n <= 1 {
        return OrderedPath::new(points.to_vec(), Strategy::Trivial);
    }

    let (first, last) = (points[0], points[n - 1]);
    if first != last {
        let (order, strategy) = solve_open(points, config);
        return OrderedPath::new(order, strategy);
    }

    let interior = &points[1..n - 1];
    let Some(rotation) = interior
        .iter()
        .copied()
        .min_by_key(|&p| (p.distance_sq(first), p))
    else {
        return OrderedPath::new(points.to_vec(), Strategy::Trivial);
    };

    let mut open = Vec::with_capacity(n);
    open.push(first);
    open.extend(interior.iter().copied().filter(|&p| p != rotation));
    open.push(rotation);

    let (mut order, strategy) = solve_open(&open, config);
    order.push(first);
    OrderedPath::new(order, strategy)
}

fn solve_open(points: &[Pixel], config: &SearchConfig) -> (Vec<Pixel>, Strategy) {
    let n = points.len();
    if n <= 3 {
        return (points.to_vec(), Strategy::Trivial);
    }

    let graph = triangulate(points);
    if graph.is_empty() {
        return (axis_sort(points), Strategy::Degenerate);
    }

    let unit = graph.filtered(SQRT_2 + 1e-9);
    let outcome = search::hamiltonian_path(&unit, 0, n - 1, config);
    tracing::trace!(
        points = n,
        steps = outcome.steps,
        exhausted = outcome.exhausted,
        "exact search"
    );

    let (order, strategy) = match outcome.path {
        Some(order) => (order, Strategy::Exact),
        None => (
            heuristic::nearest_neighbor_two_opt(points, config.two_opt_passes),
            Strategy::Heuristic {
                budget_exceeded: outcome.exhausted,
            },
        ),
    };
    (order.into_iter().map(|i| points[i]).collect(), strategy)
}

/// Sort the interior along the axis with the larger spread, oriented from the
/// first point toward the last.
fn axis_sort(points: &[Pixel]) -> Vec<Pixel> {
    let n = points.len();
    let (first, last) = (points[0], points[n - 1]);

    let spread = |f: fn(&Pixel) -> usize| {
        let lo = points.iter().map(f).min().unwrap_or(0);
        let hi = points.iter().map(f).max().unwrap_or(0);
        hi - lo
    };
    let by_col = spread(|p| p.col) >= spread(|p| p.row);
    let key = |p: &Pixel| {
        if by_col {
            (p.col, p.row)
        } else {
            (p.row, p.col)
        }
    };

    let mut interior = points[1..n - 1].to_vec();
    interior.sort_by_key(key);
    if key(&first) > key(&last) {
        interior.reverse();
    }

    let mut out = Vec::with_capacity(n);
    out.push(first);
    out.extend(interior);
    out.push(last);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(points: &[(usize, usize)]) -> Vec<Pixel> {
        points.iter().map(|&(r, c)| Pixel::new(r, c)).collect()
    }

    fn assert_unit_steps(path: &OrderedPath) {
        for w in path.points.windows(2) {
            assert!(w[0].distance(w[1]) <= SQRT_2 + 1e-9, "{:?} -> {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn colinear_run_is_axis_sorted() {
        // Vertex at the right end first: the walk runs right to left.
        let points = px(&[(3, 9), (3, 2), (3, 5), (3, 1), (3, 4), (3, 3), (3, 6), (3, 8), (3, 7), (3, 0)]);
        let path = order_path(&points, &SearchConfig::default());
        assert_eq!(path.strategy, Strategy::Degenerate);
        let cols: Vec<usize> = path.points.iter().map(|p| p.col).collect();
        assert_eq!(cols, vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert!((path.length - 9.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_run_sorts_by_row() {
        let points = px(&[(0, 4), (2, 4), (1, 4), (3, 4)]);
        let path = order_path(&points, &SearchConfig::default());
        assert_eq!(path.points, px(&[(0, 4), (1, 4), (2, 4), (3, 4)]));
    }

    #[test]
    fn bent_chain_is_ordered_exactly() {
        let points = px(&[(0, 0), (2, 2), (0, 1), (1, 2), (2, 3), (0, 2), (3, 3)]);
        let path = order_path(&points, &SearchConfig::default());
        assert_eq!(path.strategy, Strategy::Exact);
        assert_eq!(path.points, px(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 3), (3, 3)]));
        assert_unit_steps(&path);
    }

    #[test]
    fn loop_closes_on_its_vertex() {
        // A 3x3 ring hung from its top-left corner.
        let ring = px(&[(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)]);
        let mut points = vec![Pixel::new(0, 0)];
        points.extend(ring.iter().copied());
        points.push(Pixel::new(0, 0));

        let path = order_path(&points, &SearchConfig::default());
        assert!(path.is_closed());
        assert_eq!(path.points.len(), 9);
        assert_eq!(path.strategy, Strategy::Exact);
        // The rotation point is the smaller of the two nearest ring pixels.
        assert_eq!(path.points[path.points.len() - 2], Pixel::new(0, 1));
        assert_unit_steps(&path);
    }

    #[test]
    fn self_edge_stays_trivial() {
        let v = Pixel::new(4, 4);
        let path = order_path(&[v, v], &SearchConfig::default());
        assert_eq!(path.strategy, Strategy::Trivial);
        assert_eq!(path.points, vec![v, v]);
        assert_eq!(path.length, 0.0);
    }

    #[test]
    fn disconnected_points_fall_back_to_heuristic() {
        let points = px(&[(0, 0), (0, 5), (3, 2), (0, 9)]);
        let path = order_path(&points, &SearchConfig::default());
        assert_eq!(
            path.strategy,
            Strategy::Heuristic {
                budget_exceeded: false
            }
        );
        assert_eq!(path.points.first(), Some(&Pixel::new(0, 0)));
        assert_eq!(path.points.last(), Some(&Pixel::new(0, 9)));
        assert_eq!(path.points.len(), 4);
    }
}

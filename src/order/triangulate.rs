//! Bowyer–Watson Delaunay triangulation over pixel coordinates.
//!
//! All predicates run on exact integers, so cocircular and colinear pixel
//! configurations never flip on rounding.

use crate::skeleton::Pixel;

/// Weighted neighbor lists, each sorted by (weight, index).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl ProximityGraph {
    /// Node count.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// True when there are no edges.
    pub fn is_empty(&self) -> bool {
        self.adjacency.iter().all(Vec::is_empty)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn neighbors(&self, node: usize) -> &[(usize, f64)] {
        &self.adjacency[node]
    }

    /// Same nodes, keeping only edges no longer than `max_weight`.
    pub fn filtered(&self, max_weight: f64) -> Self {
        let adjacency = self
            .adjacency
            .iter()
            .map(|nbrs| nbrs.iter().copied().filter(|&(_, w)| w <= max_weight).collect())
            .collect();
        Self { adjacency }
    }
}

type Xy = (i64, i64);

fn orient(a: Xy, b: Xy, c: Xy) -> i128 {
    let (abx, aby) = ((b.0 - a.0) as i128, (b.1 - a.1) as i128);
    let (acx, acy) = ((c.0 - a.0) as i128, (c.1 - a.1) as i128);
    abx * acy - aby * acx
}

/// Positive when `d` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `a b c`.
fn in_circle(a: Xy, b: Xy, c: Xy, d: Xy) -> i128 {
    let row = |p: Xy| {
        let x = (p.0 - d.0) as i128;
        let y = (p.1 - d.1) as i128;
        (x, y, x * x + y * y)
    };
    let (ax, ay, a2) = row(a);
    let (bx, by, b2) = row(b);
    let (cx, cy, c2) = row(c);
    ax * (by * c2 - b2 * cy) - ay * (bx * c2 - b2 * cx) + a2 * (bx * cy - by * cx)
}

/// Delaunay proximity graph of `points`. Colinear input has no triangles and
/// yields a graph without edges.
pub fn triangulate(points: &[Pixel]) -> ProximityGraph {
    let n = points.len();
    let mut adjacency = vec![Vec::new(); n];
    if n < 3 {
        return ProximityGraph { adjacency };
    }

    let mut xy: Vec<Xy> = points.iter().map(|p| (p.col as i64, p.row as i64)).collect();

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (i64::MAX, i64::MAX, i64::MIN, i64::MIN);
    for &(x, y) in &xy {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let s = (max_x - min_x).max(max_y - min_y) + 1;
    let (cx, cy) = ((min_x + max_x) / 2, (min_y + max_y) / 2);
    xy.push((cx - 30 * s, cy - 3 * s));
    xy.push((cx + 30 * s, cy - 3 * s));
    xy.push((cx, cy + 30 * s));

    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for i in 0..n {
        let p = xy[i];
        let (bad, good): (Vec<[usize; 3]>, Vec<[usize; 3]>) = triangles
            .into_iter()
            .partition(|t| in_circle(xy[t[0]], xy[t[1]], xy[t[2]], p) > 0);
        triangles = good;
        if bad.is_empty() {
            continue;
        }

        let edges: Vec<(usize, usize)> = bad
            .iter()
            .flat_map(|t| [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])])
            .collect();
        for &(a, b) in &edges {
            if edges.contains(&(b, a)) {
                continue;
            }
            if orient(xy[a], xy[b], p) > 0 {
                triangles.push([a, b, i]);
            }
        }
    }

    for t in triangles.iter().filter(|t| t.iter().all(|&v| v < n)) {
        for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            let w = points[a].distance(points[b]);
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }
    }
    for nbrs in &mut adjacency {
        nbrs.sort_by(|x, y| x.1.total_cmp(&y.1).then(x.0.cmp(&y.0)));
        nbrs.dedup_by_key(|e| e.0);
    }

    ProximityGraph { adjacency }
}

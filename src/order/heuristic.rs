//! Fallback ordering: nearest-neighbor chaining, then 2-opt with both ends
//! pinned. Always returns a permutation, even when the points are not a
//! connected pixel chain.

use crate::skeleton::Pixel;

const EPS: f64 = 1e-9;

/// Order `points` from the first to the last, visiting each once.
pub fn nearest_neighbor_two_opt(points: &[Pixel], passes: usize) -> Vec<usize> {
    let mut order = nearest_neighbor(points);
    two_opt(points, &mut order, passes);
    order
}

fn nearest_neighbor(points: &[Pixel]) -> Vec<usize> {
    let n = points.len();
    if n <= 2 {
        return (0..n).collect();
    }
    let end = n - 1;

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut cur = 0;
    visited[0] = true;
    visited[end] = true;
    order.push(0);

    for _ in 1..end {
        let here = points[cur];
        let next = (0..n)
            .filter(|&i| !visited[i])
            .min_by_key(|&i| (here.distance_sq(points[i]), i));
        let Some(next) = next else {
            break;
        };
        visited[next] = true;
        order.push(next);
        cur = next;
    }

    order.push(end);
    order
}

/// Reverse inner spans while that shortens the walk. The first and last
/// positions never move.
fn two_opt(points: &[Pixel], order: &mut [usize], passes: usize) {
    let n = order.len();
    if n < 4 {
        return;
    }
    let d = |a: usize, b: usize| points[a].distance(points[b]);

    for _ in 0..passes {
        let mut improved = false;
        for i in 1..n - 2 {
            for j in i + 1..n - 1 {
                let before = d(order[i - 1], order[i]) + d(order[j], order[j + 1]);
                let after = d(order[i - 1], order[j]) + d(order[i], order[j + 1]);
                if after < before - EPS {
                    order[i..=j].reverse();
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

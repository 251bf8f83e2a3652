//! Corner detection on vertex-free loops.
//!
//! A skeleton component whose pixels all have degree 2 is a closed curve with
//! no natural place to cut it. The loop is walked into a cycle, each pixel is
//! scored by its turning angle, and the sharpest, well-separated pixels become
//! synthetic vertices.

use std::cmp::Ordering;

use crate::config::CornerConfig;
use crate::skeleton::{Pixel, Skeleton};

/// Walk a loop component into cycle order, starting at its first pixel in
/// row-major order.
///
/// Returns `None` if some pixel does not have exactly two curve neighbors
/// or the walk does not cover the whole component.
pub fn order_cycle(skeleton: &Skeleton, component: &[Pixel]) -> Option<Vec<Pixel>> {
    let start = *component.iter().min()?;
    if component.len() < 4 {
        return None;
    }

    let mut cycle = Vec::with_capacity(component.len());
    let mut prev: Option<Pixel> = None;
    let mut cur = start;

    for _ in 0..component.len() {
        if skeleton.degree(cur) != 2 {
            return None;
        }
        cycle.push(cur);

        let next = skeleton
            .linked_neighbors(cur)
            .map(|(q, _)| q)
            .find(|&q| Some(q) != prev)?;

        if next == start {
            break;
        }
        prev = Some(cur);
        cur = next;
    }

    (cycle.len() == component.len()).then_some(cycle)
}

/// Pick corner positions on a cycle. Returns indices into `cycle`, ascending.
///
/// Candidates above `sensitivity` are taken strongest first, skipping any
/// closer than `min_separation` (cyclically) to an accepted one, up to
/// `max_corners`. If fewer than `min_corners` survive, the strongest
/// remaining pixels pad the set, halving the separation when the loop is too
/// short to fit them.
pub fn detect(cycle: &[Pixel], config: &CornerConfig) -> Vec<usize> {
    let n = cycle.len();
    if n == 0 {
        return Vec::new();
    }

    let window = config.window.min(n / 3).max(1);
    let angles = turning_angles(cycle, window);

    let mut ranked: Vec<usize> = (0..n).collect();
    ranked.sort_by(|&a, &b| match angles[b].total_cmp(&angles[a]) {
        Ordering::Equal => a.cmp(&b),
        other => other,
    });

    let max_corners = config.max_corners.min(n);
    let min_corners = config.min_corners.min(max_corners);
    let mut separation = config.min_separation.max(1);
    let mut chosen: Vec<usize> = Vec::new();

    let sharp = ranked
        .iter()
        .copied()
        .filter(|&i| angles[i] > config.sensitivity);
    accept(sharp, &mut chosen, separation, max_corners, n);

    while chosen.len() < min_corners {
        accept(ranked.iter().copied(), &mut chosen, separation, min_corners, n);
        if chosen.len() >= min_corners || separation == 1 {
            break;
        }
        separation = (separation / 2).max(1);
    }

    chosen.sort_unstable();
    chosen
}

fn accept(
    candidates: impl Iterator<Item = usize>,
    chosen: &mut Vec<usize>,
    separation: usize,
    limit: usize,
    n: usize,
) {
    for i in candidates {
        if chosen.len() >= limit {
            return;
        }
        let clear = chosen
            .iter()
            .all(|&c| c != i && cyclic_distance(c, i, n) >= separation);
        if clear {
            chosen.push(i);
        }
    }
}

/// Unsigned turning angle at each cycle position, measured between the
/// incoming and outgoing chords `window` pixels long.
fn turning_angles(cycle: &[Pixel], window: usize) -> Vec<f64> {
    let n = cycle.len();
    (0..n)
        .map(|i| {
            let prev = cycle[(i + n - window) % n].to_point();
            let here = cycle[i].to_point();
            let next = cycle[(i + window) % n].to_point();
            let v_in = here - prev;
            let v_out = next - here;
            v_in.cross(v_out).atan2(v_in.dot(v_out)).abs()
        })
        .collect()
}

fn cyclic_distance(a: usize, b: usize, n: usize) -> usize {
    let d = a.abs_diff(b);
    d.min(n - d)
}

//! Polyline simplification: ordered pixel walks → minimal point subsets.
//!
//! Douglas–Peucker over an explicit worklist of segments. Each pass splits
//! every pending segment at its farthest point when that point lies more
//! than the tolerance away; segments within tolerance are marked done.

use kurbo::{BezPath, Point};
use serde::Serialize;

use crate::edges::EdgeKind;
use crate::order::OrderedPath;
use crate::skeleton::Pixel;
use crate::EdgeId;

/// A simplified walk, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub edge: EdgeId,
    pub kind: EdgeKind,
    pub points: Vec<Pixel>,
}

impl Polyline {
    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Image-space (x, y) pairs.
    pub fn points_xy(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.col as f64, p.row as f64))
            .collect()
    }

    /// Straight-segment path, closed when the polyline is.
    pub fn to_bezpath(&self) -> BezPath {
        self.to_bezpath_offset(0.0)
    }

    /// As [`Polyline::to_bezpath`], with every point shifted by `offset` on
    /// both axes.
    pub fn to_bezpath_offset(&self, offset: f64) -> BezPath {
        let mut path = BezPath::new();
        let shift = |p: &Pixel| Point::new(p.col as f64 + offset, p.row as f64 + offset);

        let closed = self.is_closed();
        let body = if closed {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points[..]
        };

        let mut iter = body.iter();
        if let Some(first) = iter.next() {
            path.move_to(shift(first));
            for p in iter {
                path.line_to(shift(p));
            }
            if closed {
                path.close_path();
            }
        }
        path
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    first: usize,
    last: usize,
    done: bool,
}

/// Indices of the points Douglas–Peucker keeps at tolerance `tau`.
///
/// `tau == 0` keeps every point. First and last are always kept.
pub fn simplify_indices(points: &[Pixel], tau: f64) -> Vec<usize> {
    let n = points.len();
    if n <= 2 || tau <= 0.0 {
        return (0..n).collect();
    }

    let mut segments = vec![Segment {
        first: 0,
        last: n - 1,
        done: false,
    }];

    loop {
        let mut changed = false;
        let mut next = Vec::with_capacity(segments.len() * 2);

        for seg in segments {
            if seg.done || seg.last - seg.first < 2 {
                next.push(Segment { done: true, ..seg });
                continue;
            }

            let a = points[seg.first].to_point();
            let b = points[seg.last].to_point();
            let mut split = seg.first;
            let mut max = 0.0;
            for i in seg.first + 1..seg.last {
                let d = segment_distance(points[i].to_point(), a, b);
                if d > max {
                    max = d;
                    split = i;
                }
            }

            if max > tau {
                next.push(Segment {
                    first: seg.first,
                    last: split,
                    done: false,
                });
                next.push(Segment {
                    first: split,
                    last: seg.last,
                    done: false,
                });
                changed = true;
            } else {
                next.push(Segment { done: true, ..seg });
            }
        }

        segments = next;
        if !changed {
            break;
        }
    }

    let mut kept = Vec::with_capacity(segments.len() + 1);
    kept.push(segments[0].first);
    kept.extend(segments.iter().map(|s| s.last));
    kept
}

/// Douglas–Peucker on pixel coordinates.
pub fn simplify(points: &[Pixel], tau: f64) -> Vec<Pixel> {
    simplify_indices(points, tau)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

pub fn simplify_path(edge: EdgeId, kind: EdgeKind, path: &OrderedPath, tau: f64) -> Polyline {
    Polyline {
        edge,
        kind,
        points: simplify(&path.points, tau),
    }
}

/// Distance from `p` to the segment `a`–`b`, clamped to its ends.
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

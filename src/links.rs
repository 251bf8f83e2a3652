//! Link segmentation: the skeleton minus its vertex pixels, cut into
//! connected runs.

use crate::features::Features;
use crate::skeleton::{Adjacency, Grid, Pixel, Skeleton};
use crate::LinkId;

/// A maximal run of non-vertex foreground pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    /// Row-major; the walk order is recovered later by the path orderer.
    pub pixels: Vec<Pixel>,
}

impl Link {
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Links {
    /// Id of the first link; equal to the vertex count.
    pub first_id: LinkId,
    pub links: Vec<Link>,
    /// Link id at each link pixel.
    pub labels: Grid<Option<LinkId>>,
}

impl Links {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn get(&self, id: LinkId) -> Option<&Link> {
        id.checked_sub(self.first_id).and_then(|i| self.links.get(i))
    }

    pub fn link_at(&self, p: Pixel) -> Option<LinkId> {
        if p.row < self.labels.height() && p.col < self.labels.width() {
            *self.labels.get(p)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }
}

/// Label the non-vertex foreground into links, ids continuing after the
/// last vertex id.
pub fn segment(skeleton: &Skeleton, features: &Features) -> Links {
    let first_id = features.len();
    let mut labels: Grid<Option<LinkId>> = Grid::new(skeleton.width(), skeleton.height(), None);
    let mut links = Vec::new();

    let is_link_pixel = |p: Pixel| skeleton.is_set(p) && features.vertex_at(p).is_none();

    for seed in skeleton.foreground() {
        if !is_link_pixel(seed) || labels.get(seed).is_some() {
            continue;
        }

        let id = first_id + links.len();
        let mut pixels = Vec::new();
        let mut stack = vec![seed];
        labels.set(seed, Some(id));

        while let Some(p) = stack.pop() {
            pixels.push(p);
            for (q, adjacency) in skeleton.neighbors(p) {
                if !is_link_pixel(q) || labels.get(q).is_some() {
                    continue;
                }
                if adjacency == Adjacency::Weak && crosses_vertex(features, p, q) {
                    continue;
                }
                labels.set(q, Some(id));
                stack.push(q);
            }
        }

        pixels.sort_unstable();
        links.push(Link { id, pixels });
    }

    Links {
        first_id,
        links,
        labels,
    }
}

/// A diagonal step whose flank is a vertex pixel passes through that vertex.
fn crosses_vertex(features: &Features, a: Pixel, b: Pixel) -> bool {
    features.vertex_at(Pixel::new(a.row, b.col)).is_some()
        || features.vertex_at(Pixel::new(b.row, a.col)).is_some()
}

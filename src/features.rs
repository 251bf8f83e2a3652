//! Feature detection: endpoints, branch points, and the corner fallback for
//! components that have neither.

use image::Luma;
use imageproc::region_labelling::{connected_components, Connectivity};
use tracing::debug;

use crate::config::CornerConfig;
use crate::corners;
use crate::error::Recovery;
use crate::skeleton::{Grid, Pixel, Skeleton};
use crate::VertexId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// Exactly one curve direction leaves the pixel.
    End,
    /// Three or more curve directions leave the pixel.
    Branch,
    /// A lone foreground pixel.
    Isolated,
    /// Inserted by corner detection on a vertex-free loop.
    Corner,
    /// Inserted on a vertex-free loop where corner detection found nothing.
    Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub id: VertexId,
    pub pixel: Pixel,
    pub kind: VertexKind,
}

/// Vertex set of one skeleton.
#[derive(Debug, Clone)]
pub struct Features {
    /// Sorted row-major; `vertices[i].id == i`.
    pub vertices: Vec<Vertex>,
    /// Vertex id at each vertex pixel.
    pub mask: Grid<Option<VertexId>>,
    /// One entry per component that needed the corner fallback.
    pub recoveries: Vec<Recovery>,
}

impl Features {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_at(&self, p: Pixel) -> Option<VertexId> {
        if p.row < self.mask.height() && p.col < self.mask.width() {
            *self.mask.get(p)
        } else {
            None
        }
    }

    pub fn count(&self, kind: VertexKind) -> usize {
        self.vertices.iter().filter(|v| v.kind == kind).count()
    }
}

/// Classify every foreground pixel by degree, then seed vertex-free
/// components with corner vertices.
pub fn detect(skeleton: &Skeleton, config: &CornerConfig) -> Features {
    let (width, height) = (skeleton.width(), skeleton.height());

    let mut found: Vec<(Pixel, VertexKind)> = skeleton
        .foreground()
        .filter_map(|p| {
            let kind = match skeleton.degree(p) {
                0 => VertexKind::Isolated,
                1 => VertexKind::End,
                2 => return None,
                _ => VertexKind::Branch,
            };
            Some((p, kind))
        })
        .collect();

    let mut recoveries = Vec::new();
    for (index, component) in components(skeleton).into_iter().enumerate() {
        let has_vertex = component.iter().any(|&p| skeleton.degree(p) != 2);
        if has_vertex {
            continue;
        }

        let picked: Vec<Pixel> = corners::order_cycle(skeleton, &component)
            .map(|cycle| {
                corners::detect(&cycle, config)
                    .into_iter()
                    .map(|i| cycle[i])
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            component = index,
            pixels = component.len(),
            corners = picked.len(),
            "vertex-free loop"
        );
        recoveries.push(Recovery::VertexlessLoop {
            component: index,
            corners: picked.len(),
        });

        if picked.is_empty() {
            found.push((component[0], VertexKind::Anchor));
        } else {
            found.extend(picked.into_iter().map(|p| (p, VertexKind::Corner)));
        }
    }

    found.sort_by_key(|&(p, _)| p);

    let mut mask = Grid::new(width, height, None);
    let vertices = found
        .into_iter()
        .enumerate()
        .map(|(id, (pixel, kind))| {
            mask.set(pixel, Some(id));
            Vertex { id, pixel, kind }
        })
        .collect();

    Features {
        vertices,
        mask,
        recoveries,
    }
}

/// 8-connected components of the whole skeleton, each sorted row-major,
/// numbered in order of their first pixel.
pub fn components(skeleton: &Skeleton) -> Vec<Vec<Pixel>> {
    let labels = connected_components(skeleton.as_gray(), Connectivity::Eight, Luma([0u8]));

    let mut remap: Vec<Option<usize>> = Vec::new();
    let mut out: Vec<Vec<Pixel>> = Vec::new();
    for p in skeleton.foreground() {
        let label = labels.get_pixel(p.col as u32, p.row as u32).0[0] as usize;
        if label >= remap.len() {
            remap.resize(label + 1, None);
        }
        let slot = *remap[label].get_or_insert_with(|| {
            out.push(Vec::new());
            out.len() - 1
        });
        out[slot].push(p);
    }
    out
}

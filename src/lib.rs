//! skel2vec: binary skeleton image → ordered, simplified vector polylines.
//!
//! Takes single-pixel-wide line art (the output of edge detection and
//! thinning) and rebuilds its topology as a graph of vertices and edges,
//! each edge walked in order and reduced to a few points.
//!
//! # Example
//!
//! ```no_run
//! use skel2vec::{trace, LoadConfig, VectorizeConfig};
//! use std::path::Path;
//!
//! let result = trace(Path::new("skeleton.png"), &LoadConfig::default(), &VectorizeConfig::default())?;
//! for polyline in &result.polylines {
//!     let path = polyline.to_bezpath(); // kurbo::BezPath
//!     # let _ = path;
//! }
//! # Ok::<(), skel2vec::VectorizeError>(())
//! ```

#![forbid(unsafe_code)]

pub mod bitmap;
pub mod config;
pub mod connectivity;
pub mod corners;
pub mod edges;
pub mod error;
pub mod features;
pub mod links;
pub mod order;
pub mod output;
pub mod simplify;
pub mod skeleton;

// Re-export kurbo so downstream users get the same version
// used by Polyline::to_bezpath.
pub use kurbo;

pub use config::{CornerConfig, LoadConfig, SearchConfig, ThresholdMethod, VectorizeConfig};
pub use edges::{Edge, EdgeKind};
pub use error::{Recovery, VectorizeError};
pub use features::{Vertex, VertexKind};
pub use links::Link;
pub use order::{OrderedPath, Strategy};
pub use simplify::Polyline;
pub use skeleton::{Pixel, Skeleton};

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Vertex ids run `0..V` in row-major order of their pixels.
pub type VertexId = usize;
/// Link ids run `V..V+L`, continuing after the vertex ids.
pub type LinkId = usize;
/// Index into [`Vectorization::edges`].
pub type EdgeId = usize;

/// Everything derived from one skeleton.
#[derive(Debug, Clone)]
pub struct Vectorization {
    pub width: usize,
    pub height: usize,
    pub vertices: Vec<Vertex>,
    pub links: Vec<Link>,
    pub edges: Vec<Edge>,
    /// One per edge, same order.
    pub paths: Vec<OrderedPath>,
    /// One per edge, same order.
    pub polylines: Vec<Polyline>,
    /// Conditions the pipeline worked around, in the order met.
    pub recoveries: Vec<Recovery>,
}

impl Vectorization {
    fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            vertices: Vec::new(),
            links: Vec::new(),
            edges: Vec::new(),
            paths: Vec::new(),
            polylines: Vec::new(),
            recoveries: vec![Recovery::EmptySkeleton],
        }
    }

    /// Polylines as kurbo paths.
    pub fn bezpaths(&self) -> Vec<kurbo::BezPath> {
        self.polylines.iter().map(Polyline::to_bezpath).collect()
    }
}

/// Full pipeline: skeleton → vertices and links → edges → ordered walks →
/// simplified polylines.
///
/// Only an invalid config is an error; trouble inside the image is absorbed
/// and listed in [`Vectorization::recoveries`].
pub fn vectorize(
    skeleton: &Skeleton,
    config: &VectorizeConfig,
) -> Result<Vectorization, VectorizeError> {
    config.validate()?;
    let t_start = Instant::now();
    let (width, height) = (skeleton.width(), skeleton.height());

    if skeleton.is_empty() {
        warn!("Result      empty skeleton, nothing to vectorize");
        return Ok(Vectorization::empty(width, height));
    }

    // ── Feature points ────────────────────────────────────
    let features = features::detect(skeleton, &config.corner);
    info!(
        "Features    {} vertices ({} end, {} branch, {} corner, {} isolated)",
        features.len(),
        features.count(VertexKind::End),
        features.count(VertexKind::Branch),
        features.count(VertexKind::Corner) + features.count(VertexKind::Anchor),
        features.count(VertexKind::Isolated),
    );

    // ── Links ─────────────────────────────────────────────
    let links = links::segment(skeleton, &features);
    info!(
        "Links       {} links \u{00b7} {} px",
        links.len(),
        links.iter().map(Link::len).sum::<usize>(),
    );

    // ── Connectivity & edges ──────────────────────────────
    let connectivity = connectivity::resolve(skeleton, &features, &links);
    let edges = edges::assemble(&features, &links, &connectivity);
    let count = |kind: EdgeKind| edges.iter().filter(|e| e.kind == kind).count();
    info!(
        "Edges       {} edges ({} direct, {} linked, {} loop, {} extra) \u{00b7} {} redundant, {} deferred touches",
        edges.len(),
        count(EdgeKind::Direct),
        count(EdgeKind::Linked),
        count(EdgeKind::Loop),
        count(EdgeKind::Extra),
        connectivity.redundant,
        connectivity.deferred,
    );

    // ── Order & simplify ──────────────────────────────────
    let paths: Vec<OrderedPath> = edges
        .par_iter()
        .map(|edge| order::order_edge(edge, &config.search))
        .collect();
    let polylines: Vec<Polyline> = edges
        .par_iter()
        .zip(&paths)
        .map(|(edge, path)| simplify::simplify_path(edge.id, edge.kind, path, config.smoothness))
        .collect();

    let mut recoveries = features.recoveries;
    recoveries.extend(connectivity.recoveries);
    for (edge, path) in edges.iter().zip(&paths) {
        match path.strategy {
            Strategy::Degenerate => {
                recoveries.push(Recovery::DegenerateGeometry { edge: edge.id });
            }
            Strategy::Heuristic {
                budget_exceeded: true,
            } => {
                warn!(
                    edge = edge.id,
                    points = path.points.len(),
                    "search budget exceeded, using heuristic order"
                );
                recoveries.push(Recovery::SearchBudgetExceeded { edge: edge.id });
            }
            _ => {}
        }
    }
    for recovery in &recoveries {
        debug!(%recovery, "recovered");
    }

    let raw_points: usize = paths.iter().map(|p| p.points.len()).sum();
    let kept_points: usize = polylines.iter().map(|p| p.points.len()).sum();
    info!(
        "Result      {} polylines \u{00b7} {} points (from {}) \u{00b7} {} recoveries  ({}ms)",
        polylines.len(),
        kept_points,
        raw_points,
        recoveries.len(),
        t_start.elapsed().as_millis(),
    );

    Ok(Vectorization {
        width,
        height,
        vertices: features.vertices,
        links: links.links,
        edges,
        paths,
        polylines,
        recoveries,
    })
}

/// Load an image, binarize it and vectorize the result.
pub fn trace(
    image_path: &Path,
    load: &LoadConfig,
    config: &VectorizeConfig,
) -> Result<Vectorization, VectorizeError> {
    let skeleton = bitmap::load(image_path, load)?;
    let threshold_name = match load.threshold {
        ThresholdMethod::Otsu => "Otsu".to_string(),
        ThresholdMethod::Fixed(t) => format!("fixed {}", t),
    };
    info!(
        "Load        {}x{} px, {} threshold{}",
        skeleton.width(),
        skeleton.height(),
        threshold_name,
        if load.invert { ", inverted" } else { "" },
    );
    vectorize(&skeleton, config)
}

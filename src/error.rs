use std::fmt;

use thiserror::Error;

use crate::{EdgeId, LinkId};

/// Errors that stop vectorization before any polyline is produced.
///
/// Topological trouble inside an image is never one of these; see
/// [`Recovery`] for the conditions the pipeline absorbs on its own.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum VectorizeError {
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("grid size mismatch: expected {expected} cells, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("invalid ascii grid: {0}")]
    InvalidGrid(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// A degraded-but-handled condition met while vectorizing one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The skeleton has no foreground pixels.
    EmptySkeleton,
    /// A component had no endpoint or branch pixel. `corners` synthetic
    /// vertices were inserted for it.
    VertexlessLoop { component: usize, corners: usize },
    /// A link touched its vertices inconsistently and was routed through the
    /// extra-edge heuristic.
    AmbiguousConnectivity { link: LinkId },
    /// An edge's points are colinear, so it was ordered by an axis sort.
    DegenerateGeometry { edge: EdgeId },
    /// The exact search ran out of budget and the heuristic ordering was used.
    SearchBudgetExceeded { edge: EdgeId },
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySkeleton => write!(f, "empty skeleton"),
            Self::VertexlessLoop { component, corners } => {
                write!(f, "vertexless loop in component {component} ({corners} corners)")
            }
            Self::AmbiguousConnectivity { link } => {
                write!(f, "ambiguous connectivity on link {link}")
            }
            Self::DegenerateGeometry { edge } => write!(f, "colinear points on edge {edge}"),
            Self::SearchBudgetExceeded { edge } => {
                write!(f, "search budget exceeded on edge {edge}")
            }
        }
    }
}

//! Writers for vectorization results.

pub mod json;
pub mod svg;

use std::path::Path;

use crate::error::VectorizeError;
use crate::Vectorization;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One stroked `<path>` per polyline.
    Svg,
    /// Plain point lists.
    Json,
}

impl Format {
    /// Guess from a file extension, defaulting to SVG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Svg,
        }
    }
}

/// Render `result` in `format` and write it to `path`.
pub fn write(result: &Vectorization, format: Format, path: &Path) -> Result<(), VectorizeError> {
    let text = match format {
        Format::Svg => svg::to_svg(result),
        Format::Json => json::to_json(result)?,
    };
    std::fs::write(path, text)?;
    Ok(())
}

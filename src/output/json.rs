use serde::Serialize;

use crate::edges::EdgeKind;
use crate::error::VectorizeError;
use crate::{EdgeId, Vectorization};

#[derive(Serialize)]
struct Document {
    width: usize,
    height: usize,
    polylines: Vec<Entry>,
}

#[derive(Serialize)]
struct Entry {
    edge: EdgeId,
    kind: EdgeKind,
    closed: bool,
    points: Vec<(f64, f64)>,
}

/// Pretty-printed JSON: image size plus each polyline's (x, y) points.
pub fn to_json(result: &Vectorization) -> Result<String, VectorizeError> {
    let doc = Document {
        width: result.width,
        height: result.height,
        polylines: result
            .polylines
            .iter()
            .map(|p| Entry {
                edge: p.edge,
                kind: p.kind,
                closed: p.is_closed(),
                points: p.points_xy(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VectorizeConfig;
    use crate::skeleton::Skeleton;
    use crate::vectorize;

    #[test]
    fn document_lists_polylines_with_kinds() {
        let skel = Skeleton::from_ascii(
            r#"
                ......
                .####.
                ......
            "#,
        )
        .expect("valid grid");
        let result = vectorize(&skel, &VectorizeConfig::default()).expect("vectorize");
        let text = to_json(&result).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&text).expect("parse back");

        assert_eq!(value["width"], 6);
        assert_eq!(value["height"], 3);
        let first = &value["polylines"][0];
        assert_eq!(first["kind"], "linked");
        assert_eq!(first["closed"], false);
        assert_eq!(first["points"][0][0], 1.0);
        assert_eq!(first["points"][1][0], 4.0);
    }
}

use crate::Vectorization;

/// SVG document with one stroked path per polyline.
///
/// Coordinates sit at pixel centers, so a polyline through pixel (0, 0)
/// starts at (0.5, 0.5) in the `viewBox`.
pub fn to_svg(result: &Vectorization) -> String {
    let (w, h) = (result.width, result.height);
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    out.push('\n');
    out.push_str(
        r#"  <g fill="none" stroke="black" stroke-width="1" stroke-linecap="round" stroke-linejoin="round">"#,
    );
    out.push('\n');
    for polyline in &result.polylines {
        let d = polyline.to_bezpath_offset(0.5).to_svg();
        if d.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "    <path data-edge=\"{}\" d=\"{}\"/>\n",
            polyline.edge, d
        ));
    }
    out.push_str("  </g>\n</svg>\n");
    out
}

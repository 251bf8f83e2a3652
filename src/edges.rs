//! Edge assembly: resolved incidence turned into vertex-to-vertex edges with
//! their raw pixel chains.

use std::cmp::Reverse;

use serde::Serialize;

use crate::connectivity::{Connectivity, Resolution};
use crate::features::Features;
use crate::links::{Link, Links};
use crate::skeleton::Pixel;
use crate::{EdgeId, LinkId, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Two touching vertices, or a vertex covering itself.
    Direct,
    /// Vertex, link, other vertex.
    Linked,
    /// Vertex, link, same vertex.
    Loop,
    /// A link joined to its nearest candidate vertices.
    Extra,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub a: VertexId,
    pub b: VertexId,
    pub kind: EdgeKind,
    pub link: Option<LinkId>,
    /// `[a, link pixels in row-major order..., b]`.
    pub chain: Vec<Pixel>,
}

impl Edge {
    /// Link pixels only, without the vertex ends.
    pub fn interior(&self) -> &[Pixel] {
        match self.chain.len() {
            0..=2 => &[],
            n => &self.chain[1..n - 1],
        }
    }

    pub fn is_closed(&self) -> bool {
        self.a == self.b
    }
}

/// Build the edge list: direct pairs, linked and loop links, extra links,
/// then a self edge for any vertex nothing else reached.
pub fn assemble(features: &Features, links: &Links, connectivity: &Connectivity) -> Vec<Edge> {
    let pixel = |v: VertexId| features.vertices[v].pixel;
    let mut edges: Vec<Edge> = Vec::new();

    let mut push = |a: VertexId, b: VertexId, kind: EdgeKind, link: Option<&Link>| {
        let mut chain = Vec::with_capacity(link.map_or(0, Link::len) + 2);
        chain.push(pixel(a));
        if let Some(link) = link {
            chain.extend_from_slice(&link.pixels);
        }
        chain.push(pixel(b));
        edges.push(Edge {
            id: edges.len(),
            a,
            b,
            kind,
            link: link.map(|l| l.id),
            chain,
        });
    };

    for &(a, b) in &connectivity.direct {
        push(a, b, EdgeKind::Direct, None);
    }

    for resolution in &connectivity.resolutions {
        let link = links.get(resolution.link());
        match *resolution {
            Resolution::Linked { a, b, .. } => push(a, b, EdgeKind::Linked, link),
            Resolution::Loop { vertex, .. } => push(vertex, vertex, EdgeKind::Loop, link),
            Resolution::Extra { .. } => {}
        }
    }

    for resolution in connectivity.extras() {
        let Resolution::Extra { candidates, .. } = resolution else {
            continue;
        };
        let Some(link) = links.get(resolution.link()) else {
            continue;
        };
        let pool: Vec<VertexId> = if candidates.is_empty() {
            (0..features.len()).collect()
        } else {
            candidates.clone()
        };
        if let Some((a, b)) = attach(link, &pool, pixel) {
            push(a, b, EdgeKind::Extra, Some(link));
        }
    }

    let mut covered = vec![false; features.len()];
    for edge in &edges {
        covered[edge.a] = true;
        covered[edge.b] = true;
    }
    let orphans: Vec<VertexId> = (0..features.len()).filter(|&v| !covered[v]).collect();
    for v in orphans {
        edges.push(Edge {
            id: edges.len(),
            a: v,
            b: v,
            kind: EdgeKind::Direct,
            link: None,
            chain: vec![pixel(v), pixel(v)],
        });
    }

    edges
}

/// Pick end vertices for an unresolved link: the candidate nearest each of
/// its two extremes, distinct when there is a choice.
fn attach(
    link: &Link,
    pool: &[VertexId],
    pixel: impl Fn(VertexId) -> Pixel,
) -> Option<(VertexId, VertexId)> {
    let (e1, e2) = extremes(&link.pixels)?;

    let nearest = |target: Pixel, skip: Option<VertexId>| {
        pool.iter()
            .copied()
            .filter(|&v| Some(v) != skip)
            .min_by_key(|&v| (pixel(v).distance_sq(target), v))
    };

    let a = nearest(e1, None)?;
    let skip = (pool.len() >= 2).then_some(a);
    let b = nearest(e2, skip).unwrap_or(a);
    Some((a, b))
}

/// Two far-apart pixels of a set by a double farthest-point sweep.
fn extremes(pixels: &[Pixel]) -> Option<(Pixel, Pixel)> {
    let farthest = |from: Pixel| {
        pixels
            .iter()
            .copied()
            .min_by_key(|&p| (Reverse(p.distance_sq(from)), p))
    };
    let e1 = farthest(*pixels.first()?)?;
    let e2 = farthest(e1)?;
    Some((e1, e2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CornerConfig;
    use crate::connectivity::{self, Ambiguity};
    use crate::skeleton::Skeleton;
    use crate::{features, links};

    fn assemble_ascii(art: &str) -> (Features, Vec<Edge>) {
        let skel = Skeleton::from_ascii(art).expect("valid grid");
        let features = features::detect(&skel, &CornerConfig::default());
        let links = links::segment(&skel, &features);
        let conn = connectivity::resolve(&skel, &features, &links);
        let edges = assemble(&features, &links, &conn);
        (features, edges)
    }

    #[test]
    fn t_junction_yields_three_linked_edges() {
        let (_, edges) = assemble_ascii(
            r#"
                .......
                .#####.
                ...#...
                ...#...
                ...#...
            "#,
        );
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| e.kind == EdgeKind::Linked));
        assert_eq!(
            edges[2].chain,
            vec![
                Pixel::new(1, 3),
                Pixel::new(2, 3),
                Pixel::new(3, 3),
                Pixel::new(4, 3)
            ]
        );
        assert_eq!(edges[2].interior().len(), 2);
    }

    #[test]
    fn direct_edge_has_only_vertex_pixels() {
        let (_, edges) = assemble_ascii("##");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EdgeKind::Direct);
        assert_eq!(edges[0].chain, vec![Pixel::new(0, 0), Pixel::new(0, 1)]);
        assert!(edges[0].interior().is_empty());
    }

    #[test]
    fn isolated_pixel_gets_a_self_edge() {
        let (features, edges) = assemble_ascii(
            r#"
                ...
                .#.
                ...
            "#,
        );
        assert_eq!(features.len(), 1);
        assert_eq!(edges.len(), 1);
        assert!(edges[0].is_closed());
        assert_eq!(edges[0].chain, vec![Pixel::new(1, 1), Pixel::new(1, 1)]);
    }

    #[test]
    fn extra_link_attaches_to_nearest_candidates() {
        let skel = Skeleton::from_ascii(
            r#"
                #....#
                ......
                .####.
            "#,
        )
        .expect("valid grid");
        let features = features::detect(&skel, &CornerConfig::default());
        let links = links::segment(&skel, &features);

        // The bar's own ends are vertices; hand the resolver's output an extra
        // link standing in for a malformed arm between the two top corners.
        let link = Link {
            id: links.first_id,
            pixels: vec![Pixel::new(1, 1), Pixel::new(1, 2), Pixel::new(1, 3), Pixel::new(1, 4)],
        };
        let fake = Links {
            first_id: links.first_id,
            links: vec![link],
            labels: links.labels.clone(),
        };
        let conn = Connectivity {
            resolutions: vec![Resolution::Extra {
                link: fake.first_id,
                candidates: vec![0, 1],
                reason: Ambiguity::Crowded,
            }],
            ..Connectivity::default()
        };
        let edges = assemble(&features, &fake, &conn);

        let extra = edges
            .iter()
            .find(|e| e.kind == EdgeKind::Extra)
            .expect("extra edge");
        assert_eq!(features.vertices[extra.a].pixel, Pixel::new(0, 5));
        assert_eq!(features.vertices[extra.b].pixel, Pixel::new(0, 0));
        // The bar vertices were not reached by anything and get self edges.
        assert_eq!(edges.iter().filter(|e| e.kind == EdgeKind::Direct).count(), 2);
    }

    #[test]
    fn extremes_of_a_bar_are_its_ends() {
        let bar: Vec<Pixel> = (0..5).map(|c| Pixel::new(2, c)).collect();
        assert_eq!(extremes(&bar), Some((Pixel::new(2, 4), Pixel::new(2, 0))));
    }
}

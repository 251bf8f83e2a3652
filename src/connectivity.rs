//! Vertex/link incidence under strong and weak adjacency.
//!
//! Every vertex pixel is checked against its eight neighbors. A neighbor that
//! is a link pixel is a *contact*: strong across an edge, weak across an open
//! corner. A corner contact that is bridged by another foreground pixel is
//! redundant (the curve really reaches the vertex through the bridge) and is
//! dropped. What remains decides, per link, which vertices it joins.

use std::collections::BTreeMap;

use crate::error::Recovery;
use crate::features::Features;
use crate::links::Links;
use crate::skeleton::{Adjacency, Skeleton};
use crate::{LinkId, VertexId};

/// Contacts between one vertex and one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    pub vertex: VertexId,
    pub link: LinkId,
    /// Edge-sharing contacts.
    pub strong: usize,
    /// Unbridged corner-sharing contacts.
    pub weak: usize,
    /// Bridged corner contacts, discarded.
    pub redundant: usize,
}

impl Touch {
    /// Counted contacts (strong + weak).
    pub fn contacts(&self) -> usize {
        self.strong + self.weak
    }

    pub fn is_trusted(&self) -> bool {
        self.contacts() > 0
    }

    /// Strongest regime that detected the touch, if any contact survived.
    pub fn strength(&self) -> Option<Adjacency> {
        if self.strong > 0 {
            Some(Adjacency::Strong)
        } else if self.weak > 0 {
            Some(Adjacency::Weak)
        } else {
            None
        }
    }
}

/// Why a link was left to the extra-edge heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ambiguity {
    /// Touches no vertex through a counted contact.
    Orphan,
    /// Touches a single vertex at a single contact.
    Dangling,
    /// Touches three or more vertices and strong contacts do not single out two.
    Crowded,
}

/// What a link resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Joins two distinct vertices, `a < b`.
    Linked {
        link: LinkId,
        a: VertexId,
        b: VertexId,
    },
    /// Leaves and returns to the same vertex.
    Loop { link: LinkId, vertex: VertexId },
    /// Unresolved; candidates sorted ascending.
    Extra {
        link: LinkId,
        candidates: Vec<VertexId>,
        reason: Ambiguity,
    },
}

impl Resolution {
    pub fn link(&self) -> LinkId {
        match self {
            Self::Linked { link, .. } | Self::Loop { link, .. } | Self::Extra { link, .. } => *link,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    /// Sorted by (vertex, link).
    pub touches: Vec<Touch>,
    /// Touching vertex pairs with `a < b`, sorted.
    pub direct: Vec<(VertexId, VertexId)>,
    /// One entry per link, in link id order.
    pub resolutions: Vec<Resolution>,
    /// Bridged corner contacts dropped, vertex/link and vertex/vertex.
    pub redundant: usize,
    /// Weak touches set aside when strong contacts settled a crowded link.
    pub deferred: usize,
    pub recoveries: Vec<Recovery>,
}

impl Connectivity {
    /// Links touching `vertex` with the regime that detected each.
    pub fn links_of(&self, vertex: VertexId) -> impl Iterator<Item = (LinkId, Adjacency)> + '_ {
        self.touches
            .iter()
            .filter(move |t| t.vertex == vertex)
            .filter_map(|t| t.strength().map(|s| (t.link, s)))
    }

    /// Vertices touching `link` through a counted contact.
    pub fn vertices_of(&self, link: LinkId) -> Vec<VertexId> {
        self.touches
            .iter()
            .filter(|t| t.link == link && t.is_trusted())
            .map(|t| t.vertex)
            .collect()
    }

    pub fn extras(&self) -> impl Iterator<Item = &Resolution> {
        self.resolutions
            .iter()
            .filter(|r| matches!(r, Resolution::Extra { .. }))
    }
}

/// Build the touch relation and resolve every link.
pub fn resolve(skeleton: &Skeleton, features: &Features, links: &Links) -> Connectivity {
    let mut touches: BTreeMap<(VertexId, LinkId), Touch> = BTreeMap::new();
    let mut direct = Vec::new();
    let mut redundant = 0;

    for vertex in &features.vertices {
        let v = vertex.pixel;
        for (q, adjacency) in skeleton.neighbors(v) {
            if !skeleton.is_set(q) {
                continue;
            }
            let bridged = adjacency == Adjacency::Weak && skeleton.is_bridged(v, q);

            if let Some(other) = features.vertex_at(q) {
                if other <= vertex.id {
                    continue;
                }
                if bridged {
                    redundant += 1;
                } else {
                    direct.push((vertex.id, other));
                }
                continue;
            }

            let Some(link) = links.link_at(q) else {
                continue;
            };
            let touch = touches.entry((vertex.id, link)).or_insert(Touch {
                vertex: vertex.id,
                link,
                strong: 0,
                weak: 0,
                redundant: 0,
            });
            match (adjacency, bridged) {
                (Adjacency::Strong, _) => touch.strong += 1,
                (Adjacency::Weak, false) => touch.weak += 1,
                (Adjacency::Weak, true) => {
                    touch.redundant += 1;
                    redundant += 1;
                }
            }
        }
    }
    direct.sort_unstable();

    let touches: Vec<Touch> = touches.into_values().collect();
    let mut by_link: Vec<Vec<Touch>> = vec![Vec::new(); links.len()];
    for t in &touches {
        by_link[t.link - links.first_id].push(*t);
    }

    let mut resolutions = Vec::with_capacity(links.len());
    let mut recoveries = Vec::new();
    let mut deferred = 0;

    for (link, link_touches) in links.iter().map(|l| l.id).zip(&by_link) {
        let (resolution, crowded) = classify(link, link_touches, &mut deferred);
        if crowded || matches!(resolution, Resolution::Extra { .. }) {
            tracing::debug!(link, ?resolution, "ambiguous link");
            recoveries.push(Recovery::AmbiguousConnectivity { link });
        }
        resolutions.push(resolution);
    }

    Connectivity {
        touches,
        direct,
        resolutions,
        redundant,
        deferred,
        recoveries,
    }
}

/// Resolve one link from its touches (sorted by vertex). The flag reports a
/// link that touched three or more vertices, even when strong contacts
/// settled it.
fn classify(link: LinkId, touches: &[Touch], deferred: &mut usize) -> (Resolution, bool) {
    let trusted: Vec<&Touch> = touches.iter().filter(|t| t.is_trusted()).collect();

    match trusted.as_slice() {
        [] => {
            let candidates = touches.iter().map(|t| t.vertex).collect();
            let extra = Resolution::Extra {
                link,
                candidates,
                reason: Ambiguity::Orphan,
            };
            (extra, false)
        }
        [only] if only.contacts() >= 2 => (
            Resolution::Loop {
                link,
                vertex: only.vertex,
            },
            false,
        ),
        [only] => {
            let extra = Resolution::Extra {
                link,
                candidates: vec![only.vertex],
                reason: Ambiguity::Dangling,
            };
            (extra, false)
        }
        [a, b] => (
            Resolution::Linked {
                link,
                a: a.vertex,
                b: b.vertex,
            },
            false,
        ),
        crowd => {
            let strong: Vec<VertexId> = crowd
                .iter()
                .filter(|t| t.strong > 0)
                .map(|t| t.vertex)
                .collect();
            if let [a, b] = strong.as_slice() {
                *deferred += crowd.len() - 2;
                let linked = Resolution::Linked { link, a: *a, b: *b };
                return (linked, true);
            }
            let candidates = if strong.len() >= 2 {
                strong
            } else {
                crowd.iter().map(|t| t.vertex).collect()
            };
            let extra = Resolution::Extra {
                link,
                candidates,
                reason: Ambiguity::Crowded,
            };
            (extra, true)
        }
    }
}

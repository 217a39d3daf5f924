//! Bounded aggregation of intermediate flows.

use lci_core::{NodeId, Real};
use lci_graph::{Edge, EdgeKind, GraphResult, GraphStore};
use tracing::{debug, warn};

use crate::names::NameSet;
use crate::totals::FlowTotals;
use crate::traversal::Traversal;

/// An intermediate edge that was neither captured nor expanded because its
/// target is missing from the allowlist.
///
/// Whatever lies behind such an edge is absent from the flattened result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroppedEdge {
    pub edge: Edge,
    pub tier: u32,
    pub scaled_amount: Real,
}

/// Result of one expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub totals: FlowTotals,
    pub dropped: Vec<DroppedEdge>,
}

/// Flattens the intermediate-flow subgraph below a root process.
///
/// For each intermediate edge, with `scaled = amount * path weight`:
/// 1. target in the always-include set and tier != 0: capture, stop there
/// 2. tier == tier limit: capture
/// 3. allowlist given and target not in it: drop
/// 4. otherwise descend one tier with `scaled` as the new weight
///
/// Every capture is added straight into one running total, in visit order.
/// A node reached along several paths is therefore summed left to right
/// across all of them, not per subtree first.
#[derive(Debug, Clone)]
pub struct Expander {
    always_include: NameSet,
}

impl Default for Expander {
    fn default() -> Self {
        Self::new(NameSet::always_include())
    }
}

struct Frame {
    edges: std::vec::IntoIter<Edge>,
    scale: Real,
    tier: u32,
}

impl Expander {
    pub fn new(always_include: NameSet) -> Self {
        Self { always_include }
    }

    pub fn always_include(&self) -> &NameSet {
        &self.always_include
    }

    pub fn expand<S: GraphStore + ?Sized>(
        &self,
        store: &S,
        root: NodeId,
        traversal: Traversal<'_>,
    ) -> GraphResult<Expansion> {
        let mut out = Expansion::default();
        if traversal.exhausted() {
            return Ok(out);
        }
        let allowlist = traversal.active_allowlist();
        let limit = traversal.tier_limit;

        let mut stack = vec![Frame {
            edges: store
                .edges_from(root, Some(EdgeKind::Intermediate))?
                .into_iter(),
            scale: traversal.scaling_factor,
            tier: traversal.start_tier,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(edge) = frame.edges.next() else {
                stack.pop();
                continue;
            };
            let (tier, scaled) = (frame.tier, edge.amount * frame.scale);
            let name = &store.node(edge.target)?.name;

            if tier != 0 && self.always_include.contains(name) {
                out.totals.add(edge.target, scaled);
                continue;
            }
            if tier == limit {
                out.totals.add(edge.target, scaled);
                continue;
            }
            if allowlist.is_some_and(|names| !names.contains(name)) {
                debug!(name = %name, tier, "skipping");
                out.dropped.push(DroppedEdge {
                    edge,
                    tier,
                    scaled_amount: scaled,
                });
                continue;
            }

            debug!(name = %name, tier, "exploring");
            stack.push(Frame {
                edges: store
                    .edges_from(edge.target, Some(EdgeKind::Intermediate))?
                    .into_iter(),
                scale: scaled,
                tier: tier + 1,
            });
        }

        if !out.dropped.is_empty() {
            warn!(
                root = %root,
                dropped = out.dropped.len(),
                "intermediate edges outside the allowlist were dropped from the flattened result"
            );
        }
        Ok(out)
    }
}

//! Elementary-flow collection through allow-listed chains.

use lci_core::{NodeId, Real};
use lci_graph::{Edge, EdgeKind, GraphResult, GraphStore};
use tracing::trace;

use crate::traversal::Traversal;

/// Scaled elementary flows and the edges they came from.
///
/// Not deduplicated: the same flow appears once per path that reaches it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub flows: Vec<(NodeId, Real)>,
    pub edges: Vec<Edge>,
}

impl Collected {
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

struct Frame {
    edges: std::vec::IntoIter<Edge>,
    scale: Real,
    tier: u32,
}

/// Gather the elementary flows of `root` and of every allow-listed supplier
/// reachable within the tier limit, each scaled by its path weight.
///
/// Intermediate edges are followed only when an allowlist is given and names
/// their target; every other non-elementary edge is ignored.
pub fn collect_elementary_flows<S: GraphStore + ?Sized>(
    store: &S,
    root: NodeId,
    traversal: Traversal<'_>,
) -> GraphResult<Collected> {
    let mut out = Collected::default();
    if traversal.exhausted() {
        return Ok(out);
    }
    let allowlist = traversal.active_allowlist();

    let mut stack = vec![Frame {
        edges: store.edges_from(root, None)?.into_iter(),
        scale: traversal.scaling_factor,
        tier: traversal.start_tier,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(edge) = frame.edges.next() else {
            stack.pop();
            continue;
        };
        let (scale, tier) = (frame.scale, frame.tier);

        match edge.kind {
            EdgeKind::Elementary => {
                out.flows.push((edge.target, edge.amount * scale));
                out.edges.push(edge);
            }
            EdgeKind::Intermediate => {
                let Some(names) = allowlist else { continue };
                let target = store.node(edge.target)?;
                if !names.contains(&target.name) {
                    continue;
                }
                // a deeper call would return empty without reading the store
                if tier + 1 > traversal.tier_limit {
                    continue;
                }
                trace!(name = %target.name, tier, "collecting through");
                stack.push(Frame {
                    edges: store.edges_from(edge.target, None)?.into_iter(),
                    scale: edge.amount * scale,
                    tier: tier + 1,
                });
            }
            EdgeKind::Reference => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameSet;
    use lci_graph::{GraphBuilder, InventoryGraph};

    struct Chain {
        graph: InventoryGraph,
        station: NodeId,
        co2: NodeId,
        ch4: NodeId,
    }

    // station -(1.0)-> ft -(2.0)-> syngas, other supplier not allow-listed
    fn chain() -> Chain {
        let mut b = GraphBuilder::new();
        let station = b.add_process("db", "st", "station", "kilogram");
        let ft = b.add_process("db", "ft", "ft", "kilogram");
        let syngas = b.add_process("db", "sg", "syngas", "cubic meter");
        let other = b.add_process("db", "ot", "transport", "ton kilometer");
        let co2 = b.add_flow("bio", "co2", "Carbon dioxide", "kilogram");
        let ch4 = b.add_flow("bio", "ch4", "Methane", "kilogram");

        b.add_edge(station, station, EdgeKind::Reference, 1.0);
        b.add_edge(station, co2, EdgeKind::Elementary, 0.5);
        b.add_edge(station, ft, EdgeKind::Intermediate, 1.0);
        b.add_edge(station, other, EdgeKind::Intermediate, 10.0);
        b.add_edge(ft, co2, EdgeKind::Elementary, 0.25);
        b.add_edge(ft, syngas, EdgeKind::Intermediate, 2.0);
        b.add_edge(syngas, ch4, EdgeKind::Elementary, 0.1);
        b.add_edge(syngas, co2, EdgeKind::Elementary, -0.05);
        b.add_edge(other, co2, EdgeKind::Elementary, 99.0);

        Chain {
            graph: b.build().unwrap(),
            station,
            co2,
            ch4,
        }
    }

    #[test]
    fn without_allowlist_only_direct_flows() {
        let c = chain();
        let out = collect_elementary_flows(&c.graph, c.station, Traversal::new(3)).unwrap();
        assert_eq!(out.flows, vec![(c.co2, 0.5)]);
        assert_eq!(out.edges.len(), 1);
    }

    #[test]
    fn follows_allowlisted_chain_in_depth_first_order() {
        let c = chain();
        let names: NameSet = ["ft", "syngas"].into_iter().collect();
        let out = collect_elementary_flows(
            &c.graph,
            c.station,
            Traversal::new(3).with_allowlist(&names),
        )
        .unwrap();

        assert_eq!(
            out.flows,
            vec![(c.co2, 0.5), (c.co2, 0.25), (c.ch4, 0.2), (c.co2, -0.1)]
        );
        assert_eq!(out.edges.len(), 4);
    }

    #[test]
    fn tier_limit_stops_descent() {
        let c = chain();
        let names: NameSet = ["ft", "syngas"].into_iter().collect();
        let out = collect_elementary_flows(
            &c.graph,
            c.station,
            Traversal::new(1).with_allowlist(&names),
        )
        .unwrap();
        assert_eq!(out.flows, vec![(c.co2, 0.5), (c.co2, 0.25)]);
    }

    #[test]
    fn scaling_factor_applies_to_every_flow() {
        let c = chain();
        let out = collect_elementary_flows(
            &c.graph,
            c.station,
            Traversal::new(0).with_scaling(4.0),
        )
        .unwrap();
        assert_eq!(out.flows, vec![(c.co2, 2.0)]);
    }

    #[test]
    fn start_beyond_limit_is_empty() {
        let c = chain();
        let out = collect_elementary_flows(
            &c.graph,
            c.station,
            Traversal::new(1).starting_at(2),
        )
        .unwrap();
        assert!(out.is_empty());
        assert!(out.edges.is_empty());
    }

    #[test]
    fn unknown_root_is_an_error() {
        let c = chain();
        let err = collect_elementary_flows(&c.graph, NodeId::from_index(50), Traversal::new(1));
        assert!(err.is_err());
    }
}

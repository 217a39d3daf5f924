//! Applies a flattening to a duplicated copy of the target process.
//!
//! The original process and its subgraph are only read. Everything the
//! rewrite needs is computed and checked for finiteness before the first
//! mutation, so a failed lookup or an overflowing amount leaves the store
//! unchanged.
//!
//! Rewrites are not idempotent: every call creates a new copy and appends a
//! fresh set of aggregated edges. Callers that must not rewrite a process
//! twice have to check for an existing copy themselves.

use lci_core::{NodeId, Real, ensure_finite};
use lci_graph::{EdgeKind, GraphStore};
use tracing::{info, warn};

use crate::collector::collect_elementary_flows;
use crate::error::{FlattenError, FlattenResult};
use crate::expander::Expander;
use crate::names::NameSet;
use crate::rules::ElementaryRules;
use crate::totals::aggregate_flows;
use crate::traversal::Traversal;

/// Namespace that receives rewritten copies unless configured otherwise.
pub const WORKING_NAMESPACE: &str = "additional_acts";

/// One flattening job.
///
/// `filters[0]` names the nested process whose edge on the copy is replaced;
/// the whole list is the allowlist for the intermediate-flow expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub root: NodeId,
    pub filters: Vec<String>,
    pub tier_limit: u32,
}

impl RewriteRequest {
    pub fn new<I, S>(root: NodeId, filters: I, tier_limit: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root,
            filters: filters.into_iter().map(Into::into).collect(),
            tier_limit,
        }
    }
}

/// Elementary flows swapped out on the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementaryReplacement {
    pub removed: usize,
    pub added: usize,
}

/// What a rewrite did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub copy: NodeId,
    pub removed_intermediate: usize,
    pub added_intermediate: usize,
    pub dropped: usize,
    pub elementary: Option<ElementaryReplacement>,
}

/// Orchestrates expansion, collection and the edits on the copy.
#[derive(Debug, Clone)]
pub struct Rewriter {
    expander: Expander,
    rules: ElementaryRules,
    namespace: String,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self {
            expander: Expander::default(),
            rules: ElementaryRules::default(),
            namespace: WORKING_NAMESPACE.to_string(),
        }
    }
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expander(mut self, expander: Expander) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_rules(mut self, rules: ElementaryRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn rules(&self) -> &ElementaryRules {
        &self.rules
    }

    /// Flatten `request.root` into a new copy in the working namespace.
    pub fn rebuild<S: GraphStore + ?Sized>(
        &self,
        store: &mut S,
        request: &RewriteRequest,
    ) -> FlattenResult<RewriteOutcome> {
        let nested = request
            .filters
            .first()
            .ok_or(FlattenError::EmptyFilterList)?;
        let root_name = store.node(request.root)?.name.clone();
        let allowlist: NameSet = request.filters.iter().map(String::as_str).collect();

        let expansion = self.expander.expand(
            &*store,
            request.root,
            Traversal::new(request.tier_limit).with_allowlist(&allowlist),
        )?;

        let elementary: Option<Vec<(NodeId, Real)>> = match self.rules.get(&root_name) {
            Some(rule) => {
                let collected = collect_elementary_flows(
                    &*store,
                    request.root,
                    Traversal::new(rule.tier_limit).with_allowlist(&rule.allowlist),
                )?;
                Some(aggregate_flows(&collected.flows))
            }
            None => None,
        };

        // path products can overflow; reject them while the store is untouched
        for (_, amount) in expansion.totals.iter() {
            ensure_finite(amount, "flattened intermediate amount")?;
        }
        for &(_, amount) in elementary.iter().flatten() {
            ensure_finite(amount, "flattened elementary amount")?;
        }

        let copy = store.duplicate_node(request.root, &self.namespace)?;

        let mut removed_intermediate = 0;
        for edge in store.edges_from(copy, Some(EdgeKind::Intermediate))? {
            if store.node(edge.target)?.name == *nested {
                store.remove_edge(edge.id)?;
                removed_intermediate += 1;
            }
        }

        let mut added_intermediate = 0;
        for (target, amount) in expansion.totals.iter() {
            store.add_edge(copy, target, EdgeKind::Intermediate, amount)?;
            added_intermediate += 1;
        }

        let elementary = match elementary {
            Some(flows) => {
                let old = store.edges_from(copy, Some(EdgeKind::Elementary))?;
                for edge in &old {
                    store.remove_edge(edge.id)?;
                }
                for &(flow, amount) in &flows {
                    store.add_edge(copy, flow, EdgeKind::Elementary, amount)?;
                }
                Some(ElementaryReplacement {
                    removed: old.len(),
                    added: flows.len(),
                })
            }
            None => None,
        };

        if removed_intermediate == 0 {
            warn!(root = %root_name, nested = %nested, "copy had no edge to the nested process");
        }
        info!(
            root = %root_name,
            copy = %copy,
            namespace = %self.namespace,
            removed = removed_intermediate,
            added = added_intermediate,
            dropped = expansion.dropped.len(),
            "rebuilt process"
        );

        Ok(RewriteOutcome {
            copy,
            removed_intermediate,
            added_intermediate,
            dropped: expansion.dropped.len(),
            elementary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lci_graph::{GraphBuilder, GraphError, InventoryGraph};

    struct Fixture {
        graph: InventoryGraph,
        root: NodeId,
        ft: NodeId,
        h2: NodeId,
        transport: NodeId,
        co2: NodeId,
    }

    // root -(1)-> ft -(0.3)-> h2, root -(2)-> transport
    fn fixture(root_name: &str) -> Fixture {
        let mut b = GraphBuilder::new();
        let root = b.add_process("db", "r", root_name, "kilogram");
        let ft = b.add_process("db", "ft", "ft production", "kilogram");
        let h2 = b.add_process("db", "h2", "hydrogen", "kilogram");
        let transport = b.add_process("db", "t", "transport", "ton kilometer");
        let co2 = b.add_flow("bio", "co2", "Carbon dioxide", "kilogram");
        b.add_edge(root, root, EdgeKind::Reference, 1.0);
        b.add_edge(root, ft, EdgeKind::Intermediate, 1.0);
        b.add_edge(root, transport, EdgeKind::Intermediate, 2.0);
        b.add_edge(root, co2, EdgeKind::Elementary, 0.1);
        b.add_edge(ft, h2, EdgeKind::Intermediate, 0.3);
        b.add_edge(ft, co2, EdgeKind::Elementary, 0.7);
        Fixture {
            graph: b.build().unwrap(),
            root,
            ft,
            h2,
            transport,
            co2,
        }
    }

    #[test]
    fn replaces_nested_edge_on_copy() {
        let mut f = fixture("station");
        let outcome = Rewriter::new()
            .rebuild(&mut f.graph, &RewriteRequest::new(f.root, ["ft production"], 1))
            .unwrap();

        assert_eq!(outcome.removed_intermediate, 1);
        assert_eq!(outcome.added_intermediate, 1);
        assert_eq!(outcome.dropped, 1);
        assert!(outcome.elementary.is_none());

        let tech = f
            .graph
            .edges_from(outcome.copy, Some(EdgeKind::Intermediate))
            .unwrap();
        let pairs: Vec<(NodeId, f64)> = tech.iter().map(|e| (e.target, e.amount)).collect();
        assert_eq!(pairs, vec![(f.transport, 2.0), (f.h2, 0.3)]);

        // the original keeps its edges
        let original = f.graph.edges_from(f.root, None).unwrap();
        assert_eq!(original.len(), 4);
        assert!(original.iter().any(|e| e.target == f.ft));
    }

    #[test]
    fn elementary_rule_replaces_flows() {
        let mut f = fixture("station");
        let rules: ElementaryRules =
            [crate::rules::ElementaryRule::new("station", ["ft production"], 1)]
                .into_iter()
                .collect();
        let outcome = Rewriter::new()
            .with_rules(rules)
            .rebuild(&mut f.graph, &RewriteRequest::new(f.root, ["ft production"], 1))
            .unwrap();

        assert_eq!(
            outcome.elementary,
            Some(ElementaryReplacement {
                removed: 1,
                added: 1
            })
        );
        let bio = f
            .graph
            .edges_from(outcome.copy, Some(EdgeKind::Elementary))
            .unwrap();
        assert_eq!(bio.len(), 1);
        assert_eq!(bio[0].target, f.co2);
        assert!((bio[0].amount - 0.8).abs() < 1e-12);
    }

    #[test]
    fn copy_lands_in_configured_namespace() {
        let mut f = fixture("station");
        let outcome = Rewriter::new()
            .with_namespace("flattened")
            .rebuild(&mut f.graph, &RewriteRequest::new(f.root, ["ft production"], 0))
            .unwrap();
        assert_eq!(f.graph.node(outcome.copy).unwrap().namespace, "flattened");
    }

    #[test]
    fn empty_filter_list_fails_before_mutation() {
        let mut f = fixture("station");
        let before = f.graph.node_count();
        let err = Rewriter::new()
            .rebuild(&mut f.graph, &RewriteRequest::new(f.root, Vec::<String>::new(), 1))
            .unwrap_err();
        assert_eq!(err, FlattenError::EmptyFilterList);
        assert_eq!(f.graph.node_count(), before);
    }

    #[test]
    fn overflowing_amount_fails_before_mutation() {
        // r -(1e200)-> a -(1e200)-> c: the captured amount overflows to inf
        let mut b = GraphBuilder::new();
        let r = b.add_process("db", "r", "R", "kilogram");
        let a = b.add_process("db", "a", "A", "kilogram");
        let c = b.add_process("db", "c", "C", "kilogram");
        b.add_edge(r, a, EdgeKind::Intermediate, 1e200);
        b.add_edge(a, c, EdgeKind::Intermediate, 1e200);
        let mut graph = b.build().unwrap();
        let (nodes, edges) = (graph.node_count(), graph.edge_count());

        let err = Rewriter::new()
            .rebuild(&mut graph, &RewriteRequest::new(r, ["A"], 1))
            .unwrap_err();
        assert!(matches!(
            err,
            FlattenError::Numeric(lci_core::LciError::NonFinite { .. })
        ));
        assert_eq!(graph.node_count(), nodes);
        assert_eq!(graph.edge_count(), edges);
        assert_eq!(graph.nodes_named(WORKING_NAMESPACE, "R").count(), 0);
        assert_eq!(graph.edges_from(r, None).unwrap()[0].target, a);
    }

    #[test]
    fn overflowing_elementary_amount_fails_before_mutation() {
        let mut b = GraphBuilder::new();
        let r = b.add_process("db", "r", "station", "kilogram");
        let a = b.add_process("db", "a", "A", "kilogram");
        let co2 = b.add_flow("bio", "co2", "Carbon dioxide", "kilogram");
        b.add_edge(r, a, EdgeKind::Intermediate, 1e200);
        b.add_edge(a, co2, EdgeKind::Elementary, 1e200);
        let mut graph = b.build().unwrap();
        let (nodes, edges) = (graph.node_count(), graph.edge_count());

        let rules: ElementaryRules = [crate::rules::ElementaryRule::new("station", ["A"], 1)]
            .into_iter()
            .collect();
        let err = Rewriter::new()
            .with_rules(rules)
            .rebuild(&mut graph, &RewriteRequest::new(r, ["A"], 0))
            .unwrap_err();
        assert!(matches!(err, FlattenError::Numeric(_)));
        assert_eq!(graph.node_count(), nodes);
        assert_eq!(graph.edge_count(), edges);
    }

    #[test]
    fn missing_root_fails_before_mutation() {
        let mut f = fixture("station");
        let before = f.graph.edge_count();
        let missing = NodeId::from_index(42);
        let err = Rewriter::new()
            .rebuild(&mut f.graph, &RewriteRequest::new(missing, ["ft production"], 1))
            .unwrap_err();
        assert_eq!(
            err,
            FlattenError::Graph(GraphError::InvalidNodeRef { node: missing })
        );
        assert_eq!(f.graph.edge_count(), before);
    }
}

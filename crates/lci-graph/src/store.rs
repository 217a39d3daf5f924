//! The graph-store seam used by the flattening engine.
//!
//! Everything the engine needs from an inventory goes through
//! [`GraphStore`], so the engine can run against the in-memory
//! [`InventoryGraph`] or any other backend that implements the trait.

use lci_core::{EdgeId, NodeId, Real};
use uuid::Uuid;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, EdgeKind, InventoryGraph, Node};

/// Graph operations consumed by the flattening engine.
///
/// Lookups that miss are hard failures: callers propagate them and abort.
pub trait GraphStore {
    /// Lookup a node by ID.
    fn node(&self, id: NodeId) -> GraphResult<&Node>;

    /// Lookup the single node named `name` in `namespace`.
    fn find_node(&self, namespace: &str, name: &str) -> GraphResult<NodeId>;

    /// Outgoing edges of `source`, optionally restricted to one kind,
    /// in the order they were created.
    fn edges_from(&self, source: NodeId, kind: Option<EdgeKind>) -> GraphResult<Vec<Edge>>;

    /// Create a new edge. Parallel edges to the same target are allowed.
    fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        amount: Real,
    ) -> GraphResult<EdgeId>;

    /// Delete an edge and return what it was.
    fn remove_edge(&mut self, id: EdgeId) -> GraphResult<Edge>;

    /// Copy a node into `namespace`, preserving its outgoing edges.
    ///
    /// Self-referencing edges of the original point at the copy afterwards.
    fn duplicate_node(&mut self, id: NodeId, namespace: &str) -> GraphResult<NodeId>;
}

impl GraphStore for InventoryGraph {
    fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.node_ref(id)
            .ok_or(GraphError::InvalidNodeRef { node: id })
    }

    fn find_node(&self, namespace: &str, name: &str) -> GraphResult<NodeId> {
        let mut matches = self.nodes_named(namespace, name);
        let first = matches.next().ok_or_else(|| GraphError::NodeNotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })?;
        let extra = matches.count();
        if extra > 0 {
            return Err(GraphError::AmbiguousNode {
                namespace: namespace.to_string(),
                name: name.to_string(),
                count: extra + 1,
            });
        }
        Ok(first.id)
    }

    fn edges_from(&self, source: NodeId, kind: Option<EdgeKind>) -> GraphResult<Vec<Edge>> {
        self.node(source)?;
        Ok(self
            .outgoing(source)
            .filter(|edge| kind.is_none_or(|k| edge.kind == k))
            .copied()
            .collect())
    }

    fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        amount: Real,
    ) -> GraphResult<EdgeId> {
        self.node(source)?;
        self.node(target)?;
        lci_core::ensure_finite(amount, "edge amount")?;
        Ok(self.push_edge(source, target, kind, amount))
    }

    fn remove_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self
            .edges
            .get_mut(id.slot())
            .and_then(Option::take)
            .ok_or(GraphError::InvalidEdgeRef { edge: id })?;
        self.outgoing[edge.source.slot()].retain(|e| *e != id);
        Ok(edge)
    }

    fn duplicate_node(&mut self, id: NodeId, namespace: &str) -> GraphResult<NodeId> {
        let original = self.node(id)?.clone();
        let edges: Vec<Edge> = self.outgoing(id).copied().collect();

        let copy = self.push_node(Node {
            namespace: namespace.to_string(),
            code: Uuid::new_v4().simple().to_string(),
            ..original
        });
        for edge in edges {
            let target = if edge.target == id { copy } else { edge.target };
            self.push_edge(copy, target, edge.kind, edge.amount);
        }
        Ok(copy)
    }
}

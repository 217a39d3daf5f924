//! Incremental graph builder.

use lci_core::{EdgeId, NodeId, Real};

use crate::error::GraphResult;
use crate::graph::{Edge, EdgeKind, InventoryGraph, Node, NodeKind};
use crate::validate;

/// Builder for constructing an inventory incrementally.
///
/// Use `add_process`, `add_flow` and `add_edge` to build up the graph,
/// then call `build()` to validate it into an `InventoryGraph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node of any kind and return its ID.
    pub fn add_node(
        &mut self,
        namespace: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            namespace: namespace.into(),
            code: code.into(),
            name: name.into(),
            unit: unit.into(),
            location: None,
            kind,
        });
        id
    }

    /// Add a production process.
    pub fn add_process(
        &mut self,
        namespace: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
    ) -> NodeId {
        self.add_node(namespace, code, name, unit, NodeKind::Process)
    }

    /// Add an elementary (environmental) flow.
    pub fn add_flow(
        &mut self,
        namespace: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
    ) -> NodeId {
        self.add_node(namespace, code, name, unit, NodeKind::ElementaryFlow)
    }

    /// Set the location of a node (useful for post-construction adjustments).
    pub fn set_location(&mut self, node_id: NodeId, location: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(node_id.slot()) {
            node.location = Some(location.into());
        }
    }

    /// Add an exchange from `source` to `target`. Returns the edge ID.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        amount: Real,
    ) -> EdgeId {
        let id = EdgeId::from_index(self.edges.len() as u32);
        self.edges.push(Edge {
            id,
            source,
            target,
            kind,
            amount,
        });
        id
    }

    /// Build and validate the graph.
    pub fn build(self) -> GraphResult<InventoryGraph> {
        validate::validate_structure(&self.nodes, &self.edges)?;

        let mut graph = InventoryGraph::default();
        for node in self.nodes {
            graph.push_node(node);
        }
        for edge in self.edges {
            graph.push_edge(edge.source, edge.target, edge.kind, edge.amount);
        }
        Ok(graph)
    }
}

//! Core inventory data structures.

use std::collections::HashMap;

use lci_core::{EdgeId, NodeId, Real};

/// What a node stands for in the inventory.
///
/// The flattening engine never looks at this tag; it is assigned when the
/// graph is built and used by validation and by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A production process (activity).
    Process,
    /// An exchange with the environment (emission, resource extraction).
    ElementaryFlow,
}

/// Classification of an exchange between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Process to environment (biosphere exchange).
    Elementary,
    /// Process to process (technosphere exchange).
    Intermediate,
    /// Self-referencing production marker.
    Reference,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Elementary => "elementary",
            EdgeKind::Intermediate => "intermediate",
            EdgeKind::Reference => "reference",
        }
    }
}

/// A node of the life-cycle inventory.
///
/// `(namespace, code)` is unique within a graph; `name` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub namespace: String,
    pub code: String,
    pub name: String,
    pub unit: String,
    pub location: Option<String>,
    pub kind: NodeKind,
}

/// A directed, weighted exchange.
///
/// `source` is the consuming process, `target` the supplier or flow.
/// Amounts may be negative (credits, avoided burdens).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub amount: Real,
}

/// The mutable inventory graph.
///
/// Edges are kept in a slot vector so that edge IDs stay valid after other
/// edges are removed; each node keeps its outgoing edges in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InventoryGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Option<Edge>>,
    pub(crate) outgoing: Vec<Vec<EdgeId>>,
    pub(crate) code_index: HashMap<(String, String), NodeId>,
}

impl InventoryGraph {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node_ref(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    /// Get a live edge by ID.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.slot()).and_then(Option::as_ref)
    }

    /// Iterate over all live edges in ID order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter_map(Option::as_ref)
    }

    /// Iterate over the live outgoing edges of a node, in insertion order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing
            .get(id.slot())
            .into_iter()
            .flatten()
            .filter_map(|edge_id| self.edge(*edge_id))
    }

    /// Look up a node by its `(namespace, code)` key.
    pub fn node_by_code(&self, namespace: &str, code: &str) -> Option<NodeId> {
        self.code_index
            .get(&(namespace.to_string(), code.to_string()))
            .copied()
    }

    /// All nodes in `namespace` whose name matches exactly.
    pub fn nodes_named<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.namespace == namespace && n.name == name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub(crate) fn push_node(&mut self, mut node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        node.id = id;
        self.code_index
            .insert((node.namespace.clone(), node.code.clone()), id);
        self.nodes.push(node);
        self.outgoing.push(Vec::new());
        id
    }

    pub(crate) fn push_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        amount: Real,
    ) -> EdgeId {
        let id = EdgeId::from_index(self.edges.len() as u32);
        self.edges.push(Some(Edge {
            id,
            source,
            target,
            kind,
            amount,
        }));
        self.outgoing[source.slot()].push(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(namespace: &str, code: &str, name: &str) -> Node {
        Node {
            id: NodeId::from_index(0),
            namespace: namespace.into(),
            code: code.into(),
            name: name.into(),
            unit: "kilogram".into(),
            location: None,
            kind: NodeKind::Process,
        }
    }

    #[test]
    fn edge_kind_labels() {
        assert_eq!(EdgeKind::Elementary.label(), "elementary");
        assert_eq!(EdgeKind::Intermediate.label(), "intermediate");
        assert_eq!(EdgeKind::Reference.label(), "reference");
    }

    #[test]
    fn push_assigns_sequential_ids() {
        let mut graph = InventoryGraph::default();
        let a = graph.push_node(process("db", "a", "A"));
        let b = graph.push_node(process("db", "b", "B"));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(graph.node_ref(b).unwrap().id, b);
        assert_eq!(graph.node_by_code("db", "a"), Some(a));
        assert_eq!(graph.node_by_code("other", "a"), None);
    }

    #[test]
    fn outgoing_preserves_insertion_order() {
        let mut graph = InventoryGraph::default();
        let a = graph.push_node(process("db", "a", "A"));
        let b = graph.push_node(process("db", "b", "B"));
        let c = graph.push_node(process("db", "c", "C"));
        graph.push_edge(a, c, EdgeKind::Intermediate, 1.0);
        graph.push_edge(a, b, EdgeKind::Intermediate, 2.0);

        let targets: Vec<NodeId> = graph.outgoing(a).map(|e| e.target).collect();
        assert_eq!(targets, vec![c, b]);
        assert_eq!(graph.outgoing(b).count(), 0);
        assert_eq!(graph.edge_count(), 2);
    }
}

//! Compilation between the project file and the in-memory inventory.

use std::collections::HashMap;

use lci_core::NodeId;
use lci_graph::{EdgeKind, GraphBuilder, InventoryGraph, NodeKind};
use lci_project::schema::{EdgeDef, EdgeKindDef, NodeDef, NodeKindDef, NodeRef, Project};

use crate::error::{AppError, AppResult};

fn node_kind(kind: NodeKindDef) -> NodeKind {
    match kind {
        NodeKindDef::Process => NodeKind::Process,
        NodeKindDef::ElementaryFlow => NodeKind::ElementaryFlow,
    }
}

fn node_kind_def(kind: NodeKind) -> NodeKindDef {
    match kind {
        NodeKind::Process => NodeKindDef::Process,
        NodeKind::ElementaryFlow => NodeKindDef::ElementaryFlow,
    }
}

fn edge_kind(kind: EdgeKindDef) -> EdgeKind {
    match kind {
        EdgeKindDef::Elementary => EdgeKind::Elementary,
        EdgeKindDef::Intermediate => EdgeKind::Intermediate,
        EdgeKindDef::Reference => EdgeKind::Reference,
    }
}

fn edge_kind_def(kind: EdgeKind) -> EdgeKindDef {
    match kind {
        EdgeKind::Elementary => EdgeKindDef::Elementary,
        EdgeKind::Intermediate => EdgeKindDef::Intermediate,
        EdgeKind::Reference => EdgeKindDef::Reference,
    }
}

/// Build the inventory graph described by the project's node and edge lists.
pub fn compile_inventory(project: &Project) -> AppResult<InventoryGraph> {
    let mut builder = GraphBuilder::new();
    let mut node_map: HashMap<NodeRef, NodeId> = HashMap::new();

    for node in &project.nodes {
        let id = builder.add_node(
            node.namespace.clone(),
            node.code.clone(),
            node.name.clone(),
            node.unit.clone(),
            node_kind(node.kind),
        );
        if let Some(location) = &node.location {
            builder.set_location(id, location.clone());
        }
        node_map.insert(node.key(), id);
    }

    for edge in &project.edges {
        let source = *node_map
            .get(&edge.source)
            .ok_or_else(|| AppError::Compile(format!("Node not found: {}", edge.source)))?;
        let target = *node_map
            .get(&edge.target)
            .ok_or_else(|| AppError::Compile(format!("Node not found: {}", edge.target)))?;
        builder.add_edge(source, target, edge_kind(edge.kind), edge.amount);
    }

    builder
        .build()
        .map_err(|e| AppError::Compile(format!("Graph build error: {}", e)))
}

/// Flatten the inventory back into project node and edge lists.
///
/// Nodes and live edges keep their creation order, so copies made by a
/// rewrite come after the nodes they were copied from.
pub fn export_inventory(graph: &InventoryGraph) -> AppResult<(Vec<NodeDef>, Vec<EdgeDef>)> {
    let nodes = graph
        .nodes()
        .iter()
        .map(|node| NodeDef {
            namespace: node.namespace.clone(),
            code: node.code.clone(),
            name: node.name.clone(),
            unit: node.unit.clone(),
            kind: node_kind_def(node.kind),
            location: node.location.clone(),
        })
        .collect();

    let key_of = |id: NodeId| -> AppResult<NodeRef> {
        let node = graph
            .node_ref(id)
            .ok_or_else(|| AppError::Graph(format!("Invalid node reference: {}", id)))?;
        Ok(NodeRef {
            namespace: node.namespace.clone(),
            code: node.code.clone(),
        })
    };

    let edges = graph
        .edges()
        .map(|edge| {
            Ok(EdgeDef {
                source: key_of(edge.source)?,
                target: key_of(edge.target)?,
                kind: edge_kind_def(edge.kind),
                amount: edge.amount,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok((nodes, edges))
}

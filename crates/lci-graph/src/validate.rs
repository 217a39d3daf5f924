//! Graph validation logic.

use std::collections::HashSet;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, EdgeKind, Node, NodeKind};

/// Validate the inventory structure before it is frozen into a graph.
pub(crate) fn validate_structure(nodes: &[Node], edges: &[Edge]) -> GraphResult<()> {
    // (namespace, code) keys must be unique
    let mut keys = HashSet::new();
    for node in nodes {
        if !keys.insert((node.namespace.as_str(), node.code.as_str())) {
            return Err(GraphError::DuplicateCode {
                namespace: node.namespace.clone(),
                code: node.code.clone(),
            });
        }
    }

    for edge in edges {
        // Both endpoints must exist
        let source = nodes
            .get(edge.source.slot())
            .ok_or(GraphError::InvalidNodeRef { node: edge.source })?;
        let target = nodes
            .get(edge.target.slot())
            .ok_or(GraphError::InvalidNodeRef { node: edge.target })?;

        lci_core::ensure_finite(edge.amount, "edge amount")?;

        // Only processes have exchanges
        if source.kind == NodeKind::ElementaryFlow {
            return Err(GraphError::FlowWithOutputs { node: source.id });
        }

        match edge.kind {
            EdgeKind::Reference => {
                if edge.source != edge.target {
                    return Err(GraphError::ReferenceNotSelf { edge: edge.id });
                }
            }
            EdgeKind::Elementary => expect_kind(edge, target, NodeKind::ElementaryFlow)?,
            EdgeKind::Intermediate => expect_kind(edge, target, NodeKind::Process)?,
        }
    }

    Ok(())
}

fn expect_kind(edge: &Edge, target: &Node, expected: NodeKind) -> GraphResult<()> {
    if target.kind != expected {
        return Err(GraphError::KindMismatch {
            edge: edge.id,
            kind: edge.kind,
            target: target.kind,
        });
    }
    Ok(())
}

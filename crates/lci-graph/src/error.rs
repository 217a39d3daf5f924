//! Graph-specific error types.

use lci_core::{EdgeId, LciError, NodeId};

use crate::graph::{EdgeKind, NodeKind};

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction, lookup and mutation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// No node with this name exists in the namespace.
    NodeNotFound { namespace: String, name: String },

    /// More than one node carries this name in the namespace.
    AmbiguousNode {
        namespace: String,
        name: String,
        count: usize,
    },

    /// A node ID does not refer to a node of this graph.
    InvalidNodeRef { node: NodeId },

    /// An edge ID does not refer to a live edge of this graph.
    InvalidEdgeRef { edge: EdgeId },

    /// Two nodes share the same `(namespace, code)` key.
    DuplicateCode { namespace: String, code: String },

    /// An edge points at a node of the wrong kind.
    KindMismatch {
        edge: EdgeId,
        kind: EdgeKind,
        target: NodeKind,
    },

    /// A reference flow that does not point back at its own process.
    ReferenceNotSelf { edge: EdgeId },

    /// An elementary flow node with outgoing edges.
    FlowWithOutputs { node: NodeId },

    /// A numeric check from `lci-core` failed (e.g. a non-finite amount).
    Core(LciError),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::NodeNotFound { namespace, name } => {
                write!(f, "No node named '{}' in namespace '{}'", name, namespace)
            }
            GraphError::AmbiguousNode {
                namespace,
                name,
                count,
            } => {
                write!(
                    f,
                    "{} nodes named '{}' in namespace '{}'",
                    count, name, namespace
                )
            }
            GraphError::InvalidNodeRef { node } => {
                write!(f, "Node {} does not exist", node)
            }
            GraphError::InvalidEdgeRef { edge } => {
                write!(f, "Edge {} does not exist or was removed", edge)
            }
            GraphError::DuplicateCode { namespace, code } => {
                write!(f, "Duplicate node code '{}' in namespace '{}'", code, namespace)
            }
            GraphError::KindMismatch { edge, kind, target } => {
                write!(
                    f,
                    "Edge {} is a {} flow but its target is a {:?} node",
                    edge,
                    kind.label(),
                    target
                )
            }
            GraphError::ReferenceNotSelf { edge } => {
                write!(f, "Reference flow {} does not point at its own process", edge)
            }
            GraphError::FlowWithOutputs { node } => {
                write!(f, "Elementary flow node {} has outgoing edges", node)
            }
            GraphError::Core(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GraphError {}

impl From<LciError> for GraphError {
    fn from(err: LciError) -> Self {
        GraphError::Core(err)
    }
}

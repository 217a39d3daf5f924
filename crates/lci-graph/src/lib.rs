//! lci-graph: inventory graph layer.
//!
//! Provides:
//! - Core data structures (Node, Edge, NodeKind, EdgeKind, InventoryGraph)
//! - The `GraphStore` trait the flattening engine runs against
//! - Incremental graph builder with validation
//!
//! # Example
//!
//! ```
//! use lci_graph::{EdgeKind, GraphBuilder, GraphStore};
//!
//! let mut builder = GraphBuilder::new();
//! let fuel = builder.add_process("db", "fuel", "diesel production", "kilogram");
//! let h2 = builder.add_process("db", "h2", "hydrogen production", "kilogram");
//! builder.add_edge(fuel, h2, EdgeKind::Intermediate, 0.4);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.find_node("db", "hydrogen production").unwrap(), h2);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod store;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{Edge, EdgeKind, InventoryGraph, Node, NodeKind};
pub use store::GraphStore;

//! lci-flatten: bounded-depth flattening of inventory subgraphs.
//!
//! Collapses a multi-tier part of the product system into direct edges on a
//! single process:
//! - [`collector`] gathers elementary flows through allow-listed chains
//! - [`totals`] merges `(node, amount)` pairs by node identity
//! - [`expander`] aggregates intermediate flows up to a tier limit
//! - [`rewriter`] applies both to a duplicated copy of the target process
//!
//! All traversals are depth-first over an explicit work stack and touch the
//! inventory only through [`lci_graph::GraphStore`].

pub mod collector;
pub mod error;
pub mod expander;
pub mod names;
pub mod rewriter;
pub mod rules;
pub mod totals;
pub mod traversal;

pub use collector::{Collected, collect_elementary_flows};
pub use error::{FlattenError, FlattenResult};
pub use expander::{DroppedEdge, Expander, Expansion};
pub use names::{ALWAYS_INCLUDE, NameSet};
pub use rewriter::{ElementaryReplacement, RewriteOutcome, RewriteRequest, Rewriter, WORKING_NAMESPACE};
pub use rules::{ElementaryRule, ElementaryRules};
pub use totals::{FlowTotals, aggregate_flows};
pub use traversal::Traversal;

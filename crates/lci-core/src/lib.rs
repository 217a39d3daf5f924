//! lci-core: stable foundation for the inventory flattening workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for graph nodes and edges)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::LciError;
pub use ids::*;
pub use numeric::*;

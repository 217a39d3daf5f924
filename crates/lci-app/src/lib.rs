//! Shared application service layer for lci-flatten.
//!
//! Loads project files, compiles them into an inventory graph, runs the
//! flattening plan and answers ad-hoc expansion and collection queries.

pub mod error;
pub mod flatten_service;
pub mod graph_compile;
pub mod project_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use flatten_service::{
    DroppedRow, ExpandReport, FlowRow, NodeQuery, PlanRun, TargetOutcome, apply_plan,
    build_rewriter, collect_node, expand_node, run_plan,
};
pub use graph_compile::{compile_inventory, export_inventory};
pub use project_service::{
    ProjectSummary, load_project, save_project, summarize_project, validate_project,
};

//! Project loading, saving, validation, and introspection.

use std::path::Path;

use lci_project::schema::{EdgeKindDef, NodeKindDef, Project};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Counts shown by `summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub version: u32,
    pub process_count: usize,
    pub flow_count: usize,
    pub intermediate_edges: usize,
    pub elementary_edges: usize,
    pub reference_edges: usize,
    pub namespaces: Vec<String>,
    pub working_namespace: String,
    pub target_count: usize,
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> AppResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(AppError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load a project, picking YAML or JSON by file extension.
pub fn load_project(path: &Path) -> AppResult<Project> {
    let project = match format_of(path)? {
        Format::Yaml => lci_project::load_yaml(path)?,
        Format::Json => lci_project::load_json(path)?,
    };
    Ok(project)
}

/// Save a project, picking YAML or JSON by file extension.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    match format_of(path)? {
        Format::Yaml => lci_project::save_yaml(path, project)?,
        Format::Json => lci_project::save_json(path, project)?,
    }
    Ok(())
}

/// Validate the project file and check that it compiles into an inventory.
pub fn validate_project(project: &Project) -> AppResult<()> {
    lci_project::validate_project(project).map_err(|e| AppError::Validation(e.to_string()))?;
    crate::graph_compile::compile_inventory(project)?;
    Ok(())
}

pub fn summarize_project(project: &Project) -> ProjectSummary {
    let count_edges = |kind: EdgeKindDef| project.edges.iter().filter(|e| e.kind == kind).count();

    let mut namespaces: Vec<String> = project.nodes.iter().map(|n| n.namespace.clone()).collect();
    namespaces.sort();
    namespaces.dedup();

    ProjectSummary {
        name: project.name.clone(),
        version: project.version,
        process_count: project
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKindDef::Process)
            .count(),
        flow_count: project
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKindDef::ElementaryFlow)
            .count(),
        intermediate_edges: count_edges(EdgeKindDef::Intermediate),
        elementary_edges: count_edges(EdgeKindDef::Elementary),
        reference_edges: count_edges(EdgeKindDef::Reference),
        namespaces,
        working_namespace: project.plan.working_namespace.clone(),
        target_count: project.plan.targets.len(),
    }
}

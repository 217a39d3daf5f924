//! Schema migration framework.

use crate::ProjectError;
use crate::schema::{PlanDef, Project};

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 wrote an empty `always_include` list to mean "use the built-in
/// set". From version 1 on an empty list disables the override.
fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    if project
        .plan
        .always_include
        .as_ref()
        .is_some_and(|names| names.is_empty())
    {
        project.plan.always_include = None;
    }
    if project.plan.working_namespace.trim().is_empty() {
        project.plan.working_namespace = PlanDef::default().working_namespace;
    }
    project.version = 1;
    Ok(project)
}

//! Project validation logic.

use crate::schema::{EdgeDef, NodeRef, PlanDef, Project};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut keys = HashSet::new();
    for node in &project.nodes {
        if !keys.insert(node.key()) {
            return Err(ValidationError::DuplicateId {
                id: node.key().to_string(),
                context: "nodes".to_string(),
            });
        }
    }

    for (idx, edge) in project.edges.iter().enumerate() {
        validate_edge(idx, edge, &keys)?;
    }

    validate_plan(&project.plan, project)
}

fn validate_edge(idx: usize, edge: &EdgeDef, keys: &HashSet<NodeRef>) -> Result<(), ValidationError> {
    for (end, node) in [("source", &edge.source), ("target", &edge.target)] {
        if !keys.contains(node) {
            return Err(ValidationError::MissingReference {
                id: node.to_string(),
                context: format!("edge {} {}", idx, end),
            });
        }
    }
    if !edge.amount.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: format!("edge {} amount", idx),
            value: edge.amount.to_string(),
            reason: "amounts must be finite".to_string(),
        });
    }
    Ok(())
}

fn validate_plan(plan: &PlanDef, project: &Project) -> Result<(), ValidationError> {
    if plan.working_namespace.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "plan.working_namespace".to_string(),
            value: plan.working_namespace.clone(),
            reason: "namespace must not be empty".to_string(),
        });
    }

    for target in &plan.targets {
        if target.filters.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("target '{}' filters", target.name),
                value: "[]".to_string(),
                reason: "the first filter names the process to replace".to_string(),
            });
        }
        let found = project
            .nodes
            .iter()
            .any(|n| n.namespace == target.namespace && n.name == target.name);
        if !found {
            return Err(ValidationError::MissingReference {
                id: format!("{}/{}", target.namespace, target.name),
                context: "plan targets".to_string(),
            });
        }
    }

    if let Some(rules) = &plan.elementary_rules {
        let mut roots = HashSet::new();
        for rule in rules {
            if !roots.insert(&rule.root) {
                return Err(ValidationError::DuplicateId {
                    id: rule.root.clone(),
                    context: "plan elementary_rules".to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EdgeKindDef, ElementaryRuleDef, NodeDef, NodeKindDef, TargetDef};

    fn node(code: &str, name: &str) -> NodeDef {
        NodeDef {
            namespace: "db".to_string(),
            code: code.to_string(),
            name: name.to_string(),
            unit: "kilogram".to_string(),
            kind: NodeKindDef::Process,
            location: None,
        }
    }

    fn key(code: &str) -> NodeRef {
        NodeRef {
            namespace: "db".to_string(),
            code: code.to_string(),
        }
    }

    fn base() -> Project {
        Project {
            version: 1,
            name: "test".to_string(),
            nodes: vec![node("st", "station"), node("syn", "synthesis")],
            edges: vec![EdgeDef {
                source: key("st"),
                target: key("syn"),
                kind: EdgeKindDef::Intermediate,
                amount: 1.0,
            }],
            plan: PlanDef {
                targets: vec![TargetDef {
                    namespace: "db".to_string(),
                    name: "station".to_string(),
                    filters: vec!["synthesis".to_string()],
                    tier_limit: 1,
                }],
                ..PlanDef::default()
            },
        }
    }

    #[test]
    fn valid_project_passes() {
        validate_project(&base()).unwrap();
    }

    #[test]
    fn duplicate_node_key_fails() {
        let mut project = base();
        project.nodes.push(node("st", "other station"));
        let err = validate_project(&project).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateId { ref id, .. } if id == "db/st"));
    }

    #[test]
    fn dangling_edge_fails() {
        let mut project = base();
        project.edges[0].target = key("missing");
        let err = validate_project(&project).unwrap_err();
        assert!(matches!(err, ValidationError::MissingReference { .. }));
    }

    #[test]
    fn non_finite_amount_fails() {
        let mut project = base();
        project.edges[0].amount = f64::INFINITY;
        let err = validate_project(&project).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn empty_filters_fail() {
        let mut project = base();
        project.plan.targets[0].filters.clear();
        assert!(validate_project(&project).is_err());
    }

    #[test]
    fn unknown_target_fails() {
        let mut project = base();
        project.plan.targets[0].name = "nowhere".to_string();
        let err = validate_project(&project).unwrap_err();
        assert!(matches!(err, ValidationError::MissingReference { .. }));
    }

    #[test]
    fn duplicate_rule_roots_fail() {
        let mut project = base();
        let rule = ElementaryRuleDef {
            root: "station".to_string(),
            allowlist: vec!["synthesis".to_string()],
            tier_limit: 1,
        };
        project.plan.elementary_rules = Some(vec![rule.clone(), rule]);
        assert!(validate_project(&project).is_err());
    }

    #[test]
    fn future_version_fails() {
        let mut project = base();
        project.version = 9;
        let err = validate_project(&project).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedVersion { version: 9 }));
    }
}

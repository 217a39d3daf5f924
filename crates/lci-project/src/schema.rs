//! Project schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    #[serde(default)]
    pub plan: PlanDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub namespace: String,
    pub code: String,
    pub name: String,
    pub unit: String,
    pub kind: NodeKindDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl NodeDef {
    pub fn key(&self) -> NodeRef {
        NodeRef {
            namespace: self.namespace.clone(),
            code: self.code.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindDef {
    Process,
    ElementaryFlow,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    pub namespace: String,
    pub code: String,
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.code)
    }
}

/// `source` consumes `amount` of `target` per unit of its reference product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDef {
    pub source: NodeRef,
    pub target: NodeRef,
    pub kind: EdgeKindDef,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKindDef {
    Elementary,
    Intermediate,
    Reference,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDef {
    #[serde(default = "default_working_namespace")]
    pub working_namespace: String,
    /// Replaces the built-in always-include set when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_include: Option<Vec<String>>,
    /// Replaces the built-in elementary rules when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elementary_rules: Option<Vec<ElementaryRuleDef>>,
    #[serde(default)]
    pub targets: Vec<TargetDef>,
}

impl Default for PlanDef {
    fn default() -> Self {
        Self {
            working_namespace: default_working_namespace(),
            always_include: None,
            elementary_rules: None,
            targets: Vec::new(),
        }
    }
}

fn default_working_namespace() -> String {
    "additional_acts".to_string()
}

/// A process to flatten, found by name within `namespace`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetDef {
    pub namespace: String,
    pub name: String,
    pub filters: Vec<String>,
    #[serde(default = "default_tier_limit")]
    pub tier_limit: u32,
}

fn default_tier_limit() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementaryRuleDef {
    pub root: String,
    #[serde(default)]
    pub allowlist: Vec<String>,
    pub tier_limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_defaults_fill_in_when_missing() {
        let yaml = "version: 1\nname: bare\n";
        let project: Project = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(project.plan.working_namespace, "additional_acts");
        assert!(project.plan.always_include.is_none());
        assert!(project.nodes.is_empty());
    }

    #[test]
    fn kinds_use_snake_case() {
        let yaml = r#"
namespace: biosphere3
code: co2
name: Carbon dioxide, fossil
unit: kilogram
kind: elementary_flow
"#;
        let node: NodeDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(node.kind, NodeKindDef::ElementaryFlow);
        assert_eq!(node.key().to_string(), "biosphere3/co2");
        assert!(node.location.is_none());

        let kind: EdgeKindDef = serde_json::from_str("\"intermediate\"").unwrap();
        assert_eq!(kind, EdgeKindDef::Intermediate);
    }

    #[test]
    fn target_tier_limit_defaults_to_one() {
        let yaml = "namespace: db\nname: station\nfilters: [synthesis]\n";
        let target: TargetDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(target.tier_limit, 1);
    }
}

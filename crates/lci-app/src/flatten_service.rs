//! Running flattening plans and ad-hoc flattening queries.

use lci_core::{NodeId, Real};
use lci_flatten::{
    ElementaryRule, ElementaryRules, Expander, NameSet, RewriteOutcome, RewriteRequest, Rewriter,
    Traversal, aggregate_flows, collect_elementary_flows,
};
use lci_graph::{GraphStore, InventoryGraph};
use lci_project::schema::{PlanDef, Project, TargetDef};
use serde::Serialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::graph_compile::{compile_inventory, export_inventory};

/// What happened to one plan target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetOutcome {
    pub target: String,
    pub copy: NodeId,
    pub copy_code: String,
    pub removed_intermediate: usize,
    pub added_intermediate: usize,
    pub dropped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elementary_removed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elementary_added: Option<usize>,
}

impl TargetOutcome {
    fn new(target: &TargetDef, copy_code: String, outcome: &RewriteOutcome) -> Self {
        Self {
            target: target.name.clone(),
            copy: outcome.copy,
            copy_code,
            removed_intermediate: outcome.removed_intermediate,
            added_intermediate: outcome.added_intermediate,
            dropped: outcome.dropped,
            elementary_removed: outcome.elementary.map(|e| e.removed),
            elementary_added: outcome.elementary.map(|e| e.added),
        }
    }
}

/// The rewritten inventory and one outcome per target, in plan order.
#[derive(Debug, Clone)]
pub struct PlanRun {
    pub graph: InventoryGraph,
    pub outcomes: Vec<TargetOutcome>,
}

/// One row of a query result, resolved to the node it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRow {
    pub namespace: String,
    pub code: String,
    pub name: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub amount: Real,
}

/// An intermediate edge left out of an expansion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRow {
    pub tier: u32,
    #[serde(flatten)]
    pub flow: FlowRow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandReport {
    pub rows: Vec<FlowRow>,
    pub dropped: Vec<DroppedRow>,
}

/// Parameters of an ad-hoc `expand` or `collect` query.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeQuery {
    pub namespace: String,
    pub name: String,
    pub tier_limit: u32,
    pub allow: Vec<String>,
    pub scale: Real,
}

impl NodeQuery {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, tier_limit: u32) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            tier_limit,
            allow: Vec::new(),
            scale: 1.0,
        }
    }

    pub fn with_allow<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_scale(mut self, scale: Real) -> Self {
        self.scale = scale;
        self
    }
}

fn build_expander(plan: &PlanDef) -> Expander {
    match &plan.always_include {
        Some(names) => Expander::new(names.iter().cloned().collect()),
        None => Expander::default(),
    }
}

/// Configure a rewriter from the plan, falling back to the built-in
/// always-include set and elementary rules where the plan is silent.
pub fn build_rewriter(plan: &PlanDef) -> Rewriter {
    let mut rewriter = Rewriter::new()
        .with_namespace(plan.working_namespace.clone())
        .with_expander(build_expander(plan));
    if let Some(rules) = &plan.elementary_rules {
        let rules: ElementaryRules = rules
            .iter()
            .map(|r| ElementaryRule::new(r.root.clone(), r.allowlist.iter().cloned(), r.tier_limit))
            .collect();
        rewriter = rewriter.with_rules(rules);
    }
    rewriter
}

/// Compile the project and rewrite every plan target in order.
///
/// The project itself is left untouched. Stops at the first failing target.
pub fn run_plan(project: &Project) -> AppResult<PlanRun> {
    let mut graph = compile_inventory(project)?;
    let rewriter = build_rewriter(&project.plan);
    let mut outcomes = Vec::with_capacity(project.plan.targets.len());

    for target in &project.plan.targets {
        let root = graph.find_node(&target.namespace, &target.name)?;
        let request = RewriteRequest::new(root, target.filters.iter().cloned(), target.tier_limit);
        let outcome = rewriter
            .rebuild(&mut graph, &request)
            .map_err(|e| AppError::Flatten {
                target: target.name.clone(),
                message: e.to_string(),
            })?;
        let copy_code = graph.node(outcome.copy)?.code.clone();
        info!(target = %target.name, copy = %copy_code, "flattened target");
        outcomes.push(TargetOutcome::new(target, copy_code, &outcome));
    }

    Ok(PlanRun { graph, outcomes })
}

/// Run the plan and write the rewritten inventory back into `project`.
///
/// Rewrites are not idempotent, so the applied targets are removed from the
/// plan. Applying the same project twice leaves it unchanged the second time.
pub fn apply_plan(project: &mut Project) -> AppResult<Vec<TargetOutcome>> {
    let run = run_plan(project)?;
    let (nodes, edges) = export_inventory(&run.graph)?;
    project.nodes = nodes;
    project.edges = edges;
    project.plan.targets.clear();
    info!(
        project = %project.name,
        targets = run.outcomes.len(),
        nodes = project.nodes.len(),
        edges = project.edges.len(),
        "applied plan"
    );
    Ok(run.outcomes)
}

fn flow_row(graph: &InventoryGraph, node: NodeId, amount: Real) -> AppResult<FlowRow> {
    let node = graph.node(node)?;
    Ok(FlowRow {
        namespace: node.namespace.clone(),
        code: node.code.clone(),
        name: node.name.clone(),
        unit: node.unit.clone(),
        location: node.location.clone(),
        amount,
    })
}

/// Aggregated intermediate flows of the queried process, as direct inputs.
pub fn expand_node(project: &Project, query: &NodeQuery) -> AppResult<ExpandReport> {
    let graph = compile_inventory(project)?;
    let root = graph.find_node(&query.namespace, &query.name)?;
    let allow: NameSet = query.allow.iter().cloned().collect();

    let expansion = build_expander(&project.plan)
        .expand(
            &graph,
            root,
            Traversal::new(query.tier_limit)
                .with_allowlist(&allow)
                .with_scaling(query.scale),
        )?;

    let rows = expansion
        .totals
        .iter()
        .map(|(node, amount)| flow_row(&graph, node, amount))
        .collect::<AppResult<Vec<_>>>()?;
    let dropped = expansion
        .dropped
        .iter()
        .map(|d| {
            Ok(DroppedRow {
                tier: d.tier,
                flow: flow_row(&graph, d.edge.target, d.scaled_amount)?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ExpandReport { rows, dropped })
}

/// Elementary flows of the queried process and its allow-listed suppliers,
/// summed per flow.
pub fn collect_node(project: &Project, query: &NodeQuery) -> AppResult<Vec<FlowRow>> {
    let graph = compile_inventory(project)?;
    let root = graph.find_node(&query.namespace, &query.name)?;
    let allow: NameSet = query.allow.iter().cloned().collect();

    let collected = collect_elementary_flows(
        &graph,
        root,
        Traversal::new(query.tier_limit)
            .with_allowlist(&allow)
            .with_scaling(query.scale),
    )?;

    aggregate_flows(&collected.flows)
        .into_iter()
        .map(|(node, amount)| flow_row(&graph, node, amount))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lci_project::schema::ElementaryRuleDef;

    #[test]
    fn rewriter_follows_plan_overrides() {
        let plan = PlanDef {
            working_namespace: "flat".to_string(),
            always_include: Some(vec![]),
            elementary_rules: Some(vec![ElementaryRuleDef {
                root: "station".to_string(),
                allowlist: vec!["synthesis".to_string()],
                tier_limit: 2,
            }]),
            targets: vec![],
        };
        let rewriter = build_rewriter(&plan);
        assert_eq!(rewriter.namespace(), "flat");
        assert_eq!(rewriter.rules().len(), 1);
        assert_eq!(rewriter.rules().get("station").map(|r| r.tier_limit), Some(2));
    }

    #[test]
    fn rewriter_defaults_when_plan_is_silent() {
        let rewriter = build_rewriter(&PlanDef::default());
        assert_eq!(rewriter.namespace(), lci_flatten::WORKING_NAMESPACE);
        assert_eq!(rewriter.rules(), &ElementaryRules::default());
        assert_eq!(build_expander(&PlanDef::default()).always_include().len(), 3);
    }

    #[test]
    fn query_defaults() {
        let q = NodeQuery::new("db", "station", 2).with_allow(["a", "b"]);
        assert_eq!(q.scale, 1.0);
        assert_eq!(q.allow, vec!["a".to_string(), "b".to_string()]);
    }
}

//! Per-process rules for flattening elementary flows.

use crate::names::NameSet;

/// Elementary-flow flattening for one named root process: collect through
/// `allowlist` down to `tier_limit`, then replace the copy's elementary flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementaryRule {
    pub root_name: String,
    pub allowlist: NameSet,
    pub tier_limit: u32,
}

impl ElementaryRule {
    pub fn new<I, S>(root_name: impl Into<String>, allowlist: I, tier_limit: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root_name: root_name.into(),
            allowlist: allowlist.into_iter().collect(),
            tier_limit,
        }
    }
}

/// Lookup table of [`ElementaryRule`]s keyed by root process name.
///
/// `Default` holds the synthetic Fischer-Tropsch diesel and kerosene
/// fuelling-station processes, whose on-site emissions sit one or three
/// tiers down the production chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementaryRules {
    rules: Vec<ElementaryRule>,
}

impl ElementaryRules {
    /// A table with no rules: rewrites never touch elementary flows.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule, replacing any earlier rule for the same root name.
    pub fn insert(&mut self, rule: ElementaryRule) {
        self.rules.retain(|r| r.root_name != rule.root_name);
        self.rules.push(rule);
    }

    pub fn get(&self, root_name: &str) -> Option<&ElementaryRule> {
        self.rules.iter().find(|r| r.root_name == root_name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementaryRule> + '_ {
        self.rules.iter()
    }
}

impl FromIterator<ElementaryRule> for ElementaryRules {
    fn from_iter<I: IntoIterator<Item = ElementaryRule>>(iter: I) -> Self {
        let mut rules = Self::empty();
        for rule in iter {
            rules.insert(rule);
        }
        rules
    }
}

fn wood_gasification_rule(fuel: &str) -> ElementaryRule {
    ElementaryRule::new(
        format!(
            "{fuel} production, synthetic, from Fischer Tropsch process, hydrogen from wood gasification, energy allocation, at fuelling station"
        ),
        [
            format!(
                "{fuel} production, synthetic, Fischer Tropsch process, hydrogen from wood gasification, energy allocation"
            ),
            "syngas, RWGS, Production, for Fischer Tropsch process, hydrogen from wood gasification"
                .to_string(),
            "carbon monoxide, from RWGS, for Fischer Tropsch process, hydrogen from wood gasification"
                .to_string(),
        ],
        3,
    )
}

fn electrolysis_rule(fuel: &str) -> ElementaryRule {
    ElementaryRule::new(
        format!(
            "{fuel} production, synthetic, from Fischer Tropsch process, hydrogen from electrolysis, energy allocation, at fuelling station"
        ),
        [format!(
            "{fuel} production, synthetic, Fischer Tropsch process, hydrogen from electrolysis, energy allocation"
        )],
        1,
    )
}

impl Default for ElementaryRules {
    fn default() -> Self {
        ["diesel", "kerosene"]
            .into_iter()
            .flat_map(|fuel| [wood_gasification_rule(fuel), electrolysis_rule(fuel)])
            .collect()
    }
}

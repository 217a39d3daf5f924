//! Parameters shared by the collector and the expander.

use lci_core::Real;

use crate::names::NameSet;

/// Where a flattening walk starts and how deep it may go.
///
/// `tier` counts intermediate-flow hops from the root. A walk that starts
/// beyond `tier_limit` yields nothing and never touches the store.
#[derive(Debug, Clone, Copy)]
pub struct Traversal<'a> {
    pub scaling_factor: Real,
    pub allowlist: Option<&'a NameSet>,
    pub start_tier: u32,
    pub tier_limit: u32,
}

impl<'a> Traversal<'a> {
    /// Unit scaling, no allowlist, starting at tier 0.
    pub fn new(tier_limit: u32) -> Self {
        Self {
            scaling_factor: 1.0,
            allowlist: None,
            start_tier: 0,
            tier_limit,
        }
    }

    pub fn with_allowlist(mut self, allowlist: &'a NameSet) -> Self {
        self.allowlist = Some(allowlist);
        self
    }

    pub fn with_scaling(mut self, scaling_factor: Real) -> Self {
        self.scaling_factor = scaling_factor;
        self
    }

    pub fn starting_at(mut self, tier: u32) -> Self {
        self.start_tier = tier;
        self
    }

    /// True when the walk has nothing to do.
    pub fn exhausted(&self) -> bool {
        self.start_tier > self.tier_limit
    }

    /// The allowlist, with an empty set treated as no allowlist at all.
    pub(crate) fn active_allowlist(&self) -> Option<&'a NameSet> {
        self.allowlist.filter(|names| !names.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let t = Traversal::new(2);
        assert_eq!(t.scaling_factor, 1.0);
        assert_eq!(t.start_tier, 0);
        assert!(t.allowlist.is_none());
        assert!(!t.exhausted());
    }

    #[test]
    fn exhausted_when_start_beyond_limit() {
        assert!(Traversal::new(1).starting_at(2).exhausted());
        assert!(!Traversal::new(1).starting_at(1).exhausted());
    }

    #[test]
    fn empty_allowlist_is_inactive() {
        let empty = NameSet::new();
        let t = Traversal::new(1).with_allowlist(&empty);
        assert!(t.active_allowlist().is_none());

        let names: NameSet = ["a"].into_iter().collect();
        let t = Traversal::new(1).with_allowlist(&names);
        assert!(t.active_allowlist().is_some());
    }
}

//! Merge-by-add accumulation of `(node, amount)` pairs.

use std::collections::HashMap;

use lci_core::{NodeId, Real};

/// Amounts keyed by node identity, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowTotals {
    entries: Vec<(NodeId, Real)>,
    index: HashMap<NodeId, usize>,
}

impl FlowTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the running total of `node`.
    pub fn add(&mut self, node: NodeId, amount: Real) {
        match self.index.get(&node) {
            Some(&slot) => self.entries[slot].1 += amount,
            None => {
                self.index.insert(node, self.entries.len());
                self.entries.push((node, amount));
            }
        }
    }

    /// Merge another set of totals into this one.
    pub fn merge(&mut self, other: &FlowTotals) {
        for &(node, amount) in &other.entries {
            self.add(node, amount);
        }
    }

    pub fn get(&self, node: NodeId) -> Option<Real> {
        self.index.get(&node).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Real)> + '_ {
        self.entries.iter().copied()
    }

    pub fn into_pairs(self) -> Vec<(NodeId, Real)> {
        self.entries
    }
}

impl FromIterator<(NodeId, Real)> for FlowTotals {
    fn from_iter<I: IntoIterator<Item = (NodeId, Real)>>(iter: I) -> Self {
        let mut totals = FlowTotals::new();
        for (node, amount) in iter {
            totals.add(node, amount);
        }
        totals
    }
}

/// Sum the amounts of each distinct node.
///
/// One output entry per node, in first-seen order; plain left-to-right
/// floating-point addition.
pub fn aggregate_flows(flows: &[(NodeId, Real)]) -> Vec<(NodeId, Real)> {
    flows.iter().copied().collect::<FlowTotals>().into_pairs()
}

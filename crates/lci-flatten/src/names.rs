//! Exact-match name sets used as allowlists.

use std::collections::BTreeSet;

/// Processes that are captured as-is below the root, never expanded.
///
/// These are the hydrogen and low-voltage electricity suppliers that the
/// energy-system model accounts for on its own.
pub const ALWAYS_INCLUDE: [&str; 3] = [
    "hydrogen production, gaseous, 30 bar, from PEM electrolysis, from grid electricity",
    "market group for electricity, low voltage",
    "hydrogen production, gaseous, 25 bar, from gasification of woody biomass in entrained flow gasifier, at gasification plant",
];

/// A set of process names matched by exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet {
    names: BTreeSet<String>,
}

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed always-include set.
    pub fn always_include() -> Self {
        ALWAYS_INCLUDE.into_iter().collect()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for NameSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

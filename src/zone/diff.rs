//! Set difference between two nameserver lists, keyed by hostname.

use std::collections::HashMap;

use super::NameserverEntry;

/// Result of comparing a desired nameserver list against the previously applied one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameserverDiff {
    /// New hostnames, or known hostnames whose address moved. Keeps `desired` order.
    pub added_or_changed: Vec<NameserverEntry>,
    /// Hostnames only present in `previous`, in `previous` order.
    pub deleted: Vec<NameserverEntry>,
}

impl NameserverDiff {
    pub fn is_empty(&self) -> bool {
        self.added_or_changed.is_empty() && self.deleted.is_empty()
    }
}

/// Classify `desired` against `previous`.
///
/// Only the address counts as a change; `create_record` flips are handled by the synthesizer.
/// Hostnames are expected to be unique within each list.
pub fn diff(desired: &[NameserverEntry], previous: &[NameserverEntry]) -> NameserverDiff {
    let mut remaining: HashMap<&str, &NameserverEntry> = previous
        .iter()
        .map(|ns| (ns.hostname.as_str(), ns))
        .collect();

    let mut added_or_changed = Vec::new();
    for ns in desired {
        match remaining.remove(ns.hostname.as_str()) {
            Some(old) if old.address == ns.address => {}
            _ => added_or_changed.push(ns.clone()),
        }
    }

    // previous order, not map order
    let deleted = previous
        .iter()
        .filter(|ns| remaining.contains_key(ns.hostname.as_str()))
        .cloned()
        .collect();

    NameserverDiff {
        added_or_changed,
        deleted,
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;

// SPDX-License-Identifier: MPL-2.0

//! Ordered, duplicate-free set of selected leaves with their display records.

use crate::api::{CompositeId, LeafDetail};
use indexmap::IndexSet;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    ids: IndexSet<CompositeId>,
    details: HashMap<CompositeId, LeafDetail>,
}

impl SelectionStore {
    /// Adds a leaf. Returns false if it was already selected.
    pub fn add(&mut self, detail: LeafDetail) -> bool {
        if !self.ids.insert(detail.id) {
            return false;
        }
        self.details.insert(detail.id, detail);
        true
    }

    /// Removes a leaf and its display record. Returns false if it was not selected.
    pub fn remove(&mut self, id: &CompositeId) -> bool {
        self.details.remove(id);
        self.ids.shift_remove(id)
    }

    pub fn contains(&self, id: &CompositeId) -> bool {
        self.ids.contains(id)
    }

    /// The externally visible value, in insertion order.
    pub fn to_array(&self) -> Vec<String> {
        self.ids.iter().map(ToString::to_string).collect()
    }

    /// Removes everything. Returns false if the store was already empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        self.details.clear();
        changed
    }

    /// Replaces the whole selection. Display records of identifiers that stay
    /// are kept; the identifiers that still need one are returned.
    pub fn replace(&mut self, ids: Vec<CompositeId>) -> Vec<CompositeId> {
        self.ids = ids.into_iter().collect();
        self.details.retain(|id, _| self.ids.contains(id));
        self.ids
            .iter()
            .filter(|id| !self.details.contains_key(id))
            .copied()
            .collect()
    }

    /// Stores display records for identifiers that are still selected.
    pub fn absorb_details(&mut self, details: Vec<LeafDetail>) {
        for detail in details {
            if self.ids.contains(&detail.id) {
                self.details.insert(detail.id, detail);
            }
        }
    }

    pub fn detail(&self, id: &CompositeId) -> Option<&LeafDetail> {
        self.details.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompositeId> {
        self.ids.iter()
    }

    /// True if the store holds exactly these identifiers in this order.
    pub fn same_as(&self, ids: &[CompositeId]) -> bool {
        self.ids.len() == ids.len() && self.ids.iter().zip(ids).all(|(a, b)| a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{NodeRef, TaxonomyNode};

    fn leaf(top: u64, mid: u64, id: u64) -> LeafDetail {
        LeafDetail::new(
            NodeRef {
                id: top,
                name: format!("Top {}", top),
            },
            NodeRef {
                id: mid,
                name: format!("Mid {}", mid),
            },
            &TaxonomyNode::new(id, format!("Leaf {}", id)),
        )
    }

    #[test]
    fn test_no_duplicates_under_any_sequence() {
        let mut store = SelectionStore::default();
        let ops: [(bool, u64); 10] = [
            (true, 1),
            (true, 2),
            (true, 1),
            (false, 2),
            (true, 2),
            (true, 2),
            (false, 9),
            (true, 3),
            (false, 1),
            (true, 1),
        ];
        for (add, id) in ops {
            if add {
                store.add(leaf(1, 1, id));
            } else {
                store.remove(&CompositeId::new(1, 1, id));
            }
            let array = store.to_array();
            let mut deduped = array.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(array.len(), deduped.len());
        }
        assert_eq!(store.to_array(), vec!["1-1-2", "1-1-3", "1-1-1"]);
    }

    #[test]
    fn test_add_then_remove_restores_state() {
        let mut store = SelectionStore::default();
        store.add(leaf(1, 2, 10));
        let before = store.to_array();

        let added = leaf(3, 4, 5);
        let id = added.id;
        assert!(store.add(added));
        assert!(store.remove(&id));

        assert_eq!(store.to_array(), before);
        assert!(store.detail(&id).is_none());
        assert!(store.detail(&CompositeId::new(1, 2, 10)).is_some());
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = SelectionStore::default();
        for id in 1..=4 {
            store.add(leaf(1, 1, id));
        }
        store.remove(&CompositeId::new(1, 1, 2));
        assert_eq!(store.to_array(), vec!["1-1-1", "1-1-3", "1-1-4"]);
    }

    #[test]
    fn test_replace_reports_missing_details() {
        let mut store = SelectionStore::default();
        store.add(leaf(1, 2, 10));
        store.add(leaf(1, 2, 11));

        let missing = store.replace(vec![CompositeId::new(1, 2, 10), CompositeId::new(5, 6, 7)]);

        assert_eq!(missing, vec![CompositeId::new(5, 6, 7)]);
        assert!(store.detail(&CompositeId::new(1, 2, 11)).is_none());

        store.absorb_details(vec![leaf(5, 6, 7), leaf(8, 8, 8)]);
        assert!(store.detail(&CompositeId::new(5, 6, 7)).is_some());
        assert!(store.detail(&CompositeId::new(8, 8, 8)).is_none());
    }

    #[test]
    fn test_clear() {
        let mut store = SelectionStore::default();
        assert!(!store.clear());
        store.add(leaf(1, 2, 3));
        assert!(store.clear());
        assert!(store.to_array().is_empty());
    }
}

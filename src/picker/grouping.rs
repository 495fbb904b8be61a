// SPDX-License-Identifier: MPL-2.0

//! Groups the selection by Top then Mid name for compact display.

use super::selection::SelectionStore;
use crate::api::LeafDetail;
use std::collections::{BTreeSet, HashMap};

/// Longest description shown in a badge tooltip.
pub const TOOLTIP_DESCRIPTION_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidGroup<'a> {
    pub name: &'a str,
    pub leaves: Vec<&'a LeafDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopGroup<'a> {
    pub name: &'a str,
    pub mids: Vec<MidGroup<'a>>,
}

impl TopGroup<'_> {
    pub fn count(&self) -> usize {
        self.mids.iter().map(|mid| mid.leaves.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grouping<'a> {
    pub groups: Vec<TopGroup<'a>>,
}

impl Grouping<'_> {
    /// Number of displayable selections.
    pub fn total(&self) -> usize {
        self.groups.iter().map(TopGroup::count).sum()
    }

    pub fn summary(&self) -> String {
        let total = self.total();
        let groups = self.groups.len();
        format!(
            "{} {} across {} top-level {}",
            total,
            if total == 1 { "selection" } else { "selections" },
            groups,
            if groups == 1 { "group" } else { "groups" },
        )
    }

    pub fn top_names(&self) -> BTreeSet<String> {
        self.groups.iter().map(|g| g.name.to_string()).collect()
    }
}

/// Groups the selection in insertion order. Identifiers without a display
/// record are skipped.
pub fn group(store: &SelectionStore) -> Grouping<'_> {
    let mut groups: Vec<TopGroup<'_>> = Vec::new();

    for detail in store.iter().filter_map(|id| store.detail(id)) {
        let index = match groups.iter().position(|g| g.name == detail.top.name) {
            Some(index) => index,
            None => {
                groups.push(TopGroup {
                    name: &detail.top.name,
                    mids: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let top = &mut groups[index];

        match top.mids.iter_mut().find(|m| m.name == detail.mid.name) {
            Some(mid) => mid.leaves.push(detail),
            None => top.mids.push(MidGroup {
                name: &detail.mid.name,
                leaves: vec![detail],
            }),
        }
    }

    Grouping { groups }
}

/// Hover text for a badge: the full path and a shortened description.
pub fn tooltip(detail: &LeafDetail) -> String {
    let path = format!(
        "{} → {} → {}",
        detail.top.name, detail.mid.name, detail.name
    );
    match detail.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => {
            format!("{}\n{}", path, truncate(description, TOOLTIP_DESCRIPTION_CHARS))
        }
        _ => path,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars).collect();
    short.push('…');
    short
}

/// Explicit expand state of a top-level group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupToggle {
    /// Not touched since the last reset: collapsed.
    #[default]
    Default,
    Expanded,
    Collapsed,
}

/// Which top-level groups are expanded.
///
/// Every group starts collapsed. Toggles survive edits that keep the same set
/// of top-level names and are forgotten when that set changes.
#[derive(Debug, Clone, Default)]
pub struct CollapseState {
    known_tops: BTreeSet<String>,
    toggles: HashMap<String, GroupToggle>,
}

impl CollapseState {
    /// Re-derives the state for the current grouping. Returns true if the
    /// toggles were reset.
    pub fn sync(&mut self, grouping: &Grouping<'_>) -> bool {
        let tops = grouping.top_names();
        if tops == self.known_tops {
            return false;
        }
        self.known_tops = tops;
        self.toggles.clear();
        true
    }

    pub fn state(&self, name: &str) -> GroupToggle {
        self.toggles.get(name).copied().unwrap_or_default()
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.state(name) == GroupToggle::Expanded
    }

    pub fn toggle(&mut self, name: &str) {
        let next = if self.is_expanded(name) {
            GroupToggle::Collapsed
        } else {
            GroupToggle::Expanded
        };
        self.toggles.insert(name.to_string(), next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CompositeId, NodeRef, TaxonomyNode};

    fn leaf(top: (u64, &str), mid: (u64, &str), id: u64, name: &str) -> LeafDetail {
        LeafDetail::new(
            NodeRef {
                id: top.0,
                name: top.1.into(),
            },
            NodeRef {
                id: mid.0,
                name: mid.1.into(),
            },
            &TaxonomyNode::new(id, name),
        )
    }

    fn store() -> SelectionStore {
        let mut store = SelectionStore::default();
        store.add(leaf((1, "Science"), (10, "Physics"), 100, "Optics"));
        store.add(leaf((2, "Arts"), (20, "Music"), 200, "Jazz"));
        store.add(leaf((1, "Science"), (11, "Biology"), 110, "Genetics"));
        store.add(leaf((1, "Science"), (10, "Physics"), 101, "Acoustics"));
        store
    }

    #[test]
    fn test_groups_by_top_then_mid() {
        let store = store();
        let grouping = group(&store);

        assert_eq!(grouping.groups.len(), 2);
        let science = &grouping.groups[0];
        assert_eq!(science.name, "Science");
        assert_eq!(science.count(), 3);
        assert_eq!(science.mids[0].name, "Physics");
        assert_eq!(
            science.mids[0].leaves.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
            vec!["Optics", "Acoustics"]
        );
        assert_eq!(grouping.groups[1].name, "Arts");
        assert_eq!(
            grouping.summary(),
            "4 selections across 2 top-level groups"
        );
    }

    #[test]
    fn test_undisplayable_entries_skipped() {
        let mut store = store();
        store.replace(vec![CompositeId::new(1, 10, 100), CompositeId::new(7, 7, 7)]);
        let grouping = group(&store);
        assert_eq!(grouping.total(), 1);
        assert_eq!(grouping.summary(), "1 selection across 1 top-level group");
    }

    #[test]
    fn test_tooltip_truncates_description() {
        let mut detail = leaf((1, "Science"), (10, "Physics"), 100, "Optics");
        assert_eq!(tooltip(&detail), "Science → Physics → Optics");

        detail.description = Some("x".repeat(200));
        let text = tooltip(&detail);
        let second_line = text.lines().nth(1).unwrap();
        assert_eq!(second_line.chars().count(), TOOLTIP_DESCRIPTION_CHARS + 1);
        assert!(second_line.ends_with('…'));
    }

    #[test]
    fn test_groups_start_collapsed() {
        let store = store();
        let mut collapse = CollapseState::default();
        collapse.sync(&group(&store));
        assert!(!collapse.is_expanded("Science"));
        assert!(!collapse.is_expanded("Arts"));
    }

    #[test]
    fn test_toggle_survives_edits_within_same_tops() {
        let mut store = store();
        let mut collapse = CollapseState::default();
        collapse.sync(&group(&store));
        collapse.toggle("Science");
        assert!(collapse.is_expanded("Science"));

        store.remove(&CompositeId::new(1, 10, 101));
        assert!(!collapse.sync(&group(&store)));
        assert!(collapse.is_expanded("Science"));

        collapse.toggle("Science");
        assert_eq!(collapse.state("Science"), GroupToggle::Collapsed);
    }

    #[test]
    fn test_new_top_resets_toggles() {
        let mut store = store();
        let mut collapse = CollapseState::default();
        collapse.sync(&group(&store));
        collapse.toggle("Science");

        store.add(leaf((3, "Law"), (30, "Tax"), 300, "VAT"));
        assert!(collapse.sync(&group(&store)));
        assert_eq!(collapse.state("Science"), GroupToggle::Default);
    }
}

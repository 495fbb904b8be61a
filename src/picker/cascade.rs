// SPDX-License-Identifier: MPL-2.0

//! Cascade navigation state: the chosen Top and Mid nodes and the lists
//! loaded for each level.

use crate::api::{FetchError, LeafDetail, Level, NodeId, TaxonomyNode};

/// Loading state of a level's list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnState {
    /// Nothing requested yet (no parent chosen).
    #[default]
    NotLoaded,
    /// Currently fetching.
    Loading,
    /// Loaded successfully. May be empty.
    Loaded(Vec<TaxonomyNode>),
    /// Failed to load.
    Error(String),
}

impl ColumnState {
    /// Returns true if the list is currently being loaded.
    pub fn is_loading(&self) -> bool {
        matches!(self, ColumnState::Loading)
    }

    /// Returns the loaded nodes, if any.
    pub fn nodes(&self) -> Option<&[TaxonomyNode]> {
        match self {
            ColumnState::Loaded(nodes) => Some(nodes),
            _ => None,
        }
    }
}

/// One level of the cascade: its list, its local filter and the generation
/// of the latest request issued for it.
#[derive(Debug, Clone, Default)]
pub struct LevelColumn {
    pub state: ColumnState,
    pub filter: String,
    generation: u64,
}

impl LevelColumn {
    /// Replaces the list with a loading placeholder and returns the new
    /// request generation.
    fn begin_load(&mut self) -> u64 {
        self.generation = super::next_request_tag();
        self.state = ColumnState::Loading;
        self.filter.clear();
        self.generation
    }

    /// Empties the column. Responses already in flight become stale.
    fn clear(&mut self) {
        self.generation = super::next_request_tag();
        self.state = ColumnState::NotLoaded;
        self.filter.clear();
    }

    /// Applies a response. Returns false if it belongs to an outdated request.
    fn apply(&mut self, generation: u64, result: Result<Vec<TaxonomyNode>, FetchError>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.filter.clear();
        self.state = match result {
            Ok(nodes) => ColumnState::Loaded(nodes),
            Err(e) => ColumnState::Error(e.to_string()),
        };
        true
    }

    /// Loaded nodes that pass the local filter.
    pub fn visible(&self) -> Vec<&TaxonomyNode> {
        let needle = self.filter.trim().to_lowercase();
        self.state
            .nodes()
            .unwrap_or_default()
            .iter()
            .filter(|node| node.matches(&needle))
            .collect()
    }

    pub fn find(&self, id: NodeId) -> Option<&TaxonomyNode> {
        self.state.nodes()?.iter().find(|node| node.id == id)
    }
}

/// A list fetch the caller has to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub level: Level,
    /// Parent node for Mid and Leaf lists.
    pub parent: Option<NodeId>,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Cascade {
    pub top: LevelColumn,
    pub mid: LevelColumn,
    pub leaf: LevelColumn,
    selected_top: Option<NodeId>,
    selected_mid: Option<NodeId>,
    /// Mid to select as soon as its list arrives.
    pending_mid: Option<NodeId>,
}

impl Cascade {
    pub fn column(&self, level: Level) -> &LevelColumn {
        match level {
            Level::Top => &self.top,
            Level::Mid => &self.mid,
            Level::Leaf => &self.leaf,
        }
    }

    fn column_mut(&mut self, level: Level) -> &mut LevelColumn {
        match level {
            Level::Top => &mut self.top,
            Level::Mid => &mut self.mid,
            Level::Leaf => &mut self.leaf,
        }
    }

    pub fn selected_top(&self) -> Option<NodeId> {
        self.selected_top
    }

    pub fn selected_mid(&self) -> Option<NodeId> {
        self.selected_mid
    }

    #[cfg(test)]
    pub fn pending_mid(&self) -> Option<NodeId> {
        self.pending_mid
    }

    /// Starts loading the Top list.
    pub fn load_top(&mut self) -> FetchRequest {
        FetchRequest {
            level: Level::Top,
            parent: None,
            generation: self.top.begin_load(),
        }
    }

    /// Chooses a Top node. Everything below it is reset.
    pub fn select_top(&mut self, id: NodeId) -> FetchRequest {
        self.selected_top = Some(id);
        self.selected_mid = None;
        self.pending_mid = None;
        self.leaf.clear();
        FetchRequest {
            level: Level::Mid,
            parent: Some(id),
            generation: self.mid.begin_load(),
        }
    }

    /// Chooses a Mid node under the current Top.
    pub fn select_mid(&mut self, id: NodeId) -> Option<FetchRequest> {
        self.selected_top?;
        self.selected_mid = Some(id);
        self.pending_mid = None;
        Some(FetchRequest {
            level: Level::Leaf,
            parent: Some(id),
            generation: self.leaf.begin_load(),
        })
    }

    /// Re-points the cascade at the given ancestors. The Mid is selected once
    /// the Top's children have been loaded.
    pub fn follow(&mut self, top: NodeId, mid: NodeId) -> FetchRequest {
        let request = self.select_top(top);
        self.pending_mid = Some(mid);
        request
    }

    /// Applies a list response. May return a follow-up request when a pending
    /// Mid becomes selectable.
    pub fn apply(
        &mut self,
        level: Level,
        generation: u64,
        result: Result<Vec<TaxonomyNode>, FetchError>,
    ) -> Option<FetchRequest> {
        if let Err(ref e) = result {
            tracing::warn!("failed to load {} list: {}", level.as_str(), e);
        }

        if !self.column_mut(level).apply(generation, result) {
            tracing::debug!(
                "discarding stale {} list (generation {})",
                level.as_str(),
                generation
            );
            return None;
        }

        if level != Level::Mid {
            return None;
        }

        let pending = self.pending_mid.take()?;
        if self.mid.find(pending).is_some() {
            self.select_mid(pending)
        } else {
            tracing::debug!("mid {} is not under the selected top", pending);
            None
        }
    }

    /// Reissues the request for a level whose list failed to load.
    pub fn retry(&mut self, level: Level) -> Option<FetchRequest> {
        match level {
            Level::Top => Some(self.load_top()),
            Level::Mid => {
                let top = self.selected_top?;
                Some(FetchRequest {
                    level: Level::Mid,
                    parent: Some(top),
                    generation: self.mid.begin_load(),
                })
            }
            Level::Leaf => {
                let mid = self.selected_mid?;
                Some(FetchRequest {
                    level: Level::Leaf,
                    parent: Some(mid),
                    generation: self.leaf.begin_load(),
                })
            }
        }
    }

    pub fn set_filter(&mut self, level: Level, text: String) {
        self.column_mut(level).filter = text;
    }

    pub fn visible(&self, level: Level) -> Vec<&TaxonomyNode> {
        self.column(level).visible()
    }

    /// Forgets the chosen Top and Mid and their lists. The Top list stays.
    pub fn reset(&mut self) {
        self.selected_top = None;
        self.selected_mid = None;
        self.pending_mid = None;
        self.top.filter.clear();
        self.mid.clear();
        self.leaf.clear();
    }

    /// Builds the display record for a leaf of the current Mid.
    pub fn leaf_detail(&self, leaf: NodeId) -> Option<LeafDetail> {
        let top = self.top.find(self.selected_top?)?;
        let mid = self.mid.find(self.selected_mid?)?;
        let leaf = self.leaf.find(leaf)?;
        Some(LeafDetail::new(top.to_ref(), mid.to_ref(), leaf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[(NodeId, &str)]) -> Vec<TaxonomyNode> {
        ids.iter()
            .map(|(id, name)| TaxonomyNode::new(*id, *name))
            .collect()
    }

    fn loaded_cascade() -> Cascade {
        let mut cascade = Cascade::default();
        let req = cascade.load_top();
        cascade.apply(Level::Top, req.generation, Ok(nodes(&[(1, "Science"), (2, "Arts")])));
        let req = cascade.select_top(1);
        cascade.apply(Level::Mid, req.generation, Ok(nodes(&[(10, "Physics")])));
        let req = cascade.select_mid(10).unwrap();
        cascade.apply(
            Level::Leaf,
            req.generation,
            Ok(nodes(&[(100, "Optics"), (101, "Acoustics")])),
        );
        cascade
    }

    #[test]
    fn test_select_top_resets_dependents() {
        let mut cascade = loaded_cascade();
        cascade.set_filter(Level::Mid, "phy".to_string());
        cascade.set_filter(Level::Leaf, "opt".to_string());

        let req = cascade.select_top(2);

        assert_eq!(req.level, Level::Mid);
        assert_eq!(req.parent, Some(2));
        assert_eq!(cascade.selected_top(), Some(2));
        assert_eq!(cascade.selected_mid(), None);
        assert!(cascade.mid.state.is_loading());
        assert!(cascade.visible(Level::Mid).is_empty());
        assert_eq!(cascade.leaf.state, ColumnState::NotLoaded);
        assert!(cascade.mid.filter.is_empty());
        assert!(cascade.leaf.filter.is_empty());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut cascade = loaded_cascade();
        let first = cascade.select_top(1);
        let second = cascade.select_top(2);

        cascade.apply(Level::Mid, second.generation, Ok(nodes(&[(20, "Painting")])));
        cascade.apply(Level::Mid, first.generation, Ok(nodes(&[(10, "Physics")])));

        let names: Vec<_> = cascade.visible(Level::Mid).iter().map(|n| n.name.clone()).collect();
        assert_eq!(names, vec!["Painting"]);
    }

    #[test]
    fn test_empty_list_differs_from_loading_and_error() {
        let mut cascade = loaded_cascade();
        let req = cascade.select_top(2);
        assert!(cascade.mid.state.is_loading());

        cascade.apply(Level::Mid, req.generation, Ok(Vec::new()));
        assert_eq!(cascade.mid.state, ColumnState::Loaded(Vec::new()));

        let req = cascade.retry(Level::Mid).unwrap();
        cascade.apply(Level::Mid, req.generation, Err(FetchError::TimedOut));
        assert!(matches!(cascade.mid.state, ColumnState::Error(_)));
    }

    #[test]
    fn test_filter_matches_name_and_description() {
        let mut cascade = Cascade::default();
        let req = cascade.load_top();
        cascade.apply(
            Level::Top,
            req.generation,
            Ok(vec![
                TaxonomyNode::new(1, "Chemistry"),
                TaxonomyNode::new(2, "Biology").with_description("Study of LIFE"),
            ]),
        );

        cascade.set_filter(Level::Top, "life".to_string());
        let visible: Vec<_> = cascade.visible(Level::Top).iter().map(|n| n.id).collect();
        assert_eq!(visible, vec![2]);

        cascade.set_filter(Level::Top, "CHEM".to_string());
        let visible: Vec<_> = cascade.visible(Level::Top).iter().map(|n| n.id).collect();
        assert_eq!(visible, vec![1]);
    }

    #[test]
    fn test_filter_resets_when_list_replaced() {
        let mut cascade = loaded_cascade();
        cascade.set_filter(Level::Leaf, "zzz".to_string());
        assert!(cascade.visible(Level::Leaf).is_empty());

        let req = cascade.retry(Level::Leaf).unwrap();
        cascade.apply(Level::Leaf, req.generation, Ok(nodes(&[(100, "Optics")])));
        assert!(cascade.leaf.filter.is_empty());
        assert_eq!(cascade.visible(Level::Leaf).len(), 1);
    }

    #[test]
    fn test_select_mid_requires_top() {
        let mut cascade = Cascade::default();
        assert!(cascade.select_mid(10).is_none());
    }

    #[test]
    fn test_follow_selects_pending_mid_after_load() {
        let mut cascade = loaded_cascade();
        let req = cascade.follow(2, 20);
        assert_eq!(cascade.pending_mid(), Some(20));

        let next = cascade
            .apply(Level::Mid, req.generation, Ok(nodes(&[(20, "Painting")])))
            .unwrap();
        assert_eq!(next.level, Level::Leaf);
        assert_eq!(next.parent, Some(20));
        assert_eq!(cascade.selected_mid(), Some(20));
    }

    #[test]
    fn test_follow_cancelled_by_newer_top() {
        let mut cascade = loaded_cascade();
        let followed = cascade.follow(2, 20);
        let newer = cascade.select_top(1);

        assert!(cascade
            .apply(Level::Mid, followed.generation, Ok(nodes(&[(20, "Painting")])))
            .is_none());
        assert!(cascade
            .apply(Level::Mid, newer.generation, Ok(nodes(&[(10, "Physics")])))
            .is_none());
        assert_eq!(cascade.selected_mid(), None);
    }

    #[test]
    fn test_leaf_detail() {
        let cascade = loaded_cascade();
        let detail = cascade.leaf_detail(101).unwrap();
        assert_eq!(detail.id.to_string(), "1-10-101");
        assert_eq!(detail.top.name, "Science");
        assert_eq!(detail.mid.name, "Physics");
        assert!(cascade.leaf_detail(999).is_none());
    }

    #[test]
    fn test_reset_keeps_top_list() {
        let mut cascade = loaded_cascade();
        cascade.reset();
        assert_eq!(cascade.selected_top(), None);
        assert_eq!(cascade.visible(Level::Top).len(), 2);
        assert_eq!(cascade.mid.state, ColumnState::NotLoaded);
        assert_eq!(cascade.leaf.state, ColumnState::NotLoaded);
    }
}

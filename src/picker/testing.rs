// SPDX-License-Identifier: MPL-2.0

//! In-memory taxonomy for picker tests.

use super::effects::perform;
use super::{Outcome, Picker, PickerEvent};
use crate::api::source::is_searchable;
use crate::api::{
    CompositeId, FetchError, LeafDetail, NodeId, TaxonomyNode, TaxonomySource,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tops: Vec<TaxonomyNode>,
    mids: Vec<(NodeId, TaxonomyNode)>,
    leaves: Vec<(NodeId, TaxonomyNode)>,
    pub fail_lists: Arc<AtomicBool>,
    pub search_calls: Arc<AtomicUsize>,
    pub detail_calls: Arc<AtomicUsize>,
}

impl MemorySource {
    /// Two tops, one mid each:
    /// `Top-1-name / Mid-2-name / {10 Deep Learning, 11 Reinforcement Learning}`
    /// and `Top-3-name / Mid-4-name / {5 Optics}`.
    pub fn sample() -> Self {
        Self {
            tops: vec![
                TaxonomyNode::new(1, "Top-1-name"),
                TaxonomyNode::new(3, "Top-3-name"),
            ],
            mids: vec![
                (1, TaxonomyNode::new(2, "Mid-2-name")),
                (3, TaxonomyNode::new(4, "Mid-4-name")),
            ],
            leaves: vec![
                (
                    2,
                    TaxonomyNode::new(10, "Deep Learning")
                        .with_description("Neural networks with many layers"),
                ),
                (2, TaxonomyNode::new(11, "Reinforcement Learning")),
                (4, TaxonomyNode::new(5, "Optics")),
            ],
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), FetchError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(FetchError::ConnectionFailed("unreachable".into()));
        }
        Ok(())
    }

    fn detail_of(&self, mid_id: NodeId, leaf: &TaxonomyNode) -> Option<LeafDetail> {
        let (top_id, mid) = self.mids.iter().find(|(_, m)| m.id == mid_id)?;
        let top = self.tops.iter().find(|t| t.id == *top_id)?;
        Some(LeafDetail::new(top.to_ref(), mid.to_ref(), leaf))
    }
}

#[async_trait]
impl TaxonomySource for MemorySource {
    async fn list_top(&self) -> Result<Vec<TaxonomyNode>, FetchError> {
        self.check()?;
        Ok(self.tops.clone())
    }

    async fn list_mid(&self, top: NodeId) -> Result<Vec<TaxonomyNode>, FetchError> {
        self.check()?;
        Ok(self
            .mids
            .iter()
            .filter(|(parent, _)| *parent == top)
            .map(|(_, node)| node.clone())
            .collect())
    }

    async fn list_leaf(&self, mid: NodeId) -> Result<Vec<TaxonomyNode>, FetchError> {
        self.check()?;
        Ok(self
            .leaves
            .iter()
            .filter(|(parent, _)| *parent == mid)
            .map(|(_, node)| node.clone())
            .collect())
    }

    async fn search_leaf(&self, query: &str, limit: usize) -> Result<Vec<LeafDetail>, FetchError> {
        if !is_searchable(query) {
            return Ok(Vec::new());
        }
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let needle = query.trim().to_lowercase();
        Ok(self
            .leaves
            .iter()
            .filter(|(_, leaf)| leaf.name.to_lowercase().contains(&needle))
            .filter_map(|(mid, leaf)| self.detail_of(*mid, leaf))
            .take(limit)
            .collect())
    }

    async fn leaf_details(&self, ids: &[CompositeId]) -> Result<Vec<LeafDetail>, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .leaves
            .iter()
            .filter_map(|(mid, leaf)| self.detail_of(*mid, leaf))
            .filter(|detail| ids.contains(&detail.id))
            .collect())
    }
}

/// Runs effects until the picker is idle and returns the emitted events.
pub async fn drive(picker: &mut Picker, source: &MemorySource, outcome: Outcome) -> Vec<PickerEvent> {
    let source: Arc<dyn TaxonomySource> = Arc::new(source.clone());
    let mut events = outcome.events;
    let mut queue: VecDeque<_> = outcome.effects.into();

    while let Some(effect) = queue.pop_front() {
        let message = perform(source.clone(), effect).await;
        let next = picker.update(message);
        queue.extend(next.effects);
        events.extend(next.events);
    }

    events
}

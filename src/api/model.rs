// SPDX-License-Identifier: MPL-2.0

//! Taxonomy data model shared by the client and the picker.

use super::composite::CompositeId;
use serde::{Deserialize, Serialize};

/// Numeric identifier of a node at any level.
pub type NodeId = u64;

/// The three levels of the taxonomy hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Top,
    Mid,
    Leaf,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Top, Level::Mid, Level::Leaf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Top => "top",
            Level::Mid => "mid",
            Level::Leaf => "leaf",
        }
    }
}

/// A node as listed by the taxonomy service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TaxonomyNode {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Case-insensitive substring match over name and description.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }

    pub fn to_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Display-only reference to an ancestor node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: NodeId,
    pub name: String,
}

/// A leaf enriched with its ancestors, used for search results and the
/// selection's detail cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafDetail {
    pub id: CompositeId,
    pub name: String,
    pub description: Option<String>,
    pub top: NodeRef,
    pub mid: NodeRef,
}

impl LeafDetail {
    pub fn new(top: NodeRef, mid: NodeRef, leaf: &TaxonomyNode) -> Self {
        Self {
            id: CompositeId::new(top.id, mid.id, leaf.id),
            name: leaf.name.clone(),
            description: leaf.description.clone(),
            top,
            mid,
        }
    }
}

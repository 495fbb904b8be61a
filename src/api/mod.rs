// SPDX-License-Identifier: MPL-2.0

//! Taxonomy service client and data model.

pub mod composite;
pub mod model;
pub mod source;
pub mod taxonomy;

pub use composite::CompositeId;
pub use model::{LeafDetail, Level, NodeId, NodeRef, TaxonomyNode};
pub use source::{FetchError, TaxonomySource};
pub use taxonomy::{Deployment, LevelLabels, TaxonomyClient};

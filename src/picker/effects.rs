// SPDX-License-Identifier: MPL-2.0

//! Runs picker effects against a taxonomy source.

use super::search::SEARCH_DEBOUNCE;
use super::{Effect, PickerMsg};
use crate::api::{Level, TaxonomySource};
use std::sync::Arc;

/// Performs one effect and returns the message that completes it.
pub async fn perform(source: Arc<dyn TaxonomySource>, effect: Effect) -> PickerMsg {
    match effect {
        Effect::Fetch(request) => {
            let result = match (request.level, request.parent) {
                (Level::Top, _) => source.list_top().await,
                (Level::Mid, Some(top)) => source.list_mid(top).await,
                (Level::Leaf, Some(mid)) => source.list_leaf(mid).await,
                (level, None) => {
                    tracing::warn!("{} list requested without a parent", level.as_str());
                    Ok(Vec::new())
                }
            };
            PickerMsg::ListLoaded {
                level: request.level,
                generation: request.generation,
                result,
            }
        }
        Effect::Debounce(ticket) => {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;
            PickerMsg::SearchDebounced(ticket)
        }
        Effect::Search { request, limit } => {
            tracing::debug!("searching for {:?}", request.query);
            let result = source.search_leaf(&request.query, limit).await;
            PickerMsg::SearchLoaded {
                ticket: request.ticket,
                result,
            }
        }
        Effect::Details(ids) => PickerMsg::DetailsLoaded(source.leaf_details(&ids).await),
    }
}

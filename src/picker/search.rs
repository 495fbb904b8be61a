// SPDX-License-Identifier: MPL-2.0

//! Debounced global search across every leaf.

use super::selection::SelectionStore;
use crate::api::source::is_searchable;
use crate::api::{FetchError, LeafDetail};
use std::time::Duration;

/// Quiet period after the last keystroke before a search is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Hands out tickets; only the most recent one is current.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    ticket: u64,
}

impl Debouncer {
    /// Invalidates every earlier ticket and returns a fresh one.
    pub fn touch(&mut self) -> u64 {
        self.ticket = super::next_request_tag();
        self.ticket
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.ticket == ticket
    }
}

/// A search the caller has to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: u64,
    pub query: String,
}

/// Keys the search box reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Down,
    Up,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Default)]
pub struct GlobalSearch {
    pub query: String,
    pub results: Vec<LeafDetail>,
    pub is_searching: bool,
    pub focused: Option<usize>,
    /// True while the search input is the last control the user typed in.
    /// Navigation keys are only meant for the search while this holds.
    pub has_focus: bool,
    debounce: Debouncer,
}

impl GlobalSearch {
    /// Records a keystroke. The returned ticket must be handed back through
    /// [`GlobalSearch::debounce_elapsed`] once [`SEARCH_DEBOUNCE`] has passed.
    pub fn input(&mut self, query: String) -> u64 {
        self.query = query;
        self.has_focus = true;
        if self.query.trim().is_empty() {
            self.results.clear();
            self.focused = None;
        }
        self.debounce.touch()
    }

    /// Called when a debounce timer fires. Returns the search to send if the
    /// ticket is still current and the query is long enough.
    pub fn debounce_elapsed(&mut self, ticket: u64) -> Option<SearchRequest> {
        if !self.debounce.is_current(ticket) {
            return None;
        }

        if !is_searchable(&self.query) {
            self.results.clear();
            self.focused = None;
            self.is_searching = false;
            return None;
        }

        self.is_searching = true;
        Some(SearchRequest {
            ticket,
            query: self.query.trim().to_string(),
        })
    }

    /// Applies a search response. Responses to superseded queries are ignored,
    /// failures leave an empty result list.
    pub fn apply(&mut self, ticket: u64, result: Result<Vec<LeafDetail>, FetchError>) {
        if !self.debounce.is_current(ticket) {
            tracing::debug!("discarding stale search results (ticket {})", ticket);
            return;
        }

        self.is_searching = false;
        self.focused = None;
        self.results = match result {
            Ok(mut results) => {
                rank(&mut results, &self.query);
                results
            }
            Err(e) => {
                tracing::warn!("search for {:?} failed: {}", self.query, e);
                Vec::new()
            }
        };
    }

    /// Handles a navigation key. Returns the index to commit on `Enter`.
    pub fn key(&mut self, key: SearchKey) -> Option<usize> {
        if key == SearchKey::Escape {
            self.clear();
            return None;
        }

        let len = self.results.len();
        if len == 0 {
            return None;
        }

        match key {
            SearchKey::Down => {
                self.focused = Some(match self.focused {
                    Some(i) if i + 1 < len => i + 1,
                    Some(_) => 0,
                    None => 0,
                });
                None
            }
            SearchKey::Up => {
                self.focused = Some(match self.focused {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                });
                None
            }
            SearchKey::Enter => self.focused.filter(|i| *i < len),
            SearchKey::Escape => None,
        }
    }

    /// Clears query, results and focus. A pending debounce no longer fires.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.focused = None;
        self.is_searching = false;
        self.has_focus = false;
        self.debounce.touch();
    }

    /// Results paired with whether they are already selected.
    pub fn annotated<'a>(
        &'a self,
        selection: &'a SelectionStore,
    ) -> impl Iterator<Item = (&'a LeafDetail, bool)> + 'a {
        self.results
            .iter()
            .map(move |result| (result, selection.contains(&result.id)))
    }
}

/// Orders results: exact (case-insensitive) name match first, then shorter
/// names before longer ones. Ties keep the service's order.
pub fn rank(results: &mut [LeafDetail], query: &str) {
    let query = query.trim().to_lowercase();
    results.sort_by_key(|result| {
        let exact = result.name.to_lowercase() == query;
        (!exact, result.name.chars().count())
    });
}

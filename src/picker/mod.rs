// SPDX-License-Identifier: MPL-2.0

//! Three-level taxonomy picker.
//!
//! The picker combines a cascade navigator (Top → Mid → Leaf lists loaded on
//! demand), a debounced global search over every leaf, and a selection of
//! leaves addressed by [`CompositeId`]. It is independent of any GUI toolkit:
//! the view layer turns user input into [`PickerMsg`] values, feeds them to
//! [`Picker::update`], runs the returned [`Effect`]s with
//! [`effects::perform`] and forwards the resulting messages back.
//!
//! # Example
//!
//! ```ignore
//! let (mut picker, outcome) = Picker::new(options, Deployment::Skills.labels(), 768.0);
//! for effect in outcome.effects {
//!     let msg = effects::perform(source.clone(), effect).await;
//!     let next = picker.update(msg);
//!     // ...
//! }
//! ```

pub mod cascade;
pub mod effects;
pub mod grouping;
pub mod highlight;
pub mod layout;
pub mod search;
pub mod selection;

#[cfg(test)]
mod testing;

use crate::api::source::SEARCH_LIMIT;
use crate::api::{CompositeId, FetchError, LeafDetail, Level, LevelLabels, NodeId, TaxonomyNode};
use cascade::{Cascade, FetchRequest};
use grouping::{CollapseState, Grouping};
use layout::Presentation;
use search::{GlobalSearch, SearchKey, SearchRequest};
use selection::SelectionStore;
use std::sync::atomic::{AtomicU64, Ordering};

/// Returns a request tag no picker in this process has handed out before.
/// Replies addressed to a discarded picker never match its replacement.
pub(crate) fn next_request_tag() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Options supplied by the owning page.
#[derive(Debug, Clone, Default)]
pub struct PickerOptions {
    pub initial_value: Vec<String>,
    pub required: bool,
    pub label: String,
    pub placeholder: String,
}

/// Messages understood by [`Picker::update`].
#[derive(Debug, Clone)]
pub enum PickerMsg {
    Open,
    Done,
    Cancel,
    SelectTop(NodeId),
    SelectMid(NodeId),
    /// Adds or removes a leaf of the current Mid.
    ToggleLeaf(NodeId),
    Filter(Level, String),
    Retry(Level),
    ListLoaded {
        level: Level,
        generation: u64,
        result: Result<Vec<TaxonomyNode>, FetchError>,
    },
    SearchInput(String),
    SearchDebounced(u64),
    SearchLoaded {
        ticket: u64,
        result: Result<Vec<LeafDetail>, FetchError>,
    },
    SearchKey(SearchKey),
    /// Commits the search result at this index.
    SearchPick(usize),
    ToggleSearchOverlay,
    DetailsLoaded(Result<Vec<LeafDetail>, FetchError>),
    Remove(CompositeId),
    ClearAll,
    ToggleGroup(String),
    Resized(f32),
    StepForward,
    StepBack,
    /// The owner replaced the value.
    SetValue(Vec<String>),
}

impl PickerMsg {
    /// Messages produced by controls other than the search input.
    fn leaves_search(&self) -> bool {
        matches!(
            self,
            PickerMsg::SelectTop(_)
                | PickerMsg::SelectMid(_)
                | PickerMsg::ToggleLeaf(_)
                | PickerMsg::Filter(..)
                | PickerMsg::Retry(_)
                | PickerMsg::Remove(_)
                | PickerMsg::ClearAll
                | PickerMsg::ToggleGroup(_)
                | PickerMsg::StepForward
                | PickerMsg::StepBack
        )
    }
}

/// Asynchronous work requested by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchRequest),
    Debounce(u64),
    Search { request: SearchRequest, limit: usize },
    Details(Vec<CompositeId>),
}

/// Notifications for the owning page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// The selection changed; carries the full new value.
    Changed(Vec<String>),
    /// The user finished; carries the final value.
    Done(Vec<String>),
    Cancelled,
}

/// What an update produced.
#[derive(Debug, Default)]
pub struct Outcome {
    pub effects: Vec<Effect>,
    pub events: Vec<PickerEvent>,
}

impl Outcome {
    pub fn none() -> Self {
        Self::default()
    }

    fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            events: Vec::new(),
        }
    }

    fn fetch(request: Option<FetchRequest>) -> Self {
        request.map_or_else(Self::none, |r| Self::effect(Effect::Fetch(r)))
    }

    fn event(event: PickerEvent) -> Self {
        Self {
            effects: Vec::new(),
            events: vec![event],
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Picker {
    pub options: PickerOptions,
    pub labels: LevelLabels,
    pub cascade: Cascade,
    pub search: GlobalSearch,
    pub selection: SelectionStore,
    pub collapse: CollapseState,
    pub presentation: Presentation,
    pub is_open: bool,
    search_limit: usize,
}

impl Picker {
    /// Creates the picker and requests the Top list plus display records for
    /// the initial value.
    pub fn new(options: PickerOptions, labels: LevelLabels, breakpoint: f32) -> (Self, Outcome) {
        let initial = CompositeId::parse_all(&options.initial_value);
        let mut picker = Self {
            options,
            labels,
            cascade: Cascade::default(),
            search: GlobalSearch::default(),
            selection: SelectionStore::default(),
            collapse: CollapseState::default(),
            presentation: Presentation::new(breakpoint),
            is_open: false,
            search_limit: SEARCH_LIMIT,
        };

        let mut outcome = Outcome::effect(Effect::Fetch(picker.cascade.load_top()));
        let missing = picker.selection.replace(initial);
        if !missing.is_empty() {
            outcome = outcome.with_effect(Effect::Details(missing));
        }
        picker.sync_collapse();

        (picker, outcome)
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    /// The current value as seen by the owner.
    pub fn value(&self) -> Vec<String> {
        self.selection.to_array()
    }

    /// True if the leaf of the current Mid is selected.
    pub fn is_checked(&self, leaf: NodeId) -> bool {
        match (self.cascade.selected_top(), self.cascade.selected_mid()) {
            (Some(top), Some(mid)) => self.selection.contains(&CompositeId::new(top, mid, leaf)),
            _ => false,
        }
    }

    pub fn grouping(&self) -> Grouping<'_> {
        grouping::group(&self.selection)
    }

    pub fn update(&mut self, message: PickerMsg) -> Outcome {
        if message.leaves_search() {
            self.search.has_focus = false;
        }
        let outcome = self.handle(message);
        self.sync_collapse();
        outcome
    }

    fn handle(&mut self, message: PickerMsg) -> Outcome {
        match message {
            PickerMsg::Open => {
                self.is_open = true;
                let top = &self.cascade.top.state;
                if !top.is_loading() && top.nodes().is_none() {
                    return Outcome::effect(Effect::Fetch(self.cascade.load_top()));
                }
            }

            PickerMsg::Done => {
                self.is_open = false;
                self.search.clear();
                return Outcome::event(PickerEvent::Done(self.value()));
            }

            PickerMsg::Cancel => {
                // Selections are committed immediately; only navigation is discarded.
                self.is_open = false;
                self.cascade.reset();
                self.search.clear();
                self.presentation.wizard.reset();
                return Outcome::event(PickerEvent::Cancelled);
            }

            PickerMsg::SelectTop(id) => {
                let request = self.cascade.select_top(id);
                if self.presentation.is_compact() {
                    self.presentation.wizard.advance(&self.cascade);
                }
                return Outcome::effect(Effect::Fetch(request));
            }

            PickerMsg::SelectMid(id) => {
                let request = self.cascade.select_mid(id);
                if request.is_some() && self.presentation.is_compact() {
                    self.presentation.wizard.advance(&self.cascade);
                }
                return Outcome::fetch(request);
            }

            PickerMsg::ToggleLeaf(leaf) => return self.toggle_leaf(leaf),

            PickerMsg::Filter(level, text) => self.cascade.set_filter(level, text),

            PickerMsg::Retry(level) => return Outcome::fetch(self.cascade.retry(level)),

            PickerMsg::ListLoaded {
                level,
                generation,
                result,
            } => return Outcome::fetch(self.cascade.apply(level, generation, result)),

            PickerMsg::SearchInput(query) => {
                let ticket = self.search.input(query);
                return Outcome::effect(Effect::Debounce(ticket));
            }

            PickerMsg::SearchDebounced(ticket) => {
                if let Some(request) = self.search.debounce_elapsed(ticket) {
                    return Outcome::effect(Effect::Search {
                        request,
                        limit: self.search_limit,
                    });
                }
            }

            PickerMsg::SearchLoaded { ticket, result } => self.search.apply(ticket, result),

            PickerMsg::SearchKey(key) => {
                if !self.search.has_focus {
                    return Outcome::none();
                }
                if let Some(index) = self.search.key(key) {
                    return self.pick_result(index);
                }
            }

            PickerMsg::SearchPick(index) => return self.pick_result(index),

            PickerMsg::ToggleSearchOverlay => self.presentation.wizard.toggle_search(),

            PickerMsg::DetailsLoaded(result) => match result {
                Ok(details) => self.selection.absorb_details(details),
                Err(e) => tracing::warn!("failed to load selection details: {}", e),
            },

            PickerMsg::Remove(id) => {
                if self.selection.remove(&id) {
                    return self.changed();
                }
            }

            PickerMsg::ClearAll => {
                if self.selection.clear() {
                    return self.changed();
                }
            }

            PickerMsg::ToggleGroup(name) => self.collapse.toggle(&name),

            PickerMsg::Resized(width) => {
                self.presentation.resize(width);
            }

            PickerMsg::StepForward => {
                self.presentation.wizard.advance(&self.cascade);
            }

            PickerMsg::StepBack => {
                self.presentation.wizard.back();
            }

            PickerMsg::SetValue(values) => {
                let ids = CompositeId::parse_all(&values);
                if self.selection.same_as(&ids) {
                    return Outcome::none();
                }
                let missing = self.selection.replace(ids);
                if !missing.is_empty() {
                    return Outcome::effect(Effect::Details(missing));
                }
            }
        }

        Outcome::none()
    }

    fn changed(&self) -> Outcome {
        Outcome::event(PickerEvent::Changed(self.value()))
    }

    fn toggle_leaf(&mut self, leaf: NodeId) -> Outcome {
        let (Some(top), Some(mid)) = (self.cascade.selected_top(), self.cascade.selected_mid())
        else {
            return Outcome::none();
        };

        let id = CompositeId::new(top, mid, leaf);
        if self.selection.remove(&id) {
            return self.changed();
        }

        match self.cascade.leaf_detail(leaf) {
            Some(detail) => {
                self.selection.add(detail);
                self.changed()
            }
            None => {
                tracing::warn!("leaf {} is not in the loaded list", id);
                Outcome::none()
            }
        }
    }

    fn pick_result(&mut self, index: usize) -> Outcome {
        let Some(result) = self.search.results.get(index).cloned() else {
            return Outcome::none();
        };
        if self.selection.contains(&result.id) {
            return Outcome::none();
        }

        let (top, mid, _) = result.id.decompose();
        let request = self.cascade.follow(top, mid);
        self.selection.add(result);
        self.search.clear();
        self.presentation.wizard.jump_to_leaf();

        self.changed().with_effect(Effect::Fetch(request))
    }

    fn sync_collapse(&mut self) {
        self.collapse.sync(&grouping::group(&self.selection));
    }
}

// SPDX-License-Identifier: MPL-2.0

//! Desktop/compact layout selection and the compact step wizard.

use super::cascade::Cascade;
use crate::api::Level;

/// Window width (logical pixels) below which the compact layout is used.
pub const COMPACT_BREAKPOINT: f32 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Three columns side by side plus a search panel.
    #[default]
    Desktop,
    /// One level at a time, search as an overlay.
    Compact,
}

impl LayoutMode {
    pub fn for_width(width: f32, breakpoint: f32) -> Self {
        if width < breakpoint {
            LayoutMode::Compact
        } else {
            LayoutMode::Desktop
        }
    }

    pub fn is_compact(&self) -> bool {
        matches!(self, LayoutMode::Compact)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Top,
    Mid,
    Leaf,
}

impl WizardStep {
    /// 1-based step number for the step counter.
    pub fn number(&self) -> usize {
        match self {
            WizardStep::Top => 1,
            WizardStep::Mid => 2,
            WizardStep::Leaf => 3,
        }
    }

    pub const COUNT: usize = 3;

    /// The taxonomy level chosen at this step.
    pub fn level(&self) -> Level {
        match self {
            WizardStep::Top => Level::Top,
            WizardStep::Mid => Level::Mid,
            WizardStep::Leaf => Level::Leaf,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    pub step: WizardStep,
    pub search_overlay: bool,
}

impl Wizard {
    /// Forward is only possible once the current step has its selection.
    pub fn can_advance(&self, cascade: &Cascade) -> bool {
        match self.step {
            WizardStep::Top => cascade.selected_top().is_some(),
            WizardStep::Mid => cascade.selected_mid().is_some(),
            WizardStep::Leaf => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.step != WizardStep::Top
    }

    /// Moves one step forward if allowed. Returns true if the step changed.
    pub fn advance(&mut self, cascade: &Cascade) -> bool {
        if !self.can_advance(cascade) {
            return false;
        }
        self.step = match self.step {
            WizardStep::Top => WizardStep::Mid,
            WizardStep::Mid | WizardStep::Leaf => WizardStep::Leaf,
        };
        true
    }

    pub fn back(&mut self) -> bool {
        let previous = match self.step {
            WizardStep::Top => return false,
            WizardStep::Mid => WizardStep::Top,
            WizardStep::Leaf => WizardStep::Mid,
        };
        self.step = previous;
        true
    }

    /// A global search selection lands the wizard on the leaf step.
    pub fn jump_to_leaf(&mut self) {
        self.step = WizardStep::Leaf;
        self.search_overlay = false;
    }

    pub fn toggle_search(&mut self) {
        self.search_overlay = !self.search_overlay;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Chooses the layout from the window width.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub mode: LayoutMode,
    pub breakpoint: f32,
    pub wizard: Wizard,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new(COMPACT_BREAKPOINT)
    }
}

impl Presentation {
    pub fn new(breakpoint: f32) -> Self {
        Self {
            mode: LayoutMode::Desktop,
            breakpoint,
            wizard: Wizard::default(),
        }
    }

    /// Re-evaluates the layout. Returns true if the mode changed.
    pub fn resize(&mut self, width: f32) -> bool {
        let mode = LayoutMode::for_width(width, self.breakpoint);
        if mode == self.mode {
            return false;
        }
        tracing::debug!("layout changed to {:?} at width {}", mode, width);
        self.mode = mode;
        true
    }

    pub fn is_compact(&self) -> bool {
        self.mode.is_compact()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TaxonomyNode;

    #[test]
    fn test_mode_from_width() {
        let mut presentation = Presentation::default();
        assert!(!presentation.resize(1200.0));
        assert!(presentation.resize(500.0));
        assert!(presentation.is_compact());
        assert!(!presentation.resize(767.0));
        assert!(presentation.resize(768.0));
        assert_eq!(presentation.mode, LayoutMode::Desktop);
    }

    #[test]
    fn test_step_guard_for_any_sequence() {
        let mut cascade = Cascade::default();
        let mut wizard = Wizard::default();

        for _ in 0..3 {
            assert!(!wizard.advance(&cascade));
            assert_eq!(wizard.step, WizardStep::Top);
        }

        let req = cascade.load_top();
        cascade.apply(Level::Top, req.generation, Ok(vec![TaxonomyNode::new(1, "Science")]));
        cascade.select_top(1);
        assert!(wizard.advance(&cascade));
        assert_eq!(wizard.step, WizardStep::Mid);

        for _ in 0..3 {
            assert!(!wizard.advance(&cascade));
            assert_eq!(wizard.step, WizardStep::Mid);
        }

        cascade.select_mid(10);
        assert!(wizard.advance(&cascade));
        assert_eq!(wizard.step.number(), 3);
        assert!(!wizard.advance(&cascade));

        assert!(wizard.back());
        assert!(wizard.back());
        assert!(!wizard.back());
        assert_eq!(wizard.step, WizardStep::Top);
    }

    #[test]
    fn test_guard_after_top_change() {
        let mut cascade = Cascade::default();
        let mut wizard = Wizard::default();
        cascade.select_top(1);
        cascade.select_mid(10);
        wizard.advance(&cascade);

        // A new Top clears the Mid, so step 3 is out of reach again.
        cascade.select_top(2);
        assert!(!wizard.advance(&cascade));
    }

    #[test]
    fn test_jump_to_leaf_closes_overlay() {
        let mut wizard = Wizard::default();
        wizard.toggle_search();
        wizard.jump_to_leaf();
        assert_eq!(wizard.step, WizardStep::Leaf);
        assert!(!wizard.search_overlay);
    }
}

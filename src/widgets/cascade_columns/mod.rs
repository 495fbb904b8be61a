// SPDX-License-Identifier: MPL-2.0

//! Cascade columns widget for the three taxonomy levels.
//!
//! Each column shows one level of the [`Cascade`](crate::picker::cascade::Cascade):
//! a header, a filter box and the loaded list. Choosing a node in one column
//! fills the next one. In the compact layout a single column is shown at a
//! time.
//!
//! # Example
//!
//! ```ignore
//! use crate::widgets::cascade_columns::CascadeColumns;
//!
//! // Desktop: all three columns side by side
//! CascadeColumns::new(&picker.cascade, picker.labels, Message::Picker)
//!     .is_checked(|leaf| picker.is_checked(leaf))
//!     .column_width(Length::FillPortion(1))
//!     .into()
//!
//! // Compact: only the current wizard step
//! CascadeColumns::new(&picker.cascade, picker.labels, Message::Picker)
//!     .only(Level::Mid)
//!     .into()
//! ```

mod widget;

pub use widget::CascadeColumns;

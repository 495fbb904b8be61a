// SPDX-License-Identifier: MPL-2.0

//! Page view modules for the taxonomy picker application.
//! Each module contains the view logic for a specific page or part of one.

pub mod field;
pub mod picker;
pub mod selection;
pub mod settings;
pub mod widgets;

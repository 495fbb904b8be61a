// SPDX-License-Identifier: MPL-2.0

//! Custom widgets for the taxonomy picker application.

pub mod cascade_columns;

//! Web-facing components.
//!
//! Page rendering for everything the browser sees.

pub mod ui;

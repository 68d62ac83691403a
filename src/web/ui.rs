//! UI rendering.
//!
//! Provides the fixed page shell and the body fragments inserted into it.

mod pages;

pub use pages::{MessageClass, error_page, home_page, render_page, result_page};

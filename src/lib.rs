//! Library definitions.
//!
//! Exports the configuration, game routing, and page rendering modules.

pub mod config;
pub mod core;
pub mod web;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use config::{Config, GameError, Result};
pub use crate::core::cookie::{TARGET_COOKIE_NAME, cookie_value, format_set_cookie};
pub use crate::core::response::{HttpResponse, parse_form};
pub use crate::core::router::{GameRouter, GuessOutcome, judge};
pub use crate::core::server::{ParsedRequest, run_listener};
pub use web::ui::MessageClass;

//! Request routing and game logic.
//!
//! Dispatches requests between the home and guess handlers. The home
//! handler starts a round by drawing a fresh secret into the client
//! cookie; the guess handler validates the submission and compares it
//! against the cookie value.

use crate::config::{Config, GameError, Result};
use crate::core::cookie::{TARGET_COOKIE_NAME, cookie_value, format_set_cookie};
use crate::core::response::{HttpResponse, parse_form};
use crate::core::server::ParsedRequest;
use crate::web::ui;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, error};

const GUESS_PATH: &str = "/guess";
const HOME_PATH: &str = "/";

const SECRET_MIN: i64 = 1;
const SECRET_MAX: i64 = 100;

/// Verdict for a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    TooHigh,
    TooLow,
    Correct,
}

impl GuessOutcome {
    /// Message shown to the player.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::TooHigh => "太大了！",
            Self::TooLow => "太小了！",
            Self::Correct => "恭喜猜对！",
        }
    }

    /// Visual class of the message box.
    #[must_use]
    pub const fn class(self) -> ui::MessageClass {
        match self {
            Self::Correct => ui::MessageClass::Success,
            Self::TooHigh | Self::TooLow => ui::MessageClass::Error,
        }
    }
}

/// Compares a guess against the secret.
#[must_use]
pub fn judge(guess: i64, secret: i64) -> GuessOutcome {
    match guess.cmp(&secret) {
        Ordering::Greater => GuessOutcome::TooHigh,
        Ordering::Less => GuessOutcome::TooLow,
        Ordering::Equal => GuessOutcome::Correct,
    }
}

/// Router for the two game routes.
pub struct GameRouter {
    config: Arc<Config>,
}

impl GameRouter {
    /// Creates a new `GameRouter`.
    #[must_use]
    pub const fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Handles one parsed request and produces the response.
    ///
    /// `/guess` goes to the guess handler; every other path starts a
    /// fresh round, whatever the method.
    #[must_use]
    pub fn handle_request(&self, request: &ParsedRequest) -> HttpResponse {
        if request.path == GUESS_PATH {
            match self.handle_guess(request) {
                Ok(response) => response,
                Err(e) => response_for(&e),
            }
        } else {
            self.handle_home(request)
        }
    }

    /// Starts a round: draws a secret and binds it to the client.
    ///
    /// Any prior secret the client held is overwritten by the new
    /// cookie.
    fn handle_home(&self, request: &ParsedRequest) -> HttpResponse {
        let secret = rand::rng().random_range(SECRET_MIN..=SECRET_MAX);
        let cookie = format_set_cookie(
            TARGET_COOKIE_NAME,
            &secret.to_string(),
            self.config.cookie_max_age_secs,
        );

        debug!(path = %request.path, secret, "Round started");
        HttpResponse::html(200, ui::home_page()).with_cookie(cookie)
    }

    /// Evaluates a guess submission.
    ///
    /// # Errors
    ///
    /// `MethodNotAllowed` for non-POST requests, `BadRequest` when the
    /// body or the `number` field does not parse, `MissingSession` when
    /// the cookie is absent or corrupt (mapped to a redirect home).
    fn handle_guess(&self, request: &ParsedRequest) -> Result<HttpResponse> {
        if request.method != "POST" {
            return Err(GameError::MethodNotAllowed);
        }

        let form = parse_form(&request.body)?;
        let guess: i64 = form
            .get("number")
            .map_or("", String::as_str)
            .parse()
            .map_err(|_| GameError::BadRequest("请输入有效的数字".to_string()))?;

        let cookie_header = request.cookie.as_deref().ok_or(GameError::MissingSession)?;
        let value =
            cookie_value(cookie_header, TARGET_COOKIE_NAME).ok_or(GameError::MissingSession)?;
        let secret: i64 = value.parse().map_err(|_| GameError::MissingSession)?;

        let outcome = judge(guess, secret);
        debug!(guess, secret, outcome = ?outcome, "Guess evaluated");

        Ok(HttpResponse::html(
            200,
            ui::result_page(outcome.class(), outcome.message()),
        ))
    }
}

/// Maps a handler error onto its HTTP response.
///
/// A missing or corrupt session is recoverable: the client is sent back
/// to the home route to start over instead of seeing an error.
#[must_use]
pub fn response_for(err: &GameError) -> HttpResponse {
    match err {
        GameError::MethodNotAllowed => HttpResponse::html(405, ui::error_page("方法不允许")),
        GameError::BadRequest(message) => HttpResponse::html(400, ui::error_page(message)),
        GameError::PayloadTooLarge => HttpResponse::html(413, ui::error_page("请求体过大")),
        GameError::MissingSession => HttpResponse::redirect(HOME_PATH),
        GameError::Io(e) => {
            error!(error = %e, "I/O error while handling request");
            HttpResponse::html(500, ui::error_page("服务器内部错误"))
        }
    }
}

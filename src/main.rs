//! `numguess` - cookie-backed number guessing web game.
//!
//! Initializes the application runtime, loads configuration, sets up logging,
//! and launches the HTTP listener.

use numguess::{Config, run_listener};

use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    dotenvy::dotenv().ok();

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let config = Config::from_env();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(non_blocking);

    if config.log_format.eq_ignore_ascii_case("pretty") {
        subscriber.init();
    } else {
        subscriber.json().init();
    }

    info!(
        listen_addr = %config.listen_addr,
        cookie_max_age_secs = config.cookie_max_age_secs,
        concurrency_limit = config.concurrency_limit,
        log_format = %config.log_format,
        "Server initialized"
    );

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    rt.block_on(run_listener(config));
}

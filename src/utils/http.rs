//! Shared HTTP client construction.

use crate::constants::CONNECT_TIMEOUT;
use std::time::Duration;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] whose requests are bounded by `timeout`.
///
/// The timeout covers the whole request including the body, so a stalled
/// peer can never hang the process.
///
/// # Errors
///
/// Fails only if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

//! Shared HTTP Client Module
//!
//! Provides a global, lazy-initialized HTTP client for generation requests.
//! Every pipeline run reuses the same connection pool instead of building a
//! new client per file.
//!
//! No request timeout is configured: a generation call waits for as long as
//! the transport allows.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for generation API calls
///
/// - A handful of idle connections per host (requests are sequential)
/// - 90s idle timeout so the 1s pacing between files keeps the connection warm
/// - TCP keepalive for long-running generations
pub static GENERATION_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create generation HTTP client")
});

/// Get the global generation HTTP client
///
/// The client is created on first access and reused for all subsequent calls.
#[inline]
pub fn generation_client() -> &'static Client {
    &GENERATION_CLIENT
}

//! Construction of the shared HTTP client with timeout and retry middleware
//! for handling transient errors, such as network issues or rate limiting.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{Jitter, RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{HttpClientConfig, JitterSetting};

/// Builds the HTTP client used for alert polling and webhook delivery.
///
/// The client applies a bounded total timeout to every request and retries
/// transient failures with exponential backoff according to the configured
/// policy.
pub fn build_http_client(
    config: &HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let base_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(config.max_idle_per_host)
        .build()?;

    let policy_builder = match config.retry.jitter {
        JitterSetting::None => ExponentialBackoff::builder().jitter(Jitter::None),
        JitterSetting::Full => ExponentialBackoff::builder().jitter(Jitter::Full),
    };

    let retry_policy = policy_builder
        .base(config.retry.base_for_backoff)
        .retry_bounds(config.retry.initial_backoff_ms, config.retry.max_backoff_secs)
        .build_with_max_retries(config.retry.max_retries);

    Ok(ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

//! HTTP GET with retry and timeout middleware.
//!
//! Index requests go through a [`seatbelt`] stack: each attempt is bounded by a timeout,
//! and transport failures, timeouts, 5xx responses and 429 responses are retried with
//! exponential backoff. A 429 waits for its `Retry-After` instead of the backoff delay.
//! Once the attempts are used up the last response is returned as is, so the caller
//! still sees the final status.

use crate::Result;
use core::time::Duration;
use layered::{Execute, Service, Stack};
use ohno::app_err;
use reqwest::StatusCode;
use seatbelt::retry::{Backoff, Retry};
use seatbelt::timeout::Timeout;
use seatbelt::{RecoveryInfo, ResilienceContext};
use tick::Clock;

const LOG_TARGET: &str = "      http";

/// Maximum retry attempts (on top of the original request).
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Wait applied to a 429 response without a usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Parse the `Retry-After` header value as seconds.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())?
        .trim()
        .parse::<u64>()
        .ok()
}

/// Classify an HTTP outcome for retry purposes.
fn should_retry_response(result: &Result<reqwest::Response>) -> RecoveryInfo {
    match result {
        // Connection errors and timeouts.
        Err(_) => RecoveryInfo::retry(),

        Ok(resp) if resp.status().is_server_error() => RecoveryInfo::retry(),

        Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
            let delay = parse_retry_after(resp.headers()).unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            RecoveryInfo::retry().delay(Duration::from_secs(delay))
        }

        // Success, and client errors such as 404, are final.
        _ => RecoveryInfo::never(),
    }
}

/// Send a GET request to `url`, retrying transient failures.
///
/// `timeout` bounds each attempt, and `base_delay` is the first backoff step.
pub async fn resilient_get(client: &reqwest::Client, url: &str, timeout: Duration, base_delay: Duration) -> Result<reqwest::Response> {
    let clock = Clock::new_tokio();
    let context = ResilienceContext::new(&clock).name("index_get");

    let client = client.clone();
    let service = (
        Retry::layer("retry", &context)
            .clone_input()
            .recovery_with(|result: &Result<reqwest::Response>, _| should_retry_response(result))
            .max_retry_attempts(MAX_RETRY_ATTEMPTS)
            .base_delay(base_delay)
            .backoff(Backoff::Exponential)
            .on_retry(|output, args| {
                let cause = match output {
                    Ok(resp) => resp.status().to_string(),
                    Err(e) => format!("{e:#}"),
                };
                log::debug!(
                    target: LOG_TARGET,
                    "Retrying GET after {cause} (attempt {}, delay {}ms)",
                    args.attempt().index() + 1,
                    args.retry_delay().as_millis(),
                );
            }),
        Timeout::layer("timeout", &context)
            .timeout_error(move |_| app_err!("HTTP request timed out after {timeout:?}"))
            .timeout(timeout),
        Execute::new(move |url: String| {
            let client = client.clone();
            async move { client.get(&url).send().await.map_err(ohno::AppError::from) }
        }),
    )
        .into_service();

    service.execute(url.to_string()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        _ = headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(parse_retry_after(&headers), Some(7));

        _ = headers.insert(RETRY_AFTER, HeaderValue::from_static(" 12 "));
        assert_eq!(parse_retry_after(&headers), Some(12));

        _ = headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_transport_errors_are_retried() {
        let info = should_retry_response(&Err(app_err!("connection reset")));
        assert_eq!(info, RecoveryInfo::retry());
    }
}

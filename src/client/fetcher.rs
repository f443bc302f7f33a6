//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the client, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests returning text, JSON, or raw bytes
//! - Error classification into `XkcdError`
//!
//! There is no retry logic: a failed request is reported to the caller as is.

use crate::config::UserAgentConfig;
use crate::{Result, XkcdError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout covering connect, send and body read
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use xkcd_ripple::client::build_http_client;
/// use xkcd_ripple::config::UserAgentConfig;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a GET request and maps transport failures and non-2xx statuses
async fn get(client: &Client, url: &Url) -> Result<Response> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(XkcdError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// Classifies a reqwest error the same way for every request helper
fn classify_error(url: &Url, error: reqwest::Error) -> XkcdError {
    if error.is_timeout() {
        XkcdError::Timeout {
            url: url.to_string(),
        }
    } else {
        XkcdError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Fetches a URL and returns its body as text
pub async fn fetch_text(client: &Client, url: &Url) -> Result<String> {
    let response = get(client, url).await?;
    response.text().await.map_err(|e| classify_error(url, e))
}

/// Fetches a page and returns its body with the URL it was finally served from
///
/// Redirects are followed, so the returned URL is the one relative links on
/// the page resolve against.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<(String, Url)> {
    let response = get(client, url).await?;
    let final_url = response.url().clone();
    if final_url != *url {
        tracing::debug!("{} redirected to {}", url, final_url);
    }
    let body = response.text().await.map_err(|e| classify_error(url, e))?;
    Ok((body, final_url))
}

/// Fetches a URL and deserializes its JSON body
///
/// Decoding failures, including missing required fields, surface as
/// `XkcdError::Parse`.
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &Url) -> Result<T> {
    let body = fetch_text(client, url).await?;
    serde_json::from_str(&body).map_err(|e| XkcdError::Parse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Fetches a URL and returns the raw body bytes
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>> {
    let response = get(client, url).await?;
    let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
    Ok(bytes.to_vec())
}

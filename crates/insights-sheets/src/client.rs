//! HTTP client for the Google Sheets v4 REST API.
//!
//! Wraps `reqwest` with bearer-token auth, URL construction for A1 ranges and
//! typed error mapping. Endpoint methods live in [`crate::values`].

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::auth::SheetsAuth;
use crate::error::SheetsError;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/";

/// Everything except RFC 3986 unreserved characters is escaped in a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the Sheets `values` endpoints.
///
/// Use [`SheetsClient::new`] for production or [`SheetsClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug)]
pub struct SheetsClient {
    client: Client,
    auth: SheetsAuth,
    base_url: Url,
}

impl SheetsClient {
    /// Creates a new client pointed at the production Sheets API.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(auth: SheetsAuth, timeout_secs: u64) -> Result<Self, SheetsError> {
        Self::with_base_url(auth, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SheetsError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        auth: SheetsAuth,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("insights/0.1 (post-insights-report)")
            .build()?;

        // Exactly one trailing slash so joined paths land under the root.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SheetsError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            auth,
            base_url,
        })
    }

    /// Builds `v4/spreadsheets/{id}/values/{range}` with the range
    /// percent-encoded as a single path segment, plus query parameters.
    pub(crate) fn build_values_url(
        &self,
        spreadsheet_id: &str,
        range: &str,
        query: &[(&str, &str)],
    ) -> Result<Url, SheetsError> {
        let path = format!(
            "v4/spreadsheets/{}/values/{}",
            utf8_percent_encode(spreadsheet_id, SEGMENT),
            utf8_percent_encode(range, SEGMENT),
        );
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| SheetsError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request and deserializes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::NotFound`] on 404, [`SheetsError::UnexpectedStatus`]
    /// on any other non-2xx status, [`SheetsError::Http`] on network failure and
    /// [`SheetsError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, SheetsError> {
        let token = self.auth.bearer_token().await?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(url, response).await
    }

    /// Sends a PUT request with a JSON body and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`SheetsClient::get_json`].
    pub(crate) async fn put_json<B, T>(&self, url: &Url, body: &B) -> Result<T, SheetsError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.auth.bearer_token().await?;
        let response = self
            .client
            .put(url.clone())
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(
        url: &Url,
        response: reqwest::Response,
    ) -> Result<T, SheetsError> {
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(SheetsError::NotFound {
                url: redact_query(url),
            });
        }
        if !status.is_success() {
            return Err(SheetsError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_query(url),
                body: truncate(&body, 300),
            });
        }

        serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
            context: redact_query(url),
            source: e,
        })
    }
}

fn redact_query(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

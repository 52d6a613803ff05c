//! HTTP fetch layer for the upstream ACS site.

use std::future::Future;
use std::time::Duration;

use acs_core::AppConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use reqwest::{Client, Response, Url};

use crate::error::AcsError;
use crate::retry::retry_with_backoff;

const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "fa-IR,fa;q=0.9,en;q=0.8";

/// Settings for [`AcsClient`]; normally derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub attempt_timeout_ms: u64,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub revalidate_secs: u64,
    pub user_agent: String,
    pub skip_network: bool,
}

impl ClientOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            attempt_timeout_ms: config.fetch_timeout_ms,
            max_attempts: config.fetch_max_attempts,
            backoff_base_ms: config.fetch_backoff_ms,
            revalidate_secs: config.revalidate_secs,
            user_agent: config.user_agent.clone(),
            skip_network: config.skip_network,
        }
    }
}

/// Per-call overrides for [`AcsClient::fetch_with_retry`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Merged over the default headers; caller values win per key.
    pub headers: HeaderMap,
    /// Revalidation hint in seconds; `None` uses the client default.
    pub revalidate_secs: Option<u64>,
}

/// Retrying HTML client bound to one upstream base URL.
///
/// Each attempt carries its own timeout. Failed attempts back off linearly
/// (`backoff_base_ms * attempt`) and the last error is returned once
/// `max_attempts` is exhausted. When `skip_network` is set every call fails
/// with [`AcsError::FetchSkipped`] before any request is built.
#[derive(Debug, Clone)]
pub struct AcsClient {
    client: Client,
    base_url: Url,
    attempt_timeout: Duration,
    max_attempts: u32,
    backoff_base_ms: u64,
    revalidate_secs: u64,
    user_agent: HeaderValue,
    skip_network: bool,
}

impl AcsClient {
    /// # Errors
    ///
    /// - [`AcsError::InvalidUrl`] if `base_url` is not an absolute URL.
    /// - [`AcsError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(options: ClientOptions) -> Result<Self, AcsError> {
        let base_url = Url::parse(&options.base_url).map_err(|e| AcsError::InvalidUrl {
            url: options.base_url.clone(),
            reason: e.to_string(),
        })?;
        let user_agent = HeaderValue::from_str(&options.user_agent).unwrap_or_else(|_| {
            tracing::warn!(
                user_agent = options.user_agent,
                "user agent is not a valid header value, using default"
            );
            HeaderValue::from_static(acs_core::config::DEFAULT_USER_AGENT)
        });
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url,
            attempt_timeout: Duration::from_millis(options.attempt_timeout_ms),
            max_attempts: options.max_attempts,
            backoff_base_ms: options.backoff_base_ms,
            revalidate_secs: options.revalidate_secs,
            user_agent,
            skip_network: options.skip_network,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL; absolute URLs pass through.
    ///
    /// # Errors
    ///
    /// Returns [`AcsError::InvalidUrl`] if the joined URL cannot be parsed.
    pub fn resolve(&self, path: &str) -> Result<Url, AcsError> {
        self.base_url.join(path).map_err(|e| AcsError::InvalidUrl {
            url: path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Fetches `path`, retrying on any failure except a skipped fetch.
    ///
    /// # Errors
    ///
    /// - [`AcsError::FetchSkipped`] when the build-time skip switch is on (never retried).
    /// - [`AcsError::Timeout`] when the final attempt timed out.
    /// - [`AcsError::UnexpectedStatus`] when the final attempt returned a non-2xx status.
    /// - [`AcsError::Http`] for any other transport failure on the final attempt.
    pub async fn fetch_with_retry(
        &self,
        path: &str,
        options: &FetchOptions,
    ) -> Result<Response, AcsError> {
        self.fetch_and_read(path, options, |response| std::future::ready(Ok(response)))
            .await
    }

    /// Fetches `path` with default options and returns the body text.
    /// Reading the body is part of each attempt, so a connection dropped
    /// mid-body is retried like any other failure.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_with_retry`].
    pub async fn fetch_html(&self, path: &str) -> Result<String, AcsError> {
        self.fetch_and_read(path, &FetchOptions::default(), Response::text)
            .await
    }

    async fn fetch_and_read<T, R, RFut>(
        &self,
        path: &str,
        options: &FetchOptions,
        read: R,
    ) -> Result<T, AcsError>
    where
        R: Fn(Response) -> RFut,
        RFut: Future<Output = Result<T, reqwest::Error>>,
    {
        let url = self.resolve(path)?;
        if self.skip_network {
            return Err(AcsError::FetchSkipped {
                url: url.to_string(),
            });
        }
        let headers = self.request_headers(options);
        let read = &read;

        retry_with_backoff(self.max_attempts, self.backoff_base_ms, |attempt| {
            let url = url.clone();
            let headers = headers.clone();
            async move {
                tracing::debug!(%url, attempt, "fetching upstream page");
                let response = self
                    .client
                    .get(url.clone())
                    .headers(headers)
                    .timeout(self.attempt_timeout)
                    .send()
                    .await
                    .map_err(|e| transport_error(&url, e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(AcsError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                read(response).await.map_err(|e| transport_error(&url, e))
            }
        })
        .await
    }

    fn request_headers(&self, options: &FetchOptions) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
        );
        let revalidate = options.revalidate_secs.unwrap_or(self.revalidate_secs);
        if let Ok(value) = HeaderValue::from_str(&format!("max-age={revalidate}")) {
            headers.insert(CACHE_CONTROL, value);
        }
        headers.extend(options.headers.clone());
        headers
    }
}

fn transport_error(url: &Url, err: reqwest::Error) -> AcsError {
    if err.is_timeout() {
        AcsError::Timeout {
            url: url.to_string(),
        }
    } else {
        AcsError::Http(err)
    }
}

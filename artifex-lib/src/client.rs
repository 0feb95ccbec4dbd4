//! HTTP client for the artworks API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use url::Url;

use crate::TableConfig;
use crate::api;
use crate::api::DatasetTotals;
use crate::api::Page;
use crate::api::PageSource;
use crate::error::ApiError;
use crate::rate_limit::RateLimiter;
use crate::rate_limit::RetryConfig;

/// Identifies this client to the API, which asks callers to send one.
const DEFAULT_USER_AGENT: &str = concat!("artifex/", env!("CARGO_PKG_VERSION"));

/// [`PageSource`] backed by the Art Institute of Chicago artworks API.
///
/// Cheap to clone (uses `Arc` internally). Every request passes through a
/// shared [`RateLimiter`] and is retried according to [`RetryConfig`].
/// The API orders artworks by id by default, which satisfies the stable
/// ordering requirement of [`PageSource`].
///
/// # Example
///
/// ```ignore
/// use artifex_lib::ArticClient;
/// use artifex_lib::api::PageSource;
///
/// let client = ArticClient::builder().page_size(7).build()?;
/// let page = client.fetch_page(1).await?;
/// ```
#[derive(Clone)]
pub struct ArticClient {
    inner: Arc<ArticClientInner>,
}

struct ArticClientInner {
    base_url: Url,
    page_size: usize,
    fields: Vec<String>,
    user_agent: String,
    http_client: Client,
    timeout: Option<Duration>,
    rate_limiter: RateLimiter,
    retry_config: RetryConfig,
}

impl ArticClient {
    /// Creates a new builder with default settings.
    pub fn builder() -> ArticClientBuilder {
        ArticClientBuilder::new()
    }

    /// Creates a client from a [`TableConfig`] with default pacing.
    pub fn from_config(config: &TableConfig) -> Result<Self, ApiError> {
        Self::builder().config(config).build()
    }

    /// Returns the API root.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Sends a GET with rate limiting and retries, returning the body.
    async fn get_text(&self, url: Url) -> Result<String, ApiError> {
        let retry = &self.inner.retry_config;
        let mut attempts = 0;

        loop {
            self.inner.rate_limiter.acquire().await;
            log::debug!("GET {}", url);

            match self.send_once(&url).await {
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 {
                        let retry_after = parse_retry_after(&response);
                        if !retry.retry_on_429 || !retry.allows(attempts) {
                            return Err(ApiError::RateLimited { retry_after });
                        }

                        let wait = retry_after.unwrap_or_else(|| retry.delay_for(attempts));
                        log::warn!("Rate limited on {}, retrying in {:?}", url, wait);
                        tokio::time::sleep(wait).await;
                        attempts += 1;
                        continue;
                    }

                    if status.is_server_error() && retry.retry_on_5xx && retry.allows(attempts) {
                        let wait = retry.delay_for(attempts);
                        log::warn!("HTTP {} on {}, retrying in {:?}", status, url, wait);
                        tokio::time::sleep(wait).await;
                        attempts += 1;
                        continue;
                    }

                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(ApiError::http(status.as_u16(), body));
                    }

                    return response.text().await.map_err(|e| self.classify(e));
                }
                Err(e) => {
                    let transient = matches!(e, ApiError::Network(_) | ApiError::Timeout(_));

                    if transient && retry.retry_on_network && retry.allows(attempts) {
                        let wait = retry.delay_for(attempts);
                        log::warn!("{} on {}, retrying in {:?}", e, url, wait);
                        tokio::time::sleep(wait).await;
                        attempts += 1;
                        continue;
                    }

                    return Err(e);
                }
            }
        }
    }

    /// Single request without retry logic.
    async fn send_once(&self, url: &Url) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .inner
            .http_client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header("AIC-User-Agent", self.inner.user_agent.as_str());

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        request.send().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, e: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if e.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(e),
        }
    }
}

#[async_trait]
impl PageSource for ArticClient {
    async fn fetch_page(&self, page: usize) -> Result<Page, ApiError> {
        if page == 0 {
            return Err(ApiError::InvalidUrl("page numbers start at 1".to_string()));
        }

        let url = api::page_url(
            &self.inner.base_url,
            page,
            self.inner.page_size,
            &self.inner.fields,
        )?;
        let body = self.get_text(url).await?;
        let page = api::parse_page(page, &body)?;

        log::debug!("Fetched page {} ({} rows)", page.number(), page.len());
        Ok(page)
    }

    async fn fetch_totals(&self) -> Result<DatasetTotals, ApiError> {
        let url = api::totals_url(&self.inner.base_url, self.inner.page_size)?;
        let body = self.get_text(url).await?;
        let totals = api::parse_totals(&body, self.inner.page_size)?;

        log::debug!(
            "Dataset has {} rows in {} pages",
            totals.total_rows,
            totals.total_pages
        );
        Ok(totals)
    }

    fn page_size(&self) -> usize {
        self.inner.page_size
    }
}

/// Parses the Retry-After header value (seconds).
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("Retry-After")?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for constructing an [`ArticClient`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use artifex_lib::ArticClient;
/// use artifex_lib::rate_limit::RetryConfig;
///
/// let client = ArticClient::builder()
///     .base_url("https://api.artic.edu/api/v1")
///     .page_size(7)
///     .timeout(Duration::from_secs(10))
///     .retry_config(RetryConfig::no_retry())
///     .build()
///     .unwrap();
/// assert_eq!(client.base_url().host_str(), Some("api.artic.edu"));
/// ```
pub struct ArticClientBuilder {
    base_url: String,
    page_size: usize,
    fields: Vec<String>,
    user_agent: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    rate_limiter: Option<RateLimiter>,
    retry_config: RetryConfig,
}

impl ArticClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        let defaults = TableConfig::default();
        Self {
            base_url: defaults.base_url,
            page_size: defaults.page_size,
            fields: defaults.fields,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: defaults.timeout,
            connect_timeout: None,
            http_client: None,
            rate_limiter: None,
            retry_config: RetryConfig::default(),
        }
    }

    /// Copies page size, base URL, fields and timeout from a [`TableConfig`].
    pub fn config(mut self, config: &TableConfig) -> Self {
        self.base_url = config.base_url.clone();
        self.page_size = config.page_size.max(1);
        self.fields = config.fields.clone();
        self.timeout = config.timeout;
        self
    }

    /// Sets the API root.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the page size. Zero is raised to one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the requested columns.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Sets the `AIC-User-Agent` value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout, applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Shares a rate limiter with other clients.
    pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Sets the retry policy.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Builds the [`ArticClient`].
    pub fn build(self) -> Result<ArticClient, ApiError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.base_url));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(ArticClient {
            inner: Arc::new(ArticClientInner {
                base_url,
                page_size: self.page_size,
                fields: self.fields,
                user_agent: self.user_agent,
                http_client,
                timeout: self.timeout,
                rate_limiter: self.rate_limiter.unwrap_or_default(),
                retry_config: self.retry_config,
            }),
        })
    }
}

impl Default for ArticClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

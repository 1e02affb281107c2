//! Gateway API client with rate limiting, unbounded retry, and cancellation.

use crate::api::{ListsApi, PoliciesApi};
use crate::config::RetryPolicy;
use governor::{Quota, RateLimiter};
use gwblock_core::{GatewayError, Result};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default minimum interval between mutating calls
const DEFAULT_MUTATION_INTERVAL: Duration = Duration::from_secs(1);

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Gateway API client.
///
/// Every request runs inside an unbounded retry loop with capped random
/// exponential backoff; mutating requests additionally pass through a
/// one-per-interval rate limiter. Transport failures, decode failures, and
/// non-2xx responses are absorbed here and never reach the caller unless
/// the run is cancelled.
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    token: String,
    base_url: String,
    limiter: DirectLimiter,
    retry: RetryPolicy,
    cancel_tx: watch::Sender<bool>,
}

/// Handle for cancelling in-flight retry loops on a [`GatewayClient`].
///
/// The retry loop has no attempt ceiling; this is the cooperative way to
/// stop a stuck run without killing the process.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<ClientInner>,
}

impl CancelHandle {
    /// Signal every pending and future request to stop with
    /// [`GatewayError::Cancelled`].
    pub fn cancel(&self) {
        let _ = self.inner.cancel_tx.send(true);
    }
}

impl GatewayClient {
    /// Create a new client with default settings
    #[must_use]
    pub fn new(token: impl Into<String>, account_id: impl Into<String>) -> Self {
        GatewayClientBuilder::new(token, account_id).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(
        token: impl Into<String>,
        account_id: impl Into<String>,
    ) -> GatewayClientBuilder {
        GatewayClientBuilder::new(token, account_id)
    }

    /// Access domain list endpoints
    #[must_use]
    pub fn lists(&self) -> ListsApi<'_> {
        ListsApi::new(self)
    }

    /// Access firewall policy endpoints
    #[must_use]
    pub fn policies(&self) -> PoliciesApi<'_> {
        PoliciesApi::new(self)
    }

    /// Obtain a cancellation handle for this client
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Perform a GET request
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, None::<&()>).await
    }

    /// Perform a POST request with JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::POST, path, Some(body)).await
    }

    /// Perform a PUT request with JSON body
    pub(crate) async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::PUT, path, Some(body)).await
    }

    /// Perform a PATCH request with JSON body
    pub(crate) async fn patch<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::PATCH, path, Some(body)).await
    }

    /// Perform a DELETE request, ignoring the response body
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute_empty(Method::DELETE, path).await
    }

    /// Run one request through the rate limiter and the retry loop.
    ///
    /// Mutating verbs wait for the limiter before every attempt; reads are
    /// not throttled. A 2xx response that decodes cleanly exits the loop;
    /// every retryable failure sleeps a jittered backoff and goes again.
    async fn execute<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let mutating = method != Method::GET && method != Method::HEAD;
        let mut cancelled = self.inner.cancel_tx.subscribe();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            if *cancelled.borrow() {
                return Err(GatewayError::Cancelled);
            }

            if mutating {
                self.inner.limiter.until_ready().await;
            }

            let outcome = match self.try_request(method.clone(), path, body).await {
                Ok(text) => serde_json::from_str(&text).map_err(GatewayError::Json),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    let delay = self.inner.retry.backoff_for(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "request failed, backing off before retry"
                    );
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        _ = cancelled.changed() => return Err(GatewayError::Cancelled),
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Like [`Self::execute`], for endpoints whose response body we discard
    async fn execute_empty(&self, method: Method, path: &str) -> Result<()> {
        let mut cancelled = self.inner.cancel_tx.subscribe();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            if *cancelled.borrow() {
                return Err(GatewayError::Cancelled);
            }

            self.inner.limiter.until_ready().await;

            match self.try_request::<()>(method.clone(), path, None).await {
                Ok(_) => return Ok(()),
                Err(err) if err.is_retryable() => {
                    let delay = self.inner.retry.backoff_for(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "request failed, backing off before retry"
                    );
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        _ = cancelled.changed() => return Err(GatewayError::Cancelled),
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Issue a single attempt, classify the status, and return the raw body
    async fn try_request<B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String> {
        let url = format!("{}{}", self.inner.base_url, path);
        debug!(method = %method, url = %url, "gateway request");

        let mut request = self
            .inner
            .http
            .request(method, &url)
            .bearer_auth(&self.inner.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(GatewayError::from_status(
                status.as_u16(),
                extract_error_message(&text),
            ))
        }
    }
}

/// Pull the first API error message out of an error body, falling back to
/// the raw body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("errors")?
                .as_array()?
                .first()?
                .get("message")?
                .as_str()
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Builder for configuring a [`GatewayClient`]
pub struct GatewayClientBuilder {
    token: String,
    account_id: String,
    base_url: Option<String>,
    timeout: Duration,
    mutation_interval: Duration,
    retry: RetryPolicy,
}

impl GatewayClientBuilder {
    /// Create a new builder with the given credentials
    #[must_use]
    pub fn new(token: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            account_id: account_id.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            mutation_interval: DEFAULT_MUTATION_INTERVAL,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the minimum interval between mutating calls
    #[must_use]
    pub fn mutation_interval(mut self, interval: Duration) -> Self {
        self.mutation_interval = interval;
        self
    }

    /// Set the retry/backoff policy
    #[must_use]
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Build the client
    #[must_use]
    pub fn build(self) -> GatewayClient {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(format!("gwblock/{}", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .deflate(true)
            .build()
            .expect("Failed to build HTTP client");

        let base_url = self.base_url.unwrap_or_else(|| {
            format!(
                "https://api.cloudflare.com/client/v4/accounts/{}/gateway",
                self.account_id
            )
        });

        let quota = Quota::with_period(self.mutation_interval)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(NonZeroU32::MIN);

        let (cancel_tx, _) = watch::channel(false);

        GatewayClient {
            inner: Arc::new(ClientInner {
                http,
                token: self.token,
                base_url,
                limiter: RateLimiter::direct(quota),
                retry: self.retry,
                cancel_tx,
            }),
        }
    }
}

//! Internal HTTP client: bearer auth, rate limiting and uniform status classification.

use crate::core::{
    domain::{
        error::{IdcError, IdcResult, ValidationError},
        model::{client_config::ClientConfig, idc_connection::IdcConnection},
    },
    infrastructure::context::OperationContext,
};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    Client, Method, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// Keys whose values never reach a log line.
const SENSITIVE_KEYS: [&str; 5] = ["password", "token", "secret", "authorization", "apikey"];

/// Characters of a non-JSON error body kept in the error message.
const EXCERPT_CHARS: usize = 200;

/// Classification of a completed HTTP exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Ok,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ClientError,
    ServerError,
    Unexpected,
}

/// Classifies an HTTP status. Total over every code; only `200` is `Ok`.
pub fn classify(status: StatusCode) -> StatusClass {
    match status {
        StatusCode::OK => StatusClass::Ok,
        StatusCode::UNAUTHORIZED => StatusClass::Unauthorized,
        StatusCode::FORBIDDEN => StatusClass::Forbidden,
        StatusCode::NOT_FOUND => StatusClass::NotFound,
        StatusCode::CONFLICT => StatusClass::Conflict,
        s if s.is_client_error() => StatusClass::ClientError,
        s if s.is_server_error() => StatusClass::ServerError,
        _ => StatusClass::Unexpected,
    }
}

/// The raw outcome of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Returns the body when the exchange classified as [`StatusClass::Ok`],
    /// otherwise the typed error for the status.
    pub fn into_ok(self) -> IdcResult<Vec<u8>> {
        let message = upstream_message(&self.body);
        let status = self.status.as_u16();
        match classify(self.status) {
            StatusClass::Ok => Ok(self.body),
            StatusClass::Unauthorized => Err(IdcError::Unauthorized(message)),
            StatusClass::Forbidden => Err(IdcError::Forbidden(message)),
            StatusClass::NotFound => Err(IdcError::NotFound(message)),
            StatusClass::Conflict => Err(IdcError::Conflict(message)),
            StatusClass::ClientError => Err(IdcError::Client { status, message }),
            StatusClass::ServerError => Err(IdcError::Server { status, message }),
            StatusClass::Unexpected => Err(IdcError::UnexpectedStatus { status, message }),
        }
    }
}

/// Extracts the API's `message` field when present, else the body text.
fn upstream_message(body: &[u8]) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(serde_json::Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }
    if serde_json::from_slice::<serde_json::Value>(body).is_ok() {
        return redact_body(body);
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "no response body".to_string()
    } else {
        text_excerpt(text)
    }
}

/// A plain-text body cut to [`EXCERPT_CHARS`] with bearer credentials and
/// `key=value` secrets masked.
fn text_excerpt(text: &str) -> String {
    let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
    if excerpt.len() < text.len() {
        excerpt.push_str("...");
    }
    let mut masked = Vec::new();
    let mut after_bearer = false;
    for word in excerpt.split_whitespace() {
        let key = word.split(['=', ':']).next().unwrap_or(word);
        let lowered = key.to_ascii_lowercase();
        if after_bearer {
            masked.push("***".to_string());
        } else if key.len() < word.len() && SENSITIVE_KEYS.iter().any(|s| lowered.contains(s)) {
            masked.push(format!("{}=***", key));
        } else {
            masked.push(word.to_string());
        }
        after_bearer = lowered == "bearer";
    }
    masked.join(" ")
}

/// Renders a body for debug logs with credential-bearing fields masked.
/// Non-JSON bodies are summarised by length only.
pub fn redact_body(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(mut value) => {
            redact_value(&mut value);
            value.to_string()
        }
        Err(_) => format!("<{} bytes>", body.len()),
    }
}

fn redact_value(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                let lowered = key.to_ascii_lowercase();
                if SENSITIVE_KEYS.iter().any(|s| lowered.contains(s)) {
                    *inner = serde_json::Value::String("***".to_string());
                } else {
                    redact_value(inner);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}

/// Internal HTTP client shared by every service operation.
///
/// Each request carries `Authorization: Bearer <token>`; a JSON body adds
/// `Content-Type: application/json`. Non-200 statuses are classified and
/// returned as typed errors, never retried here.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<IdcConnection>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Errors
    /// Returns `IdcError::Validation` for an invalid rate limit and
    /// `IdcError::Transport` if the HTTP client cannot be built.
    pub fn new(connection: IdcConnection, config: &ClientConfig) -> IdcResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| IdcError::Transport(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let per_second = NonZeroU32::new(rl.requests_per_second).ok_or_else(|| {
                    ValidationError::field("requests_per_second", "must be greater than zero")
                })?;
                let burst = NonZeroU32::new(rl.burst_size).ok_or_else(|| {
                    ValidationError::field("burst_size", "must be greater than zero")
                })?;
                let quota = Quota::per_second(per_second).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            rate_limiter,
        })
    }

    /// Returns a reference to the underlying connection details.
    pub fn connection(&self) -> &IdcConnection {
        &self.connection
    }

    /// Executes one HTTP exchange.
    ///
    /// A transport failure yields `IdcError::Transport`; any completed
    /// exchange yields the raw status and body, whatever the status.
    pub async fn request(
        &self,
        ctx: &OperationContext,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> IdcResult<RawResponse> {
        ctx.run(self.send(method, url, body)).await
    }

    async fn send(&self, method: Method, url: &str, body: Option<Vec<u8>>) -> IdcResult<RawResponse> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let mut req_builder = self
            .http_client
            .request(method.clone(), url)
            .header(AUTHORIZATION, self.connection.api_token().as_bearer_header())
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            debug!(%method, url, body = %redact_body(&body), "idc api request");
            req_builder = req_builder.header(CONTENT_TYPE, "application/json").body(body);
        } else {
            debug!(%method, url, "idc api request");
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| IdcError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| IdcError::Transport(format!("Failed to read response body: {}", e)))?
            .to_vec();

        debug!(
            %method,
            url,
            status = status.as_u16(),
            body = %redact_body(&body),
            "idc api response"
        );

        Ok(RawResponse { status, body })
    }

    /// Performs a GET and parses a 200 response.
    pub async fn get<T>(&self, ctx: &OperationContext, url: &str) -> IdcResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = self.request(ctx, Method::GET, url, None).await?.into_ok()?;
        parse(&body)
    }

    /// Performs a POST with a JSON body and parses a 200 response.
    pub async fn post<B, T>(&self, ctx: &OperationContext, url: &str, body: &B) -> IdcResult<T>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let payload = marshal(body)?;
        let body = self
            .request(ctx, Method::POST, url, Some(payload))
            .await?
            .into_ok()?;
        parse(&body)
    }

    /// Performs a PUT with a JSON body and parses a 200 response.
    pub async fn put<B, T>(&self, ctx: &OperationContext, url: &str, body: &B) -> IdcResult<T>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let payload = marshal(body)?;
        let body = self
            .request(ctx, Method::PUT, url, Some(payload))
            .await?
            .into_ok()?;
        parse(&body)
    }

    /// Performs a DELETE. The response body is ignored.
    pub async fn delete(&self, ctx: &OperationContext, url: &str) -> IdcResult<()> {
        self.request(ctx, Method::DELETE, url, None)
            .await?
            .into_ok()
            .map(|_| ())
    }
}

fn marshal<B: serde::Serialize>(body: &B) -> IdcResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| IdcError::Parse(format!("Failed to encode request: {}", e)))
}

fn parse<T: serde::de::DeserializeOwned>(body: &[u8]) -> IdcResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| IdcError::Parse(format!("Failed to parse response: {}", e)))
}

//! FoodExpress Remote Order Gateway.
//!
//! A stateless request/response wrapper around the backend's cart, order,
//! payment, and agent endpoints. The backend is the source of truth - there
//! is NO local sync and NO caching: every resource behind this gateway is
//! mutable lifecycle state, so every read goes to the wire.
//!
//! # Semantics worth knowing
//!
//! - A 404 on a cart read is not an error: it is the normal "no active cart"
//!   state and surfaces as `Ok(None)`.
//! - Cart mutations signal "cart is now empty" three ways (204, empty body,
//!   zero-line cart); all three surface as `Ok(None)`.
//! - The order-detail endpoint uses different field names than the order
//!   list; a boundary mapper folds both into one canonical
//!   [`Order`](food_express_core::Order) shape.
//!
//! # Example
//!
//! ```rust,ignore
//! use food_express_gateway::{GatewayConfig, OrderGateway};
//!
//! let gateway = OrderGateway::new(&GatewayConfig::from_env()?);
//!
//! // Read the customer's cart (None = no active cart)
//! let cart = gateway.get_cart(customer_id).await?;
//!
//! // Bump a line quantity; None = the cart emptied out
//! let cart = gateway.adjust_line_quantity(customer_id, line_id, 1).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod agents;
mod cart;
mod config;
mod conversions;
mod customers;
mod orders;
mod payment;

pub use config::{ConfigError, GatewayConfig};
pub use orders::AssignmentReceipt;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Errors that can occur when talking to the order backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed (DNS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found (outside the cart-read case, which is `Ok(None)`).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },
}

/// Client for the FoodExpress order backend.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct OrderGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
}

impl OrderGateway {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_token: config.api_token.clone(),
            }),
        }
    }

    /// Resolve a relative endpoint path against the configured base URL.
    ///
    /// Paths are compile-time constants with interpolated IDs, so a join
    /// failure is a programming error and maps to a 404-style error rather
    /// than a panic.
    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| GatewayError::NotFound(format!("invalid endpoint {path}: {e}")))
    }

    /// Start a request, attaching the bearer token when configured.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.inner.api_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Read a response body, mapping non-success statuses to errors.
    ///
    /// Reads the body as text first so parse failures can log what actually
    /// came back.
    async fn read_body(response: reqwest::Response) -> Result<String, GatewayError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body),
                "Backend returned non-success status"
            );
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        Ok(body)
    }

    /// Parse a JSON body, logging the raw payload on failure.
    fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(body),
                "Failed to parse backend response"
            );
            GatewayError::Parse(e)
        })
    }

    /// GET a JSON resource.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.endpoint(path)?;
        let response = self.request(Method::GET, url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(path.to_string()));
        }

        let body = Self::read_body(response).await?;
        Self::parse_json(&body)
    }
}

/// Truncate a response body for log output.
fn truncate(body: &str) -> String {
    body.chars().take(500).collect()
}

//! Checkout Gateway Client
//!
//! Requests a one-time hosted checkout link. The caller awaits a single round
//! trip and then opens the returned URL with the platform's URL handler.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::callback::callback_url;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::ip::resolve_device_ip;

const AUTH_USER_HEADER: &str = "x-coinflow-auth-user-id";

// Keeps error bodies from flooding logs.
const MAX_ERROR_BODY: usize = 512;

/// Source of checkout links (Strategy pattern)
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Request a one-time checkout link for `amount_cents` in `currency`.
    ///
    /// The checkout page redirects to `<callback_scheme>://checkout-complete`
    /// when payment finishes.
    async fn request_checkout_link(
        &self,
        amount_cents: u64,
        currency: &str,
        callback_scheme: &str,
    ) -> Result<Url>;

    /// Gateway name
    fn name(&self) -> &str;
}

/// Coinflow standalone checkout link client
pub struct CoinflowClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl CoinflowClient {
    /// Create a new client
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Request a link using the configured price and callback scheme
    pub async fn request_configured_link(&self) -> Result<Url> {
        self.request_checkout_link(
            self.config.amount_cents,
            &self.config.currency,
            &self.config.callback_scheme,
        )
        .await
    }

    fn build_body(&self, amount_cents: u64, currency: &str, callback_scheme: &str) -> LinkRequest {
        LinkRequest {
            subtotal: Subtotal {
                currency: currency.to_string(),
                cents: amount_cents,
            },
            standalone_link_config: StandaloneLinkConfig {
                callback_url: callback_url(callback_scheme),
                end_user_device_ip_address: resolve_device_ip(self.config.device_ip).to_string(),
            },
        }
    }
}

#[async_trait]
impl CheckoutGateway for CoinflowClient {
    async fn request_checkout_link(
        &self,
        amount_cents: u64,
        currency: &str,
        callback_scheme: &str,
    ) -> Result<Url> {
        let endpoint = self.config.link_endpoint()?;
        let body = self.build_body(amount_cents, currency, callback_scheme);

        tracing::info!(
            endpoint = %endpoint,
            cents = amount_cents,
            currency = %currency,
            callback = %body.standalone_link_config.callback_url,
            "Requesting checkout link"
        );

        let response = self
            .http
            .post(endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.config.api_key)
            .header(AUTH_USER_HEADER, &self.config.user_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(&e, self.config.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::from_transport(&e, self.config.timeout))?;

        if !status.is_success() {
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body: truncate(text),
            });
        }

        let link = parse_link(&text)?;
        tracing::info!(host = ?link.host_str(), "Checkout link issued");
        Ok(link)
    }

    fn name(&self) -> &str {
        "Coinflow"
    }
}

/// Extract the checkout URL from a gateway response body
pub fn parse_link(body: &str) -> Result<Url> {
    let response: LinkResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    let link = response
        .link
        .ok_or_else(|| GatewayError::MalformedResponse("missing `link` field".into()))?;

    let url = Url::parse(&link)
        .map_err(|e| GatewayError::MalformedResponse(format!("`link` is not a URL: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(GatewayError::MalformedResponse(format!(
            "`link` has unexpected scheme {other}"
        ))),
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

/// Body of `POST /api/checkout/link`
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    pub subtotal: Subtotal,
    pub standalone_link_config: StandaloneLinkConfig,
}

#[derive(Clone, Debug, Serialize)]
pub struct Subtotal {
    pub currency: String,
    pub cents: u64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneLinkConfig {
    pub callback_url: String,
    pub end_user_device_ip_address: String,
}

#[derive(Debug, Deserialize)]
struct LinkResponse {
    link: Option<String>,
}

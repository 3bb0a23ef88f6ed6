//! # tapstar-checkout
//!
//! Checkout round trip for buying credits.
//!
//! ```text
//! ┌──────────┐  request_checkout_link   ┌──────────────┐
//! │   Game   │─────────────────────────▶│   Gateway    │
//! │          │◀──── { "link": url } ────│ (Coinflow)   │
//! └──────────┘                          └──────────────┘
//!      │ open url                               │
//!      ▼                                        │
//! ┌──────────────┐  <scheme>://checkout-complete │
//! │ Hosted page  │──────────────────────────────┘──▶ CallbackMatcher ─▶ credits
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tapstar_checkout::{CoinflowClient, CallbackMatcher, CallbackEvent};
//!
//! let client = CoinflowClient::from_env()?;
//! let url = client.request_configured_link().await?;
//! // open `url` in the browser
//!
//! let matcher = CallbackMatcher::new(&client.config().callback_scheme)?;
//! if matcher.parse("testcheckout://checkout-complete") == Some(CallbackEvent::CheckoutComplete) {
//!     // grant credits
//! }
//! ```

mod callback;
mod config;
mod error;
mod gateway;
mod ip;

pub use callback::{callback_url, CallbackEvent, CallbackMatcher, CHECKOUT_COMPLETE_HOST};
pub use config::{
    GatewayConfig, DEFAULT_AMOUNT_CENTS, DEFAULT_BASE_URL, DEFAULT_CALLBACK_SCHEME,
    DEFAULT_CURRENCY, DEFAULT_TIMEOUT,
};
pub use error::{GatewayError, Result};
pub use gateway::{
    parse_link, CheckoutGateway, CoinflowClient, LinkRequest, StandaloneLinkConfig, Subtotal,
};
pub use ip::{discover_outbound_ip, resolve_device_ip, LOOPBACK_PLACEHOLDER};
pub use url::Url;

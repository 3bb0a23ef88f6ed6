//! Gateway Configuration

use std::net::IpAddr;
use std::time::Duration;

use url::Url;

use crate::error::{GatewayError, Result};

/// Sandbox endpoint used when `COINFLOW_API_URL` is unset
pub const DEFAULT_BASE_URL: &str = "https://api-sandbox.coinflow.cash";

/// Scheme the checkout page redirects back to
pub const DEFAULT_CALLBACK_SCHEME: &str = "testcheckout";

/// Price of one credit pack
pub const DEFAULT_AMOUNT_CENTS: u64 = 5000;

pub const DEFAULT_CURRENCY: &str = "USD";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Checkout gateway settings
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gateway base URL (without the `/api/...` path)
    pub base_url: Url,

    /// Value of the `Authorization` header
    pub api_key: String,

    /// Value of the `x-coinflow-auth-user-id` header
    pub user_id: String,

    /// Custom scheme of the deep link that reopens the app
    pub callback_scheme: String,

    /// Subtotal charged per purchase
    pub amount_cents: u64,

    pub currency: String,

    /// Upper bound for one gateway round trip
    pub timeout: Duration,

    /// Fixed device address; discovered per request when `None`
    pub device_ip: Option<IpAddr>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("callback_scheme", &self.callback_scheme)
            .field("amount_cents", &self.amount_cents)
            .field("currency", &self.currency)
            .field("timeout", &self.timeout)
            .field("device_ip", &self.device_ip)
            .finish()
    }
}

impl GatewayConfig {
    /// Config against the sandbox with default pricing
    pub fn new(api_key: impl Into<String>, user_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            api_key: api_key.into(),
            user_id: user_id.into(),
            callback_scheme: DEFAULT_CALLBACK_SCHEME.into(),
            amount_cents: DEFAULT_AMOUNT_CENTS,
            currency: DEFAULT_CURRENCY.into(),
            timeout: DEFAULT_TIMEOUT,
            device_ip: None,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    ///
    /// `COINFLOW_API_KEY` and `COINFLOW_USER_ID` are required; everything else
    /// has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| GatewayError::Config(format!("{key} not set")))
        };

        let mut config = Self::new(required("COINFLOW_API_KEY")?, required("COINFLOW_USER_ID")?)?;

        if let Some(raw) = lookup("COINFLOW_API_URL") {
            config.base_url = parse_base_url(raw.trim())?;
        }
        if let Some(scheme) = lookup("CHECKOUT_CALLBACK_SCHEME") {
            config.callback_scheme = validate_scheme(scheme.trim())?;
        }
        if let Some(raw) = lookup("CHECKOUT_AMOUNT_CENTS") {
            config.amount_cents = parse_var("CHECKOUT_AMOUNT_CENTS", &raw, "a number")?;
        }
        if let Some(currency) = lookup("CHECKOUT_CURRENCY") {
            config.currency = currency.trim().to_uppercase();
        }
        if let Some(raw) = lookup("CHECKOUT_TIMEOUT_SECS") {
            let secs: u64 = parse_var("CHECKOUT_TIMEOUT_SECS", &raw, "a number")?;
            if secs == 0 {
                return Err(GatewayError::Config("CHECKOUT_TIMEOUT_SECS must be positive".into()));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("CHECKOUT_DEVICE_IP") {
            config.device_ip = Some(parse_var("CHECKOUT_DEVICE_IP", &raw, "an IP address")?);
        }

        Ok(config)
    }

    /// Use a different gateway (tests, staging)
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Full URL of the link-creation endpoint
    pub fn link_endpoint(&self) -> Result<Url> {
        self.base_url
            .join("api/checkout/link")
            .map_err(|e| GatewayError::Config(format!("Invalid gateway URL: {e}")))
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str, expected: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| GatewayError::Config(format!("{key} is not {expected}: {raw}")))
}

// A trailing slash makes `Url::join` append rather than replace the last segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| GatewayError::Config(format!("Invalid gateway URL {raw}: {e}")))
}

/// Scheme syntax per RFC 3986: a letter followed by letters, digits, `+`, `-` or `.`
pub(crate) fn validate_scheme(scheme: &str) -> Result<String> {
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if valid {
        Ok(scheme.to_ascii_lowercase())
    } else {
        Err(GatewayError::Config(format!("Invalid callback scheme: {scheme:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |k| vars.get(k).map(|v| (*v).to_string())
    }

    #[test]
    fn test_requires_credentials() {
        let err = GatewayConfig::from_lookup(lookup_from(&[("COINFLOW_USER_ID", "user_1")]))
            .unwrap_err();
        assert!(err.to_string().contains("COINFLOW_API_KEY"));
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("COINFLOW_API_KEY", "key"),
            ("COINFLOW_USER_ID", "user_1"),
        ]))
        .unwrap();

        assert_eq!(
            config.link_endpoint().unwrap().as_str(),
            "https://api-sandbox.coinflow.cash/api/checkout/link"
        );
        assert_eq!(config.callback_scheme, "testcheckout");
        assert_eq!(config.amount_cents, 5000);
        assert_eq!(config.currency, "USD");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.device_ip, None);
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("COINFLOW_API_KEY", "key"),
            ("COINFLOW_USER_ID", "user_1"),
            ("COINFLOW_API_URL", "http://localhost:9000/gw"),
            ("CHECKOUT_CALLBACK_SCHEME", "MyGame"),
            ("CHECKOUT_AMOUNT_CENTS", "999"),
            ("CHECKOUT_CURRENCY", "eur"),
            ("CHECKOUT_TIMEOUT_SECS", "5"),
            ("CHECKOUT_DEVICE_IP", "192.168.1.20"),
        ]))
        .unwrap();

        assert_eq!(
            config.link_endpoint().unwrap().as_str(),
            "http://localhost:9000/gw/api/checkout/link"
        );
        assert_eq!(config.callback_scheme, "mygame");
        assert_eq!(config.amount_cents, 999);
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.device_ip, Some("192.168.1.20".parse().unwrap()));
    }

    #[test]
    fn test_rejects_unparsable_numbers() {
        for (key, value) in [
            ("CHECKOUT_AMOUNT_CENTS", "fifty"),
            ("CHECKOUT_TIMEOUT_SECS", "-1"),
            ("CHECKOUT_DEVICE_IP", "not-an-ip"),
        ] {
            let err = GatewayConfig::from_lookup(lookup_from(&[
                ("COINFLOW_API_KEY", "key"),
                ("COINFLOW_USER_ID", "user_1"),
                (key, value),
            ]))
            .unwrap_err();
            assert!(matches!(err, GatewayError::Config(_)));
            assert!(err.to_string().contains(key), "{err}");
        }
    }

    #[test]
    fn test_rejects_bad_scheme() {
        assert!(validate_scheme("9lives").is_err());
        assert!(validate_scheme("has space").is_err());
        assert!(validate_scheme("").is_err());
        assert_eq!(validate_scheme("app+dev").unwrap(), "app+dev");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GatewayConfig::new("sk_secret", "user_1").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk_secret"));
        assert!(debug.contains("user_1"));
    }
}

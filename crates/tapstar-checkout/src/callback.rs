//! Deep-link Callback Handling
//!
//! The hosted checkout page hands control back to the app by opening
//! `<scheme>://checkout-complete`. The scheme/host pair is the only check:
//! any URL of that shape is trusted, and replays are not detected.

use url::Url;

use crate::config::validate_scheme;
use crate::error::Result;

/// Host of the checkout completion deep link
pub const CHECKOUT_COMPLETE_HOST: &str = "checkout-complete";

/// Callback URL sent to the gateway for `scheme`
pub fn callback_url(scheme: &str) -> String {
    format!("{scheme}://{CHECKOUT_COMPLETE_HOST}")
}

/// Recognized inbound deep links
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackEvent {
    /// The user finished paying on the hosted checkout page
    CheckoutComplete,
}

/// Matches inbound URLs against the app's callback scheme
#[derive(Clone, Debug)]
pub struct CallbackMatcher {
    scheme: String,
}

impl CallbackMatcher {
    pub fn new(scheme: &str) -> Result<Self> {
        Ok(Self {
            scheme: validate_scheme(scheme)?,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Classify an inbound URL. Anything unrecognized yields `None`.
    pub fn parse(&self, raw: &str) -> Option<CallbackEvent> {
        let url = match Url::parse(raw.trim()) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(url = %raw, error = %e, "Ignoring unparsable deep link");
                return None;
            }
        };

        if url.scheme() == self.scheme && url.host_str() == Some(CHECKOUT_COMPLETE_HOST) {
            tracing::info!(url = %url, "Checkout completion callback received");
            Some(CallbackEvent::CheckoutComplete)
        } else {
            tracing::debug!(url = %url, "Ignoring unrecognized deep link");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> CallbackMatcher {
        CallbackMatcher::new("testcheckout").unwrap()
    }

    #[test]
    fn test_callback_url_shape() {
        assert_eq!(callback_url("testcheckout"), "testcheckout://checkout-complete");
    }

    #[test]
    fn test_recognizes_completion() {
        let m = matcher();
        assert_eq!(
            m.parse("testcheckout://checkout-complete"),
            Some(CallbackEvent::CheckoutComplete)
        );
        // Path and query are not inspected
        assert_eq!(
            m.parse("testcheckout://checkout-complete/done?session=abc"),
            Some(CallbackEvent::CheckoutComplete)
        );
        // The scheme is case-insensitive
        assert_eq!(
            m.parse("TestCheckout://checkout-complete"),
            Some(CallbackEvent::CheckoutComplete)
        );
    }

    #[test]
    fn test_ignores_others() {
        let m = matcher();
        assert_eq!(m.parse("othergame://checkout-complete"), None);
        assert_eq!(m.parse("testcheckout://checkout-cancelled"), None);
        assert_eq!(m.parse("https://checkout-complete"), None);
        assert_eq!(m.parse("not a url"), None);
        assert_eq!(m.parse(""), None);
    }
}

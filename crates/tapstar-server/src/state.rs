//! Application State

use std::sync::Arc;

use tapstar_checkout::{CallbackMatcher, CheckoutGateway, CoinflowClient};
use tapstar_core::GameHandle;

/// What one purchase costs and where the gateway sends the player back
#[derive(Clone)]
pub struct Checkout {
    pub gateway: Arc<dyn CheckoutGateway>,
    pub amount_cents: u64,
    pub currency: String,
    pub callback_scheme: String,
}

impl Checkout {
    pub fn from_client(client: CoinflowClient) -> Self {
        let config = client.config();
        Self {
            amount_cents: config.amount_cents,
            currency: config.currency.clone(),
            callback_scheme: config.callback_scheme.clone(),
            gateway: Arc::new(client),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The process-wide game session
    pub game: GameHandle,

    /// Checkout gateway (optional - None if not configured)
    pub checkout: Option<Checkout>,

    /// Recognizes checkout completion deep links
    pub callbacks: CallbackMatcher,
}

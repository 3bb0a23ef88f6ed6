//! tapstar HTTP Server
//!
//! Axum-based API the presentation layer drives the game through: taps,
//! the buy modal, checkout links and the deep-link callback.

mod handlers;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tapstar_checkout::{CallbackMatcher, CoinflowClient, DEFAULT_CALLBACK_SCHEME};
use tapstar_core::{GameConfig, GameHandle};

use crate::handlers::{
    create_checkout, dismiss_modal, get_session, handle_callback, health_check, request_purchase,
    tap_star,
};
use crate::state::{AppState, Checkout};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let game_config = GameConfig::from_env()?;
    tracing::info!(
        initial_credits = game_config.initial_credits,
        credits_per_purchase = game_config.credits_per_purchase,
        toast_ttl_ms = u64::try_from(game_config.toast_ttl.as_millis()).unwrap_or(u64::MAX),
        "Game configured"
    );
    let game = GameHandle::new(game_config);

    // Initialize payments
    let checkout = match CoinflowClient::from_env() {
        Ok(client) => {
            tracing::info!(config = ?client.config(), "✓ Checkout gateway configured");
            Some(Checkout::from_client(client))
        }
        Err(e) => {
            tracing::warn!("⚠ Checkout not configured - purchases disabled ({})", e);
            tracing::warn!("  Set COINFLOW_API_KEY and COINFLOW_USER_ID in .env");
            None
        }
    };

    let scheme = checkout.as_ref().map_or_else(
        || {
            std::env::var("CHECKOUT_CALLBACK_SCHEME")
                .unwrap_or_else(|_| DEFAULT_CALLBACK_SCHEME.into())
        },
        |c| c.callback_scheme.clone(),
    );
    let callbacks = CallbackMatcher::new(&scheme)?;
    tracing::info!(scheme = callbacks.scheme(), "Listening for checkout callbacks");

    let state = AppState {
        game,
        checkout,
        callbacks,
    };

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("tapstar server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health            - Health check");
    tracing::info!("  GET  /api/session       - Current session");
    tracing::info!("  POST /api/star/tap      - Tap the star");
    tracing::info!("  POST /api/purchase      - Open the buy modal");
    tracing::info!("  POST /api/modal/dismiss - Close the buy modal");
    tracing::info!("  POST /api/checkout      - Get a checkout link");
    tracing::info!("  POST /api/callback      - Deliver a deep link");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        // Game
        .route("/api/session", get(get_session))
        .route("/api/star/tap", post(tap_star))
        .route("/api/purchase", post(request_purchase))
        .route("/api/modal/dismiss", post(dismiss_modal))
        // Checkout
        .route("/api/checkout", post(create_checkout))
        .route("/api/callback", post(handle_callback))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use tapstar_checkout::{CallbackEvent, GatewayError};
use tapstar_core::{Bounds, SessionSnapshot};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checkout_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

/// Current size of the rendering surface
#[derive(Debug, Deserialize)]
pub struct TapRequest {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub handled: bool,
    pub session: SessionSnapshot,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        checkout_configured: state.checkout.is_some(),
    })
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.game.snapshot().await)
}

/// Tap the star. Taps without credits are ignored and return the unchanged session.
pub async fn tap_star(
    State(state): State<AppState>,
    Json(payload): Json<TapRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(payload.width) || !valid(payload.height) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Viewport width and height must be positive",
            "INVALID_VIEWPORT",
        ));
    }

    // Ignored taps are logged by the handle and never reported to the player
    let report = state
        .game
        .tap_star(Bounds::for_viewport(payload.width, payload.height))
        .await;

    Ok(Json(report.session))
}

pub async fn request_purchase(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.game.request_purchase().await)
}

pub async fn dismiss_modal(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.game.dismiss_modal().await)
}

/// Close the buy modal and fetch a checkout link. Responds once the gateway has answered.
pub async fn create_checkout(
    State(state): State<AppState>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let checkout = state.checkout.as_ref().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Payments not configured",
            "PAYMENTS_DISABLED",
        )
    })?;

    state.game.dismiss_modal().await;

    let url = checkout
        .gateway
        .request_checkout_link(
            checkout.amount_cents,
            &checkout.currency,
            &checkout.callback_scheme,
        )
        .await
        .map_err(|e| {
            tracing::warn!(
                gateway = checkout.gateway.name(),
                error = %e,
                "Checkout link request failed"
            );
            let (status, code) = match &e {
                GatewayError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "CHECKOUT_TIMEOUT"),
                GatewayError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CHECKOUT_CONFIG"),
                _ => (StatusCode::BAD_GATEWAY, "CHECKOUT_ERROR"),
            };
            api_error(status, e.user_message(), code)
        })?;

    Ok(Json(CheckoutResponse {
        checkout_url: url.to_string(),
    }))
}

/// Deep link forwarded by the presentation layer
pub async fn handle_callback(
    State(state): State<AppState>,
    Json(payload): Json<CallbackRequest>,
) -> Json<CallbackResponse> {
    match state.callbacks.parse(&payload.url) {
        Some(CallbackEvent::CheckoutComplete) => Json(CallbackResponse {
            handled: true,
            session: state.game.complete_purchase().await,
        }),
        None => Json(CallbackResponse {
            handled: false,
            session: state.game.snapshot().await,
        }),
    }
}

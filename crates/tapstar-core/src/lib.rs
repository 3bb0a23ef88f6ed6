//! # tapstar-core
//!
//! Session state for the "tap the star" mini-game.
//!
//! ## State machine
//!
//! ```text
//!                 tap_star (credits > 1)
//!                 ┌──────────┐
//!                 ▼          │
//!           ┌──────────┐─────┘         ┌──────────┐
//!  start ──▶│ Playable │──────────────▶│ Depleted │── tap_star: ignored
//!           └──────────┘ tap_star      └──────────┘
//!                 ▲      (last credit,       │
//!                 │       modal opens)       │
//!                 └──────────────────────────┘
//!                      complete_checkout
//! ```
//!
//! `request_purchase` and `dismiss_modal` toggle the buy modal in either phase.
//! Toasts expire on their own; see [`GameHandle`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod handle;
pub mod session;

pub use config::GameConfig;
pub use error::{GameError, Result};
pub use geometry::{Bounds, Position};
pub use handle::{GameHandle, TapReport};
pub use session::{Phase, Session, SessionId, SessionSnapshot, TapOutcome, ToastTicket};

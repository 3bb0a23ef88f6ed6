//! Shared Game Handle
//!
//! Cloneable, async access to the process-wide [`Session`]. UI bindings hold a
//! `GameHandle` instead of touching the session directly; the handle also owns
//! the toast expiry timer.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use rand::Rng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::GameConfig;
use crate::error::Result;
use crate::geometry::Bounds;
use crate::session::{Session, SessionSnapshot, TapOutcome, ToastTicket};

/// Shared handle to the game session
#[derive(Clone)]
pub struct GameHandle {
    session: Arc<Mutex<Session>>,
    toast_timer: Arc<StdMutex<Option<JoinHandle<()>>>>,
    config: Arc<GameConfig>,
}

impl Default for GameHandle {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameHandle {
    /// Start a fresh session with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_session(Session::new(&config), config)
    }

    /// Wrap an existing session
    pub fn with_session(session: Session, config: GameConfig) -> Self {
        tracing::debug!(session = %session.id(), credits = session.credits(), "Session created");
        Self {
            session: Arc::new(Mutex::new(session)),
            toast_timer: Arc::new(StdMutex::new(None)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Tap the star using the thread-local RNG
    pub async fn tap_star(&self, bounds: Bounds) -> TapReport {
        let mut session = self.session.lock().await;
        let outcome = session.tap_star(&bounds, &mut rand::thread_rng());
        TapReport::new(outcome, &session)
    }

    /// Tap the star with a caller-supplied RNG
    pub async fn tap_star_with<R: Rng + Send>(&self, bounds: Bounds, rng: &mut R) -> TapReport {
        let mut session = self.session.lock().await;
        let outcome = session.tap_star(&bounds, rng);
        TapReport::new(outcome, &session)
    }

    pub async fn request_purchase(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        session.request_purchase();
        session.snapshot()
    }

    pub async fn dismiss_modal(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        session.dismiss_modal();
        session.snapshot()
    }

    /// Grant `credits_granted` and show the confirmation toast
    pub async fn complete_checkout(&self, credits_granted: u32) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        let ticket = session.complete_checkout(credits_granted);
        self.schedule_expiry(ticket);
        session.snapshot()
    }

    /// Grant the configured per-purchase amount
    pub async fn complete_purchase(&self) -> SessionSnapshot {
        self.complete_checkout(self.config.credits_per_purchase).await
    }

    /// Show a toast that clears itself after the configured TTL
    pub async fn show_toast(&self, message: impl Into<String>) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        let ticket = session.show_toast(message);
        self.schedule_expiry(ticket);
        session.snapshot()
    }

    pub async fn clear_toast(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        session.clear_toast();
        self.cancel_expiry();
        session.snapshot()
    }

    // Called with the session lock held so timers are replaced in toast order.
    fn schedule_expiry(&self, ticket: ToastTicket) {
        let session = Arc::clone(&self.session);
        let ttl = self.config.toast_ttl;

        let task = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if session.lock().await.expire_toast(ticket) {
                tracing::debug!("Toast expired");
            }
        });

        let previous = self
            .toast_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn cancel_expiry(&self) {
        let pending = self
            .toast_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pending) = pending {
            pending.abort();
        }
    }
}

/// Result of a tap together with the session state it left behind
#[derive(Clone, Debug)]
pub struct TapReport {
    /// `Err` when the tap was ignored
    pub outcome: Result<TapOutcome>,

    /// Snapshot taken under the same lock as the tap
    pub session: SessionSnapshot,
}

impl TapReport {
    fn new(outcome: Result<TapOutcome>, session: &Session) -> Self {
        if let Err(e) = &outcome {
            tracing::warn!(session = %session.id(), error = %e, "Ignoring tap");
        }
        Self {
            outcome,
            session: session.snapshot(),
        }
    }
}

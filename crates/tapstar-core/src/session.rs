//! Session State
//!
//! The single game session: credits, score, star position and the transient
//! UI flags (buy modal, toast). All mutation goes through named methods so the
//! credit invariants hold regardless of which frontend drives the game.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::geometry::{Bounds, Position};

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the player can keep tapping
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Credits left
    Playable,
    /// Out of credits; the buy modal is shown or dismissible
    Depleted,
}

/// Result of a successful tap
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TapOutcome {
    /// Tap consumed a credit and the session is still playable
    Scored {
        credits: u32,
        score: u64,
        position: Position,
    },
    /// Tap consumed the last credit; the buy modal was opened
    Depleted { score: u64, position: Position },
}

/// Handle identifying one toast write.
///
/// Only the ticket of the current toast can expire it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastTicket(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
struct Toast {
    message: String,
    generation: u64,
}

/// Message shown after a checkout completes
pub fn credits_added_message(credits: u32) -> String {
    format!("+{credits} credits added!")
}

/// A game session
#[derive(Clone, Debug)]
pub struct Session {
    id: SessionId,
    credits: u32,
    score: u64,
    position: Position,
    modal_visible: bool,
    toast: Option<Toast>,
    toast_generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

impl Session {
    /// Create a new session
    pub fn new(config: &GameConfig) -> Self {
        Self::with_credits(config.initial_credits)
    }

    /// Create with a specific credit balance
    pub fn with_credits(credits: u32) -> Self {
        Self {
            id: SessionId::new(),
            credits,
            score: 0,
            position: Position::default(),
            modal_visible: false,
            toast: None,
            toast_generation: 0,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn modal_visible(&self) -> bool {
        self.modal_visible
    }

    /// Current toast message, if any
    pub fn toast(&self) -> Option<&str> {
        self.toast.as_ref().map(|t| t.message.as_str())
    }

    pub fn phase(&self) -> Phase {
        if self.credits > 0 {
            Phase::Playable
        } else {
            Phase::Depleted
        }
    }

    /// Tap the star: spend a credit, score a point and move the star.
    ///
    /// Opens the buy modal when the last credit is spent. Tapping with no
    /// credits leaves the session untouched and returns
    /// [`GameError::PreconditionViolation`].
    pub fn tap_star<R: Rng>(&mut self, bounds: &Bounds, rng: &mut R) -> Result<TapOutcome> {
        if self.credits == 0 {
            return Err(GameError::PreconditionViolation("tap with no credits left"));
        }

        self.credits -= 1;
        self.score += 1;
        self.position = bounds.random_point(rng);

        if self.credits == 0 {
            self.modal_visible = true;
            tracing::info!(session = %self.id, score = self.score, "Credits depleted");
            return Ok(TapOutcome::Depleted {
                score: self.score,
                position: self.position,
            });
        }

        Ok(TapOutcome::Scored {
            credits: self.credits,
            score: self.score,
            position: self.position,
        })
    }

    /// Show the buy modal (also allowed while still playable)
    pub fn request_purchase(&mut self) {
        self.modal_visible = true;
    }

    /// Hide the buy modal
    pub fn dismiss_modal(&mut self) {
        self.modal_visible = false;
    }

    /// Grant credits from a completed checkout and announce them in a toast.
    ///
    /// Duplicate deliveries are not detected: every call adds credits again.
    pub fn complete_checkout(&mut self, credits_granted: u32) -> ToastTicket {
        self.credits = self.credits.saturating_add(credits_granted);
        tracing::info!(
            session = %self.id,
            granted = credits_granted,
            credits = self.credits,
            "Checkout completed"
        );
        self.show_toast(credits_added_message(credits_granted))
    }

    /// Replace the toast. Any pending expiry of the previous toast is invalidated.
    pub fn show_toast(&mut self, message: impl Into<String>) -> ToastTicket {
        self.toast_generation += 1;
        self.toast = Some(Toast {
            message: message.into(),
            generation: self.toast_generation,
        });
        ToastTicket(self.toast_generation)
    }

    /// Remove the toast immediately
    pub fn clear_toast(&mut self) {
        self.toast_generation += 1;
        self.toast = None;
    }

    /// Clear the toast if it is still the one `ticket` was issued for.
    ///
    /// Returns whether a toast was cleared.
    pub fn expire_toast(&mut self, ticket: ToastTicket) -> bool {
        match &self.toast {
            Some(toast) if toast.generation == ticket.0 => {
                self.toast = None;
                true
            }
            _ => false,
        }
    }

    /// Serializable copy of the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            credits: self.credits,
            score: self.score,
            position: self.position,
            modal_visible: self.modal_visible,
            toast: self.toast().map(str::to_owned),
            phase: self.phase(),
        }
    }
}

/// Read-only view handed to the presentation layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub credits: u32,
    pub score: u64,
    pub position: Position,
    pub modal_visible: bool,
    pub toast: Option<String>,
    pub phase: Phase,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bounds() -> Bounds {
        Bounds::for_viewport(390.0, 400.0)
    }

    #[test]
    fn test_initial_state() {
        let session = Session::default();
        assert_eq!(session.credits(), 3);
        assert_eq!(session.score(), 0);
        assert_eq!(session.position(), Position::new(150.0, 300.0));
        assert!(!session.modal_visible());
        assert_eq!(session.toast(), None);
        assert_eq!(session.phase(), Phase::Playable);
    }

    #[test]
    fn test_tap_spends_credit_and_scores() {
        let mut session = Session::with_credits(10);
        let mut rng = StdRng::seed_from_u64(42);

        for n in 1..10u32 {
            let outcome = session.tap_star(&bounds(), &mut rng).unwrap();
            assert!(matches!(outcome, TapOutcome::Scored { .. }));
            assert_eq!(session.credits(), 10 - n);
            assert_eq!(session.score(), u64::from(n));
            assert!(bounds().contains(session.position()));
            assert!(!session.modal_visible());
        }
    }

    #[test]
    fn test_depletion_opens_modal_once() {
        let mut session = Session::default();
        let mut rng = StdRng::seed_from_u64(3);

        session.tap_star(&bounds(), &mut rng).unwrap();
        session.tap_star(&bounds(), &mut rng).unwrap();
        let last = session.tap_star(&bounds(), &mut rng).unwrap();

        assert!(matches!(last, TapOutcome::Depleted { score: 3, .. }));
        assert_eq!(session.credits(), 0);
        assert_eq!(session.score(), 3);
        assert!(session.modal_visible());
        assert_eq!(session.phase(), Phase::Depleted);

        // Dismissed modal must not come back from ignored taps
        session.dismiss_modal();
        let position = session.position();
        for _ in 0..3 {
            let err = session.tap_star(&bounds(), &mut rng).unwrap_err();
            assert!(matches!(err, GameError::PreconditionViolation(_)));
            assert!(!err.is_user_facing());
        }
        assert_eq!(session.credits(), 0);
        assert_eq!(session.score(), 3);
        assert_eq!(session.position(), position);
        assert!(!session.modal_visible());
    }

    #[test]
    fn test_request_purchase_while_playable() {
        let mut session = Session::default();
        session.request_purchase();
        assert!(session.modal_visible());
        assert_eq!(session.phase(), Phase::Playable);

        session.dismiss_modal();
        assert!(!session.modal_visible());
    }

    #[test]
    fn test_complete_checkout_restores_play() {
        let mut session = Session::with_credits(0);
        assert_eq!(session.phase(), Phase::Depleted);

        session.complete_checkout(500);
        assert_eq!(session.credits(), 500);
        assert_eq!(session.phase(), Phase::Playable);
        assert_eq!(session.toast(), Some("+500 credits added!"));
    }

    #[test]
    fn test_duplicate_checkout_grants_twice() {
        let mut session = Session::with_credits(0);
        session.complete_checkout(500);
        session.complete_checkout(500);
        assert_eq!(session.credits(), 1000);
    }

    #[test]
    fn test_stale_ticket_does_not_clear_newer_toast() {
        let mut session = Session::default();
        let first = session.show_toast("first");
        let second = session.show_toast("second");

        assert!(!session.expire_toast(first));
        assert_eq!(session.toast(), Some("second"));

        assert!(session.expire_toast(second));
        assert_eq!(session.toast(), None);
        assert!(!session.expire_toast(second));
    }

    #[test]
    fn test_clear_invalidates_pending_expiry() {
        let mut session = Session::default();
        let ticket = session.show_toast("hello");
        session.clear_toast();
        assert_eq!(session.toast(), None);
        assert!(!session.expire_toast(ticket));
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut session = Session::with_credits(0);
        session.request_purchase();

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["credits"], 0);
        assert_eq!(json["modalVisible"], true);
        assert_eq!(json["phase"], "depleted");
        assert!(json["toast"].is_null());
        assert_eq!(json["id"], session.id().as_str());
    }
}

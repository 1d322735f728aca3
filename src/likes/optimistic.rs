// src/likes/optimistic.rs
//! Client-side optimistic toggle state machine
//!
//! One control instance per like button. Local state flips before the
//! server confirms; the control holds the pre-toggle snapshot so a failed
//! request rolls back exactly. A control that is already Pending ignores
//! further activations, so at most one toggle request is in flight per
//! control.

use serde::{Deserialize, Serialize};

/// The `(liked, count)` pair a control displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeSnapshot {
    pub liked: bool,
    pub count: i64,
}

impl LikeSnapshot {
    pub fn new(liked: bool, count: i64) -> Self {
        Self { liked, count }
    }

    /// The optimistic view after flipping this snapshot
    fn flipped(self) -> Self {
        let count = if self.liked {
            self.count - 1
        } else {
            self.count + 1
        };
        Self {
            liked: !self.liked,
            count: count.max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToggleState {
    Idle(LikeSnapshot),
    Pending {
        original: LikeSnapshot,
        optimistic: LikeSnapshot,
    },
}

/// What the caller must do after an activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// No identity known: go to the sign-in page, contact no server
    RedirectToSignin,
    /// Issue exactly one toggle request; the payload is the optimistic view
    SendToggle(LikeSnapshot),
    /// A request is already in flight; do nothing
    Ignored,
}

/// Optimistic like toggle control
#[derive(Debug, Clone, Copy)]
pub struct LikeToggleControl {
    state: ToggleState,
}

impl LikeToggleControl {
    pub fn new(liked: bool, count: i64) -> Self {
        Self {
            state: ToggleState::Idle(LikeSnapshot::new(liked, count)),
        }
    }

    /// The snapshot the UI currently shows
    pub fn snapshot(&self) -> LikeSnapshot {
        match self.state {
            ToggleState::Idle(snapshot) => snapshot,
            ToggleState::Pending { optimistic, .. } => optimistic,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ToggleState::Pending { .. })
    }

    /// Handle a click/tap on the control
    pub fn activate(&mut self, signed_in: bool) -> Activation {
        if !signed_in {
            return Activation::RedirectToSignin;
        }

        match self.state {
            ToggleState::Pending { .. } => Activation::Ignored,
            ToggleState::Idle(original) => {
                let optimistic = original.flipped();
                self.state = ToggleState::Pending {
                    original,
                    optimistic,
                };
                Activation::SendToggle(optimistic)
            }
        }
    }

    /// Adopt the server's authoritative pair
    ///
    /// Overwrites the optimistic view, correcting drift from other users
    /// moving the shared counter concurrently.
    pub fn settle_success(&mut self, server: LikeSnapshot) {
        self.state = ToggleState::Idle(server);
    }

    /// Roll back to the pre-toggle snapshot after a failed request
    pub fn settle_failure(&mut self) -> LikeSnapshot {
        let restored = match self.state {
            ToggleState::Pending { original, .. } => original,
            ToggleState::Idle(snapshot) => snapshot,
        };
        self.state = ToggleState::Idle(restored);
        restored
    }
}

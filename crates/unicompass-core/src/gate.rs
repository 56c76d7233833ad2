//! Shortlist/lock gate.
//!
//! A student's interest in one university moves through
//! `Unlisted -> Shortlisted -> Locked`. Unlocking returns to `Shortlisted`;
//! nothing returns to `Unlisted`. The API evaluates these transitions inside
//! the transaction that persists them, and the client uses the same rules to
//! refuse obviously invalid actions before calling the API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestState {
    Unlisted,
    Shortlisted,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Shortlist,
    Lock,
    Unlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("University already shortlisted")]
    AlreadyShortlisted,

    #[error("University must be shortlisted before locking")]
    NotShortlisted,

    #[error("University already locked")]
    AlreadyLocked,

    #[error("University not found in locked list")]
    NotLocked,
}

impl InterestState {
    /// Derives the state from the two membership facts. A lock without a
    /// shortlist cannot be persisted, so `locked` wins only alongside it.
    pub fn from_membership(shortlisted: bool, locked: bool) -> Self {
        match (shortlisted, locked) {
            (true, true) => InterestState::Locked,
            (true, false) => InterestState::Shortlisted,
            (false, _) => InterestState::Unlisted,
        }
    }

    pub fn shortlist(self) -> Result<Self, TransitionError> {
        match self {
            InterestState::Unlisted => Ok(InterestState::Shortlisted),
            InterestState::Shortlisted | InterestState::Locked => {
                Err(TransitionError::AlreadyShortlisted)
            }
        }
    }

    pub fn lock(self) -> Result<Self, TransitionError> {
        match self {
            InterestState::Shortlisted => Ok(InterestState::Locked),
            InterestState::Unlisted => Err(TransitionError::NotShortlisted),
            InterestState::Locked => Err(TransitionError::AlreadyLocked),
        }
    }

    pub fn unlock(self) -> Result<Self, TransitionError> {
        match self {
            InterestState::Locked => Ok(InterestState::Shortlisted),
            InterestState::Unlisted | InterestState::Shortlisted => Err(TransitionError::NotLocked),
        }
    }

    pub fn apply(self, action: Action) -> Result<Self, TransitionError> {
        match action {
            Action::Shortlist => self.shortlist(),
            Action::Lock => self.lock(),
            Action::Unlock => self.unlock(),
        }
    }

    /// Actions that would currently succeed, in button order.
    pub fn available_actions(self) -> Vec<Action> {
        [Action::Shortlist, Action::Lock, Action::Unlock]
            .into_iter()
            .filter(|a| self.apply(*a).is_ok())
            .collect()
    }
}

/// Application guidance is open only while at least one university is locked.
/// Recomputed from the locked list on every load; never cached.
pub fn application_unlocked(locked_count: usize) -> bool {
    locked_count >= 1
}

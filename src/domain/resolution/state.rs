// src/domain/resolution/state.rs
//
// Resolution state machine:
//
// RECEIVED -> NORMALIZED -> VERIFIED_PRESENT                      (success)
//                        -> VERIFIED_ABSENT -> SEARCHED -> FOUND     (success)
//                                                       -> NOT_FOUND (failure)
//
// VERIFIED_PRESENT | FOUND -> REJECTED (failure): the located file fails the
// accepted-extensions filter. Without a filter this edge is never taken.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionState {
    Received,
    Normalized,
    VerifiedPresent,
    VerifiedAbsent,
    Searched,
    Found,
    NotFound,
    Rejected,
}

impl ResolutionState {
    pub fn can_transition_to(&self, next: ResolutionState) -> bool {
        use ResolutionState::*;
        matches!(
            (self, next),
            (Received, Normalized)
                | (Normalized, VerifiedPresent)
                | (Normalized, VerifiedAbsent)
                | (VerifiedAbsent, Searched)
                | (Searched, Found)
                | (Searched, NotFound)
                | (VerifiedPresent, Rejected)
                | (Found, Rejected)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResolutionState::VerifiedPresent
                | ResolutionState::Found
                | ResolutionState::NotFound
                | ResolutionState::Rejected
        )
    }

    /// Only meaningful for terminal states
    pub fn is_success(&self) -> bool {
        matches!(self, ResolutionState::VerifiedPresent | ResolutionState::Found)
    }

    /// Checked transition
    pub fn transition(self, next: ResolutionState) -> DomainResult<ResolutionState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidStateTransition(format!(
                "{} -> {}",
                self, next
            )))
        }
    }
}

impl std::fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ResolutionState::Received => "RECEIVED",
            ResolutionState::Normalized => "NORMALIZED",
            ResolutionState::VerifiedPresent => "VERIFIED_PRESENT",
            ResolutionState::VerifiedAbsent => "VERIFIED_ABSENT",
            ResolutionState::Searched => "SEARCHED",
            ResolutionState::Found => "FOUND",
            ResolutionState::NotFound => "NOT_FOUND",
            ResolutionState::Rejected => "REJECTED",
        };
        write!(f, "{}", label)
    }
}

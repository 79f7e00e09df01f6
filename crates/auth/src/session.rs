//! Typed session-state container.
//!
//! Models the client-side sign-in lifecycle, the contract a front-end or
//! CLI drives against the auth endpoints. The HTTP layer itself is
//! stateless and goes straight from bearer token to request context, so
//! nothing server-side holds one of these across requests.
//!
//! A single source of truth for "who is logged in and with what role". All
//! movement between states goes through [`Session::transition`]; invalid
//! transitions are errors, never silent no-ops.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use coffeedocket_core::StaffId;

use crate::Role;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated { staff_id: StaffId, role: Role },
}

/// Something that happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignInStarted,
    SignInSucceeded { staff_id: StaffId, role: Role },
    SignInFailed,
    SignedOut,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session transition: {from:?} on {event:?}")]
    InvalidTransition {
        from: SessionState,
        event: SessionEvent,
    },
}

/// Session container holding the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Anonymous,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        match self.state {
            SessionState::Authenticated { role, .. } => Some(role),
            _ => None,
        }
    }

    /// The single transition function.
    pub fn transition(&mut self, event: SessionEvent) -> Result<SessionState, SessionError> {
        let next = match (self.state, event) {
            (SessionState::Anonymous, SessionEvent::SignInStarted) => SessionState::Authenticating,
            (SessionState::Authenticating, SessionEvent::SignInSucceeded { staff_id, role }) => {
                SessionState::Authenticated { staff_id, role }
            }
            (SessionState::Authenticating, SessionEvent::SignInFailed) => SessionState::Anonymous,
            (SessionState::Authenticated { .. }, SessionEvent::SignedOut) => {
                SessionState::Anonymous
            }
            (from, event) => return Err(SessionError::InvalidTransition { from, event }),
        };
        self.state = next;
        Ok(next)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_sign_in_and_out() {
        let mut s = Session::new();
        assert_eq!(s.state(), SessionState::Anonymous);

        s.transition(SessionEvent::SignInStarted).unwrap();
        assert_eq!(s.state(), SessionState::Authenticating);

        let staff_id = StaffId::new();
        s.transition(SessionEvent::SignInSucceeded {
            staff_id,
            role: Role::Staff,
        })
        .unwrap();
        assert_eq!(s.role(), Some(Role::Staff));

        s.transition(SessionEvent::SignedOut).unwrap();
        assert_eq!(s.state(), SessionState::Anonymous);
    }

    #[test]
    fn failed_sign_in_returns_to_anonymous() {
        let mut s = Session::new();
        s.transition(SessionEvent::SignInStarted).unwrap();
        s.transition(SessionEvent::SignInFailed).unwrap();
        assert_eq!(s.state(), SessionState::Anonymous);
    }

    #[test]
    fn cannot_succeed_without_starting() {
        let mut s = Session::new();
        let err = s
            .transition(SessionEvent::SignInSucceeded {
                staff_id: StaffId::new(),
                role: Role::Admin,
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
        // State is untouched on a rejected transition.
        assert_eq!(s.state(), SessionState::Anonymous);
    }

    #[test]
    fn cannot_sign_out_while_anonymous() {
        let mut s = Session::new();
        assert!(s.transition(SessionEvent::SignedOut).is_err());
    }
}

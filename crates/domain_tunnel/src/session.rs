//! Tunnel session state machine
//!
//! ```text
//! INIT -> HANDSHAKING -> ESTABLISHED -> CLOSED
//!              |              |
//!              +--------------+-------> EXPIRED
//! ```
//!
//! INIT and HANDSHAKING are transient, ESTABLISHED is the only usable state,
//! and CLOSED and EXPIRED are terminal. Every transition is appended to the
//! session's history, which therefore only ever moves forward.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, TunnelId};
use crate::error::TunnelError;

/// Tunnel session state, ordered by lifecycle position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TunnelState {
    Init,
    Handshaking,
    Established,
    Closed,
    Expired,
}

impl TunnelState {
    pub const ALL: [TunnelState; 5] = [
        TunnelState::Init,
        TunnelState::Handshaking,
        TunnelState::Established,
        TunnelState::Closed,
        TunnelState::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TunnelState::Init => "INIT",
            TunnelState::Handshaking => "HANDSHAKING",
            TunnelState::Established => "ESTABLISHED",
            TunnelState::Closed => "CLOSED",
            TunnelState::Expired => "EXPIRED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TunnelState::Closed | TunnelState::Expired)
    }

    /// Non-terminal; at most one live session may exist per claim
    pub fn is_live(&self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(&self, target: TunnelState) -> bool {
        use TunnelState::*;
        matches!(
            (self, target),
            (Init, Handshaking)
                | (Handshaking, Established)
                | (Handshaking, Closed)
                | (Handshaking, Expired)
                | (Established, Closed)
                | (Established, Expired)
        )
    }
}

impl fmt::Display for TunnelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a session's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelTransition {
    pub from: TunnelState,
    pub to: TunnelState,
    pub at: DateTime<Utc>,
}

/// A secured session associated with one claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelSession {
    pub id: TunnelId,
    pub claim_id: ClaimId,
    pub protocol: String,
    pub encryption: String,
    pub state: TunnelState,
    pub created_at: DateTime<Utc>,
    /// Fixed at creation
    pub expires_at: DateTime<Utc>,
    /// Set by an explicit close only
    pub closed_at: Option<DateTime<Utc>>,
    pub transitions: Vec<TunnelTransition>,
}

impl TunnelSession {
    /// Creates a session in INIT with `expires_at = now + timeout`
    pub fn open(
        claim_id: ClaimId,
        protocol: impl Into<String>,
        encryption: impl Into<String>,
        timeout: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TunnelId::new_v7(),
            claim_id,
            protocol: protocol.into(),
            encryption: encryption.into(),
            state: TunnelState::Init,
            created_at: now,
            expires_at: now + timeout,
            closed_at: None,
            transitions: Vec::new(),
        }
    }

    fn transition(&mut self, to: TunnelState, at: DateTime<Utc>) -> Result<(), TunnelError> {
        if !self.state.can_transition_to(to) {
            return Err(TunnelError::InvalidTransition {
                tunnel_id: self.id,
                from: self.state,
                to,
            });
        }
        self.transitions.push(TunnelTransition {
            from: self.state,
            to,
            at,
        });
        self.state = to;
        Ok(())
    }

    pub fn begin_handshake(&mut self, now: DateTime<Utc>) -> Result<(), TunnelError> {
        self.transition(TunnelState::Handshaking, now)
    }

    pub fn establish(&mut self, now: DateTime<Utc>) -> Result<(), TunnelError> {
        self.transition(TunnelState::Established, now)
    }

    /// Closes a live session and records `closed_at`
    pub fn close(&mut self, now: DateTime<Utc>) -> Result<(), TunnelError> {
        self.transition(TunnelState::Closed, now)?;
        self.closed_at = Some(now);
        Ok(())
    }

    pub fn expire(&mut self, now: DateTime<Utc>) -> Result<(), TunnelError> {
        self.transition(TunnelState::Expired, now)
    }

    /// True when the session is live but its lifetime has run out
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.state.is_live() && self.expires_at <= now
    }

    /// Moves a due session to EXPIRED, returning whether it did
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        // A due session is live, so the transition cannot fail
        self.is_due(now) && self.expire(self.expires_at.min(now)).is_ok()
    }

    /// Copy of the session as it would look after a sweep at `now`
    pub fn observed_at(&self, now: DateTime<Utc>) -> TunnelSession {
        let mut view = self.clone();
        view.expire_if_due(now);
        view
    }

    pub fn is_usable(&self) -> bool {
        self.state == TunnelState::Established
    }

    /// Whole seconds of lifetime left, zero once terminal or due
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        if self.state.is_terminal() {
            return 0;
        }
        (self.expires_at - now).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn established() -> TunnelSession {
        let mut session =
            TunnelSession::open(ClaimId::new(), "TLS", "AES-256", Duration::seconds(60), start());
        session.begin_handshake(start()).unwrap();
        session.establish(start()).unwrap();
        session
    }

    #[test]
    fn test_open_sets_expiry() {
        let session =
            TunnelSession::open(ClaimId::new(), "TLS", "AES-256", Duration::seconds(60), start());
        assert_eq!(session.state, TunnelState::Init);
        assert_eq!(session.expires_at - session.created_at, Duration::seconds(60));
        assert!(session.transitions.is_empty());
    }

    #[test]
    fn test_happy_path_history() {
        let session = established();
        let path: Vec<(TunnelState, TunnelState)> =
            session.transitions.iter().map(|t| (t.from, t.to)).collect();
        assert_eq!(
            path,
            vec![
                (TunnelState::Init, TunnelState::Handshaking),
                (TunnelState::Handshaking, TunnelState::Established),
            ]
        );
        assert!(session.is_usable());
    }

    #[test]
    fn test_cannot_skip_handshake() {
        let mut session =
            TunnelSession::open(ClaimId::new(), "TLS", "AES-256", Duration::seconds(60), start());
        assert!(matches!(
            session.establish(start()),
            Err(TunnelError::InvalidTransition { from: TunnelState::Init, .. })
        ));
    }

    #[test]
    fn test_close_sets_closed_at_once() {
        let mut session = established();
        let closed_at = start() + Duration::seconds(10);
        session.close(closed_at).unwrap();
        assert_eq!(session.closed_at, Some(closed_at));

        assert!(session.close(closed_at + Duration::seconds(1)).is_err());
        assert_eq!(session.closed_at, Some(closed_at));
    }

    #[test]
    fn test_expire_if_due() {
        let mut session = established();
        assert!(!session.expire_if_due(start() + Duration::seconds(59)));
        assert!(session.expire_if_due(start() + Duration::seconds(60)));
        assert_eq!(session.state, TunnelState::Expired);
        assert!(session.closed_at.is_none());
        assert!(!session.expire_if_due(start() + Duration::seconds(120)));
    }

    #[test]
    fn test_observed_at_leaves_original_untouched() {
        let session = established();
        let view = session.observed_at(start() + Duration::seconds(61));
        assert_eq!(view.state, TunnelState::Expired);
        assert_eq!(session.state, TunnelState::Established);
    }

    #[test]
    fn test_state_serializes_screaming() {
        assert_eq!(
            serde_json::to_value(TunnelState::Established).unwrap(),
            "ESTABLISHED"
        );
    }
}

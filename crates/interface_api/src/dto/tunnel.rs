//! Tunnel DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ClaimId, TunnelId};
use domain_tunnel::{TunnelSession, TunnelState, TunnelTransition};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTunnelRequest {
    pub claim_id: ClaimId,
    #[validate(length(min = 1, max = 64))]
    pub protocol: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub encryption: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TunnelResponse {
    pub id: TunnelId,
    pub claim_id: ClaimId,
    pub protocol: String,
    pub encryption: String,
    pub state: TunnelState,
    pub usable: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub seconds_remaining: i64,
    pub transitions: Vec<TunnelTransition>,
}

impl TunnelResponse {
    pub fn from_session(session: TunnelSession, now: DateTime<Utc>) -> Self {
        Self {
            usable: session.is_usable(),
            seconds_remaining: session.seconds_remaining(now),
            id: session.id,
            claim_id: session.claim_id,
            protocol: session.protocol,
            encryption: session.encryption,
            state: session.state,
            created_at: session.created_at,
            expires_at: session.expires_at,
            closed_at: session.closed_at,
            transitions: session.transitions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub expired: usize,
}

//! Tunnel lifecycle manager
//!
//! Sessions are held in a map of per-session mutexes keyed by tunnel id. A
//! second map keyed by claim id holds a slot per claim; creation locks the
//! claim's slot for the whole check-then-create, so concurrent creations for
//! one claim serialize while other claims proceed in parallel.
//!
//! Lock order is always slot, then session. Sweeps and reads lock sessions
//! only.
//!
//! Expiry is evaluated against the injected clock. Every read sweeps the
//! session it touches, and [`TunnelLifecycleManager::sweep_expired`] sweeps
//! the whole table.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use core_kernel::{ClaimId, SharedClock, TunnelId};

use crate::config::TunnelConfig;
use crate::error::TunnelError;
use crate::session::TunnelSession;

type SessionHandle = Arc<Mutex<TunnelSession>>;

/// Sessions ever opened for one claim
#[derive(Debug, Default)]
struct ClaimSlot {
    /// Most recent session; live unless it has been closed or has expired
    current: Option<TunnelId>,
    /// Oldest first
    history: Vec<TunnelId>,
}

/// Owns every tunnel session and drives their state machines
///
/// Sessions are never evicted. Closed and expired tunnels stay in memory
/// so `get_tunnel` and the per-claim history keep answering for them, which
/// means memory grows with the number of tunnels opened over the process
/// lifetime.
#[derive(Debug)]
pub struct TunnelLifecycleManager {
    config: TunnelConfig,
    clock: SharedClock,
    /// Every session ever opened, ended ones included
    sessions: RwLock<HashMap<TunnelId, SessionHandle>>,
    /// One slot per claim that has had a tunnel
    slots: RwLock<HashMap<ClaimId, Arc<Mutex<ClaimSlot>>>>,
}

impl TunnelLifecycleManager {
    pub fn new(config: TunnelConfig, clock: SharedClock) -> Self {
        Self {
            config,
            clock,
            sessions: RwLock::new(HashMap::new()),
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TunnelConfig {
        &self.config
    }

    async fn handle(&self, id: TunnelId) -> Result<SessionHandle, TunnelError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(TunnelError::NotFound(id))
    }

    async fn slot(&self, claim_id: ClaimId) -> Arc<Mutex<ClaimSlot>> {
        if let Some(slot) = self.slots.read().await.get(&claim_id) {
            return slot.clone();
        }
        self.slots
            .write()
            .await
            .entry(claim_id)
            .or_default()
            .clone()
    }

    fn resolve_label(requested: Option<String>, default: &str, field: &str) -> Result<String, TunnelError> {
        match requested {
            None => Ok(default.to_string()),
            Some(label) if label.trim().is_empty() => {
                Err(TunnelError::Validation(format!("{field} must not be blank")))
            }
            Some(label) => Ok(label.trim().to_string()),
        }
    }

    /// Opens a session for a claim and runs the handshake to ESTABLISHED
    ///
    /// Missing labels fall back to the configured protocol and encryption.
    ///
    /// # Errors
    ///
    /// Returns `ActiveSessionExists` while the claim has a live session, and
    /// `Validation` for a blank label.
    pub async fn create_tunnel(
        &self,
        claim_id: ClaimId,
        protocol: Option<String>,
        encryption: Option<String>,
    ) -> Result<TunnelSession, TunnelError> {
        let protocol = Self::resolve_label(protocol, &self.config.protocol, "protocol")?;
        let encryption = Self::resolve_label(encryption, &self.config.encryption, "encryption")?;

        let slot = self.slot(claim_id).await;
        let mut slot = slot.lock().await;
        let now = self.clock.now();

        if let Some(current) = slot.current {
            let handle = self.handle(current).await?;
            let mut existing = handle.lock().await;
            if existing.expire_if_due(now) {
                info!(tunnel_id = %current, claim_id = %claim_id, "Tunnel expired");
            }
            if existing.state.is_live() {
                return Err(TunnelError::ActiveSessionExists {
                    claim_id,
                    tunnel_id: current,
                });
            }
        }

        let mut session =
            TunnelSession::open(claim_id, protocol, encryption, self.config.timeout(), now);
        session.begin_handshake(now)?;
        // No remote peer: the handshake completes synchronously
        session.establish(now)?;

        self.sessions
            .write()
            .await
            .insert(session.id, Arc::new(Mutex::new(session.clone())));
        slot.current = Some(session.id);
        slot.history.push(session.id);

        info!(
            tunnel_id = %session.id,
            claim_id = %claim_id,
            protocol = %session.protocol,
            encryption = %session.encryption,
            expires_at = %session.expires_at,
            "Tunnel established"
        );

        Ok(session)
    }

    /// Gets a session, expiring it first if its lifetime has run out
    pub async fn get_tunnel(&self, id: TunnelId) -> Result<TunnelSession, TunnelError> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        if session.expire_if_due(self.clock.now()) {
            info!(tunnel_id = %id, claim_id = %session.claim_id, "Tunnel expired");
        }
        Ok(session.clone())
    }

    /// Closes a live session
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the session is already closed or has
    /// expired, including one that expires on this very call.
    pub async fn close_tunnel(&self, id: TunnelId) -> Result<TunnelSession, TunnelError> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        let now = self.clock.now();
        if session.expire_if_due(now) {
            info!(tunnel_id = %id, claim_id = %session.claim_id, "Tunnel expired");
        }
        session.close(now)?;
        info!(tunnel_id = %id, claim_id = %session.claim_id, "Tunnel closed");
        Ok(session.clone())
    }

    /// Expires every live session whose lifetime has run out
    ///
    /// Returns the number of sessions expired by this call.
    pub async fn sweep_expired(&self) -> usize {
        let handles: Vec<SessionHandle> = self.sessions.read().await.values().cloned().collect();
        let now = self.clock.now();
        let mut expired = 0;
        for handle in handles {
            let mut session = handle.lock().await;
            if session.expire_if_due(now) {
                debug!(tunnel_id = %session.id, claim_id = %session.claim_id, "Tunnel expired by sweep");
                expired += 1;
            }
        }
        if expired > 0 {
            info!(expired, "Tunnel sweep completed");
        }
        expired
    }

    /// The claim's live session, if any
    pub async fn active_tunnel_for_claim(
        &self,
        claim_id: ClaimId,
    ) -> Result<Option<TunnelSession>, TunnelError> {
        let slot = match self.slots.read().await.get(&claim_id) {
            Some(slot) => slot.clone(),
            None => return Ok(None),
        };
        let current = slot.lock().await.current;
        match current {
            Some(id) => {
                let session = self.get_tunnel(id).await?;
                Ok(session.state.is_live().then_some(session))
            }
            None => Ok(None),
        }
    }

    /// Every session opened for a claim, newest first
    pub async fn tunnels_for_claim(
        &self,
        claim_id: ClaimId,
    ) -> Result<Vec<TunnelSession>, TunnelError> {
        let slot = match self.slots.read().await.get(&claim_id) {
            Some(slot) => slot.clone(),
            None => return Ok(Vec::new()),
        };
        let history = slot.lock().await.history.clone();
        let mut sessions = Vec::with_capacity(history.len());
        for id in history.into_iter().rev() {
            sessions.push(self.get_tunnel(id).await?);
        }
        Ok(sessions)
    }

    /// Read-only view of every session as observed now, newest first
    pub async fn snapshot(&self) -> Vec<TunnelSession> {
        let handles: Vec<SessionHandle> = self.sessions.read().await.values().cloned().collect();
        let now = self.clock.now();
        let mut sessions = Vec::with_capacity(handles.len());
        for handle in handles {
            sessions.push(handle.lock().await.observed_at(now));
        }
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        sessions
    }

    /// Number of sessions ever opened
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

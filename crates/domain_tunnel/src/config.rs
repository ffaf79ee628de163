//! Tunnel configuration

use serde::{Deserialize, Serialize};

use core_kernel::CoreError;

/// Defaults applied to new tunnel sessions and to the sweeper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelConfig {
    /// Protocol label used when a request names none
    pub protocol: String,
    /// Encryption label used when a request names none
    pub encryption: String,
    /// Session lifetime in seconds
    pub timeout_secs: u64,
    /// Seconds between background sweeps
    pub sweep_interval_secs: u64,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            protocol: "TLS".to_string(),
            encryption: "AES-256".to_string(),
            timeout_secs: 60,
            sweep_interval_secs: 5,
        }
    }
}

impl TunnelConfig {
    pub fn timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.timeout_secs).unwrap_or(i64::MAX))
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.protocol.trim().is_empty() {
            return Err(CoreError::configuration("TUNNEL_PROTOCOL must not be empty"));
        }
        if self.encryption.trim().is_empty() {
            return Err(CoreError::configuration("TUNNEL_ENCRYPTION must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::configuration("TUNNEL_TIMEOUT must be at least 1 second"));
        }
        // Bounded so chrono arithmetic on expires_at cannot overflow
        if self.timeout_secs > 86_400 * 365 {
            return Err(CoreError::configuration("TUNNEL_TIMEOUT must be at most one year"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(CoreError::configuration(
                "TUNNEL_SWEEP_INTERVAL must be at least 1 second",
            ));
        }
        Ok(())
    }
}

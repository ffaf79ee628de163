//! API configuration
//!
//! One [`AppConfig`] is assembled at start-up from built-in defaults and the
//! process environment, then split into the per-domain configs handed to
//! constructors. Nothing else reads the environment.

use std::collections::HashMap;
use std::fmt;

use axum::http::HeaderValue;
use serde::Deserialize;

use core_kernel::CoreError;
use domain_claims::ScoringConfig;
use domain_tunnel::TunnelConfig;

/// Deployment profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    Testing,
    Production,
}

impl AppEnv {
    /// Debug output is on by default in development only
    pub fn default_debug(&self) -> bool {
        matches!(self, AppEnv::Development)
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AppEnv::Development => "development",
            AppEnv::Testing => "testing",
            AppEnv::Production => "production",
        })
    }
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_env: AppEnv,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Overrides the profile's debug default when set
    pub debug: Option<bool>,
    /// Log level
    pub log_level: String,
    /// Comma-separated origins, or `*`
    pub cors_origins: String,
    pub ai_model_version: String,
    pub ai_accuracy_threshold: f64,
    pub ai_fraud_cutoff: f64,
    pub ai_batch_size: usize,
    pub tunnel_protocol: String,
    pub tunnel_encryption: String,
    /// Seconds
    pub tunnel_timeout: u64,
    /// Seconds
    pub tunnel_sweep_interval: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let scoring = ScoringConfig::default();
        let tunnel = TunnelConfig::default();
        Self {
            app_env: AppEnv::Development,
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: None,
            log_level: "info".to_string(),
            cors_origins: "*".to_string(),
            ai_model_version: scoring.model_version,
            ai_accuracy_threshold: scoring.accuracy_threshold,
            ai_fraud_cutoff: scoring.fraud_cutoff,
            ai_batch_size: scoring.batch_size,
            tunnel_protocol: tunnel.protocol,
            tunnel_encryption: tunnel.encryption,
            tunnel_timeout: tunnel.timeout_secs,
            tunnel_sweep_interval: tunnel.sweep_interval_secs,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::build(config::Environment::default())
    }

    /// Loads configuration from an explicit variable map instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        Self::build(config::Environment::default().source(Some(vars)))
    }

    fn build(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("app_env", defaults.app_env.to_string())?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("cors_origins", defaults.cors_origins)?
            .set_default("ai_model_version", defaults.ai_model_version)?
            .set_default("ai_accuracy_threshold", defaults.ai_accuracy_threshold)?
            .set_default("ai_fraud_cutoff", defaults.ai_fraud_cutoff)?
            .set_default("ai_batch_size", defaults.ai_batch_size as i64)?
            .set_default("tunnel_protocol", defaults.tunnel_protocol)?
            .set_default("tunnel_encryption", defaults.tunnel_encryption)?
            .set_default("tunnel_timeout", defaults.tunnel_timeout as i64)?
            .set_default("tunnel_sweep_interval", defaults.tunnel_sweep_interval as i64)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// A config for tests: testing profile, debug off unless overridden
    pub fn testing() -> Self {
        Self {
            app_env: AppEnv::Testing,
            ..Default::default()
        }
    }

    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or_else(|| self.app_env.default_debug())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            accuracy_threshold: self.ai_accuracy_threshold,
            fraud_cutoff: self.ai_fraud_cutoff,
            batch_size: self.ai_batch_size,
            model_version: self.ai_model_version.clone(),
        }
    }

    pub fn tunnel_config(&self) -> TunnelConfig {
        TunnelConfig {
            protocol: self.tunnel_protocol.clone(),
            encryption: self.tunnel_encryption.clone(),
            timeout_secs: self.tunnel_timeout,
            sweep_interval_secs: self.tunnel_sweep_interval,
        }
    }

    /// Explicit CORS origins; `None` allows any origin
    pub fn allowed_origins(&self) -> Result<Option<Vec<HeaderValue>>, CoreError> {
        let origins: Vec<&str> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() || origins.contains(&"*") {
            return Ok(None);
        }
        origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| {
                    CoreError::configuration(format!("CORS_ORIGINS contains an invalid origin: {origin}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.scoring_config().validate()?;
        self.tunnel_config().validate()?;
        self.allowed_origins()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let config = AppConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.port, 5000);
        assert_eq!(config.ai_fraud_cutoff, 0.7);
        assert_eq!(config.ai_accuracy_threshold, 0.85);
        assert_eq!(config.ai_batch_size, 50);
        assert_eq!(config.tunnel_protocol, "TLS");
        assert_eq!(config.tunnel_timeout, 60);
        assert!(config.is_debug());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("APP_ENV", "production"),
            ("PORT", "8080"),
            ("AI_FRAUD_CUTOFF", "0.6"),
            ("TUNNEL_TIMEOUT", "120"),
            ("TUNNEL_ENCRYPTION", "ChaCha20"),
        ]))
        .unwrap();

        assert_eq!(config.app_env, AppEnv::Production);
        assert!(!config.is_debug());
        assert_eq!(config.port, 8080);
        assert_eq!(config.scoring_config().fraud_cutoff, 0.6);
        assert_eq!(config.tunnel_config().timeout_secs, 120);
        assert_eq!(config.tunnel_config().encryption, "ChaCha20");
    }

    #[test]
    fn test_debug_flag_overrides_profile() {
        let config = AppConfig::from_vars(vars(&[("APP_ENV", "production"), ("DEBUG", "true")]))
            .unwrap();
        assert!(config.is_debug());
    }

    #[test]
    fn test_out_of_range_threshold_fails_validation() {
        let config = AppConfig {
            ai_accuracy_threshold: 1.5,
            ..AppConfig::testing()
        };
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_cors_origins() {
        assert!(AppConfig::testing().allowed_origins().unwrap().is_none());

        let config = AppConfig {
            cors_origins: "http://a.example, http://b.example".to_string(),
            ..AppConfig::testing()
        };
        assert_eq!(config.allowed_origins().unwrap().unwrap().len(), 2);
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::services::ledger::DEFAULT_DONATION_POINTS_PER_UNIT;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Where points records and profiles are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process memory only; lost on restart
    Memory,
    /// A single JSON document on disk
    JsonFile,
    /// Cloud Firestore
    Firestore,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "json" | "file" => Ok(StoreBackend::JsonFile),
            "firestore" => Ok(StoreBackend::Firestore),
            other => Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    pub store_backend: StoreBackend,
    /// JSON document path for the file backend
    pub points_file: PathBuf,
    /// GCP project ID (required for the Firestore backend)
    pub gcp_project_id: Option<String>,
    /// Points awarded per currency unit donated
    pub donation_points_per_unit: f64,
    /// Key required in `X-Admin-Key` for admin operations (open when unset)
    pub admin_api_key: Option<String>,
}

impl Config {
    /// In-memory config for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            store_backend: StoreBackend::Memory,
            points_file: PathBuf::from("data/userPoints.json"),
            gcp_project_id: None,
            donation_points_per_unit: DEFAULT_DONATION_POINTS_PER_UNIT,
            admin_api_key: None,
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", v))?,
            None => 8080,
        };

        let store_backend = match lookup("STORE_BACKEND") {
            Some(v) => v.parse()?,
            None => StoreBackend::JsonFile,
        };

        let gcp_project_id = lookup("GCP_PROJECT_ID").filter(|v| !v.trim().is_empty());
        if store_backend == StoreBackend::Firestore && gcp_project_id.is_none() {
            return Err(ConfigError::Missing("GCP_PROJECT_ID"));
        }

        let donation_points_per_unit = match lookup("DONATION_POINTS_PER_UNIT") {
            Some(v) => {
                let rate: f64 = v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("DONATION_POINTS_PER_UNIT", v.clone()))?;
                if !rate.is_finite() || rate < 0.0 {
                    return Err(ConfigError::Invalid("DONATION_POINTS_PER_UNIT", v));
                }
                rate
            }
            None => DEFAULT_DONATION_POINTS_PER_UNIT,
        };

        Ok(Self {
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            port,
            store_backend,
            points_file: lookup("POINTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/userPoints.json")),
            gcp_project_id,
            donation_points_per_unit,
            admin_api_key: lookup("ADMIN_API_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).expect("Config should load");

        assert_eq!(config.port, 8080);
        assert_eq!(config.store_backend, StoreBackend::JsonFile);
        assert_eq!(config.points_file, PathBuf::from("data/userPoints.json"));
        assert_eq!(config.donation_points_per_unit, 1.0);
        assert!(config.admin_api_key.is_none());
    }

    #[test]
    fn test_firestore_requires_project() {
        let err = Config::from_lookup(lookup(&[("STORE_BACKEND", "firestore")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GCP_PROJECT_ID")));

        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "Firestore"),
            ("GCP_PROJECT_ID", "eightvents"),
        ]))
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Firestore);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("STORE_BACKEND", "mysql")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DONATION_POINTS_PER_UNIT", "-2")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DONATION_POINTS_PER_UNIT", "NaN")])).is_err());

        let config =
            Config::from_lookup(lookup(&[("DONATION_POINTS_PER_UNIT", "2.5")])).unwrap();
        assert_eq!(config.donation_points_per_unit, 2.5);
    }
}

// src/config.rs
use std::net::SocketAddr;

use thiserror::Error;

use crate::services::completion::gemini::GeminiConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub gemini: GeminiConfig,
}

impl Config {
    /// Load from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let addr = format!("{}:{}", host.trim(), port);
        let bind_addr = addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid { key: "HOST", value: host.clone() })?;

        let mut gemini = GeminiConfig::new(get("GEMINI_API_KEY"));
        if let Some(model) = get("GEMINI_MODEL") {
            gemini.model = model;
        }
        if let Some(base) = get("GEMINI_API_BASE") {
            gemini.api_base = base;
        }

        Ok(Self { bind_addr, gemini })
    }
}

//! Process configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).
//! Everything downstream receives values, never reads the environment itself.

use std::env;

use crate::error::StudioError;
use crate::Result;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PORT: u16 = 8080;

/// Advisory usage limits shown on the form. Not enforced.
pub const ADVISORY_REQUESTS_PER_MINUTE: u32 = 10;
pub const ADVISORY_REQUESTS_PER_DAY: u32 = 250;

#[derive(Clone)]
pub struct StudioConfig {
    pub google_api_key: String,
    pub serp_api_key: String,
    pub model: String,
    pub dev_mode: bool,
    pub port: u16,
}

impl StudioConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let google_api_key = non_empty("GOOGLE_API_KEY")
            .or_else(|| non_empty("GEMINI_API_KEY"))
            .ok_or_else(|| {
                StudioError::Config("GOOGLE_API_KEY (or GEMINI_API_KEY) is not set".to_string())
            })?;

        let serp_api_key = non_empty("SERP_API_KEY")
            .ok_or_else(|| StudioError::Config("SERP_API_KEY is not set".to_string()))?;

        let model = non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                StudioError::Config(format!("PORT must be a port number, got {:?}", raw))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            google_api_key,
            serp_api_key,
            model,
            dev_mode: parse_flag(lookup("DEV_MODE").as_deref()),
            port,
        })
    }
}

impl std::fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioConfig")
            .field("google_api_key", &"<redacted>")
            .field("serp_api_key", &"<redacted>")
            .field("model", &self.model)
            .field("dev_mode", &self.dev_mode)
            .field("port", &self.port)
            .finish()
    }
}

/// Interpret a boolean environment flag. Unset or unrecognised means off.
pub fn parse_flag(value: Option<&str>) -> bool {
    match value {
        Some(v) => matches!(
            v.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => false,
    }
}

//! Connection settings for a [`Client`](crate::Client).

use serde::Deserialize;

use crate::error::ApiError;

pub const URL_VAR: &str = "GITLAB_URL";
pub const TOKEN_VAR: &str = "GITLAB_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// API root, e.g. `https://gitlab.example.com/api/v4`.
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    /// Reads `GITLAB_URL` and `GITLAB_TOKEN` from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup(URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ApiError::MissingConfig(URL_VAR))?;
        let token = lookup(TOKEN_VAR).filter(|token| !token.is_empty());
        Ok(Self { base_url, token })
    }
}

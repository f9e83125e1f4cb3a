//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{DEFAULT_EMAIL_SUFFIX, EmailSuffix};

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Configuration values for reaching the StudBud backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STUDBUD")]
pub struct ClientSettings {
    /// Base URL of the StudBud REST API.
    pub api_url: Option<String>,
    /// Domain suffix every sign-in email must carry.
    pub email_suffix: Option<String>,
    /// Per-request timeout in seconds. Zero means no timeout.
    #[ortho_config(default = 0)]
    pub request_timeout_secs: u64,
}

impl ClientSettings {
    /// Return the configured API URL, falling back to the local default.
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Parse the configured API URL.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when the value is not an absolute URL.
    pub fn api_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.api_url())
    }

    /// Return the configured email suffix, falling back to the campus default.
    pub fn email_suffix(&self) -> EmailSuffix {
        EmailSuffix::new(
            self.email_suffix
                .as_deref()
                .filter(|suffix| !suffix.trim().is_empty())
                .unwrap_or(DEFAULT_EMAIL_SUFFIX),
        )
    }

    /// Return the request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        Some(self.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

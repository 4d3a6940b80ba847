//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! front controller. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Asset tree and front-end script settings.
    pub assets: AssetConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Asset tree and front-end script graph configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Absolute path of the directory static files are served from.
    /// No trailing slash.
    pub asset_root: String,

    /// Root-relative file served for `/favicon.ico` requests.
    pub favicon: String,

    /// Optional manifest route rewrite.
    pub manifest: Option<ManifestConfig>,

    /// Path prefix under which scripts are always eligible for static
    /// serving. Must start and end with `/`.
    pub front_prefix: String,

    /// Specifier prefix marking modules that live in the shared
    /// dependency directory under the asset root.
    pub module_root: String,

    /// Root-relative entry-point scripts seeding the servable registry.
    pub entry_scripts: Vec<String>,

    /// Extra loader-call identifiers that count as reference sites,
    /// beyond the fixed import forms.
    pub script_calls: Vec<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_root: String::new(),
            favicon: "/favicon.ico".to_string(),
            manifest: None,
            front_prefix: "/front/".to_string(),
            module_root: "/node_modules/".to_string(),
            entry_scripts: Vec::new(),
            script_calls: Vec::new(),
        }
    }
}

/// Manifest route rewrite: requests for `route` serve `file` instead.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManifestConfig {
    /// Logical request path (e.g., "/manifest.json").
    pub route: String,

    /// Root-relative file actually served.
    pub file: String,
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Secret used to sign session cookie values.
    pub secret: String,

    /// Cookie name.
    pub cookie_name: String,

    /// Cookie max-age in seconds.
    pub max_age_secs: u64,

    /// SameSite policy.
    pub same_site: SameSite,

    /// Only send the cookie over HTTPS.
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            cookie_name: "fgSid".to_string(),
            max_age_secs: 30 * 24 * 60 * 60,
            same_site: SameSite::Strict,
            secure: false,
        }
    }
}

/// Cookie SameSite policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl std::fmt::Display for SameSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
///
/// Multipart uploads are buffered fully in memory before the executor
/// runs, so this bound is what keeps concurrent large uploads in check.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

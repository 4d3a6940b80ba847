//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check value shapes (absolute asset root, prefix delimiters)
//! - Compile-check the configured script-call patterns
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::ServerConfig;
use crate::scanner::extract::RefExtractor;

/// A single semantic problem found in the configuration.
#[derive(Debug)]
pub enum ValidationError {
    /// The asset root must be a non-empty absolute path without a
    /// trailing slash.
    AssetRoot(String),
    /// The front-end prefix must start and end with `/`.
    FrontPrefix(String),
    /// The dependency-root marker must start and end with `/`.
    ModuleRoot(String),
    /// The session secret must not be empty.
    EmptySecret,
    /// The bind address must parse as a socket address.
    BindAddress(String),
    /// The body limit must be positive.
    ZeroBodyLimit,
    /// A script-call identifier did not compile into a pattern.
    ScriptCall(String, regex::Error),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::AssetRoot(value) => {
                write!(f, "assets.asset_root must be absolute without trailing slash: {value:?}")
            }
            ValidationError::FrontPrefix(value) => {
                write!(f, "assets.front_prefix must start and end with '/': {value:?}")
            }
            ValidationError::ModuleRoot(value) => {
                write!(f, "assets.module_root must start and end with '/': {value:?}")
            }
            ValidationError::EmptySecret => write!(f, "session.secret must not be empty"),
            ValidationError::BindAddress(value) => {
                write!(f, "listener.bind_address is not a socket address: {value:?}")
            }
            ValidationError::ZeroBodyLimit => write!(f, "limits.max_body_bytes must be positive"),
            ValidationError::ScriptCall(name, err) => {
                write!(f, "assets.script_calls entry {name:?} is not usable: {err}")
            }
        }
    }
}

fn slash_delimited(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('/') && value.ends_with('/')
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let root = &config.assets.asset_root;
    if root.is_empty() || !root.starts_with('/') || root.ends_with('/') {
        errors.push(ValidationError::AssetRoot(root.clone()));
    }
    if !slash_delimited(&config.assets.front_prefix) {
        errors.push(ValidationError::FrontPrefix(config.assets.front_prefix.clone()));
    }
    if !slash_delimited(&config.assets.module_root) {
        errors.push(ValidationError::ModuleRoot(config.assets.module_root.clone()));
    }
    if config.session.secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }
    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    for call in &config.assets.script_calls {
        if let Err(err) = RefExtractor::new(std::slice::from_ref(call)) {
            errors.push(ValidationError::ScriptCall(call.clone(), err));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Asset-vs-execute classification.
//!
//! # Responsibilities
//! - Decide per request path: serve a static file or run the executor
//! - Gatekeep script files behind the front-end registry
//! - Rewrite well-known paths (favicon, manifest) to configured files
//!
//! # Design Decisions
//! - Unknown extensions and unregistered scripts are not errors; they
//!   fall through to the executor, which owns its own 404
//! - A candidate extension requires the final dot within five characters
//!   of the end and no `./` sequence anywhere in the path, which also
//!   rejects traversal-looking paths
//! - Pure classification: the scan trigger and file read happen in the
//!   server handler, keeping this table easy to test

use crate::assets::MimeRegistry;
use crate::config::schema::AssetConfig;
use crate::scanner::ScriptScanner;

/// Extensions treated as front-end scripts.
pub const SCRIPT_EXTENSIONS: [&str; 2] = ["js", "ts"];

/// Terminal outcome for one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Serve a static file.
    Asset {
        /// Absolute path of the file to serve.
        full_path: String,
        /// Mime type for the Content-Type header.
        mime: String,
        /// The file is a script and must be scanned before responding.
        script: bool,
    },
    /// Delegate to the application executor.
    Execute,
}

/// The candidate file extension of a logical path.
///
/// `None` when the path has no dot close enough to its end, or contains
/// a `./` sequence.
pub fn candidate_extension(path: &str) -> Option<&str> {
    if path.contains("./") {
        return None;
    }
    let dot = path.rfind('.')? + 1;
    if path.len() - dot > 5 {
        return None;
    }
    Some(&path[dot..])
}

/// Classify one logical request path.
pub fn classify(
    path: &str,
    assets: &AssetConfig,
    scanner: &ScriptScanner,
    mimes: &MimeRegistry,
) -> Dispatch {
    let Some(extension) = candidate_extension(path) else {
        return Dispatch::Execute;
    };

    let script = SCRIPT_EXTENSIONS.contains(&extension);
    if script && !path.starts_with(&assets.front_prefix) && !scanner.is_registered(path) {
        return Dispatch::Execute;
    }

    let Some(mime) = mimes.mime_for(extension) else {
        return Dispatch::Execute;
    };

    let file_path = rewrite_path(path, assets);
    Dispatch::Asset {
        full_path: format!("{}{}", assets.asset_root, file_path),
        mime: mime.to_string(),
        script,
    }
}

/// Well-known logical paths served from configured alternate locations.
fn rewrite_path<'a>(path: &'a str, assets: &'a AssetConfig) -> &'a str {
    if path == "/favicon.ico" {
        return &assets.favicon;
    }
    if let Some(manifest) = &assets.manifest {
        if path == manifest.route {
            return &manifest.file;
        }
    }
    path
}

//! Front-end script graph scanning subsystem.
//!
//! # Data Flow
//! ```text
//! Entry script served through the dispatcher
//!     → ensure_scanned(full path)
//!     → extract.rs (raw specifiers out of the script text)
//!     → resolve.rs (absolute + root-relative paths)
//!     → registry   (root-relative paths become servable)
//!
//! A discovered dependency's own imports are scanned only when that
//! dependency is itself requested — traversal is lazy and access-driven,
//! never an eager walk at startup.
//! ```
//!
//! # Design Decisions
//! - Registry and scanned set are owned per server instance, never global;
//!   independent servers in tests stay independent
//! - Both structures are monotonic: entries are added, never removed
//! - Concurrency-safe: the scanned set claims a path atomically so two
//!   parallel requests never parse the same file twice, and the registry
//!   lock keeps insertion dedup exact

pub mod extract;
pub mod resolve;

use std::collections::HashSet;
use std::sync::RwLock;

use dashmap::DashSet;
use thiserror::Error;

use crate::config::schema::AssetConfig;
use extract::RefExtractor;
use resolve::{parent_dir, resolve_specifier};

/// Errors from building or running the scanner.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A configured loader-call identifier did not compile into a pattern.
    #[error("invalid script-call pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The script file could not be read.
    #[error("failed to read script {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered, duplicate-free set of servable root-relative script paths.
struct Registry {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl Registry {
    fn insert(&mut self, path: String) {
        if self.seen.insert(path.clone()) {
            self.order.push(path);
        }
    }
}

/// Discovers which script files belong to the front-end module graph.
///
/// Holds the allow-list of servable scripts (seeded from the configured
/// entry points) and the set of absolute paths already parsed.
pub struct ScriptScanner {
    asset_root: String,
    module_root: String,
    extractor: RefExtractor,
    registry: RwLock<Registry>,
    scanned: DashSet<String>,
}

impl ScriptScanner {
    pub fn new(config: &AssetConfig) -> Result<Self, ScanError> {
        let extractor = RefExtractor::new(&config.script_calls)?;
        let mut registry = Registry {
            order: Vec::new(),
            seen: HashSet::new(),
        };
        for entry in &config.entry_scripts {
            registry.insert(entry.clone());
        }
        Ok(Self {
            asset_root: config.asset_root.clone(),
            module_root: config.module_root.clone(),
            extractor,
            registry: RwLock::new(registry),
            scanned: DashSet::new(),
        })
    }

    /// Is this root-relative path known to be a servable front-end script?
    pub fn is_registered(&self, root_relative: &str) -> bool {
        self.registry
            .read()
            .expect("registry lock poisoned")
            .seen
            .contains(root_relative)
    }

    /// Snapshot of the registry in insertion order.
    pub fn registered(&self) -> Vec<String> {
        self.registry
            .read()
            .expect("registry lock poisoned")
            .order
            .clone()
    }

    /// Scan one script file at most once.
    ///
    /// A path already claimed is a no-op. Otherwise the file is read, its
    /// references extracted and resolved, and each root-relative result
    /// inserted into the registry (insertion order preserved, no
    /// re-insertion). Recursion into the discovered dependencies happens
    /// only when they are served in turn.
    ///
    /// On read failure the claim is rolled back and the error propagates,
    /// failing only the triggering request; the registry is untouched.
    pub async fn ensure_scanned(&self, full_path: &str) -> Result<(), ScanError> {
        if !self.scanned.insert(full_path.to_string()) {
            return Ok(());
        }
        let content = match tokio::fs::read_to_string(full_path).await {
            Ok(content) => content,
            Err(source) => {
                self.scanned.remove(full_path);
                return Err(ScanError::Read {
                    path: full_path.to_string(),
                    source,
                });
            }
        };
        let base_dir = parent_dir(full_path).to_string();
        let mut registry = self.registry.write().expect("registry lock poisoned");
        for spec in self.extractor.extract(&content) {
            let resolved = resolve_specifier(spec, &base_dir, &self.asset_root, &self.module_root);
            registry.insert(resolved.root_relative);
        }
        tracing::debug!(path = %full_path, registered = registry.order.len(), "script scanned");
        Ok(())
    }
}

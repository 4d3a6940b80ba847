//! Specifier resolution.
//!
//! # Responsibilities
//! - Turn a raw specifier plus its referencing script's directory into an
//!   absolute path under the asset root
//! - Distinguish dependency-root specifiers (`/node_modules/...`) from
//!   relative ones
//! - Produce the asset-root-relative path that enters the registry
//!
//! # Design Decisions
//! - Purely lexical: no filesystem access, no symlink awareness
//! - Paths are `/`-separated strings end to end, matching both URLs and
//!   the asset tree layout

/// A specifier resolved against the asset tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Absolute filesystem path of the referenced script.
    pub full_path: String,
    /// Path relative to the asset root, always starting with `/`.
    /// This is the form stored in the registry and compared against
    /// request paths.
    pub root_relative: String,
}

/// Resolve `spec` as referenced from a script living in `referencing_dir`.
///
/// Specifiers starting with `module_root` (the dependency-root marker)
/// resolve against the asset root regardless of where the referencing
/// script lives; everything else resolves against the referencing
/// script's own directory.
pub fn resolve_specifier(
    spec: &str,
    referencing_dir: &str,
    asset_root: &str,
    module_root: &str,
) -> ResolvedRef {
    let joined = if spec.starts_with(module_root) {
        format!("{asset_root}{spec}")
    } else {
        format!("{referencing_dir}/{spec}")
    };
    let full_path = normalize_path(&joined);
    let root_relative = full_path
        .strip_prefix(asset_root)
        .unwrap_or(&full_path)
        .to_string();
    ResolvedRef {
        full_path,
        root_relative,
    }
}

/// The directory component of a `/`-separated path.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => ".",
    }
}

/// Lexically normalize a `/`-separated path: collapse `.` segments,
/// resolve `..` against preceding segments, and drop doubled separators.
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|s| *s != "..") {
                    stack.pop();
                } else if !absolute {
                    stack.push("..");
                }
            }
            other => stack.push(other),
        }
    }
    let joined = stack.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

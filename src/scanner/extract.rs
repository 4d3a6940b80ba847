//! Module reference extraction.
//!
//! # Responsibilities
//! - Pull raw module specifiers out of one script's text
//! - Cover import-from, bare import, dynamic import
//! - Cover configured custom loader calls (e.g. `loadModule('x.js'`)
//!
//! # Design Decisions
//! - Pattern matching over text, no AST: cheap and dependency-light
//! - A specifier only counts when it ends in `.js`
//! - False positives inside comments or string literals are accepted;
//!   they resolve to paths nobody requests and stay inert
//! - Patterns compiled once at construction, reused for every scan

use regex::Regex;

/// Extracts raw module specifiers from script text.
pub struct RefExtractor {
    patterns: Vec<Regex>,
}

impl RefExtractor {
    /// Compile the fixed import forms plus one pattern per configured
    /// loader-call identifier.
    ///
    /// Fails when an identifier does not form a valid pattern; surfaced
    /// during config validation rather than at scan time.
    pub fn new(script_calls: &[String]) -> Result<Self, regex::Error> {
        let mut patterns = vec![
            Regex::new(r#"from\s+['"]([^'"]+\.js)['"]"#)?,
            Regex::new(r#"import\s+['"]([^'"]+\.js)['"]"#)?,
            Regex::new(r#"import\(['"]([^'"]+\.js)['"]"#)?,
        ];
        for call in script_calls {
            patterns.push(Regex::new(&format!(
                r#"{}\(['"]([^'"]+\.js)['"]"#,
                regex::escape(call)
            ))?);
        }
        Ok(Self { patterns })
    }

    /// All specifiers referenced by `content`, in pattern-then-text order.
    /// Duplicates are kept; the registry deduplicates downstream.
    pub fn extract<'a>(&self, content: &'a str) -> Vec<&'a str> {
        let mut refs = Vec::new();
        for pattern in &self.patterns {
            for captures in pattern.captures_iter(content) {
                if let Some(spec) = captures.get(1) {
                    refs.push(spec.as_str());
                }
            }
        }
        refs
    }
}

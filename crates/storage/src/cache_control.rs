//! Glob-pattern rules mapping file paths to cache-control headers.
//!
//! Rules are ordered and the first matching pattern wins, so a specific
//! rule like `index.html` can precede a broader `*.html`. A pattern with no
//! path separator matches against the final path segment as well as the
//! full relative path.

use globset::{Glob, GlobMatcher};
use serde_json::Value;

use crate::error::StorageError;

/// A single compiled pattern → header-value rule.
#[derive(Debug, Clone)]
struct CacheControlRule {
    /// Original pattern text.
    pattern: String,
    /// Compiled matcher for the pattern.
    matcher: GlobMatcher,
    /// Cache-control header value.
    value: String,
}

/// Ordered cache-control mapping.
///
/// Constructed once per run and immutable thereafter. Each pattern is
/// compiled to its own matcher rather than one combined set because rule
/// order decides which value wins.
#[derive(Debug, Clone)]
pub struct CacheControlMap {
    rules: Vec<CacheControlRule>,
}

impl CacheControlMap {
    /// Build a mapping from ordered (pattern, value) pairs.
    ///
    /// # Arguments
    /// * `pairs` - Glob patterns with their cache-control values, highest
    ///   priority first
    ///
    /// # Errors
    /// Returns `StorageError::InvalidConfig` if any pattern is not a valid
    /// glob.
    pub fn new(
        pairs: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, StorageError> {
        let mut rules: Vec<CacheControlRule> = Vec::new();

        for (pattern, value) in pairs {
            let matcher: GlobMatcher = Glob::new(&pattern)
                .map_err(|e| StorageError::InvalidConfig {
                    message: format!("invalid cache-control pattern {pattern:?}: {e}"),
                })?
                .compile_matcher();
            rules.push(CacheControlRule {
                pattern,
                matcher,
                value,
            });
        }

        Ok(Self { rules })
    }

    /// The default table for single-page-app bundles.
    ///
    /// `index.html` revalidates after a minute so deploys propagate quickly;
    /// fingerprinted css/js assets are immutable for a year; images and text
    /// get a day.
    pub fn default_table() -> Self {
        const DAY_SWR: &str = "max-age=86400, stale-while-revalidate=2592000";
        let pairs: Vec<(String, String)> = vec![
            (
                "index.html".to_string(),
                "max-age=60, stale-while-revalidate=2592000".to_string(),
            ),
            ("*.css".to_string(), "max-age=31536000, immutable".to_string()),
            ("*.js".to_string(), "max-age=31536000, immutable".to_string()),
            ("*.png".to_string(), DAY_SWR.to_string()),
            ("*.ico".to_string(), DAY_SWR.to_string()),
            ("*.txt".to_string(), DAY_SWR.to_string()),
        ];
        Self::new(pairs).expect("default table patterns are valid")
    }

    /// Parse a mapping from an external JSON document.
    ///
    /// The document is an ordered array of single-entry objects, e.g.
    /// `[{"index.html": "max-age=60"}, {"*.js": "max-age=31536000"}]`.
    /// An array is required because JSON object member order is not
    /// something parsers are obliged to preserve.
    ///
    /// # Errors
    /// Returns `StorageError::InvalidConfig` if the document is not valid
    /// JSON, not shaped as described, or contains an invalid pattern.
    pub fn from_json_str(text: &str) -> Result<Self, StorageError> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| StorageError::InvalidConfig {
                message: format!("cache-control file is not valid JSON: {e}"),
            })?;

        let entries: &Vec<Value> =
            document.as_array().ok_or_else(|| StorageError::InvalidConfig {
                message: "cache-control file must be a JSON array of objects".to_string(),
            })?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        for entry in entries {
            let object = entry.as_object().ok_or_else(|| StorageError::InvalidConfig {
                message: "cache-control entries must be objects".to_string(),
            })?;
            for (pattern, value) in object {
                let value: &str = value.as_str().ok_or_else(|| StorageError::InvalidConfig {
                    message: format!("cache-control value for {pattern:?} must be a string"),
                })?;
                pairs.push((pattern.clone(), value.to_string()));
            }
        }

        Self::new(pairs)
    }

    /// Resolve the cache-control value for a relative file path.
    ///
    /// Iterates rules in insertion order and returns the value of the first
    /// match. A pattern without a path separator is also tried against the
    /// path's final segment, so `index.html` matches `sub/index.html`.
    ///
    /// # Arguments
    /// * `path` - Root-relative POSIX path of the file
    ///
    /// # Returns
    /// The header value, or `None` if no pattern matches (callers omit the
    /// header in that case).
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let base_name: &str = path.rsplit('/').next().unwrap_or(path);

        for rule in &self.rules {
            if rule.matcher.is_match(path) {
                return Some(&rule.value);
            }
            if !rule.pattern.contains('/') && rule.matcher.is_match(base_name) {
                return Some(&rule.value);
            }
        }

        None
    }

    /// Number of rules in the mapping.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the mapping has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> CacheControlMap {
        CacheControlMap::new(
            pairs
                .iter()
                .map(|(p, v)| (p.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let mapping: CacheControlMap = map(&[("index.html", "A"), ("*.html", "B")]);
        assert_eq!(mapping.resolve("index.html"), Some("A"));
        assert_eq!(mapping.resolve("about.html"), Some("B"));
    }

    #[test]
    fn test_order_is_significant() {
        let mapping: CacheControlMap = map(&[("*.html", "B"), ("index.html", "A")]);
        // The broad rule shadows the specific one when listed first
        assert_eq!(mapping.resolve("index.html"), Some("B"));
    }

    #[test]
    fn test_no_match_is_none() {
        let mapping: CacheControlMap = map(&[("*.js", "A")]);
        assert_eq!(mapping.resolve("image.svg"), None);
    }

    #[test]
    fn test_basename_match_for_separator_free_pattern() {
        let mapping: CacheControlMap = map(&[("index.html", "A")]);
        assert_eq!(mapping.resolve("sub/dir/index.html"), Some("A"));
    }

    #[test]
    fn test_pattern_with_separator_requires_full_path_match() {
        let mapping: CacheControlMap = map(&[("assets/*.css", "A")]);
        assert_eq!(mapping.resolve("assets/main.css"), Some("A"));
        assert_eq!(mapping.resolve("other/main.css"), None);
    }

    #[test]
    fn test_extension_pattern_matches_nested_path() {
        let mapping: CacheControlMap = map(&[("*.js", "A")]);
        assert_eq!(mapping.resolve("assets/js/vendor/lib.js"), Some("A"));
    }

    #[test]
    fn test_default_table_values() {
        let mapping: CacheControlMap = CacheControlMap::default_table();
        assert_eq!(
            mapping.resolve("index.html"),
            Some("max-age=60, stale-while-revalidate=2592000")
        );
        assert_eq!(mapping.resolve("app.js"), Some("max-age=31536000, immutable"));
        assert_eq!(
            mapping.resolve("styles/main.css"),
            Some("max-age=31536000, immutable")
        );
        assert_eq!(
            mapping.resolve("logo.png"),
            Some("max-age=86400, stale-while-revalidate=2592000")
        );
        assert_eq!(
            mapping.resolve("favicon.ico"),
            Some("max-age=86400, stale-while-revalidate=2592000")
        );
        assert_eq!(
            mapping.resolve("robots.txt"),
            Some("max-age=86400, stale-while-revalidate=2592000")
        );
        assert_eq!(mapping.resolve("picture.svg"), None);
    }

    #[test]
    fn test_invalid_pattern() {
        let result: Result<CacheControlMap, StorageError> =
            CacheControlMap::new(vec![("[invalid".to_string(), "A".to_string())]);
        assert!(matches!(result, Err(StorageError::InvalidConfig { .. })));
    }

    #[test]
    fn test_from_json_str_preserves_order() {
        let text: &str = r#"[{"index.html": "A"}, {"*.html": "B"}]"#;
        let mapping: CacheControlMap = CacheControlMap::from_json_str(text).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.resolve("index.html"), Some("A"));
        assert_eq!(mapping.resolve("other.html"), Some("B"));
    }

    #[test]
    fn test_from_json_str_rejects_non_array() {
        let result: Result<CacheControlMap, StorageError> =
            CacheControlMap::from_json_str(r#"{"index.html": "A"}"#);
        assert!(matches!(result, Err(StorageError::InvalidConfig { .. })));
    }

    #[test]
    fn test_from_json_str_rejects_non_string_value() {
        let result: Result<CacheControlMap, StorageError> =
            CacheControlMap::from_json_str(r#"[{"index.html": 60}]"#);
        assert!(matches!(result, Err(StorageError::InvalidConfig { .. })));
    }

    #[test]
    fn test_from_json_str_rejects_invalid_json() {
        let result: Result<CacheControlMap, StorageError> =
            CacheControlMap::from_json_str("not json");
        assert!(matches!(result, Err(StorageError::InvalidConfig { .. })));
    }

    #[test]
    fn test_empty_mapping() {
        let mapping: CacheControlMap = CacheControlMap::new(vec![]).unwrap();
        assert!(mapping.is_empty());
        assert_eq!(mapping.resolve("index.html"), None);
    }
}

//! Reverse URL resolution: route name + parameters → path.
//!
//! # Design Decisions
//! - Parameters are passed as a flat `[key, value, key, value, ...]` slice
//!   and substituted by key name, not by position
//! - Keys the pattern does not declare are ignored (no query string)
//! - When a key repeats, the last value wins
//! - A value that violates the parameter's constraint is rejected, so every
//!   generated URL routes back to the route it was built from
//! - [`UrlResolver::name_to_url`] is the page-facing entry point: it logs
//!   failures and degrades to an empty link instead of failing the render

use std::collections::HashMap;
use std::sync::Arc;

use crate::observability::metrics;
use crate::routing::errors::ResolveError;
use crate::routing::matcher::PathPattern;

/// Read-only name → pattern map, cheap to clone and share across requests.
#[derive(Debug, Clone, Default)]
pub struct UrlResolver {
    patterns: Arc<HashMap<String, PathPattern>>,
}

impl UrlResolver {
    pub(crate) fn from_patterns(patterns: impl IntoIterator<Item = (String, PathPattern)>) -> Self {
        Self {
            patterns: Arc::new(patterns.into_iter().collect()),
        }
    }

    /// Build the path for route `name`.
    pub fn resolve(&self, name: &str, pairs: &[&str]) -> Result<String, ResolveError> {
        if pairs.len() % 2 != 0 {
            return Err(ResolveError::InvalidArgumentCount(pairs.len()));
        }

        let pattern = self
            .patterns
            .get(name)
            .ok_or_else(|| ResolveError::UnknownRoute(name.to_string()))?;

        let values: HashMap<&str, &str> = pairs
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();

        pattern
            .expand(|param| values.get(param).copied())
            .map_err(|(param, rejected)| match rejected {
                None => ResolveError::MissingParameter {
                    route: name.to_string(),
                    param,
                },
                Some(value) => ResolveError::ConstraintViolation {
                    route: name.to_string(),
                    param,
                    value,
                },
            })
    }

    /// Like [`resolve`](Self::resolve) but never fails: errors are logged
    /// and an empty string is returned.
    pub fn name_to_url(&self, name: &str, pairs: &[&str]) -> String {
        match self.resolve(name, pairs) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(route = %name, error = %e, "Failed to resolve URL");
                metrics::record_resolve_failure(name);
                String::new()
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }
}

//! Route table: registration and lookup.
//!
//! # Responsibilities
//! - Store named routes in registration order
//! - Look up the first route matching method + path
//! - Look up a route by name for reverse resolution
//!
//! # Design Decisions
//! - Built mutably during startup, then frozen behind an `Arc`; no locks
//! - Names are unique; re-registering a name is an error, never an overwrite
//! - Linear scan in registration order (route counts are small and the
//!   first-match rule needs the order anyway)
//! - A path hit with the wrong method keeps scanning: one literal path is
//!   registered once per method as separate routes

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::errors::RouteError;
use crate::routing::handler::{BoxHandler, Handler};
use crate::routing::matcher::PathPattern;
use crate::routing::params::PathParams;
use crate::routing::reverse::UrlResolver;

/// A named (pattern, method, handler) triple.
pub struct Route {
    name: String,
    pattern: PathPattern,
    method: Method,
    handler: BoxHandler,
}

impl Route {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn handler(&self) -> &BoxHandler {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    names: HashMap<String, usize>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route.
    ///
    /// An empty `name` is accepted but the route cannot be resolved by name.
    pub fn register(
        &mut self,
        name: &str,
        pattern: &str,
        method: Method,
        handler: impl Handler,
    ) -> Result<&Route, RouteError> {
        if !name.is_empty() && self.names.contains_key(name) {
            return Err(RouteError::DuplicateRouteName(name.to_string()));
        }

        let pattern = PathPattern::parse(pattern).map_err(|source| RouteError::InvalidPattern {
            name: name.to_string(),
            source,
        })?;

        tracing::debug!(
            route = %name,
            method = %method,
            pattern = %pattern.as_str(),
            "Registered route"
        );

        let index = self.routes.len();
        if !name.is_empty() {
            self.names.insert(name.to_string(), index);
        }
        self.routes.push(Route {
            name: name.to_string(),
            pattern,
            method,
            handler: Arc::new(handler),
        });
        Ok(&self.routes[index])
    }

    /// Shorthand for a `GET` route.
    pub fn get(
        &mut self,
        name: &str,
        pattern: &str,
        handler: impl Handler,
    ) -> Result<&Route, RouteError> {
        self.register(name, pattern, Method::GET, handler)
    }

    /// Shorthand for a `POST` route.
    pub fn post(
        &mut self,
        name: &str,
        pattern: &str,
        handler: impl Handler,
    ) -> Result<&Route, RouteError> {
        self.register(name, pattern, Method::POST, handler)
    }

    /// First route, in registration order, whose pattern matches `path` and
    /// whose method equals `method`.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<(&Route, PathParams)> {
        self.routes.iter().find_map(|route| {
            if route.method != *method {
                return None;
            }
            route.pattern.matches(path).map(|params| (route, params))
        })
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.names.get(name).map(|&i| &self.routes[i])
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Name → pattern view of this table, for building links.
    pub fn resolver(&self) -> UrlResolver {
        UrlResolver::from_patterns(
            self.names
                .iter()
                .map(|(name, &i)| (name.clone(), self.routes[i].pattern.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop(
        _req: axum::http::Request<axum::body::Body>,
        _params: PathParams,
    ) -> &'static str {
        "ok"
    }

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table.get("articles.show", "/articles/{id:[0-9]+}", noop).unwrap();
        table.get("articles.index", "/articles", noop).unwrap();
        table.post("articles.store", "/articles", noop).unwrap();
        table.get("articles.create", "/articles/create", noop).unwrap();
        table
    }

    #[test]
    fn test_lookup_by_method() {
        let table = table();

        let (route, _) = table.lookup(&Method::GET, "/articles").unwrap();
        assert_eq!(route.name(), "articles.index");

        // Same path, different method: scanning continues past the GET route
        let (route, _) = table.lookup(&Method::POST, "/articles").unwrap();
        assert_eq!(route.name(), "articles.store");

        assert!(table.lookup(&Method::DELETE, "/articles").is_none());
    }

    #[test]
    fn test_lookup_extracts_params() {
        let table = table();
        let (route, params) = table.lookup(&Method::GET, "/articles/42").unwrap();
        assert_eq!(route.name(), "articles.show");
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = RouteTable::new();
        table.get("first", "/pages/{slug}", noop).unwrap();
        table.get("second", "/pages/about", noop).unwrap();

        let (route, _) = table.lookup(&Method::GET, "/pages/about").unwrap();
        assert_eq!(route.name(), "first");
    }

    #[test]
    fn test_constraint_falls_through() {
        let table = table();
        // "create" fails the digits constraint on articles.show and lands on articles.create
        let (route, params) = table.lookup(&Method::GET, "/articles/create").unwrap();
        assert_eq!(route.name(), "articles.create");
        assert!(params.is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut table = table();
        let err = table.get("articles.show", "/posts/{id}", noop).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRouteName(ref n) if n == "articles.show"));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut table = RouteTable::new();
        let err = table.get("broken", "no-slash", noop).unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_unnamed_routes() {
        let mut table = RouteTable::new();
        table.get("", "/a", noop).unwrap();
        table.get("", "/b", noop).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.by_name("").is_none());
        assert!(table.lookup(&Method::GET, "/b").is_some());
    }

    #[test]
    fn test_by_name() {
        let table = table();
        let route = table.by_name("articles.create").unwrap();
        assert_eq!(route.pattern().as_str(), "/articles/create");
        assert_eq!(route.method(), Method::GET);
        assert!(table.by_name("articles.delete").is_none());
    }
}

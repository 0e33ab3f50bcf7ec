//! Routing error types.

use thiserror::Error;

/// A route pattern that cannot be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    #[error("segment `{0}` mixes literal text and a parameter")]
    MalformedSegment(String),

    #[error("parameter in segment `{0}` has no name")]
    EmptyParameterName(String),

    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),

    #[error("constraint for parameter `{name}` is not a valid regex: {source}")]
    InvalidConstraint {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Route registration failure. Fatal at startup.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route name `{0}` is already registered")]
    DuplicateRouteName(String),

    #[error("invalid pattern for route `{name}`: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: PatternError,
    },
}

/// Reverse URL resolution failure. Recovered locally by
/// [`UrlResolver::name_to_url`](crate::routing::UrlResolver::name_to_url).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no route named `{0}`")]
    UnknownRoute(String),

    #[error("parameter pairs must come in key/value pairs, got {0} values")]
    InvalidArgumentCount(usize),

    #[error("route `{route}` requires parameter `{param}`")]
    MissingParameter { route: String, param: String },

    #[error("value `{value}` for parameter `{param}` of route `{route}` violates its constraint")]
    ConstraintViolation {
        route: String,
        param: String,
        value: String,
    },
}

//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Parse `/articles/{id:[0-9]+}/edit` style templates into segments
//! - Match a normalized request path segment by segment
//! - Expand a pattern back into a concrete path for reverse resolution
//!
//! # Design Decisions
//! - Literal segments compare exactly (case-sensitive)
//! - A parameter segment must be non-empty and, when constrained, fully
//!   match its regex (anchored at compile time)
//! - Segment counts must be equal; a trailing slash is an extra empty
//!   segment and therefore never matches. Normalization is the middleware's
//!   job, not the matcher's.

use regex::Regex;

use crate::routing::errors::PatternError;
use crate::routing::params::PathParams;

/// One `/`-separated piece of a pattern.
#[derive(Debug, Clone)]
pub enum Segment {
    Literal(String),
    Param {
        name: String,
        constraint: Option<Constraint>,
    },
}

/// A compiled parameter constraint.
#[derive(Debug, Clone)]
pub struct Constraint {
    source: String,
    regex: Regex,
}

impl Constraint {
    fn compile(name: &str, source: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            PatternError::InvalidConstraint {
                name: name.to_string(),
                source: e,
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The constraint as written in the pattern, without anchors.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. `/` compiles to zero segments.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(raw.to_string()))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for piece in rest.split('/') {
                let segment = Self::parse_segment(piece)?;
                if let Segment::Param { name, .. } = &segment {
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param { name: n, .. } if n == name))
                    {
                        return Err(PatternError::DuplicateParameter(name.clone()));
                    }
                }
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    fn parse_segment(piece: &str) -> Result<Segment, PatternError> {
        let inner = match piece.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(inner) => inner,
            None => {
                if piece.contains('{') || piece.contains('}') {
                    return Err(PatternError::MalformedSegment(piece.to_string()));
                }
                return Ok(Segment::Literal(piece.to_string()));
            }
        };

        let (name, constraint) = match inner.split_once(':') {
            Some((name, source)) => (name, Some(source)),
            None => (inner, None),
        };

        if name.is_empty() {
            return Err(PatternError::EmptyParameterName(piece.to_string()));
        }
        if name.contains('{') || name.contains('}') {
            return Err(PatternError::MalformedSegment(piece.to_string()));
        }

        let constraint = constraint
            .map(|source| Constraint::compile(name, source))
            .transpose()?;

        Ok(Segment::Param {
            name: name.to_string(),
            constraint,
        })
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of all parameters, in pattern order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a normalized request path, returning the bindings on success.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let rest = path.strip_prefix('/')?;
        let mut params = PathParams::new();

        if rest.is_empty() {
            return self.segments.is_empty().then_some(params);
        }

        let mut pieces = rest.split('/');
        for segment in &self.segments {
            let piece = pieces.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != piece {
                        return None;
                    }
                }
                Segment::Param { name, constraint } => {
                    if !Self::accepts(constraint.as_ref(), piece) {
                        return None;
                    }
                    params.push(name.as_str(), piece);
                }
            }
        }

        // Leftover pieces mean the path is longer than the pattern.
        if pieces.next().is_some() {
            return None;
        }
        Some(params)
    }

    fn accepts(constraint: Option<&Constraint>, value: &str) -> bool {
        !value.is_empty() && constraint.map_or(true, |c| c.is_match(value))
    }

    /// Build a concrete path, asking `lookup` for each parameter value.
    ///
    /// On failure returns the name of the offending parameter and whether it
    /// was missing (`None`) or rejected (`Some(value)`).
    pub(crate) fn expand<'a, F>(&self, lookup: F) -> Result<String, (String, Option<String>)>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let mut url = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            url.push('/');
            match segment {
                Segment::Literal(lit) => url.push_str(lit),
                Segment::Param { name, constraint } => {
                    let value = lookup(name).ok_or_else(|| (name.clone(), None))?;
                    if !Self::accepts(constraint.as_ref(), value) {
                        return Err((name.clone(), Some(value.to_string())));
                    }
                    url.push_str(value);
                }
            }
        }
        Ok(url)
    }
}

//! Path parameter bindings.
//!
//! Produced per request by the matcher, handed to the handler by value and
//! dropped with the request. Never shared between requests.

/// Parameter values extracted from a matched request path, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    pairs: Vec<(String, String)>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Value bound to `name`, if the pattern declared it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse the value bound to `name`.
    ///
    /// Returns `None` when the parameter is absent or does not parse, which
    /// handlers treat the same as an unknown resource.
    pub fn parse<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_parse() {
        let mut params = PathParams::new();
        params.push("id", "42");
        params.push("slug", "hello");

        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.parse::<u64>("id"), Some(42));
        assert_eq!(params.parse::<u64>("slug"), None);
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }
}

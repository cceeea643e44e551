//! Path template matching.
//!
//! # Responsibilities
//! - Parse templates such as `/users/{user_id}`
//! - Match a concrete path segment by segment
//! - Capture named segments as path parameters
//!
//! # Design Decisions
//! - Matching is exact: same segment count, trailing slash significant
//! - A named segment matches exactly one non-empty segment
//! - Segments are percent-decoded before comparison and capture
//! - An encoded `/` never lands inside a single capture
//! - No regex; matching is a single linear pass

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::percent_decode_str;

use crate::error::RouteError;

/// Values captured from named template segments.
pub type PathParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a template. Named segments are written `{name}` and must
    /// occupy a whole segment.
    pub fn parse(template: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let rest = template
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        let mut seen = Vec::new();
        for part in split_segments(rest) {
            if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                if name.is_empty() {
                    return Err(invalid("empty parameter name"));
                }
                if name.contains(['{', '}', '/']) {
                    return Err(invalid("malformed parameter name"));
                }
                if seen.contains(&name) {
                    return Err(invalid("duplicate parameter name"));
                }
                seen.push(name);
                segments.push(Segment::Param(name.to_string()));
            } else if part.contains(['{', '}']) {
                return Err(invalid("parameters must span a whole segment"));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of named segments; fewer means more specific.
    pub fn param_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Param(_)))
            .count()
    }

    /// Match `path` against the template, returning captured parameters.
    pub fn captures(&self, path: &str) -> Option<PathParams> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = split_segments(rest).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            let decoded = decode_segment(part);
            match segment {
                Segment::Literal(literal) => {
                    if decoded != literal.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if decoded.is_empty() || decoded.contains('/') {
                        return None;
                    }
                    params.insert(name.clone(), decoded.into_owned());
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// "/" has no segments; "/a/" has two ("a" and "").
fn split_segments(rest: &str) -> impl Iterator<Item = &str> {
    let empty = rest.is_empty();
    rest.split('/').filter(move |_| !empty)
}

fn decode_segment(segment: &str) -> Cow<'_, str> {
    percent_decode_str(segment).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_template() {
        let template = PathTemplate::parse("/").unwrap();
        assert_eq!(template.captures("/"), Some(PathParams::new()));
        assert_eq!(template.captures("/users"), None);
    }

    #[test]
    fn test_literal_template() {
        let template = PathTemplate::parse("/users").unwrap();
        assert!(template.captures("/users").is_some());
        assert!(template.captures("/users/").is_none()); // Trailing slash is significant
        assert!(template.captures("/Users").is_none()); // Case sensitive
        assert!(template.captures("/users/1").is_none());
    }

    #[test]
    fn test_named_segment_capture() {
        let template = PathTemplate::parse("/users/{user_id}").unwrap();
        assert_eq!(template.param_count(), 1);

        let params = template.captures("/users/42").unwrap();
        assert_eq!(params.get("user_id").map(String::as_str), Some("42"));

        let params = template.captures("/users/jane%20doe").unwrap();
        assert_eq!(params.get("user_id").map(String::as_str), Some("jane doe"));

        assert!(template.captures("/users/").is_none());
        assert!(template.captures("/users").is_none());
        assert!(template.captures("/users/42/posts").is_none());
    }

    #[test]
    fn test_encoded_slash_does_not_match_one_segment() {
        let template = PathTemplate::parse("/users/{user_id}").unwrap();
        assert!(template.captures("/users/a%2Fb").is_none());
        assert!(template.captures("/users/a%2fb").is_none());
        assert!(template.captures("/users/a/b").is_none());
    }

    #[test]
    fn test_invalid_templates() {
        for bad in ["users", "/users/{}", "/users/{id", "/users/x{id}", "/a/{id}/{id}"] {
            assert!(
                matches!(PathTemplate::parse(bad), Err(RouteError::InvalidTemplate { .. })),
                "expected '{}' to be rejected",
                bad
            );
        }
    }
}

//! Path templates with named placeholders.
//!
//! # Responsibilities
//! - Parse templates like `/comments/:id` into literal and placeholder parts
//! - Substitute request parameters into placeholders, one path segment each
//! - Hand back parameters no placeholder consumed (they become query entries)
//!
//! # Design Decisions
//! - A placeholder starts at a segment boundary: `/:name`
//! - Placeholder names are `[A-Za-z0-9_]+`; the rest of the segment is literal
//! - A `:` anywhere else is an ordinary character
//! - Substituted values are percent-encoded; `/`, `?` and `#` never leak
//!   into the URL structure
//! - Templates are parsed once at client construction

use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;

/// Characters escaped in a substituted value: everything the URL parser
/// would read as structure, plus `%` so values round-trip literally.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Errors raised while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("template '{0}' must start with '/'")]
    NotAbsolute(String),

    #[error("template '{0}' has a placeholder without a name")]
    UnnamedPlaceholder(String),
}

/// Errors raised while substituting parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no value for ':{0}'")]
    Missing(String),

    /// Empty, `.` and `..` would change which path is addressed.
    #[error("value '{value}' for ':{name}' is not a usable path segment")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Placeholder(String),
}

/// A parsed, immutable endpoint path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    raw: String,
    parts: Vec<Part>,
}

/// Named values for a request: placeholder substitutions and, for names
/// with no placeholder, query-string entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(BTreeMap<String, String>);

/// Result of resolving a template against parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Path with every placeholder substituted.
    pub path: String,
    /// Parameters that matched no placeholder, in name order.
    pub query: Vec<(String, String)>,
}

impl EndpointTemplate {
    /// Parse a template string.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        if raw.is_empty() {
            return Err(TemplateError::Empty);
        }
        if !raw.starts_with('/') {
            return Err(TemplateError::NotAbsolute(raw.to_string()));
        }

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            literal.push(c);
            if c != '/' {
                continue;
            }
            if !matches!(chars.peek(), Some((_, ':'))) {
                continue;
            }
            chars.next();

            let mut name = String::new();
            while let Some(&(_, n)) = chars.peek() {
                if n.is_ascii_alphanumeric() || n == '_' {
                    name.push(n);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                return Err(TemplateError::UnnamedPlaceholder(raw.to_string()));
            }

            parts.push(Part::Literal(std::mem::take(&mut literal)));
            parts.push(Part::Placeholder(name));
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            parts,
        })
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            Part::Placeholder(name) => Some(name.as_str()),
            Part::Literal(_) => None,
        })
    }

    /// Substitute `params` into the template.
    ///
    /// Each value is encoded as data inside its segment, so the resolved
    /// path always has the template's shape.
    pub fn resolve(&self, params: &PathParams) -> Result<ResolvedPath, ResolveError> {
        let mut path = String::with_capacity(self.raw.len());
        for part in &self.parts {
            match part {
                Part::Literal(text) => path.push_str(text),
                Part::Placeholder(name) => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| ResolveError::Missing(name.clone()))?;
                    if matches!(value, "" | "." | "..") {
                        return Err(ResolveError::InvalidValue {
                            name: name.clone(),
                            value: value.to_string(),
                        });
                    }
                    path.extend(utf8_percent_encode(value, PATH_SEGMENT));
                }
            }
        }

        let query = params
            .iter()
            .filter(|(name, _)| !self.placeholders().any(|p| p == *name))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Ok(ResolvedPath { path, query })
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

//! Template compilation.
//!
//! A template string mixes literal text with `%name%` variable references.
//! [`Template::compile`] splits it into an ordered list of [`Segment`]s once,
//! up front, so per-cycle expansion is a walk over pre-split pieces instead of
//! a rescan of the source.
//!
//! Compilation is total: every input string compiles. A `%` that does not
//! open a well-formed `%name%` token stays literal text, so there is no
//! escaping mechanism and no parse error. The original source string is kept
//! verbatim for display and persistence.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// One unit of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, emitted verbatim.
    Literal(String),
    /// A variable reference, stored without the enclosing `%`.
    Variable(String),
}

/// A compiled template: the original source plus its ordered segments.
///
/// Equality and serialization go through the source string, so two templates
/// compare equal exactly when their sources match.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Compile a source string into segments.
    ///
    /// A variable reference is a maximal `%[0-9A-Za-z_-]+%` match. The
    /// charset is spelled out rather than written `\w` because `\w` in the
    /// regex crate is Unicode-aware and variable names are ASCII-only.
    pub fn compile(source: &str) -> Self {
        static VARIABLE_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"%[0-9A-Za-z_-]+%").unwrap());

        let mut segments = Vec::new();
        let mut last = 0;
        for found in VARIABLE_RE.find_iter(source) {
            if found.start() > last {
                segments.push(Segment::Literal(source[last..found.start()].to_string()));
            }
            let name = &source[found.start() + 1..found.end() - 1];
            segments.push(Segment::Variable(name.to_string()));
            last = found.end();
        }
        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// The compiled segments, in source order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The original source string, verbatim.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Template {}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Ok(Self::compile(&source))
    }
}

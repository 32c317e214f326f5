//! Column metadata extracted from a table's definition text.
//!
//! This is a deliberate textual extraction, not a DDL parser. It reads the
//! text between the first `(` and the last `)`, one column per physical
//! line, and keeps only the first two space-separated tokens of each line.
//! Consequences callers should know about:
//! - multi-word types (`VARCHAR 255`, `INT NOT NULL`) keep only their first word
//! - a single-line definition yields a single "column" holding the whole list
//!
//! `INT`, `TEXT` and `BOOLEAN` are recognized in any case and always display
//! in upper case (`int` shows as `INT`). Every other tag displays as written.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

/// Declared type tag of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Int,
    Text,
    Boolean,
    /// Any other tag, kept as written.
    Other(String),
    /// The definition line had no type token.
    Unknown,
}

impl DeclaredType {
    /// Classify a raw type token. `INT`, `TEXT` and `BOOLEAN` match
    /// case-insensitively; an empty token is `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        if tag.is_empty() {
            DeclaredType::Unknown
        } else if tag.eq_ignore_ascii_case("INT") {
            DeclaredType::Int
        } else if tag.eq_ignore_ascii_case("TEXT") {
            DeclaredType::Text
        } else if tag.eq_ignore_ascii_case("BOOLEAN") {
            DeclaredType::Boolean
        } else {
            DeclaredType::Other(tag.to_string())
        }
    }

    /// The tag as shown to users, `None` for `Unknown`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DeclaredType::Int => Some("INT"),
            DeclaredType::Text => Some("TEXT"),
            DeclaredType::Boolean => Some("BOOLEAN"),
            DeclaredType::Other(raw) => Some(raw),
            DeclaredType::Unknown => None,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("?"))
    }
}

/// Serialized as the tag string, `null` for `Unknown`.
impl Serialize for DeclaredType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub declared_type: DeclaredType,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
        }
    }
}

/// Extract column metadata from a `CREATE TABLE` definition.
///
/// A missing `(` reads from the start of the text and a missing `)` reads
/// to its end, so a bare column list parses too.
pub fn parse_columns(definition: &str) -> Vec<ColumnMetadata> {
    let start = definition.find('(').map_or(0, |i| i + 1);
    let end = definition.rfind(')').unwrap_or(definition.len());
    if end < start {
        return Vec::new();
    }

    definition[start..end]
        .lines()
        .map(str::trim)
        .map(|line| line.strip_suffix(',').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> ColumnMetadata {
    let mut tokens = line.split(' ');
    let name = tokens.next().unwrap_or_default();
    let declared_type = DeclaredType::from_tag(tokens.next().unwrap_or_default());
    if declared_type == DeclaredType::Unknown {
        debug!(line, "Column definition without a type token");
    }
    ColumnMetadata::new(name, declared_type)
}

//! Source Locations
//!
//! Every IR node carries a location, either propagated from the user tree
//! node it was lowered from or a synthetic internal tag when the node was
//! created by an injection step.

use std::fmt;

/// Tag naming where a tree node came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    source_name: String,
    offset: u32,
}

impl Location {
    /// Create a location pointing into user source
    pub fn new(source_name: impl Into<String>, offset: u32) -> Self {
        Self {
            source_name: source_name.into(),
            offset,
        }
    }

    /// Create a synthetic location for compiler-generated nodes
    pub fn internal(tag: &str) -> Self {
        Self {
            source_name: format!("$internal${}", tag),
            offset: 0,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Check whether this location was synthesized rather than parsed
    pub fn is_internal(&self) -> bool {
        self.source_name.starts_with("$internal$")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.source_name, self.offset)
    }
}

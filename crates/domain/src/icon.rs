//! Icon identifiers and the partitioned glyph catalog.
//!
//! The catalog is split into chunks, each owning a contiguous lexicographic
//! range of icon names. A [`ChunkTable`] lists the chunks ordered by the first
//! name they own; the first chunk may omit its start and owns everything below
//! the second chunk's start.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Namespaces served by the vector glyph catalog.
pub const VECTOR_NAMESPACES: &[&str] = &["mdi", "hass", "hassio", "hademo"];

/// Contents of one catalog chunk: icon name → SVG path data.
pub type ChunkMap = HashMap<String, String>;

/// A `<namespace>:<name>` icon identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconName {
    namespace: String,
    name: String,
}

impl IconName {
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the icon lives in the vector glyph catalog.
    #[must_use]
    pub fn is_vector(&self) -> bool {
        VECTOR_NAMESPACES.contains(&self.namespace.as_str())
    }
}

impl FromStr for IconName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => Ok(Self {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            _ => Err(ValidationError::InvalidIconName(s.to_string())),
        }
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// One row of the partition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPart {
    /// First icon name owned by this chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Chunk file name, without the `.json` extension.
    pub file: String,
}

/// Catalog metadata: version string and sorted partition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkTable {
    pub version: String,
    pub parts: Vec<ChunkPart>,
}

impl ChunkTable {
    /// Check that the table is non-empty, sorted and contiguous.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first offending part.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.parts.is_empty() {
            return Err(ValidationError::EmptyPartitionTable);
        }
        let mut previous: Option<&str> = None;
        for (index, part) in self.parts.iter().enumerate() {
            match (&part.start, previous) {
                (None, _) if index == 0 => {}
                (None, _) => {
                    return Err(ValidationError::MissingPartitionStart {
                        file: part.file.clone(),
                    });
                }
                (Some(start), Some(prev)) if start.as_str() <= prev => {
                    return Err(ValidationError::UnsortedPartition {
                        start: start.clone(),
                    });
                }
                (Some(start), _) => previous = Some(start),
            }
        }
        Ok(())
    }

    /// File of the chunk owning `name`: the last part whose start is `<=`
    /// `name`, or the first part when `name` sorts before every start.
    #[must_use]
    pub fn find_chunk(&self, name: &str) -> Option<&str> {
        let index = self
            .parts
            .partition_point(|part| part.start.as_deref().is_none_or(|start| start <= name));
        let part = match index {
            0 => self.parts.first(),
            n => self.parts.get(n - 1),
        }?;
        Some(part.file.as_str())
    }
}

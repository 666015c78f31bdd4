//! Block state property schemas.
//!
//! The converter needs the full property space of every block to expand
//! partial variant keys into concrete states. That data comes from a
//! minecraft-data style `blocks.json`:
//!
//! ```json
//! [{ "name": "oak_log", "states": [{ "name": "axis", "type": "enum", "values": ["x", "y", "z"] }] }]
//! ```

use crate::error::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// The kind of a block state property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Bool,
    Enum,
    Int,
    Direction,
}

/// One block state axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    /// Declared values for `enum` and `direction` properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<serde_json::Value>>,
    /// Cardinality of `int` properties (values `0..num_values`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_values: Option<u32>,
}

impl PropertyDefinition {
    pub fn boolean(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: PropertyKind::Bool,
            values: None,
            num_values: None,
        }
    }

    pub fn enumeration(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: PropertyKind::Enum,
            values: Some(values.iter().map(|v| serde_json::Value::from(*v)).collect()),
            num_values: None,
        }
    }

    pub fn integer(name: &str, count: u32) -> Self {
        Self {
            name: name.to_string(),
            kind: PropertyKind::Int,
            values: None,
            num_values: Some(count),
        }
    }

    /// The concrete values this property can take, as state strings.
    ///
    /// `bool` yields `true`/`false`, `enum`/`direction` the declared values
    /// lower-cased, `int` yields `0..n`. A missing domain yields nothing.
    pub fn domain(&self) -> Vec<String> {
        match self.kind {
            PropertyKind::Bool => vec!["true".to_string(), "false".to_string()],
            PropertyKind::Enum | PropertyKind::Direction => self
                .values
                .iter()
                .flatten()
                .map(|value| match value {
                    serde_json::Value::String(s) => s.to_lowercase(),
                    other => other.to_string().to_lowercase(),
                })
                .collect(),
            PropertyKind::Int => (0..self.num_values.unwrap_or(0))
                .map(|i| i.to_string())
                .collect(),
        }
    }
}

/// Supplies the state properties of a block.
pub trait StateSchemaProvider {
    /// Properties of `block` (without namespace), or `None` if the block is unknown.
    fn state_schema(&self, block: &str) -> Option<Vec<PropertyDefinition>>;
}

impl StateSchemaProvider for HashMap<String, Vec<PropertyDefinition>> {
    fn state_schema(&self, block: &str) -> Option<Vec<PropertyDefinition>> {
        self.get(block).cloned()
    }
}

#[derive(Debug, Deserialize)]
struct BlockEntry {
    name: String,
    #[serde(default)]
    states: Option<Vec<PropertyDefinition>>,
}

/// Property schemas for every block of one game version.
#[derive(Debug, Clone, Default)]
pub struct BlockSchemaTable {
    blocks: HashMap<String, Vec<PropertyDefinition>>,
}

impl BlockSchemaTable {
    /// Load a `blocks.json` file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Parse `blocks.json` contents. An empty table is an error: without
    /// state data no block can be resolved.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<BlockEntry> = serde_json::from_str(json)?;
        if entries.is_empty() {
            return Err(ConverterError::MissingStateData(
                "block table contains no blocks".to_string(),
            ));
        }

        let blocks = entries
            .into_iter()
            .map(|entry| (entry.name, entry.states.unwrap_or_default()))
            .collect();

        Ok(Self { blocks })
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl StateSchemaProvider for BlockSchemaTable {
    fn state_schema(&self, block: &str) -> Option<Vec<PropertyDefinition>> {
        let block = block.strip_prefix("minecraft:").unwrap_or(block);
        self.blocks.get(block).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCKS_JSON: &str = r#"[
        { "id": 1, "name": "stone", "states": [] },
        { "id": 2, "name": "oak_log", "states": [
            { "name": "axis", "type": "enum", "num_values": 3, "values": ["x", "y", "z"] }
        ] },
        { "id": 3, "name": "wheat", "states": [
            { "name": "age", "type": "int", "num_values": 8, "values": ["0", "1"] }
        ] },
        { "id": 4, "name": "lever", "states": [
            { "name": "face", "type": "enum", "values": ["FLOOR", "WALL", "CEILING"] },
            { "name": "facing", "type": "direction", "values": ["north", "south", "west", "east"] },
            { "name": "powered", "type": "bool", "num_values": 2 }
        ] }
    ]"#;

    #[test]
    fn test_load_table() {
        let table = BlockSchemaTable::from_json_str(BLOCKS_JSON).unwrap();
        assert_eq!(table.len(), 4);

        let log = table.state_schema("oak_log").unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].domain(), ["x", "y", "z"]);

        assert_eq!(table.state_schema("minecraft:stone"), Some(vec![]));
        assert!(table.state_schema("unknown_block").is_none());
    }

    #[test]
    fn test_domains() {
        let table = BlockSchemaTable::from_json_str(BLOCKS_JSON).unwrap();
        let wheat = table.state_schema("wheat").unwrap();
        assert_eq!(wheat[0].domain().len(), 8);
        assert_eq!(wheat[0].domain()[7], "7");

        let lever = table.state_schema("lever").unwrap();
        assert_eq!(lever[0].domain(), ["floor", "wall", "ceiling"]);
        assert_eq!(lever[1].kind, PropertyKind::Direction);
        assert_eq!(lever[2].domain(), ["true", "false"]);
    }

    #[test]
    fn test_empty_table_is_fatal() {
        assert!(matches!(
            BlockSchemaTable::from_json_str("[]"),
            Err(ConverterError::MissingStateData(_))
        ));
    }

    #[test]
    fn test_missing_domain_is_empty() {
        let broken = PropertyDefinition {
            name: "mode".to_string(),
            kind: PropertyKind::Enum,
            values: None,
            num_values: None,
        };
        assert!(broken.domain().is_empty());
        assert!(PropertyDefinition::integer("level", 0).domain().is_empty());
    }
}

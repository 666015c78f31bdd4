//! Blockstate definition parsing.
//!
//! Blockstates define how block properties map to model placements.
//! There are two formats: "variants" and "multipart". Variant keys keep
//! their document order because resolution is first-match-wins.

use crate::types::namespaced;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A blockstate definition from blockstates/*.json.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockstateDefinition {
    /// Property combinations map to placements, in document order.
    Variants(IndexMap<String, VariantBody>),
    /// Conditional placements, in document order.
    Multipart(Vec<MultipartCase>),
}

impl<'de> Deserialize<'de> for BlockstateDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBlockstate {
            variants: Option<IndexMap<String, VariantBody>>,
            multipart: Option<Vec<MultipartCase>>,
        }

        let raw = RawBlockstate::deserialize(deserializer)?;

        if let Some(variants) = raw.variants {
            Ok(BlockstateDefinition::Variants(variants))
        } else if let Some(multipart) = raw.multipart {
            Ok(BlockstateDefinition::Multipart(multipart))
        } else {
            Ok(BlockstateDefinition::Variants(IndexMap::new()))
        }
    }
}

/// The body of a variant or multipart entry: one placement or a weighted list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantBody {
    Single(ModelReference),
    Weighted(Vec<ModelReference>),
}

impl VariantBody {
    /// The placements in this body. A single placement is a one-element slice.
    pub fn models(&self) -> &[ModelReference] {
        match self {
            VariantBody::Single(model) => std::slice::from_ref(model),
            VariantBody::Weighted(models) => models,
        }
    }

    /// The placement used when weighted alternatives cannot be expressed.
    pub fn primary(&self) -> Option<&ModelReference> {
        self.models().first()
    }

    /// Whether any placement in this body uses the given (namespaced) model.
    pub fn references_model(&self, model_location: &str) -> bool {
        self.models()
            .iter()
            .any(|m| m.model_location() == model_location)
    }
}

/// A placement of a model, with optional block rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReference {
    /// Model resource location (e.g., "block/stone" or "minecraft:block/stone").
    pub model: String,
    /// X rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub y: i32,
    /// If true, UV coordinates don't rotate with the block.
    #[serde(default)]
    pub uvlock: bool,
    /// Weight for random selection (default 1).
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl ModelReference {
    /// Get the full resource location for the model.
    pub fn model_location(&self) -> String {
        namespaced(&self.model)
    }

    /// Whether the placement rotates the model at all.
    pub fn is_rotated(&self) -> bool {
        self.x != 0 || self.y != 0
    }
}

/// A multipart case with optional condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipartCase {
    /// Condition for when this case applies.
    #[serde(default)]
    pub when: Option<MultipartCondition>,
    /// Placement(s) applied when the condition is met.
    pub apply: VariantBody,
}

/// Property name to `|`-joined allowed values.
pub type ConditionMap = BTreeMap<String, ConditionValue>;

/// Multipart `when` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultipartCondition {
    /// Any of the sub-conditions must match.
    Or {
        #[serde(rename = "OR")]
        or: Vec<ConditionMap>,
    },
    /// All of the sub-conditions must match.
    And {
        #[serde(rename = "AND")]
        and: Vec<ConditionMap>,
    },
    /// All listed properties must match.
    Simple(ConditionMap),
}

impl MultipartCondition {
    /// An empty `when` object places its model unconditionally.
    pub fn is_unconditional(&self) -> bool {
        matches!(self, MultipartCondition::Simple(map) if map.is_empty())
    }
}

/// A condition value. Packs sometimes write booleans or numbers instead of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConditionValue(pub String);

impl ConditionValue {
    /// The allowed values, split on `|`.
    pub fn alternatives(&self) -> impl Iterator<Item = &str> {
        self.0.split('|')
    }
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawValue {
            Text(String),
            Flag(bool),
            Number(serde_json::Number),
        }

        Ok(ConditionValue(match RawValue::deserialize(deserializer)? {
            RawValue::Text(text) => text,
            RawValue::Flag(flag) => flag.to_string(),
            RawValue::Number(number) => number.to_string(),
        }))
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_variants() {
        let json = r#"{
            "variants": {
                "": { "model": "block/stone" }
            }
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        match def {
            BlockstateDefinition::Variants(variants) => {
                assert!(variants.contains_key(""));
                assert_eq!(variants[""].models().len(), 1);
                assert_eq!(variants[""].models()[0].model, "block/stone");
            }
            _ => panic!("Expected Variants"),
        }
    }

    #[test]
    fn test_variants_keep_document_order() {
        let json = r#"{
            "variants": {
                "facing=west": { "model": "block/furnace", "y": 270 },
                "facing=north": { "model": "block/furnace" },
                "facing=east": { "model": "block/furnace", "y": 90 },
                "facing=south": { "model": "block/furnace", "y": 180 }
            }
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        match def {
            BlockstateDefinition::Variants(variants) => {
                let keys: Vec<_> = variants.keys().map(String::as_str).collect();
                assert_eq!(
                    keys,
                    ["facing=west", "facing=north", "facing=east", "facing=south"]
                );
                assert_eq!(variants["facing=east"].models()[0].y, 90);
            }
            _ => panic!("Expected Variants"),
        }
    }

    #[test]
    fn test_parse_weighted_variants() {
        let json = r#"{
            "variants": {
                "": [
                    { "model": "block/stone", "weight": 10 },
                    { "model": "block/stone_mirrored", "weight": 5 }
                ]
            }
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        match def {
            BlockstateDefinition::Variants(variants) => {
                let body = &variants[""];
                assert!(matches!(body, VariantBody::Weighted(_)));
                assert_eq!(body.models().len(), 2);
                assert_eq!(body.models()[0].weight, 10);
                assert_eq!(body.models()[1].weight, 5);
                assert_eq!(body.primary().unwrap().model, "block/stone");
            }
            _ => panic!("Expected Variants"),
        }
    }

    #[test]
    fn test_parse_multipart() {
        let json = r#"{
            "multipart": [
                { "apply": { "model": "block/fence_post" } },
                { "when": { "north": "true" }, "apply": { "model": "block/fence_side", "uvlock": true } },
                { "when": { "OR": [{ "east": "low|tall" }, { "west": true }] }, "apply": { "model": "block/wall_side" } },
                { "when": { "AND": [{ "up": "true" }, { "level": 2 }] }, "apply": { "model": "block/wall_post" } }
            ]
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        match def {
            BlockstateDefinition::Multipart(cases) => {
                assert_eq!(cases.len(), 4);
                assert!(cases[0].when.is_none());
                assert!(matches!(cases[1].when, Some(MultipartCondition::Simple(_))));
                match &cases[2].when {
                    Some(MultipartCondition::Or { or }) => {
                        assert_eq!(or.len(), 2);
                        let east: Vec<_> = or[0]["east"].alternatives().collect();
                        assert_eq!(east, ["low", "tall"]);
                        assert_eq!(or[1]["west"].0, "true");
                    }
                    other => panic!("Expected OR, got {:?}", other),
                }
                match &cases[3].when {
                    Some(MultipartCondition::And { and }) => {
                        assert_eq!(and[1]["level"].0, "2");
                    }
                    other => panic!("Expected AND, got {:?}", other),
                }
            }
            _ => panic!("Expected Multipart"),
        }
    }

    #[test]
    fn test_empty_when_is_unconditional() {
        let case: MultipartCase =
            serde_json::from_str(r#"{ "when": {}, "apply": { "model": "block/post" } }"#).unwrap();
        assert!(case.when.unwrap().is_unconditional());
    }

    #[test]
    fn test_references_model_is_namespace_aware() {
        let body: VariantBody =
            serde_json::from_str(r#"[{ "model": "block/a" }, { "model": "mymod:block/b" }]"#).unwrap();
        assert!(body.references_model("minecraft:block/a"));
        assert!(body.references_model("mymod:block/b"));
        assert!(!body.references_model("minecraft:block/b"));
    }

    #[test]
    fn test_multipart_keeps_weighted_applies() {
        let json = r#"{
            "multipart": [
                { "apply": { "model": "block/post" } },
                { "when": { "north": "true" }, "apply": [{ "model": "block/side" }, { "model": "block/side_alt" }] }
            ]
        }"#;
        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        let BlockstateDefinition::Multipart(cases) = def else {
            panic!("expected multipart");
        };
        let models: Vec<_> = cases[1].apply.models().iter().map(|m| m.model.as_str()).collect();
        assert_eq!(models, ["block/side", "block/side_alt"]);
    }
}

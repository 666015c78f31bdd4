//! Vanilla blockstate association.
//!
//! A pack that overrides a vanilla block model without shipping the block's
//! blockstate still changes how that block looks. These helpers find the
//! vanilla blockstate entries that place an overridden model and regroup
//! them per block so each block is resolved once.

use super::variant_resolver::StateEntry;
use crate::resource_pack::ResourcePack;
use crate::types::DEFAULT_NAMESPACE;
use indexmap::IndexMap;
use std::collections::HashSet;

/// A vanilla blockstate entry that places an associated model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateCondition<'a> {
    /// Block name without namespace.
    pub block: &'a str,
    /// Position of the entry within the block's document.
    pub index: usize,
    pub entry: StateEntry<'a>,
}

/// Map each of `models` (namespaced locations) to the vanilla blockstate
/// entries that place it. Only blockstates the input pack does not override
/// are scanned; models nothing places are absent from the result.
pub fn find_model_associations<'a>(
    vanilla: &'a ResourcePack,
    input: &ResourcePack,
    models: &[String],
) -> IndexMap<String, Vec<StateCondition<'a>>> {
    let mut associations: IndexMap<String, Vec<StateCondition<'a>>> = IndexMap::new();
    let Some(blockstates) = vanilla.blockstates.get(DEFAULT_NAMESPACE) else {
        return associations;
    };

    for block in vanilla.blockstate_ids(DEFAULT_NAMESPACE) {
        if input.get_blockstate(block).is_some() {
            continue;
        }
        let Some((block, definition)) = blockstates.get_key_value(block) else {
            continue;
        };

        for (index, entry) in StateEntry::all(definition).into_iter().enumerate() {
            for model in models {
                if entry.body().references_model(model) {
                    associations
                        .entry(model.clone())
                        .or_default()
                        .push(StateCondition {
                            block: block.as_str(),
                            index,
                            entry,
                        });
                }
            }
        }
    }

    associations
}

/// Regroup associations per block. Each block's entries come back in
/// document order, once each, even if the entry places several associated models.
pub fn group_by_block<'a>(
    associations: &IndexMap<String, Vec<StateCondition<'a>>>,
) -> IndexMap<&'a str, Vec<StateEntry<'a>>> {
    let mut per_block: IndexMap<&'a str, Vec<StateCondition<'a>>> = IndexMap::new();
    let mut seen = HashSet::new();

    for condition in associations.values().flatten() {
        if seen.insert((condition.block, condition.index)) {
            per_block.entry(condition.block).or_default().push(*condition);
        }
    }

    per_block
        .into_iter()
        .map(|(block, mut conditions)| {
            conditions.sort_by_key(|c| c.index);
            (block, conditions.into_iter().map(|c| c.entry).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::BlockstateDefinition;

    fn blockstate(json: &str) -> BlockstateDefinition {
        serde_json::from_str(json).unwrap()
    }

    fn vanilla_pack() -> ResourcePack {
        let mut pack = ResourcePack::new();
        pack.add_blockstate(
            "minecraft",
            "oak_log",
            blockstate(
                r#"{ "variants": {
                    "axis=x": { "model": "minecraft:block/oak_log_horizontal", "x": 90, "y": 90 },
                    "axis=y": { "model": "minecraft:block/oak_log" },
                    "axis=z": { "model": "minecraft:block/oak_log_horizontal", "x": 90 }
                } }"#,
            ),
        );
        pack.add_blockstate(
            "minecraft",
            "oak_fence",
            blockstate(
                r#"{ "multipart": [
                    { "apply": { "model": "minecraft:block/oak_fence_post" } },
                    { "when": { "north": "true" }, "apply": { "model": "minecraft:block/oak_fence_side", "uvlock": true } }
                ] }"#,
            ),
        );
        pack.add_blockstate(
            "minecraft",
            "stone",
            blockstate(r#"{ "variants": { "": { "model": "minecraft:block/stone" } } }"#),
        );
        pack
    }

    #[test]
    fn test_find_model_associations() {
        let vanilla = vanilla_pack();
        let input = ResourcePack::new();
        let models = vec![
            "minecraft:block/oak_log_horizontal".to_string(),
            "minecraft:block/oak_fence_side".to_string(),
            "minecraft:block/unused".to_string(),
        ];

        let associations = find_model_associations(&vanilla, &input, &models);
        assert_eq!(associations.len(), 2);

        let horizontal = &associations["minecraft:block/oak_log_horizontal"];
        assert_eq!(horizontal.len(), 2);
        assert_eq!(horizontal[0].block, "oak_log");
        assert_eq!(horizontal[1].index, 2);
        assert!(matches!(horizontal[0].entry, StateEntry::Variant { key: "axis=x", .. }));

        let side = &associations["minecraft:block/oak_fence_side"];
        assert!(matches!(side[0].entry, StateEntry::Part { when: Some(_), .. }));
        assert!(!associations.contains_key("minecraft:block/unused"));
    }

    #[test]
    fn test_overridden_blockstates_are_not_scanned() {
        let vanilla = vanilla_pack();
        let mut input = ResourcePack::new();
        input.add_blockstate(
            "minecraft",
            "stone",
            blockstate(r#"{ "variants": { "": { "model": "minecraft:block/stone" } } }"#),
        );

        let associations =
            find_model_associations(&vanilla, &input, &["minecraft:block/stone".to_string()]);
        assert!(associations.is_empty());
    }

    #[test]
    fn test_group_by_block_restores_document_order() {
        let vanilla = vanilla_pack();
        let input = ResourcePack::new();
        // Listed in reverse so the association map is out of document order.
        let models = vec![
            "minecraft:block/oak_log_horizontal".to_string(),
            "minecraft:block/oak_log".to_string(),
        ];

        let associations = find_model_associations(&vanilla, &input, &models);
        let grouped = group_by_block(&associations);

        let entries = &grouped["oak_log"];
        let keys: Vec<_> = entries
            .iter()
            .map(|entry| match entry {
                StateEntry::Variant { key, .. } => *key,
                StateEntry::Part { .. } => panic!("Expected variant"),
            })
            .collect();
        assert_eq!(keys, ["axis=x", "axis=y", "axis=z"]);
    }
}

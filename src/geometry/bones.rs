//! The four-bone transform chain shared by geometry and animations.
//!
//! Every emitted object hangs off `geyser_custom`, bound to the equipped
//! slot, with `_x`, `_y` and `_z` children nested in that order. Geometry
//! lives on `_z`. A display transform is split per axis across the chain,
//! one rotation axis per bone.

use super::cube::BedrockCube;
use super::document::{Animation, AnimationDocument, Bone, BoneAnimation, BoneScale};
use super::ten_k_round;
use crate::types::DisplayTransform;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ROOT_BONE: &str = "geyser_custom";
pub const DISABLE_ANIMATION: &str = "animation.geyser_custom.disable";

const SLOT_BINDING: &str = "c.item_slot == 'head' ? 'head' : q.item_slot_to_bone_name(c.item_slot)";
const BONE_PIVOT: [f64; 3] = [0.0, 8.0, 0.0];

/// A flat textured quad, used for sprite items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureMesh {
    pub texture: String,
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub local_pivot: [f64; 3],
}

impl TextureMesh {
    /// The mesh that lays an item icon flat in the slot.
    pub fn sprite() -> Self {
        Self {
            texture: "default".to_string(),
            position: [0.0, 8.0, 0.0],
            rotation: [90.0, 0.0, -180.0],
            local_pivot: [8.0, 0.5, 8.0],
        }
    }
}

fn chain_bone_name(axis: &str) -> String {
    format!("{}_{}", ROOT_BONE, axis)
}

/// Build the bone chain, attaching `cubes` and `texture_meshes` to the innermost bone.
pub fn bone_chain(cubes: Option<Vec<BedrockCube>>, texture_meshes: Option<Vec<TextureMesh>>) -> Vec<Bone> {
    let root = Bone {
        name: ROOT_BONE.to_string(),
        parent: None,
        binding: Some(SLOT_BINDING.to_string()),
        pivot: BONE_PIVOT,
        cubes: None,
        texture_meshes: None,
    };

    let mut bones = vec![root];
    let mut parent = ROOT_BONE.to_string();
    for axis in ["x", "y", "z"] {
        let name = chain_bone_name(axis);
        bones.push(Bone {
            name: name.clone(),
            parent: Some(parent),
            binding: None,
            pivot: BONE_PIVOT,
            cubes: None,
            texture_meshes: None,
        });
        parent = name;
    }

    if let Some(innermost) = bones.last_mut() {
        innermost.cubes = cubes;
        innermost.texture_meshes = texture_meshes;
    }
    bones
}

/// How one item slot's display transform maps onto the chain.
struct SlotRule {
    /// Animation key suffix.
    key: &'static str,
    /// Java display slot read from the model.
    display_slot: &'static str,
    /// `_x` rotation when the slot defines no rotation.
    base_rotation: Option<[f64; 3]>,
    /// Multiplier for the slot scale, and `_x` scale when the slot defines none.
    base_scale: Option<f64>,
    /// Off-hand slots mirror the X translation.
    invert_x: bool,
    /// Transform of the root bone.
    base: BoneAnimation,
}

fn slot_rules() -> [SlotRule; 5] {
    let third_person = || BoneAnimation {
        rotation: Some([90.0, 0.0, 0.0]),
        position: Some([0.0, 13.0, -3.0]),
        scale: None,
    };
    let first_person = || BoneAnimation {
        rotation: Some([90.0, 60.0, -40.0]),
        position: Some([4.0, 10.0, 4.0]),
        scale: Some(BoneScale::Uniform(1.5)),
    };

    [
        SlotRule {
            key: "thirdperson_main_hand",
            display_slot: "thirdperson_righthand",
            base_rotation: None,
            base_scale: None,
            invert_x: false,
            base: third_person(),
        },
        SlotRule {
            key: "thirdperson_off_hand",
            display_slot: "thirdperson_lefthand",
            base_rotation: None,
            base_scale: None,
            invert_x: true,
            base: third_person(),
        },
        SlotRule {
            key: "head",
            display_slot: "head",
            base_rotation: None,
            base_scale: Some(0.625),
            invert_x: false,
            base: BoneAnimation {
                position: Some([0.0, 19.9, 0.0]),
                ..Default::default()
            },
        },
        SlotRule {
            key: "firstperson_main_hand",
            display_slot: "firstperson_righthand",
            base_rotation: Some([0.1, 0.1, 0.1]),
            base_scale: None,
            invert_x: false,
            base: first_person(),
        },
        SlotRule {
            key: "firstperson_off_hand",
            display_slot: "firstperson_lefthand",
            base_rotation: Some([0.1, 0.1, 0.1]),
            base_scale: None,
            invert_x: true,
            base: first_person(),
        },
    ]
}

fn slot_animation(rule: &SlotRule, display: Option<&DisplayTransform>) -> Animation {
    let mut bones = IndexMap::new();

    if let Some(display) = display {
        let mirror = if rule.invert_x { -1.0 } else { 1.0 };
        let x_bone = BoneAnimation {
            rotation: display
                .rotation
                .map(|r| [ten_k_round(-r[0]), 0.0, 0.0])
                .or(rule.base_rotation),
            position: display.translation.map(|t| {
                [
                    ten_k_round(-t[0] * mirror),
                    ten_k_round(t[1]),
                    ten_k_round(t[2]),
                ]
            }),
            scale: match display.scale {
                Some(s) => {
                    let factor = rule.base_scale.unwrap_or(1.0);
                    Some(BoneScale::PerAxis(s.map(|v| ten_k_round(v * factor))))
                }
                None => rule.base_scale.map(BoneScale::Uniform),
            },
        };
        let y_bone = BoneAnimation {
            rotation: display.rotation.map(|r| [0.0, ten_k_round(-r[1]), 0.0]),
            ..Default::default()
        };
        let z_bone = BoneAnimation {
            rotation: display.rotation.map(|r| [0.0, 0.0, ten_k_round(r[2])]),
            ..Default::default()
        };

        for (axis, bone) in [("x", x_bone), ("y", y_bone), ("z", z_bone)] {
            if !bone.is_empty() {
                bones.insert(chain_bone_name(axis), bone);
            }
        }
    }

    bones.insert(ROOT_BONE.to_string(), rule.base.clone());

    Animation {
        looping: Some(true),
        override_previous_animation: None,
        bones,
    }
}

/// The five slot animations of item `hash`, from its display transforms.
pub fn slot_animations(hash: &str, display: &BTreeMap<String, DisplayTransform>) -> AnimationDocument {
    let animations = slot_rules()
        .iter()
        .map(|rule| {
            (
                format!("animation.geyser_custom.{}.{}", hash, rule.key),
                slot_animation(rule, display.get(rule.display_slot)),
            )
        })
        .collect();

    AnimationDocument::new(animations)
}

/// The animation that hides an attachable by scaling its root to zero.
pub fn disable_animation() -> AnimationDocument {
    let mut bones = IndexMap::new();
    bones.insert(
        ROOT_BONE.to_string(),
        BoneAnimation {
            scale: Some(BoneScale::Uniform(0.0)),
            ..Default::default()
        },
    );

    let mut animations = IndexMap::new();
    animations.insert(
        DISABLE_ANIMATION.to_string(),
        Animation {
            looping: Some(true),
            override_previous_animation: Some(true),
            bones,
        },
    );
    AnimationDocument::new(animations)
}

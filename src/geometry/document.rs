//! Bedrock resource documents: geometry, animations and attachables.

use super::bones::TextureMesh;
use super::cube::BedrockCube;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const GEOMETRY_FORMAT_VERSION: &str = "1.16.0";
pub const ANIMATION_FORMAT_VERSION: &str = "1.8.0";
pub const ATTACHABLE_FORMAT_VERSION: &str = "1.10.0";

/// Geometry identifier for a content hash.
pub fn geometry_identifier(hash: &str) -> String {
    format!("geometry.geyser_custom.geo_{}", hash)
}

/// A `*.geo.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDocument {
    pub format_version: String,
    #[serde(rename = "minecraft:geometry")]
    pub geometry: Vec<GeometryEntry>,
}

impl GeometryDocument {
    /// A single-geometry document for `hash` with the given bones.
    pub fn new(hash: &str, bones: Vec<Bone>) -> Self {
        Self {
            format_version: GEOMETRY_FORMAT_VERSION.to_string(),
            geometry: vec![GeometryEntry {
                description: GeometryDescription::new(geometry_identifier(hash)),
                bones,
            }],
        }
    }

    /// Every cube in the document.
    pub fn cubes(&self) -> impl Iterator<Item = &BedrockCube> {
        self.geometry
            .iter()
            .flat_map(|g| &g.bones)
            .flat_map(|b| b.cubes.iter().flatten())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryEntry {
    pub description: GeometryDescription,
    pub bones: Vec<Bone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDescription {
    pub identifier: String,
    pub texture_width: u32,
    pub texture_height: u32,
    pub visible_bounds_width: f64,
    pub visible_bounds_height: f64,
    pub visible_bounds_offset: [f64; 3],
}

impl GeometryDescription {
    pub fn new(identifier: String) -> Self {
        Self {
            identifier,
            texture_width: 16,
            texture_height: 16,
            visible_bounds_width: 4.0,
            visible_bounds_height: 4.5,
            visible_bounds_offset: [0.0, 0.75, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
    pub pivot: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cubes: Option<Vec<BedrockCube>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_meshes: Option<Vec<TextureMesh>>,
}

/// An `*.animation.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDocument {
    pub format_version: String,
    pub animations: IndexMap<String, Animation>,
}

impl AnimationDocument {
    pub fn new(animations: IndexMap<String, Animation>) -> Self {
        Self {
            format_version: ANIMATION_FORMAT_VERSION.to_string(),
            animations,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_previous_animation: Option<bool>,
    pub bones: IndexMap<String, BoneAnimation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneAnimation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<BoneScale>,
}

impl BoneAnimation {
    pub fn is_empty(&self) -> bool {
        self.rotation.is_none() && self.position.is_none() && self.scale.is_none()
    }
}

/// A bone scale: one factor for all axes, or one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoneScale {
    Uniform(f64),
    PerAxis([f64; 3]),
}

/// An `*.attachable.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachableDocument {
    pub format_version: String,
    #[serde(rename = "minecraft:attachable")]
    pub attachable: Attachable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachable {
    pub description: AttachableDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachableDescription {
    pub identifier: String,
    pub materials: IndexMap<String, String>,
    pub textures: IndexMap<String, String>,
    pub geometry: IndexMap<String, String>,
    pub scripts: AttachableScripts,
    pub animations: IndexMap<String, String>,
    pub render_controllers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachableScripts {
    pub pre_animation: Vec<String>,
    pub animate: Vec<IndexMap<String, String>>,
}

/// `(animation slot, condition)` pairs driving the slot animations.
const ANIMATE_CONDITIONS: [(&str, &str); 6] = [
    ("thirdperson_main_hand", "v.main_hand && !c.is_first_person"),
    ("thirdperson_off_hand", "v.off_hand && !c.is_first_person"),
    ("thirdperson_head", "v.head && !c.is_first_person"),
    ("firstperson_main_hand", "v.main_hand && c.is_first_person"),
    ("firstperson_off_hand", "v.off_hand && c.is_first_person"),
    ("firstperson_head", "c.is_first_person && v.head"),
];

fn string_map<'a>(pairs: impl IntoIterator<Item = (&'a str, String)>) -> IndexMap<String, String> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

impl AttachableDocument {
    /// The attachable for item `hash`, rendering `texture` with `material`.
    pub fn for_item(hash: &str, material: &str, texture: &str) -> Self {
        let animation = |suffix: &str| format!("animation.geyser_custom.{}.{}", hash, suffix);

        let description = AttachableDescription {
            identifier: format!("geyser_custom:g_{}", hash),
            materials: string_map([
                ("default", material.to_string()),
                ("enchanted", material.to_string()),
            ]),
            textures: string_map([
                ("default", texture.to_string()),
                ("enchanted", "textures/misc/enchanted_item_glint".to_string()),
            ]),
            geometry: string_map([("default", geometry_identifier(hash))]),
            scripts: AttachableScripts {
                pre_animation: vec![
                    "v.main_hand = c.item_slot == 'main_hand';".to_string(),
                    "v.off_hand = c.item_slot == 'off_hand';".to_string(),
                    "v.head = c.item_slot == 'head';".to_string(),
                ],
                animate: ANIMATE_CONDITIONS
                    .iter()
                    .map(|(slot, condition)| string_map([(*slot, condition.to_string())]))
                    .collect(),
            },
            animations: string_map([
                ("thirdperson_main_hand", animation("thirdperson_main_hand")),
                ("thirdperson_off_hand", animation("thirdperson_off_hand")),
                ("thirdperson_head", animation("head")),
                ("firstperson_main_hand", animation("firstperson_main_hand")),
                ("firstperson_off_hand", animation("firstperson_off_hand")),
                ("firstperson_head", super::bones::DISABLE_ANIMATION.to_string()),
            ]),
            render_controllers: vec!["controller.render.item_default".to_string()],
        };

        Self {
            format_version: ATTACHABLE_FORMAT_VERSION.to_string(),
            attachable: Attachable { description },
        }
    }
}

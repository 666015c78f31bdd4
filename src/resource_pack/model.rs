//! Block and item model parsing.
//!
//! Models define geometry with cuboid elements. Every section is optional
//! because models inherit unset sections from their parent.

use crate::types::{namespaced, Direction, DisplayTransform, ElementRotation};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed model from models/*.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockModel {
    /// Parent model to inherit from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Whether to use ambient occlusion.
    #[serde(default = "default_ao", rename = "ambientocclusion")]
    pub ambient_occlusion: bool,

    /// Texture variable definitions, in document order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub textures: IndexMap<String, String>,

    /// Model elements (cuboids). `None` means inherited from the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ModelElement>>,

    /// Display transforms per item slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<BTreeMap<String, DisplayTransform>>,
}

fn default_ao() -> bool {
    true
}

impl Default for BlockModel {
    fn default() -> Self {
        Self {
            parent: None,
            ambient_occlusion: true,
            textures: IndexMap::new(),
            elements: None,
            display: None,
        }
    }
}

impl BlockModel {
    /// Get the full parent resource location.
    pub fn parent_location(&self) -> Option<String> {
        self.parent.as_deref().map(namespaced)
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelElement {
    /// Minimum corner.
    pub from: [f64; 3],
    /// Maximum corner.
    pub to: [f64; 3],
    /// Optional rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<ElementRotation>,
    /// Whether this element receives shade.
    #[serde(default = "default_shade")]
    pub shade: bool,
    /// Face definitions.
    #[serde(default)]
    pub faces: BTreeMap<Direction, ModelFace>,
}

fn default_shade() -> bool {
    true
}

impl ModelElement {
    /// Get the size of this element in model coordinates.
    pub fn size(&self) -> [f64; 3] {
        [
            self.to[0] - self.from[0],
            self.to[1] - self.from[1],
            self.to[2] - self.from[2],
        ]
    }

    /// The UV box of a face, falling back to the box Minecraft derives
    /// from the element bounds when the face has none.
    pub fn face_uv(&self, direction: Direction, face: &ModelFace) -> [f64; 4] {
        face.uv.unwrap_or_else(|| self.default_uv(direction))
    }

    fn default_uv(&self, direction: Direction) -> [f64; 4] {
        let [fx, fy, fz] = self.from;
        let [tx, ty, tz] = self.to;
        match direction {
            Direction::Down => [fx, 16.0 - tz, tx, 16.0 - fz],
            Direction::Up => [fx, fz, tx, tz],
            Direction::North => [16.0 - tx, 16.0 - ty, 16.0 - fx, 16.0 - fy],
            Direction::South => [fx, 16.0 - ty, tx, 16.0 - fy],
            Direction::West => [fz, 16.0 - ty, tz, 16.0 - fy],
            Direction::East => [16.0 - tz, 16.0 - ty, 16.0 - fz, 16.0 - fy],
        }
    }
}

/// A face of a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFace {
    /// UV coordinates [u1, v1, u2, v2] in 0-16 range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv: Option<[f64; 4]>,
    /// Texture reference (e.g., "#side").
    pub texture: String,
    /// Face direction for culling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cullface: Option<Direction>,
    /// UV rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub rotation: i32,
    /// Tint index for biome coloring (-1 = no tint).
    #[serde(default = "default_tint_index")]
    pub tintindex: i32,
}

fn default_tint_index() -> i32 {
    -1
}

impl ModelFace {
    /// The texture variable this face samples, without the leading `#`.
    pub fn texture_key(&self) -> &str {
        self.texture.strip_prefix('#').unwrap_or(&self.texture)
    }
}

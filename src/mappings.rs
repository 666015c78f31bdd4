//! Geyser custom block mapping documents.
//!
//! These are the plain value types serialized into `geyser_mappings.json`.
//! Component sets are built as struct literals and combined with
//! [`BlockComponents::append`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How Bedrock renders a material instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMethod {
    Opaque,
    #[default]
    AlphaTest,
    Blend,
    DoubleSided,
}

/// A texture binding for one face group of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInstance {
    pub texture: String,
    pub render_method: RenderMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_dimming: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_occlusion: Option<bool>,
}

impl MaterialInstance {
    pub fn new(texture: impl Into<String>, render_method: RenderMethod) -> Self {
        Self {
            texture: texture.into(),
            render_method,
            face_dimming: None,
            ambient_occlusion: None,
        }
    }
}

/// A collision or selection box in Bedrock block space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub origin: [f64; 3],
    pub size: [f64; 3],
}

impl Hitbox {
    /// The box used for models that were downscaled to fit the block envelope.
    pub fn downscaled() -> Self {
        Self {
            origin: [-4.0, 4.0, -4.0],
            size: [8.0, 8.0, 8.0],
        }
    }
}

/// A block transformation component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<[f64; 3]>,
}

impl Transformation {
    /// Overlay the fields set in `other` on top of this transformation.
    pub fn merge(&mut self, other: &Transformation) {
        if other.rotation.is_some() {
            self.rotation = other.rotation;
        }
        if other.scale.is_some() {
            self.scale = other.scale;
        }
        if other.translation.is_some() {
            self.translation = other.translation;
        }
    }
}

/// The visual and physical components of one block state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_box: Option<Hitbox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_box: Option<Hitbox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_instances: Option<BTreeMap<String, MaterialInstance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<Transformation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cube: Option<bool>,
}

impl BlockComponents {
    /// Copy every component set in `other` into `self`. Transformations are
    /// merged field by field, everything else is replaced.
    pub fn append(&mut self, other: &BlockComponents) {
        if other.collision_box.is_some() {
            self.collision_box = other.collision_box.clone();
        }
        if other.selection_box.is_some() {
            self.selection_box = other.selection_box.clone();
        }
        if other.geometry.is_some() {
            self.geometry = other.geometry.clone();
        }
        if other.material_instances.is_some() {
            self.material_instances = other.material_instances.clone();
        }
        if let Some(transformation) = &other.transformation {
            self.transformation
                .get_or_insert_with(Transformation::default)
                .merge(transformation);
        }
        if other.unit_cube.is_some() {
            self.unit_cube = other.unit_cube;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == BlockComponents::default()
    }
}

/// The mapping entry for one Java block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootBlock {
    pub name: String,
    pub only_override_states: bool,
    #[serde(flatten)]
    pub components: BlockComponents,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub state_overrides: BTreeMap<String, BlockComponents>,
}

impl RootBlock {
    /// An entry for `minecraft:{block}` that only overrides listed states.
    pub fn new(block: &str) -> Self {
        Self {
            name: format!("minecraft:{}", block),
            only_override_states: true,
            components: BlockComponents::default(),
            state_overrides: BTreeMap::new(),
        }
    }

    /// Apply components to every state of the block.
    pub fn set_unconditional(&mut self, components: &BlockComponents) {
        self.only_override_states = false;
        self.components.append(components);
    }

    /// Apply components to one canonical state.
    pub fn override_state(&mut self, state: &str, components: BlockComponents) {
        self.state_overrides.insert(state.to_string(), components);
    }
}

/// The complete `geyser_mappings.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeyserMappings {
    pub format_version: String,
    pub blocks: BTreeMap<String, RootBlock>,
}

impl Default for GeyserMappings {
    fn default() -> Self {
        Self {
            format_version: "1".to_string(),
            blocks: BTreeMap::new(),
        }
    }
}

impl GeyserMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block: RootBlock) {
        self.blocks.insert(block.name.clone(), block);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

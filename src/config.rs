//! Converter configuration.

use crate::error::Result;
use crate::mappings::RenderMethod;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling a conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Material used by item attachables.
    pub attachable_material: String,
    /// Render method assigned to block material instances.
    pub block_render_method: RenderMethod,
    /// Convert blockstates and block models.
    pub convert_blocks: bool,
    /// Convert item models into attachables.
    pub convert_items: bool,
    /// Maximum item sprite sheet dimension.
    pub atlas_max_size: u32,
    /// Padding between textures in item sprite sheets.
    pub atlas_padding: u32,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            attachable_material: "entity_alphatest_one_sided".to_string(),
            block_render_method: RenderMethod::AlphaTest,
            convert_blocks: true,
            convert_items: true,
            atlas_max_size: 4096,
            atlas_padding: 0,
        }
    }
}

impl ConverterConfig {
    /// Load a config from a JSON file. Missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Use a different attachable material.
    pub fn with_attachable_material(mut self, material: impl Into<String>) -> Self {
        self.attachable_material = material.into();
        self
    }
}

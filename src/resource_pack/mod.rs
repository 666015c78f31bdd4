//! Resource pack loading and parsing.
//!
//! This module handles loading Minecraft Java resource packs (ZIP files, client
//! jars or directories) and parsing their blockstates and models. Textures are
//! kept as raw PNG bytes because most of them are copied through unchanged.

pub mod loader;
pub mod blockstate;
pub mod model;
pub mod texture;

pub use blockstate::{
    BlockstateDefinition, ConditionMap, ConditionValue, ModelReference, MultipartCase,
    MultipartCondition, VariantBody,
};
pub use model::{BlockModel, ModelElement, ModelFace};
pub use texture::TextureData;

use crate::types::parse_resource_location;
use std::collections::HashMap;

/// A loaded Minecraft resource pack.
#[derive(Debug, Default, Clone)]
pub struct ResourcePack {
    /// Blockstate definitions by namespace and block ID.
    pub blockstates: HashMap<String, HashMap<String, BlockstateDefinition>>,

    /// Model definitions by namespace and model path.
    pub models: HashMap<String, HashMap<String, BlockModel>>,

    /// PNG bytes by namespace and texture path.
    pub textures: HashMap<String, HashMap<String, Vec<u8>>>,
}

impl ResourcePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a blockstate definition by full resource location (e.g., "minecraft:stone").
    pub fn get_blockstate(&self, resource_location: &str) -> Option<&BlockstateDefinition> {
        let (namespace, path) = parse_resource_location(resource_location);
        self.blockstates
            .get(namespace)
            .and_then(|ns| ns.get(path))
    }

    /// Get a model by full resource location (e.g., "minecraft:block/stone").
    pub fn get_model(&self, resource_location: &str) -> Option<&BlockModel> {
        let (namespace, path) = parse_resource_location(resource_location);
        self.models.get(namespace).and_then(|ns| ns.get(path))
    }

    /// Get texture PNG bytes by full resource location (e.g., "minecraft:block/stone").
    pub fn get_texture(&self, resource_location: &str) -> Option<&[u8]> {
        let (namespace, path) = parse_resource_location(resource_location);
        self.textures
            .get(namespace)
            .and_then(|ns| ns.get(path))
            .map(Vec::as_slice)
    }

    /// Add a blockstate definition.
    pub fn add_blockstate(
        &mut self,
        namespace: &str,
        block_id: &str,
        definition: BlockstateDefinition,
    ) {
        self.blockstates
            .entry(namespace.to_string())
            .or_default()
            .insert(block_id.to_string(), definition);
    }

    /// Add a model.
    pub fn add_model(&mut self, namespace: &str, model_path: &str, model: BlockModel) {
        self.models
            .entry(namespace.to_string())
            .or_default()
            .insert(model_path.to_string(), model);
    }

    /// Add a texture.
    pub fn add_texture(&mut self, namespace: &str, texture_path: &str, png: Vec<u8>) {
        self.textures
            .entry(namespace.to_string())
            .or_default()
            .insert(texture_path.to_string(), png);
    }

    /// Block IDs with a blockstate file in a namespace, sorted.
    pub fn blockstate_ids(&self, namespace: &str) -> Vec<&str> {
        let mut ids: Vec<_> = self
            .blockstates
            .get(namespace)
            .map(|ns| ns.keys().map(String::as_str).collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Model paths in a namespace starting with `prefix` (e.g. "block/"), sorted.
    pub fn model_paths(&self, namespace: &str, prefix: &str) -> Vec<&str> {
        let mut paths: Vec<_> = self
            .models
            .get(namespace)
            .map(|ns| {
                ns.keys()
                    .map(String::as_str)
                    .filter(|p| p.starts_with(prefix))
                    .collect()
            })
            .unwrap_or_default();
        paths.sort_unstable();
        paths
    }

    /// Get the total number of blockstate definitions.
    pub fn blockstate_count(&self) -> usize {
        self.blockstates.values().map(|m| m.len()).sum()
    }

    /// Get the total number of models.
    pub fn model_count(&self) -> usize {
        self.models.values().map(|m| m.len()).sum()
    }

    /// Get the total number of textures.
    pub fn texture_count(&self) -> usize {
        self.textures.values().map(|m| m.len()).sum()
    }

    /// Get all namespaces in the resource pack.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<_> = self.blockstates.keys()
            .chain(self.models.keys())
            .chain(self.textures.keys())
            .map(|s| s.as_str())
            .collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces
    }
}

/// Read access to pack assets by resource location.
pub trait AssetSource {
    fn blockstate(&self, resource_location: &str) -> Option<&BlockstateDefinition>;

    fn model(&self, resource_location: &str) -> Option<&BlockModel>;

    fn texture_bytes(&self, resource_location: &str) -> Option<&[u8]>;
}

impl AssetSource for ResourcePack {
    fn blockstate(&self, resource_location: &str) -> Option<&BlockstateDefinition> {
        self.get_blockstate(resource_location)
    }

    fn model(&self, resource_location: &str) -> Option<&BlockModel> {
        self.get_model(resource_location)
    }

    fn texture_bytes(&self, resource_location: &str) -> Option<&[u8]> {
        self.get_texture(resource_location)
    }
}

/// The input pack layered over the vanilla pack: input assets win.
#[derive(Debug, Clone, Copy)]
pub struct LayeredSource<'a> {
    pub input: &'a ResourcePack,
    pub fallback: &'a ResourcePack,
}

impl<'a> LayeredSource<'a> {
    pub fn new(input: &'a ResourcePack, fallback: &'a ResourcePack) -> Self {
        Self { input, fallback }
    }
}

impl AssetSource for LayeredSource<'_> {
    fn blockstate(&self, resource_location: &str) -> Option<&BlockstateDefinition> {
        self.input
            .get_blockstate(resource_location)
            .or_else(|| self.fallback.get_blockstate(resource_location))
    }

    fn model(&self, resource_location: &str) -> Option<&BlockModel> {
        self.input
            .get_model(resource_location)
            .or_else(|| self.fallback.get_model(resource_location))
    }

    fn texture_bytes(&self, resource_location: &str) -> Option<&[u8]> {
        self.input
            .get_texture(resource_location)
            .or_else(|| self.fallback.get_texture(resource_location))
    }
}

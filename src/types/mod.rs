//! Shared types used throughout the library.

mod direction;
mod transform;

pub use direction::{Axis, Direction};
pub use transform::{DisplayTransform, ElementRotation};

/// Default namespace for resource locations without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Parse a resource location into namespace and path.
/// "minecraft:block/stone" -> ("minecraft", "block/stone")
/// "block/stone" -> ("minecraft", "block/stone")
pub fn parse_resource_location(resource_location: &str) -> (&str, &str) {
    if let Some((namespace, path)) = resource_location.split_once(':') {
        (namespace, path)
    } else {
        (DEFAULT_NAMESPACE, resource_location)
    }
}

/// Add the default namespace to a resource location that lacks one.
pub fn namespaced(resource_location: &str) -> String {
    let (namespace, path) = parse_resource_location(resource_location);
    format!("{}:{}", namespace, path)
}

/// Archive path of a model file, e.g. `assets/minecraft/models/block/stone.json`.
pub fn model_file_path(resource_location: &str) -> String {
    let (namespace, path) = parse_resource_location(resource_location);
    format!("assets/{}/models/{}.json", namespace, path)
}

/// Archive path of a texture file, e.g. `assets/minecraft/textures/block/stone.png`.
pub fn texture_file_path(resource_location: &str) -> String {
    let (namespace, path) = parse_resource_location(resource_location);
    format!("assets/{}/textures/{}.png", namespace, path)
}

/// Bedrock texture path without extension, e.g. `textures/minecraft/block/stone`.
pub fn bedrock_texture_path(resource_location: &str) -> String {
    let (namespace, path) = parse_resource_location(resource_location);
    format!("textures/{}/{}", namespace, path)
}

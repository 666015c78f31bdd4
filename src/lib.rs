//! # java2bedrock
//!
//! Converts a Minecraft Java Edition resource pack into Bedrock Edition
//! resources plus the block mappings Geyser uses to render custom block
//! states.
//!
//! ## Overview
//!
//! The converter takes the input pack, the vanilla client assets it
//! overrides and a table of block state properties. It produces:
//!
//! - `geyser_mappings.json` with per-state block overrides,
//! - block geometry under `models/blocks/geyser_custom/`,
//! - `textures/terrain_texture.json` plus the copied block textures,
//! - attachables, geometry, animations and textures for items.
//!
//! ## Quick Start
//!
//! ```ignore
//! use java2bedrock::{load_resource_pack, BlockSchemaTable, Converter, ConverterConfig};
//!
//! let input = load_resource_pack("path/to/pack.zip")?;
//! let vanilla = load_resource_pack("path/to/client.jar")?;
//! let schema = BlockSchemaTable::from_json_file("path/to/blocks.json")?;
//!
//! let output = Converter::new(&input, &vanilla, &schema, ConverterConfig::default()).convert()?;
//! output.pack.write_zip("out/geyser_pack.zip")?;
//!
//! for diagnostic in output.diagnostics.entries() {
//!     println!("{}", diagnostic);
//! }
//! ```
//!
//! ## Partial Failure
//!
//! Blocks and models convert independently. One that cannot be converted is
//! left out and reported through [`Diagnostics`]; `convert` only fails when
//! there is nothing to resolve against or an output document cannot be
//! serialized.

pub mod error;
pub mod types;
pub mod resource_pack;
pub mod schema;
pub mod resolver;
pub mod geometry;
pub mod atlas;
pub mod mappings;
pub mod config;
pub mod diagnostics;
pub mod hash;
pub mod converter;

// Re-export main types for convenience
pub use error::{ConverterError, Result};
pub use types::{Axis, Direction, DisplayTransform};
pub use resource_pack::{BlockModel, BlockstateDefinition, ModelElement, ResourcePack};
pub use schema::{BlockSchemaTable, PropertyDefinition, StateSchemaProvider};
pub use mappings::{BlockComponents, GeyserMappings, RenderMethod, RootBlock};
pub use config::ConverterConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use converter::{ConversionOutput, Converter, OutputPack};
pub use hash::string_hash;

/// Load a resource pack from a file path (ZIP, client jar or directory).
pub fn load_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<ResourcePack> {
    resource_pack::loader::load_from_path(path)
}

/// Load a resource pack from ZIP bytes.
pub fn load_resource_pack_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    resource_pack::loader::load_from_bytes(data)
}

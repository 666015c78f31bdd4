//! Item sprite sheets.
//!
//! Three-dimensional item models sample several textures from one sheet.
//! This module packs those textures and reports where each one landed so
//! face UVs can be remapped.

mod builder;

pub use builder::{AtlasPlacement, SpriteSheet, SpriteSheetBuilder};

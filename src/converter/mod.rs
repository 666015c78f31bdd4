//! Java to Bedrock pack conversion.
//!
//! A run converts blocks into Geyser block mappings plus Bedrock geometry
//! and terrain textures, then items into attachables with their geometry
//! and animations. Every block and model is an independent unit of work:
//! one that fails is recorded in the diagnostics and left out, the rest of
//! the run carries on.

mod blocks;
mod items;
pub mod output;

pub use output::OutputPack;

use crate::config::ConverterConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{ConverterError, Result};
use crate::mappings::GeyserMappings;
use crate::resolver::FlattenedModel;
use crate::resource_pack::{AssetSource, LayeredSource, ResourcePack};
use crate::schema::StateSchemaProvider;
use crate::types::bedrock_texture_path;
use std::collections::HashSet;

/// Path of the Geyser block mappings document within the output.
pub const MAPPINGS_PATH: &str = "geyser_mappings.json";

/// Everything a conversion run produced.
#[derive(Debug)]
pub struct ConversionOutput {
    pub pack: OutputPack,
    pub mappings: GeyserMappings,
    pub diagnostics: Diagnostics,
}

/// Converts a Java resource pack against the vanilla assets it overrides.
pub struct Converter<'a, S: StateSchemaProvider> {
    input: &'a ResourcePack,
    vanilla: &'a ResourcePack,
    schema: &'a S,
    config: ConverterConfig,
}

impl<'a, S: StateSchemaProvider> Converter<'a, S> {
    pub fn new(
        input: &'a ResourcePack,
        vanilla: &'a ResourcePack,
        schema: &'a S,
        config: ConverterConfig,
    ) -> Self {
        Self {
            input,
            vanilla,
            schema,
            config,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Run the conversion.
    ///
    /// Fails only when the vanilla pack has no blockstates to resolve against
    /// or an output document cannot be serialized. Per-block and per-model
    /// failures end up in [`ConversionOutput::diagnostics`].
    pub fn convert(&self) -> Result<ConversionOutput> {
        if self.config.convert_blocks && self.vanilla.blockstate_count() == 0 {
            return Err(ConverterError::MissingStateData(
                "vanilla pack contains no blockstates".to_string(),
            ));
        }

        let source = LayeredSource::new(self.input, self.vanilla);
        let mut context = ConversionContext::new(&source);

        let mappings = if self.config.convert_blocks {
            log::info!("Converting blocks...");
            blocks::BlockConverter::new(self.input, self.vanilla, &source, self.schema, &self.config)
                .run(&mut context)?
        } else {
            GeyserMappings::new()
        };

        if self.config.convert_items {
            log::info!("Converting items...");
            items::ItemConverter::new(self.input, self.vanilla, &source, &self.config)
                .run(&mut context)?;
        }

        context.pack.insert_json(MAPPINGS_PATH, &mappings)?;

        log::info!(
            "Converted {} blocks into {} files ({} diagnostics)",
            mappings.len(),
            context.pack.len(),
            context.diagnostics.len()
        );

        Ok(ConversionOutput {
            pack: context.pack,
            mappings,
            diagnostics: context.diagnostics,
        })
    }
}

/// Output state shared by the block and item stages.
pub(crate) struct ConversionContext<'s, A: AssetSource> {
    source: &'s A,
    pub pack: OutputPack,
    pub diagnostics: Diagnostics,
    /// Texture locations already copied or reported missing.
    textures: HashSet<String>,
}

impl<'s, A: AssetSource> ConversionContext<'s, A> {
    pub fn new(source: &'s A) -> Self {
        Self {
            source,
            pack: OutputPack::new(),
            diagnostics: Diagnostics::new(),
            textures: HashSet::new(),
        }
    }

    /// Copy a Java texture into the output and return its Bedrock path
    /// (without extension). A missing texture is reported once and still
    /// yields the path it would have had.
    pub fn copy_texture(&mut self, location: &str) -> String {
        let path = bedrock_texture_path(location);
        if !self.textures.insert(location.to_string()) {
            return path;
        }

        match self.source.texture_bytes(location) {
            Some(bytes) => self.pack.insert_bytes(format!("{}.png", path), bytes.to_vec()),
            None => self.diagnostics.warning(location, "texture not found"),
        }
        path
    }

    /// Report the texture keys of `model` that never resolved to a texture.
    pub fn report_unresolved(&mut self, model: &FlattenedModel) {
        for key in &model.unresolved_textures {
            self.diagnostics
                .warning(&model.location, format!("texture #{} does not resolve, dropped", key));
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_packs::*;
    use super::*;
    use crate::diagnostics::Severity;
    use serde_json::json;

    fn input_pack() -> ResourcePack {
        let mut pack = ResourcePack::new();
        pack.add_model(
            "minecraft",
            "block/stone",
            model(r#"{ "parent": "block/cube_all", "textures": { "all": "block/granite" } }"#),
        );
        pack.add_texture("minecraft", "block/granite", png(16, 16));
        pack.add_model(
            "minecraft",
            "item/stick",
            model(r#"{ "parent": "item/generated", "textures": { "layer0": "item/bone" } }"#),
        );
        pack.add_texture("minecraft", "item/bone", png(16, 16));
        pack
    }

    #[test]
    fn test_convert_end_to_end() {
        let input = input_pack();
        let vanilla = vanilla();
        let schema = schema();
        let output = Converter::new(&input, &vanilla, &schema, ConverterConfig::default())
            .convert()
            .unwrap();

        assert_eq!(output.mappings.len(), 1);
        assert!(output.mappings.blocks.contains_key("minecraft:stone"));
        assert!(output.pack.contains(MAPPINGS_PATH));
        assert!(output.pack.contains("textures/terrain_texture.json"));
        assert!(output.pack.contains("textures/minecraft/block/granite.png"));
        assert!(output.pack.contains("animations/disable.animation.json"));
        assert!(output.pack.contains("textures/minecraft/item/bone.png"));
        assert_eq!(output.diagnostics.count(Severity::Critical), 0);

        let mappings = output.pack.json(MAPPINGS_PATH).unwrap();
        assert_eq!(mappings["format_version"], json!("1"));
        assert_eq!(mappings["blocks"]["minecraft:stone"]["only_override_states"], json!(false));
        assert_eq!(mappings["blocks"]["minecraft:stone"]["unit_cube"], json!(true));
    }

    #[test]
    fn test_stage_toggles() {
        let input = input_pack();
        let vanilla = vanilla();
        let schema = schema();
        let config = ConverterConfig {
            convert_items: false,
            ..Default::default()
        };
        let output = Converter::new(&input, &vanilla, &schema, config).convert().unwrap();
        assert!(!output.pack.paths().any(|p| p.starts_with("attachables/")));
        assert_eq!(output.mappings.len(), 1);

        let config = ConverterConfig {
            convert_blocks: false,
            ..Default::default()
        };
        let output = Converter::new(&input, &vanilla, &schema, config).convert().unwrap();
        assert!(output.mappings.is_empty());
        assert!(output.pack.paths().any(|p| p.starts_with("attachables/")));
    }

    #[test]
    fn test_missing_vanilla_state_data_is_fatal() {
        let input = input_pack();
        let vanilla = ResourcePack::new();
        let schema = schema();
        let result = Converter::new(&input, &vanilla, &schema, ConverterConfig::default()).convert();
        assert!(matches!(result, Err(ConverterError::MissingStateData(_))));
    }

    #[test]
    fn test_copy_texture_reports_missing_once() {
        let pack = ResourcePack::new();
        let mut context = ConversionContext::new(&pack);
        assert_eq!(context.copy_texture("minecraft:block/nope"), "textures/minecraft/block/nope");
        context.copy_texture("minecraft:block/nope");
        assert_eq!(context.diagnostics.count(Severity::Warning), 1);
        assert!(context.pack.is_empty());
    }

    #[test]
    fn test_unresolved_texture_is_reported() {
        let mut input = ResourcePack::new();
        input.add_model(
            "minecraft",
            "block/stone",
            model(
                r##"{
                    "textures": { "top": "#missing" },
                    "elements": [{ "from": [0, 0, 0], "to": [16, 16, 16], "faces": { "up": { "texture": "#top" } } }]
                }"##,
            ),
        );
        let vanilla = vanilla();
        let schema = schema();
        let output = Converter::new(&input, &vanilla, &schema, ConverterConfig::default())
            .convert()
            .unwrap();

        assert!(output
            .diagnostics
            .entries()
            .iter()
            .any(|d| d.subject == "minecraft:block/stone" && d.message.contains("#top")));
    }
}

//! Item conversion: attachables with geometry, slot animations and textures.

use super::ConversionContext;
use crate::atlas::{SpriteSheet, SpriteSheetBuilder};
use crate::config::ConverterConfig;
use crate::error::Result;
use crate::geometry::{
    bone_chain, convert_elements, disable_animation, slot_animations, AttachableDocument,
    GeometryDocument, TextureMesh, UvMapping,
};
use crate::hash::string_hash;
use crate::resolver::{FlattenMode, FlattenedModel, ModelFlattener, ModelKind};
use crate::resource_pack::texture::load_texture_from_bytes;
use crate::resource_pack::{AssetSource, LayeredSource, ResourcePack, TextureData};
use crate::types::{model_file_path, DEFAULT_NAMESPACE};
use std::collections::HashSet;

pub const DISABLE_ANIMATION_PATH: &str = "animations/disable.animation.json";

pub(super) struct ItemConverter<'a> {
    input: &'a ResourcePack,
    vanilla: &'a ResourcePack,
    source: &'a LayeredSource<'a>,
    flattener: ModelFlattener<'a, LayeredSource<'a>>,
    config: &'a ConverterConfig,
}

impl<'a> ItemConverter<'a> {
    pub fn new(
        input: &'a ResourcePack,
        vanilla: &'a ResourcePack,
        source: &'a LayeredSource<'a>,
        config: &'a ConverterConfig,
    ) -> Self {
        Self {
            input,
            vanilla,
            source,
            flattener: ModelFlattener::new(source, FlattenMode::Item),
            config,
        }
    }

    /// Convert every item model the input pack overrides.
    pub fn run(self, context: &mut ConversionContext<'_, LayeredSource<'_>>) -> Result<()> {
        let locations: Vec<String> = self
            .input
            .model_paths(DEFAULT_NAMESPACE, "item/")
            .into_iter()
            .map(|path| format!("{}:{}", DEFAULT_NAMESPACE, path))
            .filter(|location| self.vanilla.get_model(location).is_some())
            .collect();

        let mut converted = 0;
        for location in &locations {
            match self.convert_item(location, context) {
                Ok(true) => converted += 1,
                Ok(false) => {}
                Err(e) => context
                    .diagnostics
                    .critical(location, format!("failed to convert item model: {}", e)),
            }
        }

        if converted > 0 {
            context.pack.insert_json(DISABLE_ANIMATION_PATH, &disable_animation())?;
        }

        log::info!("Converted {} of {} item models", converted, locations.len());
        Ok(())
    }

    /// Write the attachable of one item. Returns whether anything was written.
    fn convert_item(
        &self,
        location: &str,
        context: &mut ConversionContext<'_, LayeredSource<'_>>,
    ) -> Result<bool> {
        let model = self.flattener.flatten(location)?;
        context.report_unresolved(&model);
        let hash = string_hash(&model_file_path(location));

        let (bones, texture) = match model.kind {
            ModelKind::Entity => {
                context.diagnostics.info(location, "rendered by the game, skipped");
                return Ok(false);
            }
            ModelKind::Sprite => {
                let Some(texture) = model.primary_texture("layer0") else {
                    context.diagnostics.warning(location, "sprite has no texture, skipped");
                    return Ok(false);
                };
                let path = context.copy_texture(texture);
                (bone_chain(None, Some(vec![TextureMesh::sprite()])), path)
            }
            ModelKind::Elements | ModelKind::Template(_) => {
                let Some(sheet) = self.build_sheet(&model, context) else {
                    return Ok(false);
                };
                let converted = convert_elements(
                    &model.elements,
                    UvMapping::Sheet {
                        textures: &model.textures,
                        sheet: &sheet,
                    },
                    false,
                );
                if converted.cubes.is_empty() {
                    context.diagnostics.warning(location, "model has no visible faces, skipped");
                    return Ok(false);
                }

                let path = format!("textures/geyser_custom/atlases/{}", hash);
                context.pack.insert_bytes(format!("{}.png", path), sheet.to_png()?);
                (bone_chain(Some(converted.cubes), None), path)
            }
        };

        context.pack.insert_json(
            format!("models/entity/geyser_custom/{}.geo.json", hash),
            &GeometryDocument::new(&hash, bones),
        )?;
        context.pack.insert_json(
            format!("animations/{}.animation.json", hash),
            &slot_animations(&hash, &model.display),
        )?;
        context.pack.insert_json(
            format!("attachables/{}.attachable.json", hash),
            &AttachableDocument::for_item(&hash, &self.config.attachable_material, &texture),
        )?;

        log::debug!("{} -> attachable {}", location, hash);
        Ok(true)
    }

    /// Pack the textures of a 3D item into one sheet. Unreadable or missing
    /// textures are replaced by a placeholder; a sheet that does not fit
    /// skips the item.
    fn build_sheet(
        &self,
        model: &FlattenedModel,
        context: &mut ConversionContext<'_, LayeredSource<'_>>,
    ) -> Option<SpriteSheet> {
        if model.elements.is_empty() {
            context.diagnostics.warning(&model.location, "model has no elements, skipped");
            return None;
        }

        let mut builder = SpriteSheetBuilder::new(self.config.atlas_max_size, self.config.atlas_padding);
        let mut seen = HashSet::new();
        for (key, texture) in &model.textures {
            if key == "particle" || !seen.insert(texture.as_str()) {
                continue;
            }
            let data = match self.source.texture_bytes(texture).map(load_texture_from_bytes) {
                Some(Ok(data)) => data,
                Some(Err(e)) => {
                    context
                        .diagnostics
                        .warning(texture, format!("unreadable texture: {}", e));
                    TextureData::placeholder()
                }
                None => {
                    context.diagnostics.warning(texture, "texture not found");
                    TextureData::placeholder()
                }
            };
            builder.add_texture(texture.clone(), data);
        }

        if builder.is_empty() {
            return Some(SpriteSheet::empty());
        }
        match builder.build() {
            Ok(sheet) => Some(sheet),
            Err(e) => {
                context.diagnostics.warning(&model.location, format!("{}, skipped", e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_packs::*;
    use super::*;
    use crate::converter::OutputPack;
    use crate::diagnostics::{Diagnostics, Severity};
    use serde_json::json;

    fn convert(input: &ResourcePack) -> (OutputPack, Diagnostics) {
        let vanilla = vanilla();
        let config = ConverterConfig::default();
        let source = LayeredSource::new(input, &vanilla);

        let mut context = ConversionContext::new(&source);
        ItemConverter::new(input, &vanilla, &source, &config)
            .run(&mut context)
            .unwrap();
        (context.pack, context.diagnostics)
    }

    fn stick_hash() -> String {
        string_hash("assets/minecraft/models/item/stick.json")
    }

    #[test]
    fn test_sprite_item() {
        let mut input = ResourcePack::new();
        input.add_model(
            "minecraft",
            "item/stick",
            model(
                r#"{
                    "parent": "item/generated",
                    "textures": { "layer0": "item/bone" },
                    "display": { "thirdperson_righthand": { "rotation": [0, 90, 0] } }
                }"#,
            ),
        );
        input.add_texture("minecraft", "item/bone", png(16, 16));

        let (pack, diagnostics) = convert(&input);
        let hash = stick_hash();
        assert!(diagnostics.is_empty());
        assert!(pack.contains("textures/minecraft/item/bone.png"));
        assert!(pack.contains(DISABLE_ANIMATION_PATH));

        let geometry = pack
            .json(&format!("models/entity/geyser_custom/{}.geo.json", hash))
            .unwrap();
        let bones = &geometry["minecraft:geometry"][0]["bones"];
        assert_eq!(bones[3]["texture_meshes"][0]["texture"], json!("default"));
        assert!(bones[3].get("cubes").is_none());

        let attachable = pack
            .json(&format!("attachables/{}.attachable.json", hash))
            .unwrap();
        let description = &attachable["minecraft:attachable"]["description"];
        assert_eq!(description["identifier"], json!(format!("geyser_custom:g_{}", hash)));
        assert_eq!(description["textures"]["default"], json!("textures/minecraft/item/bone"));
        assert_eq!(description["materials"]["default"], json!("entity_alphatest_one_sided"));

        assert!(pack.contains(&format!("animations/{}.animation.json", hash)));
    }

    #[test]
    fn test_three_dimensional_item_uses_a_sheet() {
        let mut input = ResourcePack::new();
        input.add_model(
            "minecraft",
            "item/stick",
            model(
                r##"{
                    "textures": { "a": "item/bone", "b": "block/stone", "particle": "block/stone" },
                    "elements": [{
                        "from": [0, 0, 0], "to": [16, 32, 16],
                        "faces": {
                            "up": { "texture": "#a" },
                            "north": { "texture": "#b", "uv": [0, 0, 16, 16] }
                        }
                    }]
                }"##,
            ),
        );
        input.add_texture("minecraft", "item/bone", png(16, 16));

        let (pack, diagnostics) = convert(&input);
        let hash = stick_hash();
        assert_eq!(diagnostics.count(Severity::Critical), 0);
        assert!(pack.contains(&format!("textures/geyser_custom/atlases/{}.png", hash)));
        // Sheet textures are not copied one by one.
        assert!(!pack.contains("textures/minecraft/item/bone.png"));

        let attachable = pack
            .json(&format!("attachables/{}.attachable.json", hash))
            .unwrap();
        assert_eq!(
            attachable["minecraft:attachable"]["description"]["textures"]["default"],
            json!(format!("textures/geyser_custom/atlases/{}", hash))
        );

        let geometry = pack
            .json(&format!("models/entity/geyser_custom/{}.geo.json", hash))
            .unwrap();
        let cube = &geometry["minecraft:geometry"][0]["bones"][3]["cubes"][0];
        // Item geometry keeps its size, even past the block envelope.
        assert_eq!(cube["size"], json!([16.0, 32.0, 16.0]));
        // The second texture sits in the right half of a 32x32 sheet.
        let north_u = cube["uv"]["north"]["uv"][0].as_f64().unwrap();
        assert!(north_u > 8.0 && north_u < 16.0);
        assert!(cube["uv"]["north"].get("material_instance").is_none());
    }

    #[test]
    fn test_entity_and_unknown_items_are_skipped() {
        let mut input = ResourcePack::new();
        input.add_model("minecraft", "item/chest", model(r#"{ "parent": "builtin/entity" }"#));
        input.add_model(
            "minecraft",
            "item/custom_thing",
            model(r#"{ "parent": "item/generated", "textures": { "layer0": "item/bone" } }"#),
        );

        let (pack, diagnostics) = convert(&input);
        assert!(pack.is_empty());
        assert_eq!(diagnostics.count(Severity::Info), 1);
        assert_eq!(diagnostics.entries()[0].subject, "minecraft:item/chest");
    }

    #[test]
    fn test_missing_parent_is_critical() {
        let mut input = ResourcePack::new();
        input.add_model("minecraft", "item/stick", model(r#"{ "parent": "item/nowhere" }"#));

        let (pack, diagnostics) = convert(&input);
        assert!(pack.is_empty());
        assert_eq!(diagnostics.count(Severity::Critical), 1);
    }
}

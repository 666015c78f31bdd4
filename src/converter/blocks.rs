//! Block conversion: Geyser state overrides, block geometry and terrain textures.

use super::ConversionContext;
use crate::config::ConverterConfig;
use crate::error::Result;
use crate::geometry::document::geometry_identifier;
use crate::geometry::{bone_chain, convert_elements, ten_k_round, GeometryDocument, UvMapping};
use crate::hash::string_hash;
use crate::mappings::{
    BlockComponents, GeyserMappings, Hitbox, MaterialInstance, RootBlock, Transformation,
};
use crate::resolver::{
    find_model_associations, group_by_block, CubeTemplate, FlattenMode, FlattenedModel,
    MatchedStates, ModelFlattener, ModelKind, VariantGroup, VariantResolver,
};
use crate::resource_pack::{LayeredSource, ModelReference, ResourcePack};
use crate::schema::StateSchemaProvider;
use crate::types::{model_file_path, texture_file_path, DEFAULT_NAMESPACE};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const TERRAIN_TEXTURE_PATH: &str = "textures/terrain_texture.json";

/// `textures/terrain_texture.json`.
#[derive(Debug, Serialize)]
struct TerrainTextureAtlas {
    resource_pack_name: String,
    texture_name: String,
    texture_data: BTreeMap<String, TerrainTexture>,
}

#[derive(Debug, Serialize)]
struct TerrainTexture {
    textures: String,
}

impl Default for TerrainTextureAtlas {
    fn default() -> Self {
        Self {
            resource_pack_name: "vanilla".to_string(),
            texture_name: "atlas.terrain".to_string(),
            texture_data: BTreeMap::new(),
        }
    }
}

/// Geometry emitted for one elements provenance.
#[derive(Debug, Clone)]
struct BlockGeometry {
    identifier: String,
    downscaled: bool,
}

pub(super) struct BlockConverter<'a, S: StateSchemaProvider> {
    input: &'a ResourcePack,
    vanilla: &'a ResourcePack,
    resolver: VariantResolver<'a, S>,
    flattener: ModelFlattener<'a, LayeredSource<'a>>,
    config: &'a ConverterConfig,
    /// Components per model location; `None` marks a model that cannot be used.
    components: HashMap<String, Option<BlockComponents>>,
    /// Geometry per elements-provenance hash, converted at most once.
    geometries: HashMap<String, Option<BlockGeometry>>,
    terrain: TerrainTextureAtlas,
}

impl<'a, S: StateSchemaProvider> BlockConverter<'a, S> {
    pub fn new(
        input: &'a ResourcePack,
        vanilla: &'a ResourcePack,
        source: &'a LayeredSource<'a>,
        schema: &'a S,
        config: &'a ConverterConfig,
    ) -> Self {
        Self {
            input,
            vanilla,
            resolver: VariantResolver::new(schema),
            flattener: ModelFlattener::new(source, FlattenMode::Block),
            config,
            components: HashMap::new(),
            geometries: HashMap::new(),
            terrain: TerrainTextureAtlas::default(),
        }
    }

    pub fn run(mut self, context: &mut ConversionContext<'_, LayeredSource<'_>>) -> Result<GeyserMappings> {
        let input = self.input;
        let vanilla = self.vanilla;
        let mut mappings = GeyserMappings::new();

        // Vanilla blockstates that place a model the pack overrides.
        let models: Vec<String> = input
            .model_paths(DEFAULT_NAMESPACE, "block/")
            .into_iter()
            .map(|path| format!("{}:{}", DEFAULT_NAMESPACE, path))
            .filter(|location| vanilla.get_model(location).is_some())
            .collect();
        let associations = find_model_associations(vanilla, input, &models);
        log::debug!(
            "{} overridden block models are placed by vanilla blockstates",
            associations.len()
        );

        for (block, entries) in group_by_block(&associations) {
            let Some(groups) = self.resolver.resolve(block, &entries, &mut context.diagnostics) else {
                continue;
            };
            if let Some(root) = self.root_block(block, &groups, context)? {
                mappings.insert(root);
            }
        }

        // Blockstates the pack ships itself.
        for block in input.blockstate_ids(DEFAULT_NAMESPACE) {
            if vanilla.get_blockstate(block).is_none() {
                context
                    .diagnostics
                    .info(format!("{}:{}", DEFAULT_NAMESPACE, block), "not a vanilla block, skipped");
                continue;
            }
            let Some(definition) = input.get_blockstate(block) else {
                continue;
            };
            let Some(groups) = self
                .resolver
                .resolve_definition(block, definition, &mut context.diagnostics)
            else {
                continue;
            };
            if let Some(root) = self.root_block(block, &groups, context)? {
                mappings.insert(root);
            }
        }

        if !self.terrain.texture_data.is_empty() {
            context.pack.insert_json(TERRAIN_TEXTURE_PATH, &self.terrain)?;
        }

        log::info!("Mapped {} blocks", mappings.len());
        Ok(mappings)
    }

    /// Build the mapping entry of one block from its resolved groups.
    /// A block none of whose groups produced components yields `None`.
    fn root_block(
        &mut self,
        block: &str,
        groups: &[VariantGroup],
        context: &mut ConversionContext<'_, LayeredSource<'_>>,
    ) -> Result<Option<RootBlock>> {
        let mut root = RootBlock::new(block);
        let mut mapped = false;

        for group in groups {
            let Some(reference) = group.body.primary() else {
                continue;
            };
            let Some(mut components) = self.model_components(&reference.model_location(), context)? else {
                continue;
            };
            apply_placement_rotation(&mut components, reference);

            match &group.matched {
                MatchedStates::Unconditional => root.set_unconditional(&components),
                MatchedStates::States(states) => {
                    for state in states {
                        root.override_state(state, components.clone());
                    }
                }
            }
            mapped = true;
        }

        Ok(mapped.then_some(root))
    }

    fn model_components(
        &mut self,
        location: &str,
        context: &mut ConversionContext<'_, LayeredSource<'_>>,
    ) -> Result<Option<BlockComponents>> {
        if let Some(cached) = self.components.get(location) {
            return Ok(cached.clone());
        }

        let model = match self.flattener.flatten(location) {
            Ok(model) => model,
            Err(e) => {
                context
                    .diagnostics
                    .critical(location, format!("failed to convert block model: {}", e));
                self.components.insert(location.to_string(), None);
                return Ok(None);
            }
        };
        context.report_unresolved(&model);

        let components = match model.kind {
            ModelKind::Template(template) => Some(self.template_components(&model, template, context)),
            ModelKind::Elements => self.geometry_components(&model, context)?,
            ModelKind::Sprite | ModelKind::Entity => {
                context.diagnostics.info(location, "model has no block geometry, skipped");
                None
            }
        };

        self.components.insert(location.to_string(), components.clone());
        Ok(components)
    }

    /// Unit cube components with one material instance per face.
    fn template_components(
        &mut self,
        model: &FlattenedModel,
        template: CubeTemplate,
        context: &mut ConversionContext<'_, LayeredSource<'_>>,
    ) -> BlockComponents {
        let mut instances = BTreeMap::new();
        for (face, slot) in template.face_slots() {
            let Some(texture) = model.textures.get(slot) else {
                continue;
            };
            let key = if face == "particle" { "*" } else { face };
            let instance = self.material_instance(texture, model.ambient_occlusion, context);
            instances.insert(key.to_string(), instance);
        }
        let fallback = self.wildcard_instance(model, context);
        fill_wildcard(&mut instances, fallback);

        BlockComponents {
            material_instances: (!instances.is_empty()).then_some(instances),
            unit_cube: Some(true),
            ..Default::default()
        }
    }

    /// Custom geometry components, converting the model's elements once per provenance.
    fn geometry_components(
        &mut self,
        model: &FlattenedModel,
        context: &mut ConversionContext<'_, LayeredSource<'_>>,
    ) -> Result<Option<BlockComponents>> {
        let provenance = model.provenance.elements.as_deref().unwrap_or(&model.location);
        let hash = string_hash(&model_file_path(provenance));

        let geometry = match self.geometries.get(&hash) {
            Some(geometry) => geometry.clone(),
            None => {
                let geometry = emit_geometry(&hash, model, context)?;
                self.geometries.insert(hash.clone(), geometry.clone());
                geometry
            }
        };
        let Some(geometry) = geometry else {
            context.diagnostics.info(&model.location, "model has no visible faces, skipped");
            return Ok(None);
        };

        let mut instances = BTreeMap::new();
        for (key, texture) in &model.textures {
            let instance = self.material_instance(texture, model.ambient_occlusion, context);
            if key == "particle" {
                instances.insert("*".to_string(), instance.clone());
            }
            instances.insert(key.clone(), instance);
        }
        let fallback = self.wildcard_instance(model, context);
        fill_wildcard(&mut instances, fallback);

        let mut components = BlockComponents {
            geometry: Some(geometry.identifier),
            material_instances: (!instances.is_empty()).then_some(instances),
            ..Default::default()
        };
        if geometry.downscaled {
            components.collision_box = Some(Hitbox::downscaled());
            components.selection_box = Some(Hitbox::downscaled());
            components.transformation = Some(Transformation {
                scale: Some([2.0, 2.0, 2.0]),
                ..Default::default()
            });
        }
        Ok(Some(components))
    }

    /// The `*` instance: the particle texture, else the model's first texture.
    fn wildcard_instance(
        &mut self,
        model: &FlattenedModel,
        context: &mut ConversionContext<'_, LayeredSource<'_>>,
    ) -> Option<MaterialInstance> {
        let texture = model.primary_texture("particle")?;
        Some(self.material_instance(texture, model.ambient_occlusion, context))
    }

    /// Register a texture in the terrain atlas and bind it with the configured render method.
    fn material_instance(
        &mut self,
        texture: &str,
        ambient_occlusion: bool,
        context: &mut ConversionContext<'_, LayeredSource<'_>>,
    ) -> MaterialInstance {
        let name = format!("g_{}", string_hash(&texture_file_path(texture)));
        if !self.terrain.texture_data.contains_key(&name) {
            let path = context.copy_texture(texture);
            self.terrain
                .texture_data
                .insert(name.clone(), TerrainTexture { textures: path });
        }

        let mut instance = MaterialInstance::new(name, self.config.block_render_method);
        if !ambient_occlusion {
            instance.ambient_occlusion = Some(false);
        }
        instance
    }
}

/// Write the geometry document for `hash`. Models whose elements produce
/// no cubes have no geometry.
fn emit_geometry(
    hash: &str,
    model: &FlattenedModel,
    context: &mut ConversionContext<'_, LayeredSource<'_>>,
) -> Result<Option<BlockGeometry>> {
    let converted = convert_elements(&model.elements, UvMapping::Block, true);
    if converted.cubes.is_empty() {
        return Ok(None);
    }

    let document = GeometryDocument::new(hash, bone_chain(Some(converted.cubes), None));
    context
        .pack
        .insert_json(format!("models/blocks/geyser_custom/{}.geo.json", hash), &document)?;
    log::debug!("{} -> geometry {}", model.location, hash);

    Ok(Some(BlockGeometry {
        identifier: geometry_identifier(hash),
        downscaled: converted.downscaled,
    }))
}

/// Make sure a `*` instance exists, falling back to `fallback`.
fn fill_wildcard(instances: &mut BTreeMap<String, MaterialInstance>, fallback: Option<MaterialInstance>) {
    if instances.contains_key("*") {
        return;
    }
    if let Some(fallback) = fallback {
        instances.insert("*".to_string(), fallback);
    }
}

/// Carry a blockstate placement rotation onto the block transformation.
fn apply_placement_rotation(components: &mut BlockComponents, reference: &ModelReference) {
    if !reference.is_rotated() {
        return;
    }
    let rotation = Transformation {
        rotation: Some([
            ten_k_round(reference.x as f64),
            ten_k_round(-(reference.y as f64)),
            0.0,
        ]),
        ..Default::default()
    };
    components
        .transformation
        .get_or_insert_with(Transformation::default)
        .merge(&rotation);
}

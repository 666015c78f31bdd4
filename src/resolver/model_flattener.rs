//! Model inheritance flattening.

use crate::error::{ConverterError, Result};
use crate::resource_pack::{AssetSource, BlockModel, ModelElement};
use crate::types::{namespaced, DisplayTransform};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// Maximum depth for model inheritance to prevent infinite loops.
const MAX_INHERITANCE_DEPTH: usize = 10;

/// Texture chains longer than this are treated as unresolved.
const MAX_TEXTURE_REFERENCE_DEPTH: usize = 10;

/// Whether models are flattened for block placement or item rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenMode {
    /// Built-in cube templates end the walk and become unit cubes.
    Block,
    /// Templates are walked through to reach their elements.
    Item,
}

/// Built-in full-cube parents that map directly onto a Bedrock unit cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeTemplate {
    Cube,
    CubeAll,
    CubeBottomTop,
    CubeColumn,
    CubeColumnHorizontal,
    CubeColumnMirrored,
    CubeColumnUvLockedX,
    CubeColumnUvLockedY,
    CubeColumnUvLockedZ,
    CubeDirectional,
    CubeMirrored,
    CubeMirroredAll,
    CubeNorthWestMirrored,
    CubeNorthWestMirroredAll,
    CubeTop,
}

/// Slot order of [`CubeTemplate::slots`].
pub const TEMPLATE_FACES: [&str; 7] = ["particle", "down", "up", "north", "south", "west", "east"];

const SIX_FACES: [&str; 7] = ["down", "down", "up", "north", "south", "west", "east"];
const ALL: [&str; 7] = ["all"; 7];
const BOTTOM_TOP: [&str; 7] = ["side", "bottom", "top", "side", "side", "side", "side"];
const COLUMN: [&str; 7] = ["side", "end", "end", "side", "side", "side", "side"];
const COLUMN_X: [&str; 7] = ["side", "side", "side", "side", "side", "end", "end"];
const COLUMN_Z: [&str; 7] = ["side", "side", "side", "end", "end", "side", "side"];
const TOP: [&str; 7] = ["side", "side", "top", "side", "side", "side", "side"];

static TEMPLATES: &[(&str, CubeTemplate, &[&str; 7])] = &[
    ("cube", CubeTemplate::Cube, &SIX_FACES),
    ("cube_all", CubeTemplate::CubeAll, &ALL),
    ("cube_bottom_top", CubeTemplate::CubeBottomTop, &BOTTOM_TOP),
    ("cube_column", CubeTemplate::CubeColumn, &COLUMN),
    ("cube_column_horizontal", CubeTemplate::CubeColumnHorizontal, &COLUMN),
    ("cube_column_mirrored", CubeTemplate::CubeColumnMirrored, &COLUMN),
    ("cube_column_uv_locked_x", CubeTemplate::CubeColumnUvLockedX, &COLUMN_X),
    ("cube_column_uv_locked_y", CubeTemplate::CubeColumnUvLockedY, &COLUMN),
    ("cube_column_uv_locked_z", CubeTemplate::CubeColumnUvLockedZ, &COLUMN_Z),
    ("cube_directional", CubeTemplate::CubeDirectional, &SIX_FACES),
    ("cube_mirrored", CubeTemplate::CubeMirrored, &SIX_FACES),
    ("cube_mirrored_all", CubeTemplate::CubeMirroredAll, &ALL),
    ("cube_north_west_mirrored", CubeTemplate::CubeNorthWestMirrored, &SIX_FACES),
    ("cube_north_west_mirrored_all", CubeTemplate::CubeNorthWestMirroredAll, &ALL),
    ("cube_top", CubeTemplate::CubeTop, &TOP),
];

impl CubeTemplate {
    /// Look up a template by parent location (`block/cube_all`, `minecraft:block/cube_all`).
    pub fn from_location(location: &str) -> Option<Self> {
        let name = namespaced(location);
        let name = name.strip_prefix("minecraft:block/")?;
        TEMPLATES
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(_, template, _)| *template)
    }

    /// Texture keys per face, in [`TEMPLATE_FACES`] order.
    pub fn slots(&self) -> &'static [&'static str; 7] {
        TEMPLATES
            .iter()
            .find(|(_, template, _)| template == self)
            .map(|(_, _, slots)| *slots)
            .unwrap_or(&SIX_FACES)
    }

    /// `(face, texture key)` pairs, particle first.
    pub fn face_slots(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        TEMPLATE_FACES.into_iter().zip(self.slots().iter().copied())
    }
}

/// What kind of visual a flattened model produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Cuboid elements to convert into geometry.
    Elements,
    /// A flat item icon from `builtin/generated`.
    Sprite,
    /// Rendered by the game itself (`builtin/entity`).
    Entity,
    /// A built-in full cube, emitted as a unit cube.
    Template(CubeTemplate),
}

/// The model that supplied each section of a flattened model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub elements: Option<String>,
    pub textures: Option<String>,
    pub display: Option<String>,
}

/// A model with its inheritance chain applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedModel {
    /// The namespaced location this model was flattened from.
    pub location: String,
    pub kind: ModelKind,
    pub elements: Vec<ModelElement>,
    /// Texture key to texture location, references resolved.
    pub textures: IndexMap<String, String>,
    pub display: BTreeMap<String, DisplayTransform>,
    pub ambient_occlusion: bool,
    pub provenance: Provenance,
    /// Referenced texture keys whose `#` chain never reached a texture.
    pub unresolved_textures: Vec<String>,
}

impl FlattenedModel {
    pub fn is_sprite(&self) -> bool {
        self.kind == ModelKind::Sprite
    }

    pub fn is_entity(&self) -> bool {
        self.kind == ModelKind::Entity
    }

    pub fn template(&self) -> Option<CubeTemplate> {
        match self.kind {
            ModelKind::Template(template) => Some(template),
            _ => None,
        }
    }

    /// The texture a `*` material or an item icon falls back to.
    pub fn primary_texture(&self, preferred: &str) -> Option<&str> {
        self.textures
            .get(preferred)
            .or_else(|| self.textures.values().next())
            .map(String::as_str)
    }
}

/// Flattens model inheritance chains against an asset source.
pub struct ModelFlattener<'a, S: AssetSource> {
    source: &'a S,
    mode: FlattenMode,
    cache: RefCell<HashMap<String, FlattenedModel>>,
}

impl<'a, S: AssetSource> ModelFlattener<'a, S> {
    pub fn new(source: &'a S, mode: FlattenMode) -> Self {
        Self {
            source,
            mode,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn mode(&self) -> FlattenMode {
        self.mode
    }

    /// Flatten a model with all inherited sections.
    pub fn flatten(&self, model_location: &str) -> Result<FlattenedModel> {
        let location = namespaced(model_location);

        if let Some(cached) = self.cache.borrow().get(&location) {
            return Ok(cached.clone());
        }

        let flattened = self.flatten_internal(&location)?;

        self.cache
            .borrow_mut()
            .insert(location, flattened.clone());

        Ok(flattened)
    }

    fn flatten_internal(&self, location: &str) -> Result<FlattenedModel> {
        let mut elements: Option<Vec<ModelElement>> = None;
        let mut textures: IndexMap<String, String> = IndexMap::new();
        let mut display: BTreeMap<String, DisplayTransform> = BTreeMap::new();
        let mut ambient_occlusion = true;
        let mut provenance = Provenance::default();
        let mut kind = ModelKind::Elements;

        let mut current_location = location.to_string();
        let mut model = self.fetch(&current_location)?;
        let mut depth = 0;

        loop {
            inherit(&mut elements, &mut textures, &mut display, &mut provenance, model, &current_location);
            ambient_occlusion &= model.ambient_occlusion;

            let Some(parent) = model.parent_location() else {
                break;
            };

            if parent == "minecraft:builtin/generated" {
                if elements.is_none() {
                    kind = ModelKind::Sprite;
                }
                break;
            }
            if parent == "minecraft:builtin/entity" {
                kind = ModelKind::Entity;
                break;
            }
            if self.mode == FlattenMode::Block && elements.is_none() {
                if let Some(template) = CubeTemplate::from_location(&parent) {
                    kind = ModelKind::Template(template);
                    break;
                }
            }

            depth += 1;
            if depth >= MAX_INHERITANCE_DEPTH {
                return Err(ConverterError::ModelInheritanceTooDeep(location.to_string()));
            }

            model = self.fetch(&parent)?;
            current_location = parent;
        }

        let elements = if kind == ModelKind::Elements {
            elements.unwrap_or_default()
        } else {
            Vec::new()
        };

        let resolved = resolve_texture_references(&textures);
        let referenced = referenced_keys(kind, &elements);
        let mut unresolved_textures = Vec::new();
        let textures = match referenced {
            Some(keys) => {
                let mut kept = IndexMap::new();
                for (key, value) in resolved {
                    if !keys.iter().any(|k| *k == key) {
                        continue;
                    }
                    if value.starts_with('#') {
                        log::debug!("{}: texture #{} does not resolve ({})", location, key, value);
                        unresolved_textures.push(key);
                    } else {
                        kept.insert(key, value);
                    }
                }
                kept
            }
            None => resolved
                .into_iter()
                .filter(|(_, value)| !value.starts_with('#'))
                .collect(),
        };

        Ok(FlattenedModel {
            location: location.to_string(),
            kind,
            elements,
            textures,
            display,
            ambient_occlusion,
            provenance,
            unresolved_textures,
        })
    }

    fn fetch(&self, location: &str) -> Result<&'a BlockModel> {
        self.source.model(location).ok_or_else(|| {
            ConverterError::ModelResolution(format!("Model not found: {}", location))
        })
    }
}

/// Fill the still-unset sections from `model`. Textures and display slots
/// merge key by key with the nearer model winning; elements are taken whole.
fn inherit(
    elements: &mut Option<Vec<ModelElement>>,
    textures: &mut IndexMap<String, String>,
    display: &mut BTreeMap<String, DisplayTransform>,
    provenance: &mut Provenance,
    model: &BlockModel,
    location: &str,
) {
    if elements.is_none() {
        if let Some(model_elements) = &model.elements {
            *elements = Some(model_elements.clone());
            provenance.elements = Some(location.to_string());
        }
    }

    if !model.textures.is_empty() {
        provenance.textures.get_or_insert_with(|| location.to_string());
        for (key, value) in &model.textures {
            textures.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    if let Some(model_display) = &model.display {
        if !model_display.is_empty() {
            provenance.display.get_or_insert_with(|| location.to_string());
        }
        for (slot, transform) in model_display {
            display.entry(slot.clone()).or_insert_with(|| transform.clone());
        }
    }
}

/// Follow `#key` chains. Values that never reach a texture keep their last `#` reference.
fn resolve_texture_references(textures: &IndexMap<String, String>) -> IndexMap<String, String> {
    textures
        .iter()
        .map(|(key, value)| {
            let mut current = value;
            for _ in 0..MAX_TEXTURE_REFERENCE_DEPTH {
                let Some(reference) = current.strip_prefix('#') else {
                    break;
                };
                match textures.get(reference) {
                    Some(next) => current = next,
                    None => break,
                }
            }
            (key.clone(), current.clone())
        })
        .collect()
}

/// Texture keys a model actually samples, plus `particle`. `None` keeps every key.
fn referenced_keys(kind: ModelKind, elements: &[ModelElement]) -> Option<Vec<String>> {
    let mut keys = vec!["particle".to_string()];
    match kind {
        ModelKind::Elements => {
            for face in elements.iter().flat_map(|e| e.faces.values()) {
                let key = face.texture_key();
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
        }
        ModelKind::Template(template) => {
            for slot in template.slots() {
                if !keys.iter().any(|k| k == slot) {
                    keys.push(slot.to_string());
                }
            }
        }
        ModelKind::Sprite | ModelKind::Entity => return None,
    }
    Some(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::{ModelFace, ResourcePack};
    use crate::types::Direction;

    fn face(texture: &str) -> ModelFace {
        ModelFace {
            texture: texture.to_string(),
            uv: None,
            cullface: None,
            rotation: 0,
            tintindex: -1,
        }
    }

    fn textures(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn create_test_pack() -> ResourcePack {
        let mut pack = ResourcePack::new();

        // cube: the full-cube template with real elements
        let cube = BlockModel {
            elements: Some(vec![ModelElement {
                from: [0.0, 0.0, 0.0],
                to: [16.0, 16.0, 16.0],
                rotation: None,
                shade: true,
                faces: Direction::ALL
                    .iter()
                    .map(|d| (*d, face(&format!("#{}", d.name()))))
                    .collect(),
            }]),
            ..Default::default()
        };
        pack.add_model("minecraft", "block/cube", cube);

        let cube_all = BlockModel {
            parent: Some("block/cube".to_string()),
            textures: textures(&[
                ("particle", "#all"),
                ("down", "#all"),
                ("up", "#all"),
                ("north", "#all"),
                ("south", "#all"),
                ("west", "#all"),
                ("east", "#all"),
            ]),
            ..Default::default()
        };
        pack.add_model("minecraft", "block/cube_all", cube_all);

        let stone = BlockModel {
            parent: Some("block/cube_all".to_string()),
            textures: textures(&[("all", "block/stone")]),
            ..Default::default()
        };
        pack.add_model("minecraft", "block/stone", stone);

        // A custom shape with an unused texture and a dangling reference
        let slab = BlockModel {
            ambient_occlusion: false,
            textures: textures(&[
                ("side", "block/slab_side"),
                ("unused", "block/other"),
                ("top", "#missing"),
            ]),
            elements: Some(vec![ModelElement {
                from: [0.0, 0.0, 0.0],
                to: [16.0, 8.0, 16.0],
                rotation: None,
                shade: true,
                faces: [(Direction::North, face("#side")), (Direction::Up, face("#top"))]
                    .into_iter()
                    .collect(),
            }]),
            ..Default::default()
        };
        pack.add_model("minecraft", "block/custom_slab", slab);

        let custom_slab_child = BlockModel {
            parent: Some("block/custom_slab".to_string()),
            textures: textures(&[("side", "block/child_side")]),
            ..Default::default()
        };
        pack.add_model("minecraft", "block/custom_slab_child", custom_slab_child);

        let generated = BlockModel {
            parent: Some("builtin/generated".to_string()),
            display: Some(
                [("head".to_string(), DisplayTransform {
                    rotation: Some([0.0, 180.0, 0.0]),
                    ..Default::default()
                })]
                .into_iter()
                .collect(),
            ),
            ..Default::default()
        };
        pack.add_model("minecraft", "item/generated", generated);

        let handheld = BlockModel {
            parent: Some("item/generated".to_string()),
            display: Some(
                [("thirdperson_righthand".to_string(), DisplayTransform {
                    rotation: Some([0.0, -90.0, 55.0]),
                    ..Default::default()
                })]
                .into_iter()
                .collect(),
            ),
            ..Default::default()
        };
        pack.add_model("minecraft", "item/handheld", handheld);

        let stick = BlockModel {
            parent: Some("item/handheld".to_string()),
            textures: textures(&[("layer0", "item/stick")]),
            ..Default::default()
        };
        pack.add_model("minecraft", "item/stick", stick);

        let chest = BlockModel {
            parent: Some("builtin/entity".to_string()),
            ..Default::default()
        };
        pack.add_model("minecraft", "item/chest", chest);

        let loop_a = BlockModel {
            parent: Some("block/loop_b".to_string()),
            ..Default::default()
        };
        let loop_b = BlockModel {
            parent: Some("block/loop_a".to_string()),
            ..Default::default()
        };
        pack.add_model("minecraft", "block/loop_a", loop_a);
        pack.add_model("minecraft", "block/loop_b", loop_b);

        pack
    }

    #[test]
    fn test_block_mode_template_short_circuit() {
        let pack = create_test_pack();
        let flattener = ModelFlattener::new(&pack, FlattenMode::Block);

        let model = flattener.flatten("block/stone").unwrap();
        assert_eq!(model.template(), Some(CubeTemplate::CubeAll));
        assert!(model.elements.is_empty());
        assert_eq!(model.textures.get("all"), Some(&"block/stone".to_string()));
        assert!(model.provenance.elements.is_none());
    }

    #[test]
    fn test_item_mode_walks_through_templates() {
        let pack = create_test_pack();
        let flattener = ModelFlattener::new(&pack, FlattenMode::Item);

        let model = flattener.flatten("minecraft:block/stone").unwrap();
        assert_eq!(model.kind, ModelKind::Elements);
        assert_eq!(model.elements.len(), 1);
        assert_eq!(model.provenance.elements.as_deref(), Some("minecraft:block/cube"));
        assert_eq!(model.provenance.textures.as_deref(), Some("minecraft:block/stone"));

        // particle -> #all -> block/stone
        assert_eq!(model.textures.get("particle"), Some(&"block/stone".to_string()));
        assert_eq!(model.textures.get("north"), Some(&"block/stone".to_string()));
        // "all" is not sampled by any face
        assert!(!model.textures.contains_key("all"));
    }

    #[test]
    fn test_texture_filtering_and_unresolved_references() {
        let pack = create_test_pack();
        let flattener = ModelFlattener::new(&pack, FlattenMode::Block);

        let model = flattener.flatten("block/custom_slab").unwrap();
        assert!(!model.ambient_occlusion);
        assert_eq!(model.textures.len(), 1);
        assert_eq!(model.textures["side"], "block/slab_side");
        assert_eq!(model.unresolved_textures, ["top"]);
    }

    #[test]
    fn test_child_textures_override_key_wise() {
        let pack = create_test_pack();
        let flattener = ModelFlattener::new(&pack, FlattenMode::Block);

        let model = flattener.flatten("block/custom_slab_child").unwrap();
        assert_eq!(model.textures["side"], "block/child_side");
        assert_eq!(model.provenance.elements.as_deref(), Some("minecraft:block/custom_slab"));
        assert_eq!(model.provenance.textures.as_deref(), Some("minecraft:block/custom_slab_child"));
        assert!(!model.ambient_occlusion);
    }

    #[test]
    fn test_sprite_detection_and_display_merge() {
        let pack = create_test_pack();
        let flattener = ModelFlattener::new(&pack, FlattenMode::Item);

        let model = flattener.flatten("item/stick").unwrap();
        assert!(model.is_sprite());
        assert!(model.elements.is_empty());
        assert_eq!(model.primary_texture("layer0"), Some("item/stick"));
        assert_eq!(model.display.len(), 2);
        assert_eq!(model.display["head"].rotation, Some([0.0, 180.0, 0.0]));
        assert_eq!(model.provenance.display.as_deref(), Some("minecraft:item/handheld"));
    }

    #[test]
    fn test_entity_items() {
        let pack = create_test_pack();
        let flattener = ModelFlattener::new(&pack, FlattenMode::Item);

        let model = flattener.flatten("item/chest").unwrap();
        assert!(model.is_entity());
        assert!(!model.is_sprite());
    }

    #[test]
    fn test_parent_cycle_is_an_error() {
        let pack = create_test_pack();
        let flattener = ModelFlattener::new(&pack, FlattenMode::Block);

        assert!(matches!(
            flattener.flatten("block/loop_a"),
            Err(ConverterError::ModelInheritanceTooDeep(_))
        ));
    }

    #[test]
    fn test_missing_model() {
        let pack = create_test_pack();
        let flattener = ModelFlattener::new(&pack, FlattenMode::Block);

        assert!(matches!(
            flattener.flatten("minecraft:block/nonexistent"),
            Err(ConverterError::ModelResolution(_))
        ));
    }

    #[test]
    fn test_results_are_cached() {
        let pack = create_test_pack();
        let flattener = ModelFlattener::new(&pack, FlattenMode::Block);

        let first = flattener.flatten("block/stone").unwrap();
        let second = flattener.flatten("minecraft:block/stone").unwrap();
        assert_eq!(first, second);
        assert_eq!(flattener.cache.borrow().len(), 1);
    }

    #[test]
    fn test_template_lookup() {
        assert_eq!(CubeTemplate::from_location("block/cube_column"), Some(CubeTemplate::CubeColumn));
        assert_eq!(
            CubeTemplate::from_location("minecraft:block/cube_top"),
            Some(CubeTemplate::CubeTop)
        );
        assert_eq!(CubeTemplate::from_location("block/slab"), None);
        assert_eq!(CubeTemplate::from_location("mymod:block/cube_all"), None);

        let slots: Vec<_> = CubeTemplate::CubeColumnUvLockedX.face_slots().collect();
        assert_eq!(slots[0], ("particle", "side"));
        assert_eq!(slots[5], ("west", "end"));
    }
}

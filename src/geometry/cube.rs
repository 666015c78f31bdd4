//! Java element to Bedrock cube conversion.

use super::uv_rotation::split_rotated_face;
use super::{round_vec, ten_k_round};
use crate::atlas::SpriteSheet;
use crate::resource_pack::{ModelElement, ModelFace};
use crate::types::Direction;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inset applied to every UV box so neighbouring atlas tiles never bleed in.
const UV_INSET: f64 = 0.016;

/// Elements reaching outside this envelope force the model to half size.
const ENVELOPE_MIN: [f64; 3] = [-6.4, 0.0, -6.4];
const ENVELOPE_MAX: [f64; 3] = [22.4, 28.8, 22.4];

const DOWNSCALE_PIVOT: [f64; 3] = [0.0, 8.0, 0.0];
const DOWNSCALE_FACTOR: f64 = 0.5;

/// The UV box of one cube face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceUv {
    pub uv: [f64; 2],
    pub uv_size: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_instance: Option<String>,
}

/// A Bedrock geometry cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedrockCube {
    pub origin: [f64; 3],
    pub size: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<[f64; 3]>,
    pub uv: BTreeMap<Direction, FaceUv>,
}

/// Where face UVs point.
#[derive(Debug, Clone, Copy)]
pub enum UvMapping<'a> {
    /// Each face samples its own texture through a material instance
    /// named after the face's texture key.
    Block,
    /// Every face samples one packed sheet. `textures` resolves a face's
    /// texture key to the location the sheet was packed under.
    Sheet {
        textures: &'a IndexMap<String, String>,
        sheet: &'a SpriteSheet,
    },
}

impl UvMapping<'_> {
    fn remap(&self, face: &ModelFace, uv: [f64; 4]) -> [f64; 4] {
        match self {
            UvMapping::Block => uv,
            UvMapping::Sheet { textures, sheet } => {
                let placement = textures
                    .get(face.texture_key())
                    .and_then(|location| sheet.offset_of(location));
                match placement {
                    Some(placement) => {
                        let [u1, v1] = placement.remap(uv[0], uv[1]);
                        let [u2, v2] = placement.remap(uv[2], uv[3]);
                        [u1, v1, u2, v2]
                    }
                    None => uv,
                }
            }
        }
    }

    fn material_instance(&self, face: &ModelFace) -> Option<String> {
        match self {
            UvMapping::Block => Some(face.texture_key().to_string()),
            UvMapping::Sheet { .. } => None,
        }
    }
}

/// The cubes of one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertedCubes {
    pub cubes: Vec<BedrockCube>,
    /// The model was halved to fit the block envelope.
    pub downscaled: bool,
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Convert a Java `[u1, v1, u2, v2]` box into a Bedrock `(uv, uv_size)` pair.
///
/// Horizontal faces start from the second corner, side faces from the first.
pub fn calculate_uv(face: Direction, uv: [f64; 4]) -> ([f64; 2], [f64; 2]) {
    let [u1, v1, u2, v2] = uv;
    let xs = sign(u2 - u1);
    let ys = sign(v2 - v1);

    let (origin, size) = if face.is_vertical() {
        (
            [u2 - UV_INSET * xs, v2 - UV_INSET * ys],
            [(u1 - u2) + UV_INSET * xs, (v1 - v2) + UV_INSET * ys],
        )
    } else {
        (
            [u1 + UV_INSET * xs, v1 + UV_INSET * ys],
            [(u2 - u1) - UV_INSET * xs, (v2 - v1) - UV_INSET * ys],
        )
    };
    (origin.map(ten_k_round), size.map(ten_k_round))
}

/// Java model point to Bedrock: X mirrored, both horizontal axes shifted by 8.
fn to_bedrock_point(x: f64, y: f64, z: f64) -> [f64; 3] {
    [-x + 8.0, y, z - 8.0]
}

fn exceeds_envelope(element: &ModelElement) -> bool {
    (0..3).any(|i| element.from[i] < ENVELOPE_MIN[i] || element.to[i] > ENVELOPE_MAX[i])
}

fn downscale_point(point: [f64; 3]) -> [f64; 3] {
    let mut scaled = [0.0; 3];
    for i in 0..3 {
        scaled[i] = DOWNSCALE_PIVOT[i] + (point[i] - DOWNSCALE_PIVOT[i]) * DOWNSCALE_FACTOR;
    }
    scaled
}

fn element_cube(element: &ModelElement, downscaled: bool) -> BedrockCube {
    // The mirrored X axis makes `to.x` the minimum corner.
    let mut origin = to_bedrock_point(element.to[0], element.from[1], element.from[2]);
    let mut size = element.size();

    let rotation = element
        .rotation
        .as_ref()
        .filter(|rotation| rotation.angle != 0.0);
    let mut pivot = rotation.map(|rotation| {
        let [x, y, z] = rotation.origin;
        to_bedrock_point(x, y, z)
    });

    if downscaled {
        origin = downscale_point(origin);
        size = size.map(|v| v * DOWNSCALE_FACTOR);
        pivot = pivot.map(downscale_point);
    }

    BedrockCube {
        origin: round_vec(origin),
        size: round_vec(size),
        rotation: rotation.map(|rotation| round_vec(rotation.bedrock_euler())),
        pivot: pivot.map(round_vec),
        uv: BTreeMap::new(),
    }
}

/// Convert a model's elements into Bedrock cubes.
///
/// With `allow_downscale`, a model reaching outside the block envelope is
/// halved about `(0, 8, 0)`. Faces with a UV rotation become companion
/// cubes instead of sitting on their element's cube. Cubes left with no
/// faces are dropped.
pub fn convert_elements(
    elements: &[ModelElement],
    mapping: UvMapping<'_>,
    allow_downscale: bool,
) -> ConvertedCubes {
    let downscaled = allow_downscale && elements.iter().any(exceeds_envelope);
    let mut cubes = Vec::with_capacity(elements.len());

    for element in elements {
        let mut cube = element_cube(element, downscaled);
        let mut companions = Vec::new();

        for (&direction, face) in &element.faces {
            let java_uv = mapping.remap(face, element.face_uv(direction, face));
            let (uv, uv_size) = calculate_uv(direction, java_uv);
            let face_uv = FaceUv {
                uv,
                uv_size,
                material_instance: mapping.material_instance(face),
            };

            if face.rotation.rem_euclid(360) == 0 {
                cube.uv.insert(direction, face_uv);
            } else {
                match split_rotated_face(&cube, direction, face.rotation, face_uv) {
                    Some(companion) => companions.push(companion),
                    None => log::debug!(
                        "Dropping {} face with unsupported UV rotation {}",
                        direction,
                        face.rotation
                    ),
                }
            }
        }

        if !cube.uv.is_empty() {
            cubes.push(cube);
        }
        cubes.extend(companions);
    }

    ConvertedCubes { cubes, downscaled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasPlacement;
    use crate::types::{Axis, ElementRotation};

    fn element(from: [f64; 3], to: [f64; 3], faces: &[(Direction, i32)]) -> ModelElement {
        ModelElement {
            from,
            to,
            rotation: None,
            shade: true,
            faces: faces
                .iter()
                .map(|&(direction, rotation)| {
                    (
                        direction,
                        ModelFace {
                            uv: None,
                            texture: "#all".to_string(),
                            cullface: None,
                            rotation,
                            tintindex: -1,
                        },
                    )
                })
                .collect(),
        }
    }

    fn all_faces() -> Vec<(Direction, i32)> {
        Direction::ALL.iter().map(|&d| (d, 0)).collect()
    }

    #[test]
    fn test_unit_cube() {
        let converted = convert_elements(
            &[element([0.0; 3], [16.0; 3], &all_faces())],
            UvMapping::Block,
            true,
        );
        assert!(!converted.downscaled);
        assert_eq!(converted.cubes.len(), 1);

        let cube = &converted.cubes[0];
        assert_eq!(cube.origin, [-8.0, 0.0, -8.0]);
        assert_eq!(cube.size, [16.0, 16.0, 16.0]);
        assert!(cube.rotation.is_none());
        assert!(cube.pivot.is_none());
        assert_eq!(cube.uv.len(), 6);
        assert_eq!(cube.uv[&Direction::North].material_instance.as_deref(), Some("all"));
    }

    #[test]
    fn test_uv_inset_by_face_kind() {
        let (uv, size) = calculate_uv(Direction::North, [0.0, 0.0, 16.0, 16.0]);
        assert_eq!(uv, [0.016, 0.016]);
        assert_eq!(size, [15.984, 15.984]);

        let (uv, size) = calculate_uv(Direction::Up, [0.0, 0.0, 16.0, 16.0]);
        assert_eq!(uv, [15.984, 15.984]);
        assert_eq!(size, [-15.984, -15.984]);

        // A mirrored box insets towards the other edge.
        let (uv, size) = calculate_uv(Direction::South, [16.0, 0.0, 0.0, 16.0]);
        assert_eq!(uv, [15.984, 0.016]);
        assert_eq!(size, [-15.984, 15.984]);
    }

    #[test]
    fn test_downscale_halves_about_pivot() {
        let converted = convert_elements(
            &[element([0.0; 3], [16.0, 30.0, 16.0], &all_faces())],
            UvMapping::Block,
            true,
        );
        assert!(converted.downscaled);
        let cube = &converted.cubes[0];
        assert_eq!(cube.origin, [-4.0, 4.0, -4.0]);
        assert_eq!(cube.size, [8.0, 15.0, 8.0]);
    }

    #[test]
    fn test_downscale_applies_to_whole_model() {
        let converted = convert_elements(
            &[
                element([0.0; 3], [16.0; 3], &all_faces()),
                element([-8.0, 0.0, 0.0], [0.0, 8.0, 8.0], &all_faces()),
            ],
            UvMapping::Block,
            true,
        );
        assert!(converted.downscaled);
        assert_eq!(converted.cubes[0].size, [8.0, 8.0, 8.0]);
    }

    #[test]
    fn test_downscale_can_be_disabled() {
        let converted = convert_elements(
            &[element([0.0; 3], [16.0, 30.0, 16.0], &all_faces())],
            UvMapping::Block,
            false,
        );
        assert!(!converted.downscaled);
        assert_eq!(converted.cubes[0].size, [16.0, 30.0, 16.0]);
    }

    #[test]
    fn test_element_rotation_and_pivot() {
        let mut rotated = element([4.0, 0.0, 4.0], [12.0, 16.0, 12.0], &all_faces());
        rotated.rotation = Some(ElementRotation {
            origin: [8.0, 8.0, 8.0],
            axis: Axis::Y,
            angle: 45.0,
            rescale: false,
        });
        let converted = convert_elements(&[rotated.clone()], UvMapping::Block, true);
        let cube = &converted.cubes[0];
        assert_eq!(cube.origin, [-4.0, 0.0, -4.0]);
        assert_eq!(cube.rotation, Some([0.0, -45.0, 0.0]));
        assert_eq!(cube.pivot, Some([0.0, 8.0, 0.0]));

        rotated.rotation.as_mut().unwrap().angle = 0.0;
        let converted = convert_elements(&[rotated], UvMapping::Block, true);
        assert!(converted.cubes[0].rotation.is_none());
        assert!(converted.cubes[0].pivot.is_none());
    }

    #[test]
    fn test_rotated_face_moves_to_companion_cube() {
        let mut faces = all_faces();
        faces[2] = (Direction::North, 90);
        let converted = convert_elements(&[element([0.0; 3], [16.0; 3], &faces)], UvMapping::Block, true);

        assert_eq!(converted.cubes.len(), 2);
        assert!(!converted.cubes[0].uv.contains_key(&Direction::North));
        let companion = &converted.cubes[1];
        assert_eq!(companion.uv.keys().collect::<Vec<_>>(), [&Direction::North]);
        assert!(companion.rotation.is_some());
    }

    #[test]
    fn test_faceless_element_is_dropped() {
        let converted = convert_elements(&[element([0.0; 3], [16.0; 3], &[])], UvMapping::Block, true);
        assert!(converted.cubes.is_empty());
    }

    #[test]
    fn test_sheet_mapping_remaps_uv() {
        let mut textures = IndexMap::new();
        textures.insert("all".to_string(), "minecraft:item/stick".to_string());
        let mut sheet = SpriteSheet::empty();
        sheet.width = 32;
        sheet.height = 32;
        sheet.placements.insert(
            "minecraft:item/stick".to_string(),
            AtlasPlacement {
                x: 16,
                y: 0,
                width: 16,
                height: 16,
                atlas_width: 32,
                atlas_height: 32,
            },
        );

        let converted = convert_elements(
            &[element([0.0; 3], [16.0; 3], &[(Direction::South, 0)])],
            UvMapping::Sheet {
                textures: &textures,
                sheet: &sheet,
            },
            false,
        );
        let face = &converted.cubes[0].uv[&Direction::South];
        assert_eq!(face.uv, [8.016, 0.016]);
        assert_eq!(face.uv_size, [7.984, 7.984]);
        assert!(face.material_instance.is_none());
    }
}

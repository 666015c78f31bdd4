//! Bedrock geometry generation.
//!
//! Java cuboid elements become Bedrock cubes attached to a fixed bone
//! chain. Faces with a UV rotation, which Bedrock cubes cannot express,
//! are split into zero-depth companion cubes.

pub mod bones;
pub mod cube;
pub mod document;
pub mod rotation;
pub mod uv_rotation;

pub use bones::{bone_chain, disable_animation, slot_animations, TextureMesh, ROOT_BONE};
pub use cube::{convert_elements, BedrockCube, ConvertedCubes, FaceUv, UvMapping};
pub use document::{
    AnimationDocument, AttachableDocument, Bone, GeometryDescription, GeometryDocument,
};

use glam::DVec3;

/// Round to four decimal places, the precision of every emitted coordinate.
pub fn ten_k_round(value: f64) -> f64 {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    // Avoid emitting -0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub fn round_vec(v: [f64; 3]) -> [f64; 3] {
    v.map(ten_k_round)
}

pub(crate) fn to_dvec(v: [f64; 3]) -> DVec3 {
    DVec3::from_array(v)
}

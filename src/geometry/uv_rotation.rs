//! Rotated face UVs.
//!
//! Bedrock cube faces take a UV box but no UV rotation. A Java face with a
//! rotated UV is rebuilt as a zero-depth cube lying on the face, turned
//! about the face normal so that Bedrock's default UV orientation lands
//! where the rotated Java UV would.
//!
//! Every face is described by a frame: the corner where UV sampling starts
//! and the two edge vectors along which `u` and `v` grow. Turning the UV a
//! quarter turn moves the start to the next corner and swaps the edges, so
//! the companion cube is the one whose unrotated frame matches the turned
//! frame of the original face.

use super::cube::{BedrockCube, FaceUv};
use super::rotation::{compose, rotate_point, rotation_matrix};
use super::{round_vec, to_dvec};
use crate::types::Direction;
use glam::DVec3;
use std::collections::BTreeMap;

const DIRECTION_EPSILON: f64 = 1e-9;

/// UV start corner and edge vectors of one face of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFrame {
    pub origin: DVec3,
    pub u: DVec3,
    pub v: DVec3,
}

impl FaceFrame {
    /// The frame after turning the face UV a quarter turn.
    pub fn quarter_turn(self) -> Self {
        Self {
            origin: self.origin + self.u,
            u: self.v,
            v: -self.u,
        }
    }

    pub fn turned(self, quarter_turns: u32) -> Self {
        (0..quarter_turns).fold(self, |frame, _| frame.quarter_turn())
    }
}

/// The UV frame of `face` on the box with minimum corner `min` and `size`.
pub fn face_frame(face: Direction, min: DVec3, size: DVec3) -> FaceFrame {
    let max = min + size;
    let (origin, u, v) = match face {
        Direction::North => (
            DVec3::new(min.x, max.y, min.z),
            DVec3::new(size.x, 0.0, 0.0),
            DVec3::new(0.0, -size.y, 0.0),
        ),
        Direction::South => (
            DVec3::new(max.x, max.y, max.z),
            DVec3::new(-size.x, 0.0, 0.0),
            DVec3::new(0.0, -size.y, 0.0),
        ),
        Direction::East => (
            DVec3::new(min.x, max.y, max.z),
            DVec3::new(0.0, 0.0, -size.z),
            DVec3::new(0.0, -size.y, 0.0),
        ),
        Direction::West => (
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(0.0, 0.0, size.z),
            DVec3::new(0.0, -size.y, 0.0),
        ),
        Direction::Up => (
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(-size.x, 0.0, 0.0),
            DVec3::new(0.0, 0.0, size.z),
        ),
        Direction::Down => (
            DVec3::new(max.x, min.y, max.z),
            DVec3::new(-size.x, 0.0, 0.0),
            DVec3::new(0.0, 0.0, -size.z),
        ),
    };
    FaceFrame { origin, u, v }
}

fn same_direction(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < DIRECTION_EPSILON
}

/// Index of the single non-zero component of an axis-aligned vector.
fn axis_of(v: DVec3) -> usize {
    let abs = v.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
        0
    } else if abs.y >= abs.z {
        1
    } else {
        2
    }
}

/// The rotation about the face normal that carries the unturned UV
/// directions of `face` onto the directions after `quarter_turns` turns.
fn normal_rotation(face: Direction, quarter_turns: u32) -> Option<[f64; 3]> {
    let unit = face_frame(face, DVec3::ZERO, DVec3::ONE);
    let target = unit.turned(quarter_turns);
    let axis = face.axis().index();

    [90.0, 180.0, 270.0].into_iter().find_map(|angle| {
        let mut euler = [0.0; 3];
        euler[axis] = angle;
        let m = rotation_matrix(euler);
        (same_direction(m * unit.u, target.u) && same_direction(m * unit.v, target.v))
            .then_some(euler)
    })
}

/// Build the companion cube that shows `uv` on `face` of `cube`, turned by
/// `rotation` degrees.
///
/// Returns `None` for rotations that are not a non-zero multiple of 90.
pub fn split_rotated_face(
    cube: &BedrockCube,
    face: Direction,
    rotation: i32,
    uv: FaceUv,
) -> Option<BedrockCube> {
    let degrees = rotation.rem_euclid(360);
    if degrees == 0 || degrees % 90 != 0 {
        return None;
    }
    let quarter_turns = (degrees / 90) as u32;

    let turned = face_frame(face, to_dvec(cube.origin), to_dvec(cube.size)).turned(quarter_turns);
    let face_rotation = normal_rotation(face, quarter_turns)?;

    let unit = face_frame(face, DVec3::ZERO, DVec3::ONE);
    let mut size = DVec3::ZERO;
    size[axis_of(unit.u)] = turned.u.length();
    size[axis_of(unit.v)] = turned.v.length();

    // The turned start corner becomes the companion's pivot, so only the
    // parent rotation moves it.
    let parent_rotation = cube.rotation.unwrap_or([0.0; 3]);
    let parent_pivot = cube.pivot.map(to_dvec).unwrap_or(DVec3::ZERO);
    let pivot = rotate_point(turned.origin, parent_pivot, parent_rotation);
    let origin = pivot - face_frame(face, DVec3::ZERO, size).origin;

    Some(BedrockCube {
        origin: round_vec(origin.to_array()),
        size: round_vec(size.to_array()),
        rotation: Some(round_vec(compose(parent_rotation, face_rotation))),
        pivot: Some(round_vec(pivot.to_array())),
        uv: BTreeMap::from([(face, uv)]),
    })
}

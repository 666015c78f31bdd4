//! Bedrock euler rotations.
//!
//! Bedrock stores a cube or bone rotation as three degrees `[x, y, z]`
//! applied about the pivot. Because its X axis is mirrored relative to a
//! right-handed frame, the matrix of `[x, y, z]` is `Rz(-z) * Ry(y) * Rx(-x)`
//! with standard right-handed axis rotations. Rotations are composed as
//! matrices and decomposed back into a single triple; angles are never added.

use glam::{DMat3, DVec3};

/// Below this `cos(y)` the decomposition treats the rotation as gimbal locked.
const SINGULAR_EPSILON: f64 = 1e-6;

/// The rotation matrix of a Bedrock euler triple (degrees).
pub fn rotation_matrix(euler: [f64; 3]) -> DMat3 {
    let [x, y, z] = euler.map(f64::to_radians);
    DMat3::from_rotation_z(-z) * DMat3::from_rotation_y(y) * DMat3::from_rotation_x(-x)
}

/// Rotate `point` about `pivot` by a Bedrock euler triple.
pub fn rotate_point(point: DVec3, pivot: DVec3, euler: [f64; 3]) -> DVec3 {
    pivot + rotation_matrix(euler) * (point - pivot)
}

/// Decompose a rotation matrix into a Bedrock euler triple (degrees).
pub fn matrix_to_euler(m: &DMat3) -> [f64; 3] {
    // glam is column-major: element (row, col) lives in column `col`.
    let at = |row: usize, col: usize| m.col(col)[row];

    let sy = (at(0, 0) * at(0, 0) + at(1, 0) * at(1, 0)).sqrt();
    let (rx, ry, rz) = if sy >= SINGULAR_EPSILON {
        (
            at(2, 1).atan2(at(2, 2)),
            (-at(2, 0)).atan2(sy),
            at(1, 0).atan2(at(0, 0)),
        )
    } else {
        ((-at(1, 2)).atan2(at(1, 1)), (-at(2, 0)).atan2(sy), 0.0)
    };

    [-rx.to_degrees(), ry.to_degrees(), -rz.to_degrees()]
}

/// The single rotation equal to applying `inner` first and then `outer`.
pub fn compose(outer: [f64; 3], inner: [f64; 3]) -> [f64; 3] {
    matrix_to_euler(&(rotation_matrix(outer) * rotation_matrix(inner)))
}

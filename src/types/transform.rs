//! Transform types for element rotations and display settings.

use super::Axis;
use serde::{Deserialize, Serialize};

/// Element-level rotation from a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRotation {
    /// Origin point for rotation (in Java model coordinates).
    #[serde(default = "default_origin")]
    pub origin: [f64; 3],
    /// Axis to rotate around.
    pub axis: Axis,
    /// Rotation angle in degrees (-45 to 45, in 22.5 increments).
    pub angle: f64,
    /// Whether to rescale the element after rotation.
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f64; 3] {
    [8.0, 8.0, 8.0]
}

impl ElementRotation {
    /// The rotation as a Bedrock euler triple.
    ///
    /// Bedrock mirrors the X axis, so X and Y angles flip sign while Z keeps its sign.
    pub fn bedrock_euler(&self) -> [f64; 3] {
        match self.axis {
            Axis::X => [-self.angle, 0.0, 0.0],
            Axis::Y => [0.0, -self.angle, 0.0],
            Axis::Z => [0.0, 0.0, self.angle],
        }
    }
}

/// A display transform for one item slot (`thirdperson_righthand`, `head`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 3]>,
}

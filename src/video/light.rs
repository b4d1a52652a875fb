use crate::math::prelude::*;

/// A directional light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Light {
    /// The normalized direction the light travels along.
    pub direction: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl Light {
    pub fn new(direction: Vector3<f32>, color: Vector3<f32>) -> Self {
        Light {
            direction: direction.normalize(),
            color,
        }
    }
}

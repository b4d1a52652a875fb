use crate::errors::*;

use super::geometry::Geometry;
use super::shader::Shader;
use super::Device;

/// Uses `shader`, binds the vertex array of `geometry` and draws all of its
/// indices as a triangle list. Nothing is cached between calls.
pub fn draw(video: &mut Device, shader: &Shader, geometry: &Geometry) -> Result<()> {
    if shader.is_null() {
        return Err(Error::NullHandle("shader"));
    }

    if geometry.is_null() {
        return Err(Error::NullHandle("geometry"));
    }

    unsafe {
        video
            .visitor()
            .draw(shader.program(), geometry.vao(), geometry.size())
    }
}

use gl;
use gl::types::*;

use super::super::super::shader::ShaderStage;
use super::super::super::texture::{TextureFilter, TextureFormat};

impl From<ShaderStage> for GLenum {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl From<TextureFilter> for GLint {
    fn from(filter: TextureFilter) -> Self {
        match filter {
            TextureFilter::Nearest => gl::NEAREST as GLint,
        }
    }
}

/// Returns `(internal_format, format, pixel_type)` of texture data.
pub fn texture_format(format: TextureFormat) -> (GLint, GLenum, GLenum) {
    match format {
        TextureFormat::R8 => (gl::R8 as GLint, gl::RED, gl::UNSIGNED_BYTE),
        TextureFormat::RG8 => (gl::RG8 as GLint, gl::RG, gl::UNSIGNED_BYTE),
        TextureFormat::RGB8 => (gl::RGB8 as GLint, gl::RGB, gl::UNSIGNED_BYTE),
        TextureFormat::RGBA8 => (gl::RGBA8 as GLint, gl::RGBA, gl::UNSIGNED_BYTE),
    }
}

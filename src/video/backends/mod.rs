//! The backend of the video module, which should be responsible for only one
//! thing: turning resource and draw requests into low-level OpenGL calls.
//!
//! Backends own no resource state beyond what they need to validate names.
//! Every call leaves nothing bound that a later call could depend on.

pub mod gl;
pub mod headless;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};

use super::shader::ShaderStage;
use super::texture::{TextureFilter, TextureFormat};
use super::uniform::UniformVariable;
use super::vertex::VertexAttribute;

/// The names of the GL objects behind a geometry. All zeros is the null
/// object.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GeometryObject {
    pub vao: u32,
    pub vbo: u32,
    pub ibo: u32,
}

pub trait Visitor {
    /// Uploads `vertices` into a static vertex buffer and `indices` into a
    /// static index buffer, and records `layout` into a vertex array object.
    unsafe fn create_geometry(
        &mut self,
        vertices: &[u8],
        indices: &[u32],
        layout: &[VertexAttribute],
        stride: usize,
    ) -> Result<GeometryObject>;

    unsafe fn delete_geometry(&mut self, object: GeometryObject) -> Result<()>;

    /// Reads back the whole content of buffer `id`.
    unsafe fn read_buffer(&mut self, id: u32) -> Result<Vec<u8>>;

    unsafe fn create_texture(
        &mut self,
        dimensions: Vector2<u32>,
        format: TextureFormat,
        filter: TextureFilter,
        pixels: &[u8],
    ) -> Result<u32>;

    unsafe fn delete_texture(&mut self, id: u32) -> Result<()>;

    /// Creates a stage object and compiles `source` into it. A failed
    /// compilation still returns the stage, see `stage_log`.
    unsafe fn create_stage(&mut self, stage: ShaderStage, source: &str) -> Result<u32>;

    /// Returns the info log of a stage that failed to compile, or `None` if it
    /// compiled.
    unsafe fn stage_log(&mut self, id: u32) -> Result<Option<String>>;

    unsafe fn delete_stage(&mut self, id: u32) -> Result<()>;

    /// Links compiled stages into a program.
    unsafe fn link(&mut self, stages: &[u32]) -> Result<u32>;

    unsafe fn delete_program(&mut self, id: u32) -> Result<()>;

    unsafe fn program_uniform(
        &mut self,
        program: u32,
        location: u32,
        variable: &UniformVariable,
    ) -> Result<()>;

    unsafe fn bind_texture(&mut self, unit: u32, id: u32) -> Result<()>;

    /// Draws `len` indices of vertex array `vao` as triangles with `program`.
    unsafe fn draw(&mut self, program: u32, vao: u32, len: u32) -> Result<()>;

    unsafe fn clear(&mut self, color: Color<f32>, depth: f32) -> Result<()>;

    unsafe fn update_viewport(&mut self, dimensions: Vector2<u32>) -> Result<()>;
}

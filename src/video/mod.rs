//! GPU resources and the calls that create, configure and draw them.
//!
//! Every operation takes the `Device` explicitly. The device is the only way
//! to reach the GPU, so the implicit bind state of OpenGL never leaks across
//! calls: each function binds what it needs and unbinds it before returning.
//!
//! Resources are plain values owned by the caller. `free_*` resets a value to
//! its null state and is a no-op on an already freed value. A `VideoGuard`
//! frees whatever is still alive when it goes out of scope.

pub mod backends;
pub mod draw;
pub mod geometry;
pub mod guard;
pub mod light;
pub mod shader;
pub mod texture;
pub mod uniform;
pub mod vertex;

pub mod prelude {
    pub use super::backends::headless::{Command, Journal};
    pub use super::draw::draw;
    pub use super::geometry::{
        free_geometry, load_geometry, make_geometry, parse_obj, Geometry, MeshData,
    };
    pub use super::guard::VideoGuard;
    pub use super::light::Light;
    pub use super::shader::{
        check_shader, free_shader, load_shader, make_shader, Shader, ShaderStage,
    };
    pub use super::texture::{
        free_texture, load_texture, make_texture, Texture, TextureFilter, TextureFormat,
    };
    pub use super::uniform::{
        set_texture, set_uniform, uniform_slots, verify_slots, UniformSlot, UniformVariable,
        UniformVariableType,
    };
    pub use super::vertex::{Attribute, Vertex, VertexAttribute};
    pub use super::Device;
}

pub use self::draw::draw;
pub use self::geometry::{free_geometry, load_geometry, make_geometry, Geometry};
pub use self::shader::{check_shader, free_shader, load_shader, make_shader, Shader};
pub use self::texture::{free_texture, load_texture, make_texture, Texture};
pub use self::uniform::{set_texture, set_uniform};

use std::marker::PhantomData;
use std::mem;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};
use crate::window::Context;

use self::backends::headless::{HeadlessVisitor, Journal};
use self::backends::Visitor;
use self::vertex::Vertex;

/// The capability to issue GPU commands.
///
/// A device borrows the `Context` it was created from, so the context can not
/// be terminated while the device is alive:
///
/// ```rust,compile_fail
/// use pastel::prelude::*;
///
/// let ctx = Context::headless(Params::default());
/// let mut video = Device::new(&ctx).unwrap();
/// ctx.term();
/// video.clear(Color::charcoal(), 1.0).unwrap();
/// ```
pub struct Device<'ctx> {
    visitor: Box<dyn Visitor>,
    _ctx: PhantomData<&'ctx Context>,
}

impl<'ctx> Device<'ctx> {
    /// Creates a device for the GL context of `ctx`. A headless context gets a
    /// device that records commands without a GPU.
    pub fn new(ctx: &'ctx Context) -> Result<Self> {
        if ctx.is_headless() {
            let (visitor, _) = HeadlessVisitor::new();
            return Ok(Device::with_visitor(visitor));
        }

        ctx.make_current()?;
        let visitor = unsafe { backends::gl::visitor::GLVisitor::new()? };
        Ok(Device::with_visitor(visitor))
    }

    /// Creates a device without GPU, and the journal of the commands it
    /// receives.
    pub fn headless() -> (Device<'static>, Journal) {
        let (visitor, journal) = HeadlessVisitor::new();
        (Device::with_visitor(visitor), journal)
    }

    fn with_visitor<T: Visitor + 'static>(visitor: T) -> Self {
        Device {
            visitor: Box::new(visitor),
            _ctx: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn visitor(&mut self) -> &mut dyn Visitor {
        self.visitor.as_mut()
    }

    /// Clears the color and depth buffers of the default framebuffer.
    pub fn clear(&mut self, color: Color<f32>, depth: f32) -> Result<()> {
        unsafe { self.visitor.clear(color, depth) }
    }

    /// Sets the viewport to cover `dimensions` pixels.
    pub fn update_viewport(&mut self, dimensions: Vector2<u32>) -> Result<()> {
        unsafe { self.visitor.update_viewport(dimensions) }
    }

    /// Reads back the vertices stored in the vertex buffer of `geometry`.
    pub fn read_vertex_buffer(&mut self, geometry: &Geometry) -> Result<Vec<Vertex>> {
        if geometry.is_null() {
            return Err(Error::NullHandle("geometry"));
        }

        let bytes = unsafe { self.visitor.read_buffer(geometry.vbo())? };
        if bytes.len() % mem::size_of::<Vertex>() != 0 {
            return Err(Error::Backend(format!(
                "vertex buffer has {} bytes, which is not a multiple of the vertex size.",
                bytes.len()
            )));
        }

        Ok(bytes
            .chunks_exact(mem::size_of::<Vertex>())
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }
}

use std::collections::HashSet;
use std::path::Path;

use crate::errors::*;
use crate::window::Context;

use super::backends::GeometryObject;
use super::draw;
use super::geometry::{self, Geometry};
use super::shader::{self, Shader};
use super::texture::{self, Texture};
use super::uniform::{self, UniformVariable};
use super::vertex::Vertex;
use super::Device;

/// Frees every resource it created and that is still alive when it is
/// dropped, including on early returns.
///
/// The guard keeps the device to itself while it is alive. Resources it
/// created can only be freed through it, so it never deletes a name twice.
pub struct VideoGuard<'a, 'ctx> {
    stack: HashSet<Resource>,
    video: &'a mut Device<'ctx>,
}

impl<'a, 'ctx> VideoGuard<'a, 'ctx> {
    pub fn new(video: &'a mut Device<'ctx>) -> Self {
        VideoGuard {
            stack: HashSet::new(),
            video,
        }
    }

    /// Returns the number of resources alive in this guard.
    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[inline]
    pub fn make_geometry(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<Geometry> {
        let v = geometry::make_geometry(self.video, vertices, indices)?;
        self.stack.insert(Resource::Geometry(v.object()));
        Ok(v)
    }

    #[inline]
    pub fn load_geometry<P: AsRef<Path>>(&mut self, path: P) -> Result<Geometry> {
        let v = geometry::load_geometry(self.video, path)?;
        self.stack.insert(Resource::Geometry(v.object()));
        Ok(v)
    }

    #[inline]
    pub fn free_geometry(&mut self, v: &mut Geometry) -> Result<()> {
        self.stack.remove(&Resource::Geometry(v.object()));
        geometry::free_geometry(self.video, v)
    }

    #[inline]
    pub fn make_texture(
        &mut self,
        width: u32,
        height: u32,
        channels: u32,
        pixels: &[u8],
    ) -> Result<Texture> {
        let v = texture::make_texture(self.video, width, height, channels, pixels)?;
        self.stack.insert(Resource::Texture(v.handle()));
        Ok(v)
    }

    #[inline]
    pub fn load_texture<P: AsRef<Path>>(&mut self, path: P) -> Result<Texture> {
        let v = texture::load_texture(self.video, path)?;
        self.stack.insert(Resource::Texture(v.handle()));
        Ok(v)
    }

    #[inline]
    pub fn free_texture(&mut self, v: &mut Texture) -> Result<()> {
        self.stack.remove(&Resource::Texture(v.handle()));
        texture::free_texture(self.video, v)
    }

    #[inline]
    pub fn make_shader(&mut self, vs: &str, fs: &str) -> Result<Shader> {
        let v = shader::make_shader(self.video, vs, fs)?;
        self.stack.insert(Resource::Shader(v.program()));
        Ok(v)
    }

    #[inline]
    pub fn load_shader<P1, P2>(&mut self, vs: P1, fs: P2) -> Result<Shader>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
    {
        let v = shader::load_shader(self.video, vs, fs)?;
        self.stack.insert(Resource::Shader(v.program()));
        Ok(v)
    }

    #[inline]
    pub fn free_shader(&mut self, v: &mut Shader) -> Result<()> {
        self.stack.remove(&Resource::Shader(v.program()));
        shader::free_shader(self.video, v)
    }

    #[inline]
    pub fn set_uniform<T>(&mut self, shader: &Shader, location: u32, value: T) -> Result<()>
    where
        T: Into<UniformVariable>,
    {
        uniform::set_uniform(self.video, shader, location, value)
    }

    #[inline]
    pub fn set_texture(
        &mut self,
        shader: &Shader,
        location: u32,
        texture: &Texture,
        unit: u32,
    ) -> Result<()> {
        uniform::set_texture(self.video, shader, location, texture, unit)
    }

    #[inline]
    pub fn draw(&mut self, shader: &Shader, geometry: &Geometry) -> Result<()> {
        draw::draw(self.video, shader, geometry)
    }

    /// Clears the window of `ctx` through the guarded device.
    #[inline]
    pub fn clear(&mut self, ctx: &Context) -> Result<()> {
        ctx.clear(self.video)
    }

    #[inline]
    pub fn read_vertex_buffer(&mut self, geometry: &Geometry) -> Result<Vec<Vertex>> {
        self.video.read_vertex_buffer(geometry)
    }

    fn delete(video: &mut Device, resource: Resource) -> Result<()> {
        unsafe {
            match resource {
                Resource::Geometry(v) => video.visitor().delete_geometry(v),
                Resource::Texture(v) => video.visitor().delete_texture(v),
                Resource::Shader(v) => video.visitor().delete_program(v),
            }
        }
    }
}

impl<'a, 'ctx> Drop for VideoGuard<'a, 'ctx> {
    fn drop(&mut self) {
        for v in self.stack.drain() {
            debug!("[VideoGuard] frees {:?}.", v);
            if let Err(err) = Self::delete(self.video, v) {
                warn!("[VideoGuard] failed to free {:?}: {}", v, err);
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum Resource {
    Geometry(GeometryObject),
    Texture(u32),
    Shader(u32),
}

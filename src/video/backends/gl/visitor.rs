use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;

use gl;
use gl::types::*;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};

use super::super::super::shader::ShaderStage;
use super::super::super::texture::{TextureFilter, TextureFormat};
use super::super::super::uniform::UniformVariable;
use super::super::super::vertex::VertexAttribute;
use super::super::{GeometryObject, Visitor};
use super::capabilities::Capabilities;
use super::{check, types};

pub struct GLVisitor {
    capabilities: Capabilities,
}

impl GLVisitor {
    /// Creates a visitor for the current context. The GL function table must
    /// have been loaded.
    pub unsafe fn new() -> Result<Self> {
        let capabilities = Capabilities::parse()?;
        Ok(GLVisitor { capabilities })
    }

    unsafe fn create_buffer(tp: GLenum, data: &[u8]) -> Result<GLuint> {
        let mut id = 0;
        gl::GenBuffers(1, &mut id);
        if id == 0 {
            return Err(Error::Backend("[GL] Failed to generate buffer.".to_owned()));
        }

        let value = if data.is_empty() {
            ptr::null()
        } else {
            data.as_ptr() as *const c_void
        };

        gl::BindBuffer(tp, id);
        gl::BufferData(tp, data.len() as isize, value, gl::STATIC_DRAW);

        if let Err(err) = check() {
            gl::DeleteBuffers(1, &id);
            return Err(err);
        }

        Ok(id)
    }

    /// Fills the bound vertex array `object.vao`. Buffer names are written to
    /// `object` as soon as they exist, so a failure leaves nothing untracked.
    unsafe fn upload(
        object: &mut GeometryObject,
        vertices: &[u8],
        indices: &[u32],
        layout: &[VertexAttribute],
        stride: usize,
    ) -> Result<()> {
        object.vbo = Self::create_buffer(gl::ARRAY_BUFFER, vertices)?;
        object.ibo = Self::create_buffer(gl::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices))?;

        for v in layout {
            gl::EnableVertexAttribArray(v.location());
            gl::VertexAttribPointer(
                v.location(),
                GLint::from(v.size),
                gl::FLOAT,
                gl::FALSE,
                stride as GLsizei,
                v.offset as *const c_void,
            );
        }

        Ok(())
    }
}

impl Visitor for GLVisitor {
    unsafe fn create_geometry(
        &mut self,
        vertices: &[u8],
        indices: &[u32],
        layout: &[VertexAttribute],
        stride: usize,
    ) -> Result<GeometryObject> {
        let mut object = GeometryObject::default();
        gl::GenVertexArrays(1, &mut object.vao);
        if object.vao == 0 {
            return Err(Error::Backend("[GL] Failed to generate vertex array.".to_owned()));
        }

        gl::BindVertexArray(object.vao);
        let uploaded = Self::upload(&mut object, vertices, indices, layout, stride);

        // The element buffer binding is part of the vertex array, so the
        // array goes first.
        gl::BindVertexArray(0);
        gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0);

        let result = match uploaded {
            Ok(()) => check(),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => Ok(object),
            Err(err) => {
                // Deleting the zero name is silently ignored.
                if let Err(v) = self.delete_geometry(object) {
                    warn!("[GL] failed to delete {:?}: {}", object, v);
                }

                Err(err)
            }
        }
    }

    unsafe fn delete_geometry(&mut self, object: GeometryObject) -> Result<()> {
        gl::DeleteVertexArrays(1, &object.vao);
        gl::DeleteBuffers(1, &object.vbo);
        gl::DeleteBuffers(1, &object.ibo);
        check()
    }

    unsafe fn read_buffer(&mut self, id: u32) -> Result<Vec<u8>> {
        gl::BindBuffer(gl::COPY_READ_BUFFER, id);

        let mut len = 0;
        gl::GetBufferParameteriv(gl::COPY_READ_BUFFER, gl::BUFFER_SIZE, &mut len);

        let mut bytes = vec![0u8; len as usize];
        if !bytes.is_empty() {
            gl::GetBufferSubData(
                gl::COPY_READ_BUFFER,
                0,
                len as isize,
                bytes.as_mut_ptr() as *mut c_void,
            );
        }

        gl::BindBuffer(gl::COPY_READ_BUFFER, 0);
        check()?;
        Ok(bytes)
    }

    unsafe fn create_texture(
        &mut self,
        dimensions: Vector2<u32>,
        format: TextureFormat,
        filter: TextureFilter,
        pixels: &[u8],
    ) -> Result<u32> {
        let mut id = 0;
        gl::GenTextures(1, &mut id);
        if id == 0 {
            return Err(Error::Backend("[GL] Failed to generate texture.".to_owned()));
        }

        gl::BindTexture(gl::TEXTURE_2D, id);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, filter.into());
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, filter.into());

        let (internal_format, format, pixel_type) = types::texture_format(format);
        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            internal_format,
            dimensions.x as GLsizei,
            dimensions.y as GLsizei,
            0,
            format,
            pixel_type,
            pixels.as_ptr() as *const c_void,
        );

        gl::BindTexture(gl::TEXTURE_2D, 0);

        if let Err(err) = check() {
            gl::DeleteTextures(1, &id);
            return Err(err);
        }

        Ok(id)
    }

    unsafe fn delete_texture(&mut self, id: u32) -> Result<()> {
        gl::DeleteTextures(1, &id);
        check()
    }

    unsafe fn create_stage(&mut self, stage: ShaderStage, source: &str) -> Result<u32> {
        let c_str = CString::new(source.as_bytes()).map_err(|_| {
            Error::ShaderCompile(
                stage.label().to_owned(),
                "source contains a nul byte.".to_owned(),
            )
        })?;

        let id = gl::CreateShader(stage.into());
        if id == 0 {
            check()?;
            return Err(Error::Backend("[GL] Failed to create shader.".to_owned()));
        }

        gl::ShaderSource(id, 1, &c_str.as_ptr(), ptr::null());
        gl::CompileShader(id);

        if let Err(err) = check() {
            gl::DeleteShader(id);
            return Err(err);
        }

        Ok(id)
    }

    unsafe fn stage_log(&mut self, id: u32) -> Result<Option<String>> {
        let mut status = GLint::from(gl::FALSE);
        gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut status);
        check()?;

        if status == GLint::from(gl::TRUE) {
            return Ok(None);
        }

        let mut len = 0;
        gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);

        let mut buf = vec![0u8; len.max(1) as usize];
        gl::GetShaderInfoLog(
            id,
            len,
            ptr::null_mut(),
            buf.as_mut_ptr() as *mut GLchar,
        );

        Ok(Some(info_log(buf)))
    }

    unsafe fn delete_stage(&mut self, id: u32) -> Result<()> {
        gl::DeleteShader(id);
        check()
    }

    unsafe fn link(&mut self, stages: &[u32]) -> Result<u32> {
        let program = gl::CreateProgram();
        if program == 0 {
            check()?;
            return Err(Error::Backend("[GL] Failed to create program.".to_owned()));
        }

        for &v in stages {
            gl::AttachShader(program, v);
        }

        gl::LinkProgram(program);

        for &v in stages {
            gl::DetachShader(program, v);
        }

        let mut status = GLint::from(gl::FALSE);
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

        if status != GLint::from(gl::TRUE) {
            let mut len: GLint = 0;
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);

            let mut buf = vec![0u8; len.max(1) as usize];
            gl::GetProgramInfoLog(
                program,
                len,
                ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );

            gl::DeleteProgram(program);

            let log = info_log(buf);
            error!("[ERROR] Program link \n {}", log);
            return Err(Error::ShaderLink(log));
        }

        if let Err(err) = check() {
            gl::DeleteProgram(program);
            return Err(err);
        }

        Ok(program)
    }

    unsafe fn delete_program(&mut self, id: u32) -> Result<()> {
        gl::DeleteProgram(id);
        check()
    }

    unsafe fn program_uniform(
        &mut self,
        program: u32,
        location: u32,
        variable: &UniformVariable,
    ) -> Result<()> {
        let location = location as GLint;
        match *variable {
            UniformVariable::I32(v) => gl::ProgramUniform1i(program, location, v),
            UniformVariable::F32(v) => gl::ProgramUniform1f(program, location, v),
            UniformVariable::Vector2f(v) => {
                gl::ProgramUniform2fv(program, location, 1, v.as_ptr())
            }
            UniformVariable::Vector3f(v) => {
                gl::ProgramUniform3fv(program, location, 1, v.as_ptr())
            }
            UniformVariable::Vector4f(v) => {
                gl::ProgramUniform4fv(program, location, 1, v.as_ptr())
            }
            UniformVariable::Matrix4f(v, transpose) => {
                let transpose = if transpose { gl::TRUE } else { gl::FALSE };
                gl::ProgramUniformMatrix4fv(program, location, 1, transpose, v[0].as_ptr())
            }
        }

        check()
    }

    unsafe fn bind_texture(&mut self, unit: u32, id: u32) -> Result<()> {
        if unit >= self.capabilities.max_combined_texture_image_units {
            return Err(Error::Backend(format!(
                "[GL] Texture unit {} exceeds the {} units available.",
                unit, self.capabilities.max_combined_texture_image_units
            )));
        }

        gl::ActiveTexture(gl::TEXTURE0 + unit);
        gl::BindTexture(gl::TEXTURE_2D, id);
        check()
    }

    unsafe fn draw(&mut self, program: u32, vao: u32, len: u32) -> Result<()> {
        gl::UseProgram(program);
        gl::BindVertexArray(vao);
        gl::DrawElements(gl::TRIANGLES, len as GLsizei, gl::UNSIGNED_INT, ptr::null());
        gl::BindVertexArray(0);
        gl::UseProgram(0);
        check()
    }

    unsafe fn clear(&mut self, color: Color<f32>, depth: f32) -> Result<()> {
        gl::ClearColor(color.r, color.g, color.b, color.a);
        gl::ClearDepth(GLdouble::from(depth));
        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        check()
    }

    unsafe fn update_viewport(&mut self, dimensions: Vector2<u32>) -> Result<()> {
        gl::Viewport(0, 0, dimensions.x as GLsizei, dimensions.y as GLsizei);
        check()
    }
}

fn info_log(mut buf: Vec<u8>) -> String {
    // Skips the trailing nul and anything after it.
    if let Some(i) = buf.iter().position(|&v| v == 0) {
        buf.truncate(i);
    }

    String::from_utf8_lossy(&buf).trim_end().to_owned()
}

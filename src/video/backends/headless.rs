//! A backend without GPU. It hands out object names the way a GL driver does,
//! keeps buffer contents for read-back and journals every command it gets.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};

use super::super::shader::ShaderStage;
use super::super::texture::{TextureFilter, TextureFormat};
use super::super::uniform::UniformVariable;
use super::super::vertex::VertexAttribute;
use super::{GeometryObject, Visitor};

/// A command received by a headless device.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateGeometry {
        object: GeometryObject,
        vertices: usize,
        indices: usize,
    },
    DeleteGeometry(GeometryObject),
    CreateTexture {
        id: u32,
        dimensions: Vector2<u32>,
        format: TextureFormat,
    },
    DeleteTexture(u32),
    CompileStage {
        id: u32,
        stage: ShaderStage,
        compiled: bool,
    },
    DeleteStage(u32),
    Link {
        program: u32,
        stages: Vec<u32>,
    },
    DeleteProgram(u32),
    Uniform {
        program: u32,
        location: u32,
        variable: UniformVariable,
    },
    BindTexture {
        unit: u32,
        id: u32,
    },
    Draw {
        program: u32,
        vao: u32,
        len: u32,
    },
    Clear {
        color: Color<f32>,
        depth: f32,
    },
    Viewport(Vector2<u32>),
}

/// The shared record of the commands a headless device received, in order.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Command>>>);

impl Journal {
    pub fn commands(&self) -> Vec<Command> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, command: Command) {
        self.0.borrow_mut().push(command);
    }
}

#[derive(Default)]
pub struct HeadlessVisitor {
    journal: Journal,
    next: u32,
    buffers: HashMap<u32, Vec<u8>>,
    vaos: HashMap<u32, u32>,
    textures: HashSet<u32>,
    stages: HashMap<u32, Option<String>>,
    programs: HashSet<u32>,
}

impl HeadlessVisitor {
    pub fn new() -> (Self, Journal) {
        let journal = Journal::default();
        let visitor = HeadlessVisitor {
            journal: journal.clone(),
            ..Default::default()
        };

        (visitor, journal)
    }

    fn alloc(&mut self) -> u32 {
        self.next += 1;
        self.next
    }

    fn compile(stage: ShaderStage, source: &str) -> Option<String> {
        if source.contains("main") {
            None
        } else {
            Some(format!(
                "0:1(1): error: {} shader has no entry point `main`",
                stage.label()
            ))
        }
    }
}

impl Visitor for HeadlessVisitor {
    unsafe fn create_geometry(
        &mut self,
        vertices: &[u8],
        indices: &[u32],
        _: &[VertexAttribute],
        stride: usize,
    ) -> Result<GeometryObject> {
        let vbo = self.alloc();
        self.buffers.insert(vbo, vertices.to_vec());

        let ibo = self.alloc();
        self.buffers
            .insert(ibo, bytemuck::cast_slice(indices).to_vec());

        let vao = self.alloc();
        self.vaos.insert(vao, indices.len() as u32);

        let object = GeometryObject { vao, vbo, ibo };
        self.journal.push(Command::CreateGeometry {
            object,
            vertices: vertices.len() / stride.max(1),
            indices: indices.len(),
        });

        Ok(object)
    }

    unsafe fn delete_geometry(&mut self, object: GeometryObject) -> Result<()> {
        self.vaos.remove(&object.vao);
        self.buffers.remove(&object.vbo);
        self.buffers.remove(&object.ibo);
        self.journal.push(Command::DeleteGeometry(object));
        Ok(())
    }

    unsafe fn read_buffer(&mut self, id: u32) -> Result<Vec<u8>> {
        self.buffers
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::Backend(format!("buffer {} does not exist.", id)))
    }

    unsafe fn create_texture(
        &mut self,
        dimensions: Vector2<u32>,
        format: TextureFormat,
        _: TextureFilter,
        _: &[u8],
    ) -> Result<u32> {
        let id = self.alloc();
        self.textures.insert(id);
        self.journal.push(Command::CreateTexture {
            id,
            dimensions,
            format,
        });

        Ok(id)
    }

    unsafe fn delete_texture(&mut self, id: u32) -> Result<()> {
        self.textures.remove(&id);
        self.journal.push(Command::DeleteTexture(id));
        Ok(())
    }

    unsafe fn create_stage(&mut self, stage: ShaderStage, source: &str) -> Result<u32> {
        let id = self.alloc();
        let log = Self::compile(stage, source);
        self.journal.push(Command::CompileStage {
            id,
            stage,
            compiled: log.is_none(),
        });

        self.stages.insert(id, log);
        Ok(id)
    }

    unsafe fn stage_log(&mut self, id: u32) -> Result<Option<String>> {
        self.stages
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::Backend(format!("shader stage {} does not exist.", id)))
    }

    unsafe fn delete_stage(&mut self, id: u32) -> Result<()> {
        self.stages.remove(&id);
        self.journal.push(Command::DeleteStage(id));
        Ok(())
    }

    unsafe fn link(&mut self, stages: &[u32]) -> Result<u32> {
        for id in stages {
            match self.stages.get(id) {
                Some(None) => {}
                Some(Some(_)) => {
                    return Err(Error::ShaderLink(format!("stage {} is not compiled.", id)));
                }
                None => return Err(Error::ShaderLink(format!("stage {} does not exist.", id))),
            }
        }

        let program = self.alloc();
        self.programs.insert(program);
        self.journal.push(Command::Link {
            program,
            stages: stages.to_vec(),
        });

        Ok(program)
    }

    unsafe fn delete_program(&mut self, id: u32) -> Result<()> {
        self.programs.remove(&id);
        self.journal.push(Command::DeleteProgram(id));
        Ok(())
    }

    unsafe fn program_uniform(
        &mut self,
        program: u32,
        location: u32,
        variable: &UniformVariable,
    ) -> Result<()> {
        if !self.programs.contains(&program) {
            return Err(Error::Backend(format!("program {} does not exist.", program)));
        }

        self.journal.push(Command::Uniform {
            program,
            location,
            variable: *variable,
        });

        Ok(())
    }

    unsafe fn bind_texture(&mut self, unit: u32, id: u32) -> Result<()> {
        if !self.textures.contains(&id) {
            return Err(Error::Backend(format!("texture {} does not exist.", id)));
        }

        self.journal.push(Command::BindTexture { unit, id });
        Ok(())
    }

    unsafe fn draw(&mut self, program: u32, vao: u32, len: u32) -> Result<()> {
        if !self.programs.contains(&program) {
            return Err(Error::Backend(format!("program {} does not exist.", program)));
        }

        match self.vaos.get(&vao) {
            Some(&size) if len <= size => {}
            Some(&size) => {
                return Err(Error::Backend(format!(
                    "drawing {} indices from vertex array {} of {}.",
                    len, vao, size
                )));
            }
            None => return Err(Error::Backend(format!("vertex array {} does not exist.", vao))),
        }

        self.journal.push(Command::Draw { program, vao, len });
        Ok(())
    }

    unsafe fn clear(&mut self, color: Color<f32>, depth: f32) -> Result<()> {
        self.journal.push(Command::Clear { color, depth });
        Ok(())
    }

    unsafe fn update_viewport(&mut self, dimensions: Vector2<u32>) -> Result<()> {
        self.journal.push(Command::Viewport(dimensions));
        Ok(())
    }
}

//! The vertex record shared by every geometry, and the layout that describes
//! it to the GPU.

use std::mem;

use bytemuck::{Pod, Zeroable};

/// One mesh vertex. The byte layout is fixed and mirrored by `Vertex::layout`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub normal: [f32; 4],
}

impl Vertex {
    pub fn new(position: [f32; 4], color: [f32; 4], uv: [f32; 2], normal: [f32; 4]) -> Self {
        Vertex {
            position,
            color,
            uv,
            normal,
        }
    }

    /// The number of bytes between two consecutive vertices.
    #[inline]
    pub fn stride() -> usize {
        mem::size_of::<Vertex>()
    }

    /// Describes the attributes of `Vertex` as bound at locations 0 to 3.
    pub fn layout() -> [VertexAttribute; 4] {
        [
            VertexAttribute::new(Attribute::Position, 4, mem::offset_of!(Vertex, position)),
            VertexAttribute::new(Attribute::Color, 4, mem::offset_of!(Vertex, color)),
            VertexAttribute::new(Attribute::Texcoord, 2, mem::offset_of!(Vertex, uv)),
            VertexAttribute::new(Attribute::Normal, 4, mem::offset_of!(Vertex, normal)),
        ]
    }
}

/// The attributes of a vertex, the discriminant is the shader input location.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position = 0,
    Color = 1,
    Texcoord = 2,
    Normal = 3,
}

/// Describes one float attribute inside the vertex record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: Attribute,
    /// Number of `f32` components.
    pub size: u8,
    /// Byte offset from the start of the vertex.
    pub offset: usize,
}

impl VertexAttribute {
    pub fn new(name: Attribute, size: u8, offset: usize) -> Self {
        VertexAttribute { name, size, offset }
    }

    #[inline]
    pub fn location(&self) -> u32 {
        self.name as u32
    }
}

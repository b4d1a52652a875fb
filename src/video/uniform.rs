//! Sets parameters on a specific program object.
//!
//! Every call names its target program explicitly (`glProgramUniform*`), the
//! program that happens to be in use is never touched. Slots are plain
//! integers which must match the `layout (location = N)` declared in the
//! shader source; `uniform_slots` and `verify_slots` are the load-time check
//! for that coupling.

use crate::errors::*;
use crate::math::prelude::{Matrix4, Vector2, Vector3, Vector4};

use super::shader::Shader;
use super::texture::Texture;
use super::Device;

/// The type of a uniform variable as declared in GLSL.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UniformVariableType {
    Texture,
    I32,
    F32,
    Vector2f,
    Vector3f,
    Vector4f,
    Matrix4f,
}

impl UniformVariableType {
    /// Parses the GLSL type name of a uniform declaration.
    pub fn from_glsl(name: &str) -> Option<Self> {
        match name {
            "sampler2D" => Some(UniformVariableType::Texture),
            "int" => Some(UniformVariableType::I32),
            "float" => Some(UniformVariableType::F32),
            "vec2" => Some(UniformVariableType::Vector2f),
            "vec3" => Some(UniformVariableType::Vector3f),
            "vec4" => Some(UniformVariableType::Vector4f),
            "mat4" => Some(UniformVariableType::Matrix4f),
            _ => None,
        }
    }
}

/// Uniform variable for program object. Each matrix based `UniformVariable`
/// is supplied in column major order with a optional transpose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformVariable {
    I32(i32),
    F32(f32),
    Vector2f([f32; 2]),
    Vector3f([f32; 3]),
    Vector4f([f32; 4]),
    Matrix4f([[f32; 4]; 4], bool),
}

impl UniformVariable {
    pub fn variable_type(&self) -> UniformVariableType {
        match *self {
            UniformVariable::I32(_) => UniformVariableType::I32,
            UniformVariable::F32(_) => UniformVariableType::F32,
            UniformVariable::Vector2f(_) => UniformVariableType::Vector2f,
            UniformVariable::Vector3f(_) => UniformVariableType::Vector3f,
            UniformVariable::Vector4f(_) => UniformVariableType::Vector4f,
            UniformVariable::Matrix4f(_, _) => UniformVariableType::Matrix4f,
        }
    }
}

impl From<i32> for UniformVariable {
    fn from(v: i32) -> Self {
        UniformVariable::I32(v)
    }
}

impl From<f32> for UniformVariable {
    fn from(v: f32) -> Self {
        UniformVariable::F32(v)
    }
}

impl From<Vector2<f32>> for UniformVariable {
    fn from(v: Vector2<f32>) -> Self {
        UniformVariable::Vector2f(v.into())
    }
}

impl From<Vector3<f32>> for UniformVariable {
    fn from(v: Vector3<f32>) -> Self {
        UniformVariable::Vector3f(v.into())
    }
}

impl From<[f32; 3]> for UniformVariable {
    fn from(v: [f32; 3]) -> Self {
        UniformVariable::Vector3f(v)
    }
}

impl From<Vector4<f32>> for UniformVariable {
    fn from(v: Vector4<f32>) -> Self {
        UniformVariable::Vector4f(v.into())
    }
}

impl From<Matrix4<f32>> for UniformVariable {
    fn from(v: Matrix4<f32>) -> Self {
        UniformVariable::Matrix4f(*v.as_ref(), false)
    }
}

/// Writes `value` into the slot `location` of `shader`.
pub fn set_uniform<T>(video: &mut Device, shader: &Shader, location: u32, value: T) -> Result<()>
where
    T: Into<UniformVariable>,
{
    if shader.is_null() {
        return Err(Error::NullHandle("shader"));
    }

    let variable = value.into();
    unsafe {
        video
            .visitor()
            .program_uniform(shader.program(), location, &variable)
    }
}

/// Binds `texture` to texture unit `unit`, and writes `unit` into the sampler
/// slot `location` of `shader`.
pub fn set_texture(
    video: &mut Device,
    shader: &Shader,
    location: u32,
    texture: &Texture,
    unit: u32,
) -> Result<()> {
    if shader.is_null() {
        return Err(Error::NullHandle("shader"));
    }

    if texture.is_null() {
        return Err(Error::NullHandle("texture"));
    }

    unsafe {
        let visitor = video.visitor();
        visitor.bind_texture(unit, texture.handle())?;
        visitor.program_uniform(shader.program(), location, &UniformVariable::I32(unit as i32))
    }
}

/// A `layout (location = N) uniform <type> <name>;` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    pub location: u32,
    pub tp: UniformVariableType,
    pub name: String,
}

/// Extracts the uniform declarations with explicit locations from GLSL source.
/// Declarations of unknown types or without a location are skipped.
pub fn uniform_slots(source: &str) -> Vec<UniformSlot> {
    let mut code = String::with_capacity(source.len());
    for c in strip_comments(source).chars() {
        match c {
            '(' | ')' | '=' | ',' => {
                code.push(' ');
                code.push(c);
                code.push(' ');
            }
            _ => code.push(c),
        }
    }

    code.split(|c| c == ';' || c == '{' || c == '}')
        .filter_map(|statement| parse_slot(&statement.split_whitespace().collect::<Vec<_>>()))
        .collect()
}

/// Replaces `//` and `/* */` comments with whitespace, keeping line breaks.
fn strip_comments(source: &str) -> String {
    let mut code = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        match (c, next) {
            ('/', Some('/')) => {
                while chars.peek().map_or(false, |&v| v != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();

                let mut last = ' ';
                for v in &mut chars {
                    if last == '*' && v == '/' {
                        break;
                    }

                    if v == '\n' {
                        code.push('\n');
                    }

                    last = v;
                }

                code.push(' ');
            }
            _ => code.push(c),
        }
    }

    code
}

fn parse_slot(tokens: &[&str]) -> Option<UniformSlot> {
    let start = tokens.iter().position(|&v| v == "layout")?;
    let tokens = &tokens[start + 1..];
    if tokens.first() != Some(&"(") {
        return None;
    }

    let close = tokens.iter().position(|&v| v == ")")?;
    let qualifiers = &tokens[1..close];

    let mut location = None;
    for (i, &v) in qualifiers.iter().enumerate() {
        if v == "location" && qualifiers.get(i + 1) == Some(&"=") {
            location = qualifiers.get(i + 2).and_then(|v| v.parse().ok());
        }
    }

    match &tokens[close + 1..] {
        ["uniform", tp, name] => Some(UniformSlot {
            location: location?,
            tp: UniformVariableType::from_glsl(tp)?,
            name: (*name).to_owned(),
        }),
        _ => None,
    }
}

/// Checks that every `(location, type)` pair in `expected` is declared in
/// `source` with the same type.
pub fn verify_slots(source: &str, expected: &[(u32, UniformVariableType)]) -> Result<()> {
    let slots = uniform_slots(source);
    for &(location, tp) in expected {
        let declared = slots.iter().any(|v| v.location == location && v.tp == tp);
        if !declared {
            return Err(Error::SlotMismatch(location, format!("{:?}", tp)));
        }
    }

    Ok(())
}

use std::path::PathBuf;

use glutin;
use serde_json;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Glutin: {}", _0)]
    Glutin(String),
    #[fail(display = "Backend: {}", _0)]
    Backend(String),
    #[fail(display = "OpenGL implementation doesn\'t support {}.", _0)]
    Requirement(String),
    #[fail(display = "A window context is already live in this process.")]
    ContextExists,
    #[fail(display = "Failed to open {:?}: {}.", _0, _1)]
    ResourceNotFound(PathBuf, String),
    #[fail(display = "Failed to decode {:?}: {}.", _0, _1)]
    Decode(PathBuf, String),
    #[fail(display = "Face {} has {} vertices, only triangles are supported.", _0, _1)]
    FaceArity(usize, u32),
    #[fail(display = "Channel count {} is out of range [1, 4].", _0)]
    ChannelCount(u32),
    #[fail(display = "Pixel data has {} bytes, {} are required.", _0, _1)]
    PixelDataMismatch(usize, usize),
    #[fail(display = "Index {} is out of bounds of {} vertices.", _0, _1)]
    IndexOutOfBounds(u32, usize),
    #[fail(display = "{} shader failed to compile: \n{}", _0, _1)]
    ShaderCompile(String, String),
    #[fail(display = "Failed to link shader program: \n{}", _0)]
    ShaderLink(String),
    #[fail(display = "Uniform slot {} is not declared as {}.", _0, _1)]
    SlotMismatch(u32, String),
    #[fail(display = "Trying to use a {} that has been freed.", _0)]
    NullHandle(&'static str),
    #[fail(display = "Config: {}", _0)]
    Config(String),
    #[fail(display = "IO: {}", _0)]
    Io(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<glutin::CreationError> for Error {
    fn from(err: glutin::CreationError) -> Error {
        Error::Glutin(format!("{}", err))
    }
}

impl From<glutin::ContextError> for Error {
    fn from(err: glutin::ContextError) -> Error {
        Error::Glutin(format!("{}", err))
    }
}

impl From<::std::io::Error> for Error {
    fn from(err: ::std::io::Error) -> Error {
        Error::Io(format!("{}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Config(format!("{}", err))
    }
}

pub mod capabilities;
pub mod types;
pub mod visitor;

use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr;

use gl;
use gl::types::*;

use crate::errors::*;
use crate::math::prelude::Color;

use self::capabilities::Capabilities;

/// Checks the requirements of the current context and sets the default render
/// state: back faces with counter-clockwise winding are culled, depth test
/// with `LEQUAL`, tightly packed pixel rows.
///
/// *Safety*: the GL function table must be loaded for the current context.
pub unsafe fn setup(clear_color: Color<f32>) -> Result<Capabilities> {
    let caps = Capabilities::parse()?;
    info!("[GL] Version: {:?} ({:?})", caps.version, caps.profile);
    info!("[GL] Renderer: {}", caps.renderer);
    info!("[GL] Vendor: {}", caps.vendor);
    info!("[GL] GLSL: {}", caps.shading_language);

    check_capabilities(&caps)?;

    if caps.has_debug_output() && gl::DebugMessageCallback::is_loaded() {
        gl::Enable(gl::DEBUG_OUTPUT);
        gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
        gl::DebugMessageCallback(Some(debug_message), ptr::null());
        gl::DebugMessageControl(
            gl::DONT_CARE,
            gl::DONT_CARE,
            gl::DONT_CARE,
            0,
            ptr::null(),
            gl::TRUE,
        );
    } else {
        warn!("[GL] Debug output is not available.");
    }

    gl::Enable(gl::CULL_FACE);
    gl::CullFace(gl::BACK);
    gl::FrontFace(gl::CCW);

    gl::Enable(gl::DEPTH_TEST);
    gl::DepthFunc(gl::LEQUAL);
    gl::DepthMask(gl::TRUE);

    gl::ClearColor(clear_color.r, clear_color.g, clear_color.b, clear_color.a);
    gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);

    check()?;
    Ok(caps)
}

fn check_capabilities(caps: &Capabilities) -> Result<()> {
    if !caps.has_vertex_array_object() {
        return Err(Error::Requirement("vertex array objects".to_owned()));
    }

    if !caps.has_program_uniform() || !gl::ProgramUniform1i::is_loaded() {
        return Err(Error::Requirement("glProgramUniform".to_owned()));
    }

    if !caps.has_explicit_uniform_location() {
        return Err(Error::Requirement("explicit uniform locations".to_owned()));
    }

    Ok(())
}

extern "system" fn debug_message(
    source: GLenum,
    tp: GLenum,
    id: GLuint,
    severity: GLenum,
    _: GLsizei,
    message: *const GLchar,
    _: *mut c_void,
) {
    if message.is_null() {
        return;
    }

    let message = unsafe { CStr::from_ptr(message) }.to_string_lossy();
    let level = match severity {
        gl::DEBUG_SEVERITY_HIGH => log::Level::Error,
        gl::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        gl::DEBUG_SEVERITY_LOW => log::Level::Info,
        _ => log::Level::Debug,
    };

    log!(
        level,
        "[GL] {} {} {}: {}",
        source_label(source),
        type_label(tp),
        id,
        message
    );
}

fn source_label(source: GLenum) -> &'static str {
    match source {
        gl::DEBUG_SOURCE_API => "API",
        gl::DEBUG_SOURCE_WINDOW_SYSTEM => "Window System",
        gl::DEBUG_SOURCE_SHADER_COMPILER => "Shader Compiler",
        gl::DEBUG_SOURCE_THIRD_PARTY => "Third Party",
        gl::DEBUG_SOURCE_APPLICATION => "Application",
        _ => "Other",
    }
}

fn type_label(tp: GLenum) -> &'static str {
    match tp {
        gl::DEBUG_TYPE_ERROR => "Error",
        gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated Behaviour",
        gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behaviour",
        gl::DEBUG_TYPE_PORTABILITY => "Portability",
        gl::DEBUG_TYPE_PERFORMANCE => "Performance",
        gl::DEBUG_TYPE_MARKER => "Marker",
        _ => "Other",
    }
}

pub(crate) unsafe fn check() -> Result<()> {
    let message = match gl::GetError() {
        gl::NO_ERROR => return Ok(()),
        gl::INVALID_ENUM => "An unacceptable value is specified for an enumerated argument.",
        gl::INVALID_VALUE => "A numeric argument is out of range.",
        gl::INVALID_OPERATION => "The specified operation is not allowed in the current state.",
        gl::INVALID_FRAMEBUFFER_OPERATION => {
            "The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        }
        gl::OUT_OF_MEMORY => "There is not enough memory left to execute the command.",
        _ => "Oops, Unknown OpenGL error.",
    };

    Err(Error::Backend(format!("[GL] {}", message)))
}

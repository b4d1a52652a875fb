use std::cmp;
use std::ffi;

use gl;
use gl::types::*;

use crate::errors::*;

/// Describes the OpenGL context profile.
#[derive(Debug, Copy, Clone)]
pub enum Profile {
    /// The context uses only future-compatible functions and definitions.
    Core,
    /// The context includes all immediate mode functions and definitions.
    Compatibility,
}

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        match (*self, *other) {
            (Version::GL(a, b), Version::GL(c, d)) | (Version::ES(a, b), Version::ES(c, d)) => {
                Some((a, b).cmp(&(c, d)))
            }
            _ => None,
        }
    }
}

impl Version {
    /// Obtains the OpenGL version of the current context using the loaded functions.
    ///
    /// # Unsafe
    ///
    /// You must ensure that the functions belong to the current context, otherwise you will get
    /// an undefined behavior.
    pub unsafe fn parse() -> Result<Version> {
        Self::from_desc(&parse_str(gl::VERSION)?)
    }

    /// Parses a `GL_VERSION` string, e.g. `4.6.0 NVIDIA 390.77` or `OpenGL ES 3.2 Mesa`.
    pub fn from_desc(desc: &str) -> Result<Version> {
        let malformed = || Error::Backend(format!("[GL] Version string {:?} is malformed.", desc));

        // `OpenGL ES 3.2 ...`, or `OpenGL ES-CM 1.1 ...` with a profile.
        let (es, numbers) = match desc.strip_prefix("OpenGL ES") {
            Some(rest) => (true, rest.split_once(' ').map_or("", |v| v.1)),
            None => (false, desc),
        };

        let mut iter = numbers
            .split(' ')
            .next()
            .ok_or_else(malformed)?
            .split('.');

        let major = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;

        let minor = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;

        if es {
            Ok(Version::ES(major, minor))
        } else {
            Ok(Version::GL(major, minor))
        }
    }
}

macro_rules! extensions {
    ($($string:expr => $field:ident,)+) => {
        /// Contains data about the list of extensions.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct Extensions {
            $(
                pub $field: bool,
            )+
        }

        impl Extensions {
            /// Returns the list of extensions supported by the current context.
            ///
            /// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
            pub unsafe fn parse() -> Result<Extensions> {
                let mut num_extensions = 0;
                gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num_extensions);

                let mut extensions = Extensions::default();
                for i in 0..num_extensions {
                    let ext = gl::GetStringi(gl::EXTENSIONS, i as GLuint);
                    if ext.is_null() {
                        continue;
                    }

                    match ffi::CStr::from_ptr(ext as *const _).to_str() {
                        $(
                            Ok($string) => extensions.$field = true,
                        )+
                        _ => ()
                    }
                }

                Ok(extensions)
            }
        }
    }
}

extensions! {
    "GL_KHR_debug" => gl_khr_debug,
    "GL_ARB_separate_shader_objects" => gl_arb_separate_shader_objects,
    "GL_ARB_explicit_uniform_location" => gl_arb_explicit_uniform_location,
    "GL_ARB_vertex_array_object" => gl_arb_vertex_array_object,
}

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug)]
pub struct Capabilities {
    pub version: Version,
    /// The company responsible for this GL implementation.
    pub vendor: String,
    /// The name of the renderer. This name is typically specific to a particular
    /// configuration of a hardware platform.
    pub renderer: String,
    pub shading_language: String,
    pub extensions: Extensions,
    /// The context profile is available from OpenGL 3.2 onwards. `None` if not supported.
    pub profile: Option<Profile>,
    /// Maximum number of textures that can be bound to a program.
    ///
    /// `glActiveTexture` must be between `GL_TEXTURE0` and `GL_TEXTURE0` + this value - 1.
    pub max_combined_texture_image_units: u32,
}

impl Capabilities {
    pub unsafe fn parse() -> Result<Capabilities> {
        let version = Version::parse()?;
        let extensions = Extensions::parse()?;

        let mut units = 0;
        gl::GetIntegerv(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, &mut units);

        Ok(Capabilities {
            version,
            vendor: parse_str(gl::VENDOR)?,
            renderer: parse_str(gl::RENDERER)?,
            shading_language: parse_str(gl::SHADING_LANGUAGE_VERSION)?,
            extensions,
            profile: Self::parse_profile(version),
            max_combined_texture_image_units: units as u32,
        })
    }

    /// Whether `glProgramUniform*` is available.
    pub fn has_program_uniform(&self) -> bool {
        self.version >= Version::GL(4, 1) || self.extensions.gl_arb_separate_shader_objects
    }

    /// Whether uniforms can declare `layout (location = N)`.
    pub fn has_explicit_uniform_location(&self) -> bool {
        self.version >= Version::GL(4, 3) || self.extensions.gl_arb_explicit_uniform_location
    }

    pub fn has_vertex_array_object(&self) -> bool {
        self.version >= Version::GL(3, 0) || self.extensions.gl_arb_vertex_array_object
    }

    pub fn has_debug_output(&self) -> bool {
        self.version >= Version::GL(4, 3) || self.extensions.gl_khr_debug
    }

    unsafe fn parse_profile(version: Version) -> Option<Profile> {
        if version >= Version::GL(3, 2) {
            let mut val = 0;
            gl::GetIntegerv(gl::CONTEXT_PROFILE_MASK, &mut val);
            let val = val as GLenum;
            if (val & gl::CONTEXT_COMPATIBILITY_PROFILE_BIT) != 0 {
                Some(Profile::Compatibility)
            } else if (val & gl::CONTEXT_CORE_PROFILE_BIT) != 0 {
                Some(Profile::Core)
            } else {
                None
            }
        } else {
            None
        }
    }
}

unsafe fn parse_str(id: GLenum) -> Result<String> {
    let s = gl::GetString(id);
    if s.is_null() {
        return Err(Error::Backend(format!("[GL] String of {} is null.", id)));
    }

    ffi::CStr::from_ptr(s as *const _)
        .to_str()
        .map(|v| v.to_owned())
        .map_err(|_| Error::Backend(format!("[GL] String of {} is malformed.", id)))
}

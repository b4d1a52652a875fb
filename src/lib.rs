//! A minimal forward renderer built on top of OpenGL.
//!
//! A `Context` owns the window and its GL context, a `Device` is the explicit
//! capability every GPU operation goes through. Geometry, textures and shaders
//! are plain values created by free functions in `video`, and released either
//! by hand or by a `VideoGuard` scope.
//!
//! ```rust,ignore
//! let params = Params::default();
//! let ctx = Context::init(params)?;
//! let mut video = Device::new(&ctx)?;
//!
//! while !ctx.should_close() {
//!     ctx.tick()?;
//!     ctx.clear(&mut video)?;
//!     video::draw(&mut video, &shader, &geometry)?;
//! }
//! ```

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

pub mod errors;
pub mod math;
pub mod video;
pub mod window;

mod params;
pub use self::params::Params;

pub mod prelude {
    pub use crate::errors::{Error, Result};
    pub use crate::math::prelude::*;
    pub use crate::params::Params;
    pub use crate::video::prelude::*;
    pub use crate::window::{Context, WindowParams};
}

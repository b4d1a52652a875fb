//! Functions for loading renderer settings.

use std::fs;
use std::path::Path;

use crate::errors::*;
use crate::math::Color;
use crate::window::WindowParams;

/// A structure containing configuration data for the renderer, which are
/// used to specify hardware setup stuff to create the window and the
/// default render state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub window: WindowParams,
    /// The color used when clearing the back buffer.
    pub clear_color: Color<f32>,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            window: WindowParams::default(),
            clear_color: Color::charcoal(),
        }
    }
}

impl Params {
    /// Loads parameters from a JSON file. Missing fields fall back to their
    /// defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| Error::ResourceNotFound(path.to_owned(), format!("{}", err)))?;

        let params = serde_json::from_str(&text)?;
        info!("Loads params from {:?}.", path);
        Ok(params)
    }
}

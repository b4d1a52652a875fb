//! Linked program objects built from a vertex and a fragment stage.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::*;

use super::Device;

/// The programmable stages of the pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Fragment => "Fragment",
        }
    }
}

/// A linked program. The zero program is the freed state.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Shader {
    program: u32,
}

impl Shader {
    #[inline]
    pub fn program(&self) -> u32 {
        self.program
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.program == 0
    }
}

/// Compiles both stages, links them into a program and deletes the stage
/// objects, whether linking succeeds or not.
pub fn make_shader(video: &mut Device, vs: &str, fs: &str) -> Result<Shader> {
    let visitor = video.visitor();

    let vs_id = unsafe { visitor.create_stage(ShaderStage::Vertex, vs)? };
    let fs_id = match unsafe { visitor.create_stage(ShaderStage::Fragment, fs) } {
        Ok(id) => id,
        Err(err) => {
            if let Err(v) = unsafe { visitor.delete_stage(vs_id) } {
                warn!("[Shader] failed to delete stage {}: {}", vs_id, v);
            }

            return Err(err);
        }
    };

    let linked = link(video, vs_id, fs_id);

    for &id in &[vs_id, fs_id] {
        if let Err(err) = unsafe { video.visitor().delete_stage(id) } {
            warn!("[Shader] failed to delete stage {}: {}", id, err);
        }
    }

    let program = linked?;
    debug!("[Shader] creates program {}.", program);
    Ok(Shader { program })
}

/// Reads both stages from text files and builds a program with `make_shader`.
pub fn load_shader<P1, P2>(video: &mut Device, vs: P1, fs: P2) -> Result<Shader>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let vs = read_source(vs.as_ref())?;
    let fs = read_source(fs.as_ref())?;
    make_shader(video, &vs, &fs)
}

/// Deletes the program and resets `shader` to the freed state. Freeing twice
/// is a no-op.
pub fn free_shader(video: &mut Device, shader: &mut Shader) -> Result<()> {
    if shader.is_null() {
        return Ok(());
    }

    unsafe { video.visitor().delete_program(shader.program)? };
    debug!("[Shader] deletes program {}.", shader.program);

    *shader = Shader::default();
    Ok(())
}

/// Returns whether the stage object `handle` compiled, logging the compiler
/// messages tagged with `label` if it did not.
pub fn check_shader(video: &mut Device, handle: u32, label: &str) -> bool {
    match unsafe { video.visitor().stage_log(handle) } {
        Ok(None) => true,
        Ok(Some(log)) => {
            error!("[ERROR] {} Shader \n {}", label, log);
            false
        }
        Err(err) => {
            error!("[ERROR] {} Shader \n {}", label, err);
            false
        }
    }
}

fn link(video: &mut Device, vs: u32, fs: u32) -> Result<u32> {
    for &(handle, stage) in &[(vs, ShaderStage::Vertex), (fs, ShaderStage::Fragment)] {
        if !check_shader(video, handle, stage.label()) {
            let log = unsafe { video.visitor().stage_log(handle)? };
            return Err(Error::ShaderCompile(
                stage.label().to_owned(),
                log.unwrap_or_default(),
            ));
        }
    }

    unsafe { video.visitor().link(&[vs, fs]) }
}

fn read_source(path: &Path) -> Result<String> {
    let file = File::open(path)
        .map_err(|err| Error::ResourceNotFound(path.to_owned(), format!("{}", err)))?;

    let mut source = String::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|err| Error::Decode(path.to_owned(), format!("{}", err)))?;
        source.push_str(&line);
        source.push('\n');
    }

    Ok(source)
}

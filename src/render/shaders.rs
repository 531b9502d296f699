use std::path::Path;

use crate::foundation::error::{HalftoneError, HalftoneResult};

/// Vertex program file name.
pub const VERTEX_FILE: &str = "halftone.vs.glsl";
/// Vertex program file name for dark-on-top compositors.
pub const INVERTED_VERTEX_FILE: &str = "halftone-inverted.vs.glsl";
/// Fragment program file name.
pub const FRAGMENT_FILE: &str = "halftone.fs.glsl";

const BUILTIN_VERTEX: &str = include_str!("../../shaders/halftone.vs.glsl");
const BUILTIN_INVERTED_VERTEX: &str = include_str!("../../shaders/halftone-inverted.vs.glsl");
const BUILTIN_FRAGMENT: &str = include_str!("../../shaders/halftone.fs.glsl");

/// Pipeline stage a source compiles for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-point program.
    Vertex,
    /// Per-fragment program.
    Fragment,
}

/// GLSL source text tagged with its stage and origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    /// File name (or built-in name) for diagnostics.
    pub name: String,
    /// Target stage.
    pub stage: ShaderStage,
    /// GLSL text.
    pub source: String,
}

impl ShaderSource {
    /// Wrap source text.
    pub fn new(name: impl Into<String>, stage: ShaderStage, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage,
            source: source.into(),
        }
    }

    /// `true` when the source declares `#define <name>`.
    pub fn defines(&self, name: &str) -> bool {
        self.source.lines().any(|line| {
            let mut parts = line.split_whitespace();
            parts.next() == Some("#define") && parts.next() == Some(name)
        })
    }
}

/// Vertex and fragment sources for one halftone program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HalftoneShaders {
    /// Vertex program (standard or inverted).
    pub vertex: ShaderSource,
    /// Fragment program.
    pub fragment: ShaderSource,
}

impl HalftoneShaders {
    /// Sources embedded in the crate.
    pub fn builtin(inverted: bool) -> Self {
        let (name, vertex) = if inverted {
            (INVERTED_VERTEX_FILE, BUILTIN_INVERTED_VERTEX)
        } else {
            (VERTEX_FILE, BUILTIN_VERTEX)
        };
        Self {
            vertex: ShaderSource::new(name, ShaderStage::Vertex, vertex),
            fragment: ShaderSource::new(FRAGMENT_FILE, ShaderStage::Fragment, BUILTIN_FRAGMENT),
        }
    }

    /// Read the same file names from `dir`.
    pub fn load_dir(dir: &Path, inverted: bool) -> HalftoneResult<Self> {
        let vertex_file = if inverted {
            INVERTED_VERTEX_FILE
        } else {
            VERTEX_FILE
        };
        Ok(Self {
            vertex: read_source(dir, vertex_file, ShaderStage::Vertex)?,
            fragment: read_source(dir, FRAGMENT_FILE, ShaderStage::Fragment)?,
        })
    }
}

fn read_source(dir: &Path, file: &str, stage: ShaderStage) -> HalftoneResult<ShaderSource> {
    let path = dir.join(file);
    let source = std::fs::read_to_string(&path).map_err(|e| {
        HalftoneError::shader(format!("failed to load '{}': {e}", path.display()))
    })?;
    Ok(ShaderSource::new(file, stage, source))
}

#[cfg(test)]
#[path = "../../tests/unit/render/shaders.rs"]
mod tests;

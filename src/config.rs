use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Color,
    error::{HalftoneError, HalftoneResult},
};
use crate::palette::{DEFAULT_LAYER_COLORS, DEFAULT_LAYER_OVERLAP, Palette};

/// Largest dot at full coverage, in pixels; also the lattice row pitch.
pub const DEFAULT_DOT_SIZE: f32 = 16.0;

/// Layer colors and how much neighbouring luminosity bands overlap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// One color per layer, darkest band first.
    #[serde(default = "default_colors")]
    pub colors: Vec<Color>,
    /// Shared fraction of each band, in `[0, 1)`.
    #[serde(default = "default_overlap")]
    pub overlap: f64,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            overlap: default_overlap(),
        }
    }
}

fn default_colors() -> Vec<Color> {
    DEFAULT_LAYER_COLORS.to_vec()
}

fn default_overlap() -> f64 {
    DEFAULT_LAYER_OVERLAP
}

/// Per-compositor construction options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositorOptions {
    /// Source image requested at construction.
    #[serde(default)]
    pub image: Option<PathBuf>,
    /// Draw the darkest layer on top, using the inverted vertex program.
    #[serde(default)]
    pub dark_top: bool,
    /// Dot size at full coverage and lattice pitch.
    #[serde(default = "default_dot_size")]
    pub dot_size: f32,
    /// Directory to read shader sources from instead of the built-ins.
    #[serde(default)]
    pub shader_dir: Option<PathBuf>,
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self {
            image: None,
            dark_top: false,
            dot_size: default_dot_size(),
            shader_dir: None,
        }
    }
}

fn default_dot_size() -> f32 {
    DEFAULT_DOT_SIZE
}

impl CompositorOptions {
    /// Reject unusable dot sizes.
    pub fn validate(&self) -> HalftoneResult<()> {
        if !self.dot_size.is_finite() || self.dot_size <= 0.0 {
            return Err(HalftoneError::validation(format!(
                "dot_size must be finite and > 0, got {}",
                self.dot_size
            )));
        }
        Ok(())
    }
}

/// JSON-facing configuration: a palette plus compositor options.
///
/// ```json
/// { "palette": { "colors": ["#014c51", "#02787f"], "overlap": 0.05 },
///   "image": "hero.png", "dark_top": false, "dot_size": 16 }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HalftoneConfig {
    /// Palette section.
    #[serde(default)]
    pub palette: PaletteConfig,
    /// Compositor options, stored at the top level.
    #[serde(flatten)]
    pub options: CompositorOptions,
}

impl HalftoneConfig {
    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> HalftoneResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| HalftoneError::validation(format!("parse halftone config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> HalftoneResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> HalftoneResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            HalftoneError::validation(format!("open halftone config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check options and palette without building sprites.
    pub fn validate(&self) -> HalftoneResult<()> {
        self.options.validate()?;
        if self.palette.colors.is_empty() {
            return Err(HalftoneError::validation(
                "palette needs at least one layer color",
            ));
        }
        let o = self.palette.overlap;
        if !o.is_finite() || !(0.0..1.0).contains(&o) {
            return Err(HalftoneError::validation(format!(
                "layer overlap must be in [0, 1), got {o}"
            )));
        }
        Ok(())
    }

    /// Build the configured palette.
    pub fn build_palette(&self) -> HalftoneResult<Palette> {
        Palette::from_config(&self.palette)
    }

    /// Serialize back to pretty JSON.
    pub fn to_json_string(&self) -> HalftoneResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HalftoneError::validation(format!("serialize halftone config: {e}")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

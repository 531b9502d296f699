use std::sync::Arc;

use vello_cpu::kurbo::Shape;

use crate::config::PaletteConfig;
use crate::foundation::{
    core::Color,
    error::{HalftoneError, HalftoneResult},
    raster::Raster,
};

/// Side of every layer sprite, in pixels.
pub const SPRITE_SIZE: u16 = 64;

/// Fraction of each layer's luminosity depth shared with its neighbour.
pub const DEFAULT_LAYER_OVERLAP: f64 = 0.05;

/// Layer colors used when none are configured, darkest first.
pub const DEFAULT_LAYER_COLORS: [Color; 2] = [
    Color::rgb(0x01, 0x4c, 0x51),
    Color::rgb(0x02, 0x78, 0x7f),
];

/// Luminosity interval one layer renders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthRange {
    /// Dark end.
    pub low: f64,
    /// Light end.
    pub high: f64,
}

impl DepthRange {
    /// Width of the interval.
    pub fn span(self) -> f64 {
        self.high - self.low
    }

    /// `[low, high]` as a `vec2` uniform.
    pub fn as_uniform(self) -> [f32; 2] {
        [self.low as f32, self.high as f32]
    }
}

/// One palette entry: color, its dot sprite and the luminosity band it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    /// Dot color.
    pub color: Color,
    /// 64x64 filled circle in `color` on transparent.
    pub sprite: Arc<Raster>,
    /// Luminosity band.
    pub depth: DepthRange,
}

/// Ordered set of halftone layers derived from a color list.
///
/// Cloning is cheap; every compositor built from one palette shares its
/// sprites.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    layers: Arc<[LayerSpec]>,
    overlap: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self::build(&DEFAULT_LAYER_COLORS, DEFAULT_LAYER_OVERLAP)
    }
}

impl Palette {
    /// Build a palette, one layer per color (darkest band first).
    ///
    /// `overlap` must lie in `[0, 1)`.
    pub fn new(colors: &[Color], overlap: f64) -> HalftoneResult<Self> {
        if colors.is_empty() {
            return Err(HalftoneError::validation(
                "palette needs at least one layer color",
            ));
        }
        if !overlap.is_finite() || !(0.0..1.0).contains(&overlap) {
            return Err(HalftoneError::validation(format!(
                "layer overlap must be in [0, 1), got {overlap}"
            )));
        }
        Ok(Self::build(colors, overlap))
    }

    /// Build from a parsed [`PaletteConfig`].
    pub fn from_config(cfg: &PaletteConfig) -> HalftoneResult<Self> {
        Self::new(&cfg.colors, cfg.overlap)
    }

    fn build(colors: &[Color], overlap: f64) -> Self {
        let layers = colors
            .iter()
            .zip(depth_ranges(colors.len(), overlap))
            .map(|(&color, depth)| LayerSpec {
                color,
                sprite: Arc::new(rasterize_sprite(color)),
                depth,
            })
            .collect::<Vec<_>>();
        Self {
            layers: layers.into(),
            overlap,
        }
    }

    /// Layers, darkest band first.
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false` for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Overlap fraction the palette was built with.
    pub fn overlap(&self) -> f64 {
        self.overlap
    }

    /// Unshared depth each layer would get: `1 / (n - (n-1) * overlap)`.
    pub fn nominal_depth(&self) -> f64 {
        nominal_depth(self.layers.len(), self.overlap)
    }
}

fn nominal_depth(n: usize, overlap: f64) -> f64 {
    let n = n as f64;
    1.0 / (n - (n - 1.0) * overlap)
}

/// Partition `[0, 1]` into `n` bands whose neighbours share `overlap` of a band.
pub fn depth_ranges(n: usize, overlap: f64) -> Vec<DepthRange> {
    if n == 0 {
        return Vec::new();
    }
    let depth = nominal_depth(n, overlap);
    let mut out = Vec::with_capacity(n);
    let mut dark = 0.0;
    for _ in 0..n {
        let light = dark + depth;
        out.push(DepthRange {
            low: dark,
            high: light,
        });
        dark = light - overlap * depth;
    }
    out
}

/// Anti-aliased filled circle inscribed in a [`SPRITE_SIZE`] square.
pub fn rasterize_sprite(color: Color) -> Raster {
    let side = f64::from(SPRITE_SIZE);
    let radius = side / 2.0;

    let mut ctx = vello_cpu::RenderContext::new(SPRITE_SIZE, SPRITE_SIZE);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    let circle = vello_cpu::kurbo::Circle::new((radius, radius), radius);
    ctx.fill_path(&circle.to_path(0.1));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(SPRITE_SIZE, SPRITE_SIZE);
    ctx.render_to_pixmap(&mut pixmap);
    Raster::from_pixmap(&pixmap)
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;

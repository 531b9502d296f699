//! Layered halftone stylization of images.
//!
//! A [`Compositor`] turns a source image into stacked layers of dots. Each
//! layer of a [`Palette`] owns a color and a band of luminosity; a brick-offset
//! [`PointField`] places one dot per lattice point, and every dot grows with
//! how far the image luminance at its position reaches into the layer's band.
//! A diagonal [`FadeMask`] scales all dot sizes, and animating its two stops
//! reveals or conceals the halftone.
//!
//! Rendering goes through the [`RenderDevice`] trait. [`CpuDevice`] runs the
//! point program in software so the whole pipeline works headless.
//!
//! ```no_run
//! use std::time::{Duration, Instant};
//! use halftone::{Compositor, CompositorOptions, CpuDevice, Palette, Panel, Resolution};
//!
//! # fn main() -> halftone::HalftoneResult<()> {
//! let palette = Palette::default();
//! let mut panel = Panel::new(Resolution::new(800, 600));
//! let mut ht = Compositor::new(CpuDevice::default(), CompositorOptions::default(), &palette)?;
//! ht.append_to(&mut panel).set_image("hero.jpg");
//! ht.set_size(None, None)?;
//! ht.wait_for_image(Duration::from_secs(5))?;
//! ht.anim_in(Duration::from_millis(1200))?;
//! while ht.is_animating() {
//!     ht.on_animation_frame(Instant::now())?;
//! }
//! let frame = ht.device().target();
//! # let _ = frame;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod animation;
mod assets;
mod compositor;
mod config;
mod field;
mod foundation;
mod layer;
mod mask;
mod mount;
mod palette;
mod render;

pub use animation::{
    anim::{Keyframe, Keyframes, Lerp},
    ease::Ease,
    run::{AnimationGeneration, AnimationRun, FadeCurves, FadeOffsets},
};
pub use assets::{
    decode::{decode_image, load_image_file, parse_svg, rasterize_svg},
    fit::{cover_fit, cover_scale, cover_transform},
    loader::{ImageEvent, ImageLoader, ImageRequest},
};
pub use compositor::{
    Compositor, ImageStatus,
    lifecycle::{LifecycleEvent, Stage},
};
pub use config::{CompositorOptions, DEFAULT_DOT_SIZE, HalftoneConfig, PaletteConfig};
pub use field::{MAX_FIELD_POINTS, PointField};
pub use foundation::{
    core::{Affine, Color, Point, Resolution, Vec2},
    error::{HalftoneError, HalftoneResult},
    raster::Raster,
};
pub use layer::{Layer, LayerFrame, MIN_DOT_SIZE};
pub use mask::{FadeGradient, FadeMask, GradientStop, cutoff_color};
pub use mount::{Container, Panel, SurfaceId};
pub use palette::{
    DEFAULT_LAYER_COLORS, DEFAULT_LAYER_OVERLAP, DepthRange, LayerSpec, Palette, SPRITE_SIZE,
    depth_ranges, rasterize_sprite,
};
pub use render::{
    cpu::{CpuDevice, DrawRecord, RenderSettings},
    device::{AttributeSlot, BufferId, ProgramId, RenderDevice, TextureId, TextureUnit, Uniform},
    shaders::{
        FRAGMENT_FILE, HalftoneShaders, INVERTED_VERTEX_FILE, ShaderSource, ShaderStage,
        VERTEX_FILE,
    },
};

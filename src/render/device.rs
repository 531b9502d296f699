use crate::foundation::{core::Resolution, error::HalftoneResult, raster::Raster};
use crate::render::shaders::ShaderSource;

/// Device texture handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Device vertex buffer handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// Linked program handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// Texture units used by the halftone program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureUnit {
    /// Per-layer dot sprite.
    Sprite,
    /// Cover-fitted source image.
    Image,
    /// Fade mask.
    Mask,
}

impl TextureUnit {
    /// Every unit, in index order.
    pub const ALL: [TextureUnit; 3] = [Self::Sprite, Self::Image, Self::Mask];

    /// Hardware unit index.
    pub fn index(self) -> usize {
        match self {
            Self::Sprite => 0,
            Self::Image => 1,
            Self::Mask => 2,
        }
    }
}

/// Vertex attribute slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeSlot {
    /// `aPosition`, pixel-space `vec2`.
    Position,
}

/// Uniform writes understood by the halftone program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
    /// `uResolution`: viewport size in pixels.
    Resolution([f32; 2]),
    /// `uMinSize`: point size at zero coverage.
    MinSize(f32),
    /// `uMaxSize`: point size at full coverage.
    MaxSize(f32),
    /// `uDepths`: luminosity band `[low, high]`.
    Depths([f32; 2]),
    /// `uImage`: unit the source image sampler reads.
    Image(TextureUnit),
    /// `uPointSprite`: unit the sprite sampler reads.
    PointSprite(TextureUnit),
    /// `uMask`: unit the mask sampler reads.
    Mask(TextureUnit),
}

/// Rendering context the compositor drives.
///
/// Mirrors the small slice of a GL-style API the halftone pipeline needs:
/// one program, a handful of textures, a shared vertex buffer and point
/// draws onto a single 2D target.
pub trait RenderDevice {
    /// Acquire (or confirm) the underlying context.
    fn ensure_context(&mut self) -> HalftoneResult<()>;

    /// Resize the render target.
    fn set_viewport(&mut self, resolution: Resolution) -> HalftoneResult<()>;

    /// Clear the render target to the device clear color.
    fn clear(&mut self) -> HalftoneResult<()>;

    /// Compile and link a program from a vertex and a fragment source.
    fn compile_program(
        &mut self,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> HalftoneResult<ProgramId>;

    /// Make `program` current for uniforms and draws.
    fn use_program(&mut self, program: ProgramId) -> HalftoneResult<()>;

    /// Allocate an empty texture.
    fn create_texture(&mut self) -> HalftoneResult<TextureId>;

    /// Replace the texture's content.
    fn upload_texture(&mut self, texture: TextureId, raster: &Raster) -> HalftoneResult<()>;

    /// Bind a texture to a unit.
    fn bind_texture(&mut self, texture: TextureId, unit: TextureUnit) -> HalftoneResult<()>;

    /// Allocate an empty vertex buffer.
    fn create_vertex_buffer(&mut self) -> HalftoneResult<BufferId>;

    /// Replace the buffer's interleaved `x, y` data.
    fn upload_vertices(&mut self, buffer: BufferId, coords: &[f32]) -> HalftoneResult<()>;

    /// Bind a buffer to a vertex attribute.
    fn bind_vertex_buffer(&mut self, buffer: BufferId, attribute: AttributeSlot)
    -> HalftoneResult<()>;

    /// Write one uniform of the current program.
    fn set_uniform(&mut self, uniform: Uniform) -> HalftoneResult<()>;

    /// Draw the first `count` points of the bound vertex buffer.
    fn draw_points(&mut self, count: usize) -> HalftoneResult<()>;

    /// Copy the render target back.
    fn read_pixels(&self) -> HalftoneResult<Raster>;
}

impl<D: RenderDevice + ?Sized> RenderDevice for Box<D> {
    fn ensure_context(&mut self) -> HalftoneResult<()> {
        (**self).ensure_context()
    }

    fn set_viewport(&mut self, resolution: Resolution) -> HalftoneResult<()> {
        (**self).set_viewport(resolution)
    }

    fn clear(&mut self) -> HalftoneResult<()> {
        (**self).clear()
    }

    fn compile_program(
        &mut self,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> HalftoneResult<ProgramId> {
        (**self).compile_program(vertex, fragment)
    }

    fn use_program(&mut self, program: ProgramId) -> HalftoneResult<()> {
        (**self).use_program(program)
    }

    fn create_texture(&mut self) -> HalftoneResult<TextureId> {
        (**self).create_texture()
    }

    fn upload_texture(&mut self, texture: TextureId, raster: &Raster) -> HalftoneResult<()> {
        (**self).upload_texture(texture, raster)
    }

    fn bind_texture(&mut self, texture: TextureId, unit: TextureUnit) -> HalftoneResult<()> {
        (**self).bind_texture(texture, unit)
    }

    fn create_vertex_buffer(&mut self) -> HalftoneResult<BufferId> {
        (**self).create_vertex_buffer()
    }

    fn upload_vertices(&mut self, buffer: BufferId, coords: &[f32]) -> HalftoneResult<()> {
        (**self).upload_vertices(buffer, coords)
    }

    fn bind_vertex_buffer(
        &mut self,
        buffer: BufferId,
        attribute: AttributeSlot,
    ) -> HalftoneResult<()> {
        (**self).bind_vertex_buffer(buffer, attribute)
    }

    fn set_uniform(&mut self, uniform: Uniform) -> HalftoneResult<()> {
        (**self).set_uniform(uniform)
    }

    fn draw_points(&mut self, count: usize) -> HalftoneResult<()> {
        (**self).draw_points(count)
    }

    fn read_pixels(&self) -> HalftoneResult<Raster> {
        (**self).read_pixels()
    }
}

use crate::foundation::{core::Resolution, error::HalftoneResult};
use crate::palette::LayerSpec;
use crate::render::device::{RenderDevice, TextureId, TextureUnit, Uniform};

/// Point size at zero coverage.
pub const MIN_DOT_SIZE: f32 = 0.0;

/// Per-frame values shared by every layer draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerFrame {
    /// Viewport size.
    pub resolution: Resolution,
    /// Point size at full coverage.
    pub dot_size: f32,
    /// Points in the shared vertex buffer.
    pub point_count: usize,
}

/// One palette entry resident on a device.
#[derive(Clone, Debug)]
pub struct Layer {
    index: usize,
    spec: LayerSpec,
    sprite: TextureId,
}

impl Layer {
    /// Upload the entry's sprite.
    pub fn new<D: RenderDevice + ?Sized>(
        device: &mut D,
        index: usize,
        spec: LayerSpec,
    ) -> HalftoneResult<Self> {
        let sprite = device.create_texture()?;
        device.upload_texture(sprite, &spec.sprite)?;
        Ok(Self {
            index,
            spec,
            sprite,
        })
    }

    /// Position in the palette.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Palette entry.
    pub fn spec(&self) -> &LayerSpec {
        &self.spec
    }

    /// Sprite texture on the device.
    pub fn sprite(&self) -> TextureId {
        self.sprite
    }

    /// Issue this layer's point draw with the current program.
    ///
    /// `image`, when given, is bound to the image unit first; otherwise the
    /// existing binding is used, so one bind can serve every layer.
    pub fn draw<D: RenderDevice + ?Sized>(
        &self,
        device: &mut D,
        frame: &LayerFrame,
        image: Option<TextureId>,
    ) -> HalftoneResult<()> {
        if let Some(image) = image {
            device.bind_texture(image, TextureUnit::Image)?;
            device.set_uniform(Uniform::Image(TextureUnit::Image))?;
        }

        device.set_uniform(Uniform::Resolution(frame.resolution.as_uniform()))?;
        device.set_uniform(Uniform::MinSize(MIN_DOT_SIZE))?;
        device.set_uniform(Uniform::MaxSize(frame.dot_size))?;
        device.set_uniform(Uniform::Depths(self.spec.depth.as_uniform()))?;

        device.bind_texture(self.sprite, TextureUnit::Sprite)?;
        device.set_uniform(Uniform::PointSprite(TextureUnit::Sprite))?;

        device.draw_points(frame.point_count)
    }
}

#[cfg(test)]
#[path = "../tests/unit/layer.rs"]
mod tests;

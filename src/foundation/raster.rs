use std::sync::Arc;

use crate::foundation::core::{Color, Resolution};
use crate::foundation::error::{HalftoneError, HalftoneResult};

/// Premultiplied RGBA8 pixels, row-major, tightly packed.
///
/// Rasters back every texture the compositor touches: layer sprites, the fade
/// mask, the fitted source image and device read-back.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Fully transparent raster.
    pub fn new(resolution: Resolution) -> Self {
        Self::filled(resolution, [0, 0, 0, 0])
    }

    /// Raster with every pixel set to `rgba_premul`.
    pub fn filled(resolution: Resolution, rgba_premul: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(resolution.area() * 4);
        for _ in 0..resolution.area() {
            data.extend_from_slice(&rgba_premul);
        }
        Self {
            width: resolution.width,
            height: resolution.height,
            data,
        }
    }

    /// Raster with every pixel set to a straight color.
    pub fn solid(resolution: Resolution, color: Color) -> Self {
        Self::filled(resolution, color.premultiplied())
    }

    /// Wrap premultiplied bytes, checking the length against the dimensions.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> HalftoneResult<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(HalftoneError::validation(format!(
                "raster byte length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Resolution`].
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// `true` when the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw premultiplied bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Overwrite every pixel.
    pub fn fill(&mut self, rgba_premul: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba_premul);
        }
    }

    /// Reallocate to `resolution`; like resizing a canvas, the content is cleared.
    pub fn resize(&mut self, resolution: Resolution) {
        *self = Self::new(resolution);
    }

    /// Nearest-neighbour sample at a pixel-space position, clamped to the edge.
    pub fn sample_nearest(&self, x: f32, y: f32) -> [u8; 4] {
        if self.is_empty() {
            return [0, 0, 0, 0];
        }
        let clamp_axis = |v: f32, len: u32| -> u32 {
            if !v.is_finite() || v <= 0.0 {
                return 0;
            }
            (v.floor() as u32).min(len - 1)
        };
        let sx = clamp_axis(x, self.width);
        let sy = clamp_axis(y, self.height);
        let idx = (sy as usize * self.width as usize + sx as usize) * 4;
        let px = &self.data[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }

    pub(crate) fn to_pixmap(&self) -> HalftoneResult<vello_cpu::Pixmap> {
        let (w, h) = pixmap_dims(self.resolution())?;
        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize);
        for px in self.data.chunks_exact(4) {
            may_have_opacities |= px[3] != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            });
        }
        Ok(vello_cpu::Pixmap::from_parts_with_opacity(
            pixels,
            w,
            h,
            may_have_opacities,
        ))
    }

    pub(crate) fn to_image_paint(&self) -> HalftoneResult<vello_cpu::Image> {
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(self.to_pixmap()?)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }

    pub(crate) fn from_pixmap(pixmap: &vello_cpu::Pixmap) -> Self {
        Self {
            width: u32::from(pixmap.width()),
            height: u32::from(pixmap.height()),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

/// `vello_cpu` surfaces are addressed with `u16` dimensions.
pub(crate) fn pixmap_dims(resolution: Resolution) -> HalftoneResult<(u16, u16)> {
    let w: u16 = resolution
        .width
        .try_into()
        .map_err(|_| HalftoneError::render("raster width exceeds u16"))?;
    let h: u16 = resolution
        .height
        .try_into()
        .map_err(|_| HalftoneError::render("raster height exceeds u16"))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/raster.rs"]
mod tests;

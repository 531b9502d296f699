use crate::foundation::{
    core::Resolution,
    error::{HalftoneError, HalftoneResult},
    math::{luminance_premul, over},
    raster::Raster,
};
use crate::render::{
    device::{AttributeSlot, BufferId, ProgramId, RenderDevice, TextureId, TextureUnit, Uniform},
    shaders::{ShaderSource, ShaderStage},
};

/// Points smaller than this are not rasterized.
const MIN_STAMP_SIZE: f32 = 0.5;

/// Device-wide settings.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Premultiplied clear color; transparent when unset.
    pub clear_rgba: Option<[u8; 4]>,
}

/// One `draw_points` call as observed by [`CpuDevice`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    /// Program the draw ran with.
    pub program: ProgramId,
    /// `uDepths` at draw time.
    pub depths: [f32; 2],
    /// Texture bound to the sprite sampler.
    pub sprite: TextureId,
    /// Points submitted.
    pub points: usize,
    /// Points large enough to be stamped.
    pub stamped: usize,
}

#[derive(Clone, Copy, Debug)]
struct CpuProgram {
    inverted: bool,
}

#[derive(Clone, Copy, Debug)]
struct UniformState {
    resolution: [f32; 2],
    min_size: f32,
    max_size: f32,
    depths: [f32; 2],
    image: TextureUnit,
    sprite: TextureUnit,
    mask: TextureUnit,
}

impl Default for UniformState {
    fn default() -> Self {
        Self {
            resolution: [0.0, 0.0],
            min_size: 0.0,
            max_size: 0.0,
            depths: [0.0, 1.0],
            image: TextureUnit::Image,
            sprite: TextureUnit::Sprite,
            mask: TextureUnit::Mask,
        }
    }
}

/// Software implementation of [`RenderDevice`].
///
/// Runs the halftone point program on the CPU: every point samples the image
/// luminance and the mask, derives a point size, and stamps the bound sprite
/// onto the target with source-over blending.
#[derive(Debug)]
pub struct CpuDevice {
    settings: RenderSettings,
    has_context: bool,
    target: Raster,
    programs: Vec<CpuProgram>,
    current_program: Option<ProgramId>,
    uniforms: Vec<UniformState>,
    textures: Vec<Raster>,
    units: [Option<TextureId>; 3],
    buffers: Vec<Vec<f32>>,
    position: Option<BufferId>,
    draws: Vec<DrawRecord>,
}

impl Default for CpuDevice {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl CpuDevice {
    /// Device with a working context.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            has_context: true,
            target: Raster::default(),
            programs: Vec::new(),
            current_program: None,
            uniforms: Vec::new(),
            textures: Vec::new(),
            units: [None; 3],
            buffers: Vec::new(),
            position: None,
            draws: Vec::new(),
        }
    }

    /// Device whose context can never be acquired.
    pub fn without_context() -> Self {
        Self {
            has_context: false,
            ..Self::default()
        }
    }

    /// Current render target.
    pub fn target(&self) -> &Raster {
        &self.target
    }

    /// Draw calls since the last clear.
    pub fn draw_log(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Texture content, if the id is known.
    pub fn texture(&self, texture: TextureId) -> Option<&Raster> {
        self.textures.get(texture.0 as usize)
    }

    /// Texture bound to `unit`.
    pub fn bound_texture(&self, unit: TextureUnit) -> Option<TextureId> {
        self.units[unit.index()]
    }

    /// Vertex data of a buffer, if the id is known.
    pub fn vertices(&self, buffer: BufferId) -> Option<&[f32]> {
        self.buffers.get(buffer.0 as usize).map(Vec::as_slice)
    }

    fn clear_rgba(&self) -> [u8; 4] {
        self.settings.clear_rgba.unwrap_or([0, 0, 0, 0])
    }

    fn require_context(&self) -> HalftoneResult<()> {
        if self.has_context {
            Ok(())
        } else {
            Err(HalftoneError::context("no rendering context"))
        }
    }

    fn texture_index(&self, texture: TextureId) -> HalftoneResult<usize> {
        let idx = texture.0 as usize;
        if idx < self.textures.len() {
            Ok(idx)
        } else {
            Err(HalftoneError::render(format!(
                "unknown texture id {}",
                texture.0
            )))
        }
    }

    fn buffer_index(&self, buffer: BufferId) -> HalftoneResult<usize> {
        let idx = buffer.0 as usize;
        if idx < self.buffers.len() {
            Ok(idx)
        } else {
            Err(HalftoneError::render(format!(
                "unknown vertex buffer id {}",
                buffer.0
            )))
        }
    }

    fn bound(&self, unit: TextureUnit) -> HalftoneResult<(TextureId, &Raster)> {
        let id = self.units[unit.index()].ok_or_else(|| {
            HalftoneError::render(format!("no texture bound to unit {}", unit.index()))
        })?;
        Ok((id, &self.textures[id.0 as usize]))
    }
}

fn check_source(src: &ShaderSource, stage: ShaderStage) -> HalftoneResult<()> {
    if src.stage != stage {
        return Err(HalftoneError::shader(format!(
            "'{}' is a {:?} source, expected {stage:?}",
            src.name, src.stage
        )));
    }
    if !src.source.contains("void main") {
        return Err(HalftoneError::shader(format!(
            "'{}' has no main entry point",
            src.name
        )));
    }
    Ok(())
}

/// Sample a texture at viewport position `(x, y)` mapped through uv space.
fn sample_uv(tex: &Raster, resolution: [f32; 2], x: f32, y: f32) -> [u8; 4] {
    if resolution[0] <= 0.0 || resolution[1] <= 0.0 {
        return [0, 0, 0, 0];
    }
    let u = x / resolution[0];
    let v = y / resolution[1];
    tex.sample_nearest(u * tex.width() as f32, v * tex.height() as f32)
}

fn coverage(lum: f32, depths: [f32; 2], inverted: bool) -> f32 {
    let [low, high] = depths;
    let span = high - low;
    if span <= 0.0 {
        let lit = if inverted { lum <= high } else { lum >= low };
        return if lit { 1.0 } else { 0.0 };
    }
    let c = if inverted {
        (high - lum) / span
    } else {
        (lum - low) / span
    };
    c.clamp(0.0, 1.0)
}

fn stamp(target: &mut Raster, sprite: &Raster, cx: f32, cy: f32, size: f32) {
    let x0 = cx - size / 2.0;
    let y0 = cy - size / 2.0;
    let (tw, th) = (target.width() as i64, target.height() as i64);

    let px_start = (x0.floor() as i64).max(0);
    let px_end = ((x0 + size).ceil() as i64).min(tw);
    let py_start = (y0.floor() as i64).max(0);
    let py_end = ((y0 + size).ceil() as i64).min(th);

    let sw = sprite.width() as f32;
    let sh = sprite.height() as f32;
    let width = target.width() as usize;

    for py in py_start..py_end {
        let fy = py as f32 + 0.5 - y0;
        if fy < 0.0 || fy >= size {
            continue;
        }
        for px in px_start..px_end {
            let fx = px as f32 + 0.5 - x0;
            if fx < 0.0 || fx >= size {
                continue;
            }
            let src = sprite.sample_nearest(fx / size * sw, fy / size * sh);
            if src[3] == 0 {
                continue;
            }
            let idx = (py as usize * width + px as usize) * 4;
            let data = target.data_mut();
            let dst = [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]];
            data[idx..idx + 4].copy_from_slice(&over(dst, src));
        }
    }
}

impl RenderDevice for CpuDevice {
    fn ensure_context(&mut self) -> HalftoneResult<()> {
        self.require_context()
    }

    fn set_viewport(&mut self, resolution: Resolution) -> HalftoneResult<()> {
        self.require_context()?;
        self.target = Raster::filled(resolution, self.clear_rgba());
        Ok(())
    }

    fn clear(&mut self) -> HalftoneResult<()> {
        self.require_context()?;
        let rgba = self.clear_rgba();
        self.target.fill(rgba);
        self.draws.clear();
        Ok(())
    }

    fn compile_program(
        &mut self,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> HalftoneResult<ProgramId> {
        self.require_context()?;
        check_source(vertex, ShaderStage::Vertex)?;
        check_source(fragment, ShaderStage::Fragment)?;
        if !vertex.source.contains("aPosition") {
            return Err(HalftoneError::shader(format!(
                "'{}' does not declare aPosition",
                vertex.name
            )));
        }

        let id = ProgramId(self.programs.len() as u32);
        self.programs.push(CpuProgram {
            inverted: vertex.defines("HALFTONE_INVERTED"),
        });
        self.uniforms.push(UniformState::default());
        Ok(id)
    }

    fn use_program(&mut self, program: ProgramId) -> HalftoneResult<()> {
        if program.0 as usize >= self.programs.len() {
            return Err(HalftoneError::render(format!(
                "unknown program id {}",
                program.0
            )));
        }
        self.current_program = Some(program);
        Ok(())
    }

    fn create_texture(&mut self) -> HalftoneResult<TextureId> {
        self.require_context()?;
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(Raster::default());
        Ok(id)
    }

    fn upload_texture(&mut self, texture: TextureId, raster: &Raster) -> HalftoneResult<()> {
        let idx = self.texture_index(texture)?;
        self.textures[idx].clone_from(raster);
        Ok(())
    }

    fn bind_texture(&mut self, texture: TextureId, unit: TextureUnit) -> HalftoneResult<()> {
        self.texture_index(texture)?;
        self.units[unit.index()] = Some(texture);
        Ok(())
    }

    fn create_vertex_buffer(&mut self) -> HalftoneResult<BufferId> {
        self.require_context()?;
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(Vec::new());
        Ok(id)
    }

    fn upload_vertices(&mut self, buffer: BufferId, coords: &[f32]) -> HalftoneResult<()> {
        let idx = self.buffer_index(buffer)?;
        self.buffers[idx].clear();
        self.buffers[idx].extend_from_slice(coords);
        Ok(())
    }

    fn bind_vertex_buffer(
        &mut self,
        buffer: BufferId,
        attribute: AttributeSlot,
    ) -> HalftoneResult<()> {
        self.buffer_index(buffer)?;
        match attribute {
            AttributeSlot::Position => self.position = Some(buffer),
        }
        Ok(())
    }

    fn set_uniform(&mut self, uniform: Uniform) -> HalftoneResult<()> {
        let program = self
            .current_program
            .ok_or_else(|| HalftoneError::render("set_uniform without a program in use"))?;
        let state = &mut self.uniforms[program.0 as usize];
        match uniform {
            Uniform::Resolution(v) => state.resolution = v,
            Uniform::MinSize(v) => state.min_size = v,
            Uniform::MaxSize(v) => state.max_size = v,
            Uniform::Depths(v) => state.depths = v,
            Uniform::Image(unit) => state.image = unit,
            Uniform::PointSprite(unit) => state.sprite = unit,
            Uniform::Mask(unit) => state.mask = unit,
        }
        Ok(())
    }

    fn draw_points(&mut self, count: usize) -> HalftoneResult<()> {
        self.require_context()?;
        let program_id = self
            .current_program
            .ok_or_else(|| HalftoneError::render("draw without a program in use"))?;
        let program = self.programs[program_id.0 as usize];
        let u = self.uniforms[program_id.0 as usize];

        let buffer = self
            .position
            .ok_or_else(|| HalftoneError::render("no vertex buffer bound to aPosition"))?;
        let coords = &self.buffers[buffer.0 as usize];
        if coords.len() < count * 2 {
            return Err(HalftoneError::render(format!(
                "draw of {count} points exceeds vertex buffer of {}",
                coords.len() / 2
            )));
        }

        let (sprite_id, sprite) = self.bound(u.sprite)?;
        let (_, image) = self.bound(u.image)?;
        let (_, mask) = self.bound(u.mask)?;

        let mut stamps = Vec::new();
        for xy in coords[..count * 2].chunks_exact(2) {
            let (x, y) = (xy[0], xy[1]);
            let lum = luminance_premul(sample_uv(image, u.resolution, x, y));
            let cov = coverage(lum, u.depths, program.inverted);
            let m = f32::from(sample_uv(mask, u.resolution, x, y)[0]) / 255.0;
            let size = u.min_size + (u.max_size - u.min_size) * cov * m;
            if size >= MIN_STAMP_SIZE {
                stamps.push((x, y, size));
            }
        }
        let sprite = sprite.clone();

        for &(x, y, size) in &stamps {
            stamp(&mut self.target, &sprite, x, y, size);
        }
        let stamped = stamps.len();

        self.draws.push(DrawRecord {
            program: program_id,
            depths: u.depths,
            sprite: sprite_id,
            points: count,
            stamped,
        });
        Ok(())
    }

    fn read_pixels(&self) -> HalftoneResult<Raster> {
        self.require_context()?;
        Ok(self.target.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

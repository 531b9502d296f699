use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::animation::run::{AnimationGeneration, AnimationRun, Animator, FadeCurves};
use crate::assets::{
    fit::cover_fit,
    loader::{ImageEvent, ImageLoader, ImageRequest},
};
use crate::config::CompositorOptions;
use crate::field::PointField;
use crate::foundation::{
    core::{Color, Resolution},
    error::{HalftoneError, HalftoneResult},
    raster::Raster,
};
use crate::layer::{Layer, LayerFrame};
use crate::mask::FadeMask;
use crate::mount::{Container, SurfaceId};
use crate::palette::Palette;
use crate::render::{
    device::{AttributeSlot, BufferId, ProgramId, RenderDevice, TextureId, TextureUnit, Uniform},
    shaders::HalftoneShaders,
};

pub(crate) mod lifecycle;

use lifecycle::{Lifecycle, LifecycleEvent, Stage};

static NEXT_INDEX: AtomicUsize = AtomicUsize::new(0);

/// Where the source image is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageStatus {
    /// No image set; the image texture is solid white.
    Unset,
    /// Load in flight; the image texture is transparent.
    Pending,
    /// Loaded and fitted.
    Loaded,
    /// Load failed; the image texture is transparent.
    Failed,
}

#[derive(Clone, Debug)]
enum SourceImage {
    Unset,
    Pending(ImageRequest),
    Loaded(Arc<Raster>),
    Failed,
}

/// Renders one image as stacked halftone layers on a [`RenderDevice`].
///
/// A compositor owns its device, a fade mask and the source image; the palette
/// it was built from supplies one layer per color. All state changes happen on
/// the owning thread: image loads complete on a helper thread but are only
/// applied by [`Compositor::process_events`], [`Compositor::on_animation_frame`]
/// or [`Compositor::wait_for_image`].
///
/// ```no_run
/// use halftone::{Compositor, CompositorOptions, CpuDevice, Palette};
/// # fn main() -> halftone::HalftoneResult<()> {
/// let palette = Palette::default();
/// let mut ht = Compositor::new(CpuDevice::default(), CompositorOptions::default(), &palette)?;
/// ht.set_image("hero.png");
/// ht.set_size(Some(640), Some(480))?;
/// ht.anim_in(std::time::Duration::from_millis(1500))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Compositor<D: RenderDevice> {
    index: usize,
    device: D,
    dot_size: f32,
    inverted: bool,
    lifecycle: Lifecycle,
    program: ProgramId,
    layers: Vec<Layer>,
    surface: SurfaceId,
    layout_size: Option<Resolution>,
    resolution: Option<Resolution>,
    field: PointField,
    vertices: BufferId,
    image_texture: TextureId,
    mask_texture: TextureId,
    mask: FadeMask,
    source: SourceImage,
    loader: ImageLoader,
    animator: Animator,
}

impl<D: RenderDevice> Compositor<D> {
    /// Acquire the context, upload layer sprites and build the program.
    ///
    /// Fails with [`HalftoneError::Context`] when the device has no context and
    /// with [`HalftoneError::Shader`] when sources cannot be loaded or compiled.
    #[tracing::instrument(skip(device, palette), fields(layers = palette.len()))]
    pub fn new(
        mut device: D,
        options: CompositorOptions,
        palette: &Palette,
    ) -> HalftoneResult<Self> {
        options.validate()?;
        let index = NEXT_INDEX.fetch_add(1, Ordering::Relaxed);

        if let Err(err) = device.ensure_context() {
            tracing::error!(index, error = %err, "failed to get rendering context");
            return Err(err);
        }
        let mut lifecycle = Lifecycle::default();

        let layers = palette
            .layers()
            .iter()
            .enumerate()
            .map(|(i, spec)| Layer::new(&mut device, i, spec.clone()))
            .collect::<HalftoneResult<Vec<_>>>()?;
        lifecycle.emit(LifecycleEvent::LayersReady);

        lifecycle.enter(Stage::ShadersLoading);
        tracing::info!(index, "start loading shaders");
        let shaders = match &options.shader_dir {
            Some(dir) => HalftoneShaders::load_dir(dir, options.dark_top)
                .inspect_err(|e| tracing::error!(index, error = %e, "failed to load shaders"))?,
            None => HalftoneShaders::builtin(options.dark_top),
        };
        tracing::info!(index, "done loading shaders");
        lifecycle.emit(LifecycleEvent::ShadersReady);

        lifecycle.enter(Stage::ProgramsBuilding);
        tracing::info!(index, "initializing programs");
        let program = device
            .compile_program(&shaders.vertex, &shaders.fragment)
            .inspect_err(|e| tracing::error!(index, error = %e, "failed to build program"))?;
        lifecycle.emit(LifecycleEvent::ProgramsReady);

        let vertices = device.create_vertex_buffer()?;
        let image_texture = device.create_texture()?;
        let mask_texture = device.create_texture()?;
        lifecycle.enter(Stage::SizingPending);

        let mut compositor = Self {
            index,
            device,
            dot_size: options.dot_size,
            inverted: options.dark_top,
            lifecycle,
            program,
            layers,
            surface: SurfaceId::next(),
            layout_size: None,
            resolution: None,
            field: PointField::default(),
            vertices,
            image_texture,
            mask_texture,
            mask: FadeMask::default(),
            source: SourceImage::Unset,
            loader: ImageLoader::new(),
            animator: Animator::default(),
        };
        if let Some(path) = &options.image {
            compositor.set_image(path);
        }
        Ok(compositor)
    }

    /// Insert the surface as the container's last child.
    pub fn append_to<C: Container + ?Sized>(&mut self, container: &mut C) -> &mut Self {
        let end = container.children().len();
        container.insert_child(end, self.surface);
        self.layout_size = container.layout_size(self.surface);
        self
    }

    /// Insert the surface as the container's first child.
    pub fn prepend_to<C: Container + ?Sized>(&mut self, container: &mut C) -> &mut Self {
        if container.children().is_empty() {
            return self.append_to(container);
        }
        container.insert_child(0, self.surface);
        self.layout_size = container.layout_size(self.surface);
        self
    }

    /// Record the surface's laid-out size, as reported by the host.
    pub fn set_layout_size(&mut self, size: Option<Resolution>) -> &mut Self {
        self.layout_size = size;
        self
    }

    /// Size the render target.
    ///
    /// Missing or zero dimensions fall back to the laid-out size. When a
    /// dimension cannot be resolved nothing changes, so a compositor without a size
    /// keeps treating draws as no-ops.
    #[tracing::instrument(skip(self), fields(index = self.index))]
    pub fn set_size(
        &mut self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> HalftoneResult<&mut Self> {
        let computed = self.layout_size;
        let width = width
            .filter(|&w| w > 0)
            .or_else(|| computed.map(|r| r.width))
            .filter(|&w| w > 0);
        let height = height
            .filter(|&h| h > 0)
            .or_else(|| computed.map(|r| r.height))
            .filter(|&h| h > 0);
        let (Some(width), Some(height)) = (width, height) else {
            tracing::debug!("size unresolved; waiting for layout");
            return Ok(self);
        };

        let resolution = Resolution::new(width, height);
        let field = PointField::generate(resolution, self.dot_size)?;
        let image = self.image_raster(resolution)?;

        self.device.set_viewport(resolution)?;
        self.device.upload_texture(self.image_texture, &image)?;
        self.device.upload_vertices(self.vertices, field.coords())?;

        self.resolution = Some(resolution);
        self.mask.resize(resolution);
        self.field = field;

        self.lifecycle.enter(Stage::Ready);
        tracing::debug!(%resolution, points = self.field.len(), "sized");
        self.lifecycle.emit(LifecycleEvent::Ready);
        Ok(self)
    }

    /// Start loading a source image; a newer call supersedes an older one.
    pub fn set_image(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let request = self.loader.request(path);
        self.source = SourceImage::Pending(request);
        self
    }

    /// Use an already-decoded raster as the source image.
    pub fn set_image_raster(&mut self, raster: Raster) -> HalftoneResult<&mut Self> {
        self.source = SourceImage::Loaded(Arc::new(raster));
        self.update_image_texture()?;
        self.lifecycle.emit(LifecycleEvent::ImageReady);
        Ok(self)
    }

    /// Apply image loads that have completed since the last call.
    pub fn process_events(&mut self) -> HalftoneResult<()> {
        for event in self.loader.poll() {
            self.apply_image_event(event)?;
        }
        Ok(())
    }

    /// Block up to `timeout` for the pending image; `true` once it is loaded.
    pub fn wait_for_image(&mut self, timeout: Duration) -> HalftoneResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            match &self.source {
                SourceImage::Pending(_) => {}
                SourceImage::Loaded(_) => return Ok(true),
                SourceImage::Unset | SourceImage::Failed => return Ok(false),
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }
            match self.loader.wait(remaining) {
                Some(event) => {
                    self.apply_image_event(event)?;
                }
                None => return Ok(false),
            }
        }
    }

    fn apply_image_event(&mut self, event: ImageEvent) -> HalftoneResult<()> {
        let current = match &self.source {
            SourceImage::Pending(request) => *request,
            _ => {
                tracing::debug!(request = event.request().get(), "ignoring image completion");
                return Ok(());
            }
        };
        if event.request() != current {
            tracing::debug!(
                request = event.request().get(),
                current = current.get(),
                "ignoring superseded image completion"
            );
            return Ok(());
        }

        match event {
            ImageEvent::Loaded { image, .. } => {
                tracing::debug!(
                    index = self.index,
                    source = %image.resolution(),
                    "image loaded"
                );
                self.source = SourceImage::Loaded(image);
                self.update_image_texture()?;
                self.lifecycle.emit(LifecycleEvent::ImageReady);
            }
            ImageEvent::Failed { path, error, .. } => {
                tracing::warn!(
                    index = self.index,
                    path = %path.display(),
                    error = %error,
                    "image failed to load"
                );
                self.source = SourceImage::Failed;
                self.update_image_texture()?;
            }
        }
        Ok(())
    }

    fn image_raster(&self, resolution: Resolution) -> HalftoneResult<Raster> {
        match &self.source {
            SourceImage::Unset => Ok(Raster::solid(resolution, Color::WHITE)),
            SourceImage::Pending(_) | SourceImage::Failed => Ok(Raster::new(resolution)),
            SourceImage::Loaded(image) => cover_fit(image, resolution),
        }
    }

    fn update_image_texture(&mut self) -> HalftoneResult<()> {
        let Some(resolution) = self.resolution else {
            return Ok(());
        };
        let raster = self.image_raster(resolution)?;
        self.device.upload_texture(self.image_texture, &raster)
    }

    fn frame(&self) -> LayerFrame {
        LayerFrame {
            resolution: self.resolution.unwrap_or_default(),
            dot_size: self.dot_size,
            point_count: self.field.len(),
        }
    }

    fn bind_shared(&mut self) -> HalftoneResult<()> {
        self.device.use_program(self.program)?;
        self.device
            .bind_vertex_buffer(self.vertices, AttributeSlot::Position)?;
        self.device
            .upload_texture(self.mask_texture, self.mask.raster())?;
        self.device.bind_texture(self.mask_texture, TextureUnit::Mask)?;
        self.device.set_uniform(Uniform::Mask(TextureUnit::Mask))
    }

    /// Clear and draw every layer, lightest on top unless inverted.
    ///
    /// Sizes lazily on first use; a no-op until the compositor is ready.
    pub fn draw(&mut self) -> HalftoneResult<()> {
        if self.resolution.is_none() {
            self.set_size(None, None)?;
        }
        if !self.lifecycle.is_ready() {
            return Ok(());
        }

        self.device.clear()?;
        self.bind_shared()?;
        self.device
            .bind_texture(self.image_texture, TextureUnit::Image)?;
        self.device.set_uniform(Uniform::Image(TextureUnit::Image))?;

        let frame = self.frame();
        if self.inverted {
            for layer in self.layers.iter().rev() {
                layer.draw(&mut self.device, &frame, None)?;
            }
        } else {
            for layer in &self.layers {
                layer.draw(&mut self.device, &frame, None)?;
            }
        }
        Ok(())
    }

    /// Draw one layer over the current target without clearing.
    pub fn draw_layer(&mut self, index: usize) -> HalftoneResult<()> {
        if index >= self.layers.len() {
            return Err(HalftoneError::validation(format!(
                "layer index {index} out of range (0..{})",
                self.layers.len()
            )));
        }
        if !self.lifecycle.is_ready() {
            return Ok(());
        }

        self.bind_shared()?;
        let frame = self.frame();
        self.layers[index].draw(&mut self.device, &frame, Some(self.image_texture))
    }

    /// Repaint the fade mask for a black point and a white point.
    pub fn set_fade(&mut self, black: f64, white: f64) -> HalftoneResult<()> {
        if !black.is_finite() || !white.is_finite() {
            return Err(HalftoneError::validation(format!(
                "fade offsets must be finite, got black={black} white={white}"
            )));
        }
        self.mask.paint(black, white);
        Ok(())
    }

    /// Animate the layers in over `duration`, starting now.
    pub fn anim_in(&mut self, duration: Duration) -> HalftoneResult<AnimationGeneration> {
        self.anim_in_at(duration, Instant::now())
    }

    /// Animate the layers in over `duration`, starting at `now`.
    pub fn anim_in_at(
        &mut self,
        duration: Duration,
        now: Instant,
    ) -> HalftoneResult<AnimationGeneration> {
        self.start_animation(FadeCurves::reveal(), duration, now)
    }

    /// Animate the layers out over `duration`, starting now.
    pub fn anim_out(&mut self, duration: Duration) -> HalftoneResult<AnimationGeneration> {
        self.anim_out_at(duration, Instant::now())
    }

    /// Animate the layers out over `duration`, starting at `now`.
    pub fn anim_out_at(
        &mut self,
        duration: Duration,
        now: Instant,
    ) -> HalftoneResult<AnimationGeneration> {
        self.start_animation(FadeCurves::conceal(), duration, now)
    }

    fn start_animation(
        &mut self,
        curves: FadeCurves,
        duration: Duration,
        now: Instant,
    ) -> HalftoneResult<AnimationGeneration> {
        let run = self.animator.start(curves, now, duration);
        let generation = run.generation();
        tracing::debug!(
            index = self.index,
            generation = generation.get(),
            duration_ms = duration.as_millis() as u64,
            "animation started"
        );
        self.run_frame(run, now)?;
        Ok(generation)
    }

    fn run_frame(&mut self, run: AnimationRun, now: Instant) -> HalftoneResult<()> {
        if !self.animator.is_current(&run) {
            tracing::debug!(
                generation = run.generation().get(),
                "animation superseded"
            );
            return Ok(());
        }
        let (offsets, t) = run.sample(now);
        let painted = self
            .set_fade(offsets.black, offsets.white)
            .and_then(|()| self.draw());
        // A failed frame is retried on the next callback.
        if t < 1.0 || painted.is_err() {
            self.animator.schedule(run);
        }
        painted
    }

    /// Display-refresh callback: apply image completions, then advance every
    /// scheduled animation to `now`.
    ///
    /// A failing run stays scheduled and does not stop the others; the first
    /// error is returned once every scheduled run has been advanced.
    pub fn on_animation_frame(&mut self, now: Instant) -> HalftoneResult<()> {
        let mut result = self.process_events();
        for run in self.animator.take_scheduled() {
            if let Err(err) = self.run_frame(run, now) {
                tracing::error!(index = self.index, error = %err, "animation frame failed");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    /// `true` while the current animation still has frames to run.
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Generation of the most recently started animation.
    pub fn animation_generation(&self) -> AnimationGeneration {
        self.animator.generation()
    }

    /// Register a lifecycle observer; events already emitted are replayed.
    pub fn subscribe<F>(&mut self, observer: F) -> &mut Self
    where
        F: FnMut(LifecycleEvent) + 'static,
    {
        self.lifecycle.subscribe(Box::new(observer));
        self
    }

    /// `true` once `event` has been emitted at least once.
    pub fn has_reached(&self, event: LifecycleEvent) -> bool {
        self.lifecycle.has_reached(event)
    }

    /// Construction order across the process.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current lifecycle stage.
    pub fn stage(&self) -> Stage {
        self.lifecycle.stage()
    }

    /// `true` when draws will render.
    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    /// Render target size, once sized.
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Dot size at full coverage.
    pub fn dot_size(&self) -> f32 {
        self.dot_size
    }

    /// `true` when the darkest layer draws on top.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layers in palette order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Current dot lattice.
    pub fn point_field(&self) -> &PointField {
        &self.field
    }

    /// Fade mask.
    pub fn mask(&self) -> &FadeMask {
        &self.mask
    }

    /// Source image state.
    pub fn image_status(&self) -> ImageStatus {
        match self.source {
            SourceImage::Unset => ImageStatus::Unset,
            SourceImage::Pending(_) => ImageStatus::Pending,
            SourceImage::Loaded(_) => ImageStatus::Loaded,
            SourceImage::Failed => ImageStatus::Failed,
        }
    }

    /// Texture holding the fitted source image.
    pub fn image_texture(&self) -> TextureId {
        self.image_texture
    }

    /// Texture holding the fade mask.
    pub fn mask_texture(&self) -> TextureId {
        self.mask_texture
    }

    /// Surface identity inside host containers.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Laid-out size last reported by the host.
    pub fn layout_size(&self) -> Option<Resolution> {
        self.layout_size
    }

    /// Underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Underlying device, mutably.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Give the device back.
    pub fn into_device(self) -> D {
        self.device
    }
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;

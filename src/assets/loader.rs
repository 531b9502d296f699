use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};

use crate::assets::decode::load_image_file;
use crate::foundation::raster::Raster;

/// Identifies one `request` call; later requests compare greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageRequest(u64);

impl ImageRequest {
    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Completion delivered back to the owning thread.
#[derive(Clone, Debug)]
pub enum ImageEvent {
    /// Decoded successfully.
    Loaded {
        /// Request this answers.
        request: ImageRequest,
        /// Decoded premultiplied pixels.
        image: Arc<Raster>,
    },
    /// Read or decode failed.
    Failed {
        /// Request this answers.
        request: ImageRequest,
        /// Source path.
        path: PathBuf,
        /// Rendered error message.
        error: String,
    },
}

impl ImageEvent {
    /// Request the event answers.
    pub fn request(&self) -> ImageRequest {
        match self {
            Self::Loaded { request, .. } | Self::Failed { request, .. } => *request,
        }
    }
}

/// Loads source images on helper threads.
///
/// Each request decodes on its own thread; completions queue on a channel and
/// are only observed when the owner calls [`ImageLoader::poll`] or
/// [`ImageLoader::wait`], so all state changes stay on the owner's thread.
#[derive(Debug)]
pub struct ImageLoader {
    next: u64,
    tx: Sender<ImageEvent>,
    rx: Receiver<ImageEvent>,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    /// Loader with an empty completion queue.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { next: 0, tx, rx }
    }

    /// Start loading `path` in the background.
    pub fn request(&mut self, path: impl AsRef<Path>) -> ImageRequest {
        self.next += 1;
        let request = ImageRequest(self.next);
        let path = path.as_ref().to_path_buf();
        let tx = self.tx.clone();

        tracing::debug!(request = request.get(), path = %path.display(), "image load requested");
        thread::spawn(move || {
            let event = match load_image_file(&path) {
                Ok(image) => ImageEvent::Loaded {
                    request,
                    image: Arc::new(image),
                },
                Err(err) => ImageEvent::Failed {
                    request,
                    path,
                    error: err.to_string(),
                },
            };
            // The loader may already be gone; nothing to deliver to then.
            let _ = tx.send(event);
        });
        request
    }

    /// Most recent request id, if any.
    pub fn latest(&self) -> Option<ImageRequest> {
        (self.next > 0).then_some(ImageRequest(self.next))
    }

    /// Drain completions that have already arrived.
    pub fn poll(&self) -> Vec<ImageEvent> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(ev) => out.push(ev),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Block up to `timeout` for the next completion.
    pub fn wait(&self, timeout: Duration) -> Option<ImageEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;

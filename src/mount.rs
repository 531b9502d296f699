use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::Resolution;

static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

/// Identity of a compositor's drawing surface inside a host container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Fresh process-unique id.
    pub fn next() -> Self {
        Self(NEXT_SURFACE.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Host element that can hold compositor surfaces.
pub trait Container {
    /// Children in order.
    fn children(&self) -> &[SurfaceId];

    /// Insert `surface` at `index`, moving it if it is already a child.
    fn insert_child(&mut self, index: usize, surface: SurfaceId);

    /// Laid-out size of `surface`, when the host knows it.
    fn layout_size(&self, surface: SurfaceId) -> Option<Resolution>;
}

/// In-memory container whose children all fill its own size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Panel {
    size: Option<Resolution>,
    children: Vec<SurfaceId>,
}

impl Panel {
    /// Panel laid out at `size`.
    pub fn new(size: Resolution) -> Self {
        Self {
            size: Some(size),
            children: Vec::new(),
        }
    }

    /// Panel that has not been laid out.
    pub fn without_size() -> Self {
        Self::default()
    }

    /// Change the laid-out size.
    pub fn set_size(&mut self, size: Option<Resolution>) {
        self.size = size;
    }

    /// Laid-out size.
    pub fn size(&self) -> Option<Resolution> {
        self.size
    }
}

impl Container for Panel {
    fn children(&self) -> &[SurfaceId] {
        &self.children
    }

    fn insert_child(&mut self, index: usize, surface: SurfaceId) {
        let mut index = index;
        if let Some(pos) = self.children.iter().position(|&c| c == surface) {
            self.children.remove(pos);
            if pos < index {
                index -= 1;
            }
        }
        let index = index.min(self.children.len());
        self.children.insert(index, surface);
    }

    fn layout_size(&self, surface: SurfaceId) -> Option<Resolution> {
        if self.children.contains(&surface) {
            self.size
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/mount.rs"]
mod tests;

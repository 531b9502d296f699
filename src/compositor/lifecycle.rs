use std::fmt;

/// Where a compositor is in its setup.
///
/// Stages only move forward except for `Ready`, which is re-entered on every
/// successful resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Context acquired; nothing built yet.
    Uninitialized,
    /// Shader sources are being loaded.
    ShadersLoading,
    /// Sources loaded; the program is being compiled.
    ProgramsBuilding,
    /// Program and layers exist; waiting for a usable size.
    SizingPending,
    /// Able to draw.
    Ready,
}

/// Notifications for observers registered with
/// [`Compositor::subscribe`](crate::Compositor::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Shader sources loaded.
    ShadersReady,
    /// Program compiled and linked.
    ProgramsReady,
    /// Every layer's sprite is resident.
    LayersReady,
    /// A source image finished loading and was fitted.
    ImageReady,
    /// Sized and able to draw.
    Ready,
}

type Observer = Box<dyn FnMut(LifecycleEvent)>;

pub(crate) struct Lifecycle {
    stage: Stage,
    reached: Vec<LifecycleEvent>,
    observers: Vec<Observer>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            stage: Stage::Uninitialized,
            reached: Vec::new(),
            observers: Vec::new(),
        }
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("stage", &self.stage)
            .field("reached", &self.reached)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Lifecycle {
    pub(crate) fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.stage == Stage::Ready
    }

    pub(crate) fn emit(&mut self, event: LifecycleEvent) {
        if !self.reached.contains(&event) {
            self.reached.push(event);
        }
        for observer in &mut self.observers {
            observer(event);
        }
    }

    /// Register `observer`, replaying events already emitted.
    pub(crate) fn subscribe(&mut self, mut observer: Observer) {
        for &event in &self.reached {
            observer(event);
        }
        self.observers.push(observer);
    }

    pub(crate) fn has_reached(&self, event: LifecycleEvent) -> bool {
        self.reached.contains(&event)
    }
}

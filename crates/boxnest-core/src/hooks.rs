// crates/boxnest-core/src/hooks.rs
use glam::IVec2;
use std::fmt;

pub type DestroyHook = Box<dyn FnMut()>;
pub type ResizeHook = Box<dyn FnMut(IVec2)>;
pub type RepositionHook = Box<dyn FnMut(IVec2)>;

fn noop_destroy() -> DestroyHook {
    Box::new(|| {})
}

fn noop_resize() -> ResizeHook {
    Box::new(|_| {})
}

fn noop_reposition() -> RepositionHook {
    Box::new(|_| {})
}

/// Owner-supplied notification slots of a primitive.
///
/// Every slot always holds a callable; clearing a slot puts a no-op back in
/// place so firing never needs a presence check.
pub struct Hooks {
    on_destroy: DestroyHook,
    on_resize: ResizeHook,
    on_reposition: RepositionHook,
}

impl Hooks {
    pub fn new() -> Self {
        Self {
            on_destroy: noop_destroy(),
            on_resize: noop_resize(),
            on_reposition: noop_reposition(),
        }
    }

    pub fn on_destroy(&mut self) -> &mut DestroyHook {
        &mut self.on_destroy
    }

    pub fn on_resize(&mut self) -> &mut ResizeHook {
        &mut self.on_resize
    }

    pub fn on_reposition(&mut self) -> &mut RepositionHook {
        &mut self.on_reposition
    }

    pub fn set_on_destroy(&mut self, hook: Option<DestroyHook>) {
        self.on_destroy = hook.unwrap_or_else(noop_destroy);
    }

    pub fn set_on_resize(&mut self, hook: Option<ResizeHook>) {
        self.on_resize = hook.unwrap_or_else(noop_resize);
    }

    pub fn set_on_reposition(&mut self, hook: Option<RepositionHook>) {
        self.on_reposition = hook.unwrap_or_else(noop_reposition);
    }

    pub fn fire_destroy(&mut self) {
        (self.on_destroy)();
    }

    pub fn fire_resize(&mut self, size: IVec2) {
        (self.on_resize)(size);
    }

    pub fn fire_reposition(&mut self, pos: IVec2) {
        (self.on_reposition)(pos);
    }

    /// Replace all three slots with no-ops.
    pub fn disarm(&mut self) {
        self.set_on_destroy(None);
        self.set_on_resize(None);
        self.set_on_reposition(None);
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

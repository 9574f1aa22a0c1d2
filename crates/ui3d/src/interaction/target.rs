//! Gaze targets: the host-owned scene handle and the engine's registration record.

use super::Bounds;
use crate::config::{TargetOptions, TargetSettings};
use glam::Vec3;
use reticulum_core::{Color, TargetId};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
struct ObjectState {
    id: TargetId,
    name: String,
    bounds: Cell<Bounds>,
    visible: Cell<bool>,
}

/// Shared handle on a scene object that can be gazed at.
///
/// The host scene moves and shows/hides the object through any clone of the
/// handle; the engine only reads it.
#[derive(Debug, Clone)]
pub struct SceneObject {
    inner: Rc<ObjectState>,
}

impl SceneObject {
    pub fn new(bounds: Bounds) -> Self {
        let id = TargetId::next();
        Self::with_id(id, id.to_string(), bounds)
    }

    /// Object with a human-readable name used in logs.
    pub fn named(name: impl Into<String>, bounds: Bounds) -> Self {
        Self::with_id(TargetId::next(), name.into(), bounds)
    }

    fn with_id(id: TargetId, name: String, bounds: Bounds) -> Self {
        Self {
            inner: Rc::new(ObjectState {
                id,
                name,
                bounds: Cell::new(bounds),
                visible: Cell::new(true),
            }),
        }
    }

    pub fn id(&self) -> TargetId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn bounds(&self) -> Bounds {
        self.inner.bounds.get()
    }

    pub fn set_bounds(&self, bounds: Bounds) {
        self.inner.bounds.set(bounds);
    }

    /// Move the object, keeping its shape.
    pub fn set_position(&self, center: Vec3) {
        self.set_bounds(self.bounds().recentered(center));
    }

    pub fn is_visible(&self) -> bool {
        self.inner.visible.get()
    }

    pub fn set_visible(&self, visible: bool) {
        self.inner.visible.set(visible);
    }
}

/// A callback slot. Callbacks take no arguments; data they need is captured.
pub type GazeCallback = Box<dyn FnMut()>;

#[derive(Default)]
pub(crate) struct GazeCallbacks {
    pub over: Option<GazeCallback>,
    pub out: Option<GazeCallback>,
    pub long: Option<GazeCallback>,
    pub click: Option<GazeCallback>,
}

/// Registration options for one target: data overrides plus callbacks.
#[derive(Default)]
pub struct GazeOptions {
    pub(crate) options: TargetOptions,
    pub(crate) callbacks: GazeCallbacks,
}

impl GazeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: TargetOptions) -> Self {
        Self {
            options,
            callbacks: GazeCallbacks::default(),
        }
    }

    pub fn hover_color(mut self, color: Color) -> Self {
        self.options.reticle_hover_color = Some(color.to_hex());
        self
    }

    pub fn fuse_color(mut self, color: Color) -> Self {
        self.options.fuse_color = Some(color.to_hex());
        self
    }

    pub fn fuse_duration(mut self, seconds: f32) -> Self {
        self.options.fuse_duration = Some(seconds);
        self
    }

    pub fn fuse_visible(mut self, visible: bool) -> Self {
        self.options.fuse_visible = Some(visible);
        self
    }

    pub fn click_cancel_fuse(mut self, cancel: bool) -> Self {
        self.options.click_cancel_fuse = Some(cancel);
        self
    }

    pub fn on_gaze_over(mut self, callback: impl FnMut() + 'static) -> Self {
        self.callbacks.over = Some(Box::new(callback));
        self
    }

    pub fn on_gaze_out(mut self, callback: impl FnMut() + 'static) -> Self {
        self.callbacks.out = Some(Box::new(callback));
        self
    }

    pub fn on_gaze_long(mut self, callback: impl FnMut() + 'static) -> Self {
        self.callbacks.long = Some(Box::new(callback));
        self
    }

    pub fn on_gaze_click(mut self, callback: impl FnMut() + 'static) -> Self {
        self.callbacks.click = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for GazeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GazeOptions")
            .field("options", &self.options)
            .field("on_gaze_over", &self.callbacks.over.is_some())
            .field("on_gaze_out", &self.callbacks.out.is_some())
            .field("on_gaze_long", &self.callbacks.long.is_some())
            .field("on_gaze_click", &self.callbacks.click.is_some())
            .finish()
    }
}

/// Engine-side bookkeeping for a registered target.
pub(crate) struct Registration {
    pub object: SceneObject,
    pub settings: TargetSettings,
    pub callbacks: GazeCallbacks,
    pub gazeable: bool,
    /// Session time the current dwell started; zero when not gazed.
    pub hit_time: f64,
    /// False once removed while still intersected; dropped after its gaze-out.
    pub listed: bool,
}

impl Registration {
    pub fn new(object: SceneObject, settings: TargetSettings, callbacks: GazeCallbacks) -> Self {
        Self {
            object,
            settings,
            callbacks,
            gazeable: true,
            hit_time: 0.0,
            listed: true,
        }
    }

    /// Whether hit detection and proximity may consider this target.
    pub fn is_selectable(&self, ignore_invisible: bool) -> bool {
        self.gazeable && (!ignore_invisible || self.object.is_visible())
    }
}

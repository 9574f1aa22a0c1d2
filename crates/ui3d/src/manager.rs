//! Reticulum - the gaze selection engine
//!
//! Each frame the host calls [`Reticulum::update`]. The engine casts the aim
//! ray against its registered targets, picks the nearest selectable hit and
//! drives hover transitions, dwell timing and click activation from it.

use crate::components::{Fuse, Indicator, Reticle};
use crate::config::{FuseSettings, ReticleSettings, ReticulumOptions, TargetSettings};
use crate::interaction::{GazeOptions, Raycaster, Registration, SceneObject};
use glam::{Quat, Vec3};
use reticulum_camera::{Camera, Ray};
use reticulum_core::{GazeEventKind, GazeEventRecord, ReticulumError, SessionClock, TargetId};
use reticulum_input::{
    ControllerId, Haptics, InputEvent, InputHub, InputSubscription, NoHaptics, PressSource,
    VibrationRequest,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Which ray drives hit detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimSource {
    /// Screen-center ray of the head camera
    Head,
    /// A hand controller's pointing ray
    Controller(ControllerId),
}

#[derive(Debug)]
enum Command {
    Add(SceneObject, GazeOptions),
    Remove(TargetId),
    SetGazeable(TargetId, bool),
}

/// Deferred registration changes, safe to use from inside gaze callbacks.
///
/// Queued commands are applied at the end of the next [`Reticulum::update`].
#[derive(Debug, Clone, Default)]
pub struct ReticulumCommands {
    queue: Rc<RefCell<Vec<Command>>>,
}

impl ReticulumCommands {
    pub fn add(&self, object: &SceneObject, options: GazeOptions) {
        self.push(Command::Add(object.clone(), options));
    }

    pub fn remove(&self, target: TargetId) {
        self.push(Command::Remove(target));
    }

    pub fn set_gazeable(&self, target: TargetId, gazeable: bool) {
        self.push(Command::SetGazeable(target, gazeable));
    }

    /// Number of queued commands
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    fn push(&self, command: Command) {
        self.queue.borrow_mut().push(command);
    }

    fn take(&self) -> Vec<Command> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

/// Builder for [`Reticulum`]. A camera is required.
#[derive(Default)]
pub struct ReticulumBuilder {
    camera: Option<Camera>,
    options: ReticulumOptions,
    input: Option<InputHub>,
    haptics: Option<Box<dyn Haptics>>,
}

impl ReticulumBuilder {
    pub fn camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn options(mut self, options: ReticulumOptions) -> Self {
        self.options = options;
        self
    }

    /// Input source for press/release and controller events.
    pub fn input(mut self, hub: &InputHub) -> Self {
        self.input = Some(hub.clone());
        self
    }

    pub fn haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Some(Box::new(haptics));
        self
    }

    pub fn build(self) -> Result<Reticulum, ReticulumError> {
        let camera = self.camera.ok_or(ReticulumError::MissingCamera)?;
        let options = self.options;

        let reticle_settings = ReticleSettings::resolve(&options.reticle, camera.far)?;
        let fuse_settings = FuseSettings::resolve(&options.fuse, &reticle_settings)?;

        // Without click events the engine never listens to the hub
        let input = if options.click_events {
            self.input.as_ref().map(InputHub::subscribe)
        } else {
            None
        };

        info!(
            proximity = options.proximity,
            click_events = options.click_events,
            lock_distance = options.lock_distance,
            "reticulum ready"
        );

        Ok(Reticulum {
            flags: EngineFlags {
                proximity: options.proximity,
                click_events: options.click_events,
                lock_distance: options.lock_distance,
            },
            raycaster: Raycaster::with_limits(options.near, options.far),
            clock: SessionClock::new(),
            reticle: Reticle::new(reticle_settings, &camera),
            fuse: Fuse::new(fuse_settings),
            camera,
            registry: HashMap::new(),
            collision_list: Vec::new(),
            intersected: None,
            hit_on_press: false,
            aim: AimSource::Head,
            controllers: BTreeMap::new(),
            input,
            haptics: self.haptics.unwrap_or_else(|| Box::new(NoHaptics)),
            commands: ReticulumCommands::default(),
            events: Vec::new(),
            destroyed: false,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct EngineFlags {
    proximity: bool,
    click_events: bool,
    lock_distance: bool,
}

/// The gaze selection engine
pub struct Reticulum {
    flags: EngineFlags,
    camera: Camera,
    raycaster: Raycaster,
    clock: SessionClock,
    reticle: Reticle,
    fuse: Fuse,
    registry: HashMap<TargetId, Registration>,
    /// Registration order; also the set of targets hit detection considers
    collision_list: Vec<TargetId>,
    intersected: Option<TargetId>,
    /// Whether the reticle was on a target when the current press began
    hit_on_press: bool,
    aim: AimSource,
    controllers: BTreeMap<ControllerId, Option<Ray>>,
    input: Option<InputSubscription>,
    haptics: Box<dyn Haptics>,
    commands: ReticulumCommands,
    events: Vec<GazeEventRecord>,
    destroyed: bool,
}

impl Reticulum {
    pub fn builder() -> ReticulumBuilder {
        ReticulumBuilder::default()
    }

    /// Engine without input or haptics.
    pub fn new(camera: Camera, options: ReticulumOptions) -> Result<Self, ReticulumError> {
        Self::builder().camera(camera).options(options).build()
    }

    /// Register a target. Adding a target that is already registered is
    /// rejected and leaves the existing registration untouched.
    pub fn add(
        &mut self,
        object: &SceneObject,
        options: GazeOptions,
    ) -> Result<(), ReticulumError> {
        self.ensure_alive()?;
        let id = object.id();
        if self.registry.get(&id).is_some_and(|r| r.listed) {
            warn!(target_id = %id, name = object.name(), "duplicate registration rejected");
            return Err(ReticulumError::DuplicateTarget(id));
        }

        let settings = TargetSettings::resolve(
            &options.options,
            self.reticle.settings(),
            self.fuse.settings(),
        )?;
        let mut registration = Registration::new(object.clone(), settings, options.callbacks);

        // Re-added while its pending gaze-out was outstanding: keep the dwell going
        if let Some(retired) = self.registry.remove(&id) {
            registration.hit_time = retired.hit_time;
        }

        self.registry.insert(id, registration);
        self.collision_list.push(id);
        debug!(target_id = %id, name = object.name(), "target registered");
        Ok(())
    }

    /// Unregister a target. Unknown targets are ignored.
    ///
    /// A target removed while gazed gets its gaze-out on the next update.
    pub fn remove(&mut self, target: TargetId) {
        let Some(registration) = self.registry.get_mut(&target) else {
            return;
        };
        if !registration.listed {
            return;
        }

        registration.gazeable = false;
        self.collision_list.retain(|id| *id != target);

        if self.intersected == Some(target) {
            registration.listed = false;
            // A press begun on it can no longer complete a click
            self.hit_on_press = false;
        } else {
            self.registry.remove(&target);
        }
        debug!(target_id = %target, "target removed");
    }

    /// Toggle whether a registered target can be selected.
    pub fn set_gazeable(&mut self, target: TargetId, gazeable: bool) -> Result<(), ReticulumError> {
        match self.registry.get_mut(&target) {
            Some(registration) if registration.listed => {
                registration.gazeable = gazeable;
                Ok(())
            }
            _ => Err(ReticulumError::UnknownTarget(target)),
        }
    }

    /// Per-frame driver.
    pub fn update(&mut self, delta: f32) -> Result<(), ReticulumError> {
        self.ensure_alive()?;
        self.clock.advance(delta);

        self.pump_input();
        self.detect_hit();
        if self.flags.proximity {
            self.proximity();
        }
        self.reticle.update(delta);

        self.apply_commands();
        Ok(())
    }

    /// Process one input event immediately instead of through the hub.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), ReticulumError> {
        self.ensure_alive()?;
        self.process_input(event);
        Ok(())
    }

    /// Detach from the input hub. Any further use returns
    /// [`ReticulumError::Destroyed`].
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(subscription) = self.input.take() {
            subscription.cancel();
        }
        self.reticle.set_visible(false);
        self.fuse.out();
        self.destroyed = true;
        info!(targets = self.collision_list.len(), "reticulum destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Handle for queuing registration changes from callbacks.
    pub fn commands(&self) -> ReticulumCommands {
        self.commands.clone()
    }

    /// Drain the log of fired gaze events.
    pub fn take_events(&mut self) -> Vec<GazeEventRecord> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GazeEventRecord] {
        &self.events
    }

    /// Currently gazed target, if any.
    pub fn intersected(&self) -> Option<TargetId> {
        self.intersected
    }

    pub fn is_registered(&self, target: TargetId) -> bool {
        self.registry.get(&target).is_some_and(|r| r.listed)
    }

    pub fn is_gazeable(&self, target: TargetId) -> Option<bool> {
        self.registry
            .get(&target)
            .filter(|r| r.listed)
            .map(|r| r.gazeable)
    }

    /// Number of targets in the collision list.
    pub fn target_count(&self) -> usize {
        self.collision_list.len()
    }

    pub fn reticle(&self) -> &Reticle {
        &self.reticle
    }

    pub fn fuse(&self) -> &Fuse {
        &self.fuse
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_camera_pose(&mut self, position: Vec3, orientation: Quat) {
        self.camera.position = position;
        self.camera.orientation = orientation;
    }

    /// Seconds on the session clock.
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn aim_source(&self) -> AimSource {
        self.aim
    }

    /// Feed a controller's pointing ray for this frame. Unknown controllers
    /// are treated as connected.
    pub fn set_controller_ray(&mut self, controller: ControllerId, ray: Option<Ray>) {
        self.controllers.insert(controller, ray);
    }

    fn ensure_alive(&self) -> Result<(), ReticulumError> {
        if self.destroyed {
            return Err(ReticulumError::Destroyed);
        }
        Ok(())
    }

    fn pump_input(&mut self) {
        let events = match &self.input {
            Some(subscription) => subscription.drain(),
            None => return,
        };
        for event in events {
            self.process_input(event);
        }
    }

    fn process_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::ControllerConnected(id) => {
                self.controllers.entry(id).or_insert(None);
                debug!(controller = id.0, "controller connected");
            }
            InputEvent::ControllerDisconnected(id) => {
                self.controllers.remove(&id);
                if self.aim == AimSource::Controller(id) {
                    self.aim = AimSource::Head;
                    debug!(controller = id.0, "aim returned to head");
                }
            }
            InputEvent::Press(source) if self.flags.click_events => self.press(source),
            InputEvent::Release(_) if self.flags.click_events => self.release(),
            InputEvent::Press(_) | InputEvent::Release(_) => {}
        }
    }

    fn press(&mut self, source: PressSource) {
        if let PressSource::Controller(id) = source {
            if self.controllers.contains_key(&id) && self.aim != AimSource::Controller(id) {
                self.aim = AimSource::Controller(id);
                // Hover state still belongs to the previous aim
                self.hit_on_press = false;
                debug!(controller = id.0, "aim switched to controller");
                return;
            }
        }
        self.hit_on_press = self.reticle.is_hit();
    }

    fn release(&mut self) {
        let qualifies = self.hit_on_press && self.reticle.is_hit();
        self.hit_on_press = false;
        if let (true, Some(target)) = (qualifies, self.intersected) {
            self.gaze_click(target);
        }
    }

    fn aim_ray(&self) -> Option<Ray> {
        match self.aim {
            AimSource::Head => self.camera.center_ray(),
            AimSource::Controller(id) => match self.controllers.get(&id).copied().flatten() {
                Some(ray) if ray.is_valid() => Some(ray),
                _ => self.camera.center_ray(),
            },
        }
    }

    fn detect_hit(&mut self) {
        let Some(ray) = self.aim_ray() else {
            warn!("no usable aim ray, skipping hit detection");
            return;
        };

        let registry = &self.registry;
        let ignore_invisible = self.reticle.settings().ignore_invisible;
        let hits = self.raycaster.intersect(
            &ray,
            self.camera.position,
            self.collision_list
                .iter()
                .filter_map(|id| registry.get(id).map(|r| (*id, r.object.bounds()))),
        );

        // Nearest first, so a filtered near target never hides a valid far one
        let candidate = hits.iter().map(|hit| hit.target).find(|id| {
            registry
                .get(id)
                .is_some_and(|r| r.is_selectable(ignore_invisible))
        });

        match (candidate, self.intersected) {
            (None, None) => {}
            (None, Some(previous)) => {
                self.intersected = None;
                self.gaze_out(previous);
            }
            (Some(current), Some(previous)) if current == previous => self.gaze_long(current),
            (Some(current), previous) => {
                if let Some(previous) = previous {
                    self.gaze_out(previous);
                }
                self.intersected = Some(current);
                self.gaze_over(current);
            }
        }
    }

    fn proximity(&mut self) {
        let frustum = self.camera.frustum();
        let ignore_invisible = self.reticle.settings().ignore_invisible;
        let show = self
            .collision_list
            .iter()
            .filter_map(|id| self.registry.get(id))
            .any(|r| r.is_selectable(ignore_invisible) && r.object.bounds().in_frustum(&frustum));
        self.reticle.set_visible(show);
    }

    fn gaze_over(&mut self, target: TargetId) {
        let now = self.clock.elapsed();
        let Some(registration) = self.registry.get_mut(&target) else {
            return;
        };
        let settings = registration.settings;

        self.reticle.set_hover_color(settings.hover_color);
        self.fuse
            .over(Some(settings.fuse_duration), Some(settings.fuse_visible));
        self.fuse.set_color(settings.fuse_color);
        registration.hit_time = now;

        vibrate(self.haptics.as_mut(), self.aim, self.reticle.settings().vibrate);
        fire(&mut self.events, registration, now, GazeEventKind::Over);
    }

    fn gaze_long(&mut self, target: TargetId) {
        let now = self.clock.elapsed();
        let Some(registration) = self.registry.get_mut(&target) else {
            return;
        };
        let gaze_time = (now - registration.hit_time) as f32;

        if self.reticle.is_active() {
            self.reticle.set_hit(true);
            if !self.flags.lock_distance {
                let bounds = registration.object.bounds();
                let distance =
                    self.camera.position.distance(bounds.center()) - bounds.bounding_radius();
                self.reticle.set_depth_and_scale(Some(distance), &self.camera);
            }
        }

        // A dwell completed on an earlier frame: start the next cycle
        if self.fuse.is_done() {
            self.fuse.rearm();
        }
        self.fuse.update(gaze_time);

        if gaze_time >= self.fuse.duration() && !self.fuse.is_active() && !self.fuse.is_done() {
            self.fuse.complete();
            vibrate(self.haptics.as_mut(), self.aim, self.fuse.settings().vibrate);
            registration.hit_time = now;
            fire(&mut self.events, registration, now, GazeEventKind::Long);
        }
    }

    fn gaze_out(&mut self, target: TargetId) {
        let now = self.clock.elapsed();
        self.fuse.out();
        self.reticle.set_hit(false);
        self.reticle.set_depth_and_scale(None, &self.camera);

        let retired = match self.registry.get_mut(&target) {
            Some(registration) => {
                registration.hit_time = 0.0;
                fire(&mut self.events, registration, now, GazeEventKind::Out);
                !registration.listed
            }
            None => false,
        };
        if retired {
            self.registry.remove(&target);
        }
    }

    fn gaze_click(&mut self, target: TargetId) {
        let now = self.clock.elapsed();
        let Some(registration) = self.registry.get_mut(&target) else {
            return;
        };
        // Removed or disabled since the last hit test
        if !registration.listed || !registration.gazeable {
            return;
        }

        if registration.settings.click_cancel_fuse {
            registration.hit_time = now;
            self.fuse.cancel();
        }
        fire(&mut self.events, registration, now, GazeEventKind::Click);
    }

    fn apply_commands(&mut self) {
        for command in self.commands.take() {
            let result = match command {
                Command::Add(object, options) => self.add(&object, options),
                Command::Remove(target) => {
                    self.remove(target);
                    Ok(())
                }
                Command::SetGazeable(target, gazeable) => self.set_gazeable(target, gazeable),
            };
            if let Err(err) = result {
                warn!(%err, "deferred command rejected");
            }
        }
    }
}

impl fmt::Debug for Reticulum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reticulum")
            .field("flags", &self.flags)
            .field("elapsed", &self.clock.elapsed())
            .field("targets", &self.collision_list.len())
            .field("intersected", &self.intersected)
            .field("aim", &self.aim)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

/// Record the event and run the matching callback. A panicking callback is
/// logged and does not unwind into the frame.
fn fire(
    events: &mut Vec<GazeEventRecord>,
    registration: &mut Registration,
    time: f64,
    kind: GazeEventKind,
) {
    let target = registration.object.id();
    events.push(GazeEventRecord { time, target, kind });
    debug!(
        target_id = %target,
        name = registration.object.name(),
        event = kind.as_str(),
        time,
        "gaze event"
    );

    let callbacks = &mut registration.callbacks;
    let slot = match kind {
        GazeEventKind::Over => &mut callbacks.over,
        GazeEventKind::Out => &mut callbacks.out,
        GazeEventKind::Long => &mut callbacks.long,
        GazeEventKind::Click => &mut callbacks.click,
    };
    if let Some(callback) = slot.as_mut() {
        if panic::catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
            error!(target_id = %target, event = kind.as_str(), "gaze callback panicked");
        }
    }
}

/// Best-effort pulse on the active aim source. Zero length means off.
fn vibrate(haptics: &mut dyn Haptics, aim: AimSource, duration_ms: u32) {
    if duration_ms == 0 {
        return;
    }
    let controller = match aim {
        AimSource::Head => None,
        AimSource::Controller(id) => Some(id),
    };
    if !haptics.vibrate(VibrationRequest {
        controller,
        duration_ms,
    }) {
        debug!(duration_ms, "haptics unavailable");
    }
}

//! Dwell timer with a progress sweep.

use super::{Indicator, RingGeometry, Transform3D};
use crate::config::FuseSettings;
use glam::{Quat, Vec3};
use reticulum_core::Color;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

const THETA_SEGMENTS: u32 = 32;
const PHI_SEGMENTS: u32 = 3;

/// Progress is a pure function of the elapsed hover time handed to
/// [`Fuse::update`], so it is independent of frame rate.
#[derive(Debug, Clone)]
pub struct Fuse {
    settings: FuseSettings,
    active: bool,
    time_done: bool,
    duration: f32,
    progress: f32,
    visible: bool,
    /// Visibility requested by the last `over`, restored on re-arm.
    shown: bool,
    color: Color,
    transform: Transform3D,
    ring: RingGeometry,
}

impl Fuse {
    pub fn new(settings: FuseSettings) -> Self {
        Self {
            settings,
            active: false,
            time_done: false,
            duration: settings.duration,
            progress: 0.0,
            visible: settings.visible,
            shown: settings.visible,
            color: settings.color,
            // Slightly in front of the reticle and mirrored so the sweep runs clockwise
            transform: Transform3D::new(Vec3::new(0.0, 0.0, 0.0001))
                .with_rotation(Quat::from_rotation_y(PI)),
            ring: RingGeometry::new(
                settings.inner_radius,
                settings.outer_radius,
                THETA_SEGMENTS,
                PHI_SEGMENTS,
                FRAC_PI_2,
                0.0,
            ),
        }
    }

    /// Start accumulating from zero.
    pub fn over(&mut self, duration: Option<f32>, visible: Option<bool>) {
        self.duration = duration.unwrap_or(self.settings.duration);
        self.shown = visible.unwrap_or(self.settings.visible);
        self.start();
    }

    /// Stop accumulating and hide.
    pub fn out(&mut self) {
        self.active = false;
        self.time_done = false;
        self.visible = false;
        self.color = self.settings.color;
        self.set_progress(0.0);
    }

    /// Feed the time elapsed since hover started.
    pub fn update(&mut self, elapsed: f32) {
        if !self.active || self.time_done {
            return;
        }

        let gazed = elapsed / self.duration;
        self.set_progress(gazed);
        if gazed >= 1.0 {
            self.active = false;
        }
    }

    /// Mark the dwell as complete.
    pub(crate) fn complete(&mut self) {
        self.time_done = true;
        if self.settings.hide_after_end {
            self.visible = false;
        }
    }

    /// Start a new dwell cycle with the duration and visibility of the last `over`.
    pub(crate) fn rearm(&mut self) {
        self.start();
    }

    /// Force the sweep to its end without completing the dwell.
    pub(crate) fn cancel(&mut self) {
        self.update(self.duration);
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn settings(&self) -> &FuseSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the current dwell completed and has not been reset.
    pub fn is_done(&self) -> bool {
        self.time_done
    }

    /// Duration of the current dwell in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Sweep fraction in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn ring(&self) -> &RingGeometry {
        &self.ring
    }

    fn start(&mut self) {
        self.active = true;
        self.time_done = false;
        self.visible = self.shown;
        self.set_progress(0.0);
        self.update(0.0);
    }

    fn set_progress(&mut self, gazed: f32) {
        let progress = if gazed.is_nan() { 1.0 } else { gazed.clamp(0.0, 1.0) };
        self.progress = progress;
        self.ring.set_theta_length(progress * TAU);
    }
}

impl Indicator for Fuse {
    fn transform(&self) -> &Transform3D {
        &self.transform
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn color(&self) -> Color {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FuseOptions, ReticleOptions, ReticleSettings};

    fn fuse_with(options: FuseOptions) -> Fuse {
        let reticle = ReticleSettings::resolve(&ReticleOptions::default(), 11.0).unwrap();
        Fuse::new(FuseSettings::resolve(&options, &reticle).unwrap())
    }

    fn fuse() -> Fuse {
        fuse_with(FuseOptions::default())
    }

    #[test]
    fn over_starts_from_zero() {
        let mut fuse = fuse();
        fuse.over(None, None);
        assert!(fuse.is_active());
        assert_eq!(fuse.progress(), 0.0);
        assert_eq!(fuse.duration(), 2.5);
        assert!(fuse.is_visible());
    }

    #[test]
    fn progress_is_elapsed_over_duration() {
        let mut fuse = fuse();
        fuse.over(Some(2.0), None);
        fuse.update(0.5);
        assert!((fuse.progress() - 0.25).abs() < 1e-6);
        assert!((fuse.ring().theta_length - TAU * 0.25).abs() < 1e-5);
    }

    #[test]
    fn reaching_duration_deactivates_without_completing() {
        let mut fuse = fuse();
        fuse.over(Some(1.0), None);
        fuse.update(3.0);
        assert!(!fuse.is_active());
        assert!(!fuse.is_done());
        assert_eq!(fuse.progress(), 1.0);
    }

    #[test]
    fn out_resets_everything() {
        let mut fuse = fuse();
        fuse.over(Some(1.0), Some(true));
        fuse.set_color(Color::from_hex(0xff0000));
        fuse.update(0.5);
        fuse.out();
        assert!(!fuse.is_active());
        assert!(!fuse.is_visible());
        assert_eq!(fuse.progress(), 0.0);
        assert_eq!(fuse.color(), fuse.settings().color);
    }

    #[test]
    fn complete_hides_unless_configured_otherwise() {
        let mut hiding = fuse();
        hiding.over(None, None);
        hiding.complete();
        assert!(hiding.is_done());
        assert!(!hiding.is_visible());

        let mut keeping = fuse_with(FuseOptions {
            hide_after_end: Some(false),
            ..FuseOptions::default()
        });
        keeping.over(None, None);
        keeping.complete();
        assert!(keeping.is_visible());
    }

    #[test]
    fn done_fuse_ignores_updates_until_rearmed() {
        let mut fuse = fuse();
        fuse.over(Some(1.0), Some(true));
        fuse.update(1.0);
        fuse.complete();
        fuse.update(0.2);
        assert_eq!(fuse.progress(), 1.0);

        fuse.rearm();
        assert!(fuse.is_active());
        assert!(fuse.is_visible());
        fuse.update(0.2);
        assert!((fuse.progress() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn cancel_runs_sweep_to_end() {
        let mut fuse = fuse();
        fuse.over(Some(4.0), None);
        fuse.update(1.0);
        fuse.cancel();
        assert!(!fuse.is_active());
        assert!(!fuse.is_done());
    }

    #[test]
    fn hidden_override_applies() {
        let mut fuse = fuse();
        fuse.over(None, Some(false));
        assert!(!fuse.is_visible());
    }
}

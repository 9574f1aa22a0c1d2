//! Screen-center dwell indicator.

use super::{Indicator, RingGeometry, Transform3D};
use crate::config::ReticleSettings;
use glam::{Vec2, Vec3};
use reticulum_camera::Camera;
use reticulum_core::Color;

const THETA_SEGMENTS: u32 = 32;
const PHI_SEGMENTS: u32 = 3;
/// Closest the reticle may sit in front of the near plane.
const NEAR_MARGIN: f32 = 0.1;

/// Camera-attached ring that keeps a constant apparent size and blends from
/// its idle look to its hover look while a target is hit.
#[derive(Debug, Clone)]
pub struct Reticle {
    settings: ReticleSettings,
    active: bool,
    hit: bool,
    /// Morph influence between idle (0) and hover (1).
    blend: f32,
    hover_color: Color,
    color: Color,
    visible: bool,
    transform: Transform3D,
    idle_ring: RingGeometry,
    hover_ring: RingGeometry,
}

impl Reticle {
    pub fn new(settings: ReticleSettings, camera: &Camera) -> Self {
        let mut reticle = Self {
            settings,
            active: true,
            hit: false,
            blend: 0.0,
            hover_color: settings.hover_color,
            color: settings.color,
            visible: settings.visible,
            transform: Transform3D::default(),
            idle_ring: RingGeometry::full(
                settings.inner_radius,
                settings.outer_radius,
                THETA_SEGMENTS,
                PHI_SEGMENTS,
            ),
            hover_ring: RingGeometry::full(
                settings.hover_inner_radius,
                settings.hover_outer_radius,
                THETA_SEGMENTS,
                PHI_SEGMENTS,
            ),
        };
        reticle.set_depth_and_scale(None, camera);
        reticle
    }

    /// Place the reticle at `depth` (rest point when absent or not finite) and
    /// scale it so it renders at the same size at any distance.
    pub fn set_depth_and_scale(&mut self, depth: Option<f32>, camera: &Camera) {
        let z = depth
            .filter(|d| d.is_finite())
            .unwrap_or(self.settings.rest_point)
            .abs();
        let camera_z = camera.position.z;
        let scale = (camera_z - z).abs() - camera_z.abs();

        self.transform.position = Vec3::new(0.0, 0.0, -z.max(camera.near + NEAR_MARGIN));
        self.transform.scale = Vec3::splat(scale);
    }

    /// Advance the idle/hover blend by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        if !self.active {
            return;
        }

        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let acceleration = delta * self.settings.speed;

        // Quantized to 1/1000 so the blend settles instead of jittering at the ends
        self.blend = if self.hit {
            ((self.blend + acceleration).min(1.0) * 1000.0).ceil() / 1000.0
        } else {
            ((self.blend - acceleration).max(0.0) * 1000.0).floor() / 1000.0
        };

        self.color = self.settings.color.lerp(self.hover_color, self.blend);
    }

    pub fn settings(&self) -> &ReticleSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the reticle is over a target.
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub(crate) fn set_hit(&mut self, hit: bool) {
        self.hit = hit;
    }

    /// Morph influence in `[0, 1]`.
    pub fn blend(&self) -> f32 {
        self.blend
    }

    /// Color the blend moves toward while hovering.
    pub fn hover_color(&self) -> Color {
        self.hover_color
    }

    pub(crate) fn set_hover_color(&mut self, color: Color) {
        self.hover_color = color;
    }

    /// Distance in front of the camera.
    pub fn depth(&self) -> f32 {
        -self.transform.position.z
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale.x
    }

    pub fn idle_ring(&self) -> &RingGeometry {
        &self.idle_ring
    }

    pub fn hover_ring(&self) -> &RingGeometry {
        &self.hover_ring
    }

    /// Ring vertices at the current blend.
    pub fn morphed_positions(&self) -> Vec<Vec2> {
        self.idle_ring
            .morph_positions(&self.hover_ring, self.blend)
            .unwrap_or_else(|| self.idle_ring.positions().to_vec())
    }
}

impl Indicator for Reticle {
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

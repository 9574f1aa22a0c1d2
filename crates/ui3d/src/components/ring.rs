//! Flat ring (annulus sector) geometry shared by the reticle and fuse.

use glam::Vec2;

/// Ring mesh in the local XY plane.
///
/// Vertices are laid out band by band from the inner radius outward, each band
/// holding `theta_segments + 1` vertices from `theta_start` through
/// `theta_start + theta_length`.
#[derive(Debug, Clone, PartialEq)]
pub struct RingGeometry {
    /// Inner radius.
    pub inner_radius: f32,
    /// Outer radius.
    pub outer_radius: f32,
    /// Angular subdivisions.
    pub theta_segments: u32,
    /// Radial subdivisions (bands).
    pub phi_segments: u32,
    /// Start angle in radians.
    pub theta_start: f32,
    /// Swept angle in radians.
    pub theta_length: f32,
    positions: Vec<Vec2>,
    indices: Vec<u32>,
}

impl RingGeometry {
    /// Build a ring. Segment counts are floored at 3 angular and 1 radial.
    pub fn new(
        inner_radius: f32,
        outer_radius: f32,
        theta_segments: u32,
        phi_segments: u32,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        let mut ring = Self {
            inner_radius,
            outer_radius,
            theta_segments: theta_segments.max(3),
            phi_segments: phi_segments.max(1),
            theta_start,
            theta_length,
            positions: Vec::new(),
            indices: Vec::new(),
        };
        ring.rebuild_positions();
        ring.indices = ring.build_indices();
        ring
    }

    /// Full circle ring.
    pub fn full(
        inner_radius: f32,
        outer_radius: f32,
        theta_segments: u32,
        phi_segments: u32,
    ) -> Self {
        Self::new(
            inner_radius,
            outer_radius,
            theta_segments,
            phi_segments,
            0.0,
            std::f32::consts::TAU,
        )
    }

    /// Change the swept angle, keeping topology. Only positions move.
    pub fn set_theta_length(&mut self, theta_length: f32) {
        self.theta_length = theta_length;
        self.rebuild_positions();
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Triangle indices (two triangles per quad).
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Blend vertex positions toward `target` (morph influence `t`).
    ///
    /// Returns `None` when the two rings have different topology.
    pub fn morph_positions(&self, target: &RingGeometry, t: f32) -> Option<Vec<Vec2>> {
        if self.positions.len() != target.positions.len() {
            return None;
        }
        // Endpoints are exact; lerp at 1.0 can be off by one rounding step
        if t >= 1.0 {
            return Some(target.positions.clone());
        }
        let t = t.max(0.0);
        Some(
            self.positions
                .iter()
                .zip(&target.positions)
                .map(|(a, b)| a.lerp(*b, t))
                .collect(),
        )
    }

    fn rebuild_positions(&mut self) {
        let radius_step = (self.outer_radius - self.inner_radius) / self.phi_segments as f32;
        let mut positions =
            Vec::with_capacity(((self.phi_segments + 1) * (self.theta_segments + 1)) as usize);

        let mut radius = self.inner_radius;
        for _ in 0..=self.phi_segments {
            for i in 0..=self.theta_segments {
                let segment =
                    self.theta_start + (i as f32 / self.theta_segments as f32) * self.theta_length;
                positions.push(Vec2::new(radius * segment.cos(), radius * segment.sin()));
            }
            radius += radius_step;
        }
        self.positions = positions;
    }

    fn build_indices(&self) -> Vec<u32> {
        let stride = self.theta_segments + 1;
        let mut indices =
            Vec::with_capacity((self.phi_segments * self.theta_segments * 6) as usize);
        for j in 0..self.phi_segments {
            let band = j * stride;
            for i in 0..self.theta_segments {
                let a = band + i;
                let b = band + stride + i;
                let c = band + stride + i + 1;
                let d = band + i + 1;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        indices
    }
}

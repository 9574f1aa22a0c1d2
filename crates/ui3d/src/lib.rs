//! Gaze dwell selection for head-mounted and magic-window 3D scenes.
//!
//! The engine casts a ray from the viewer (or an active hand controller)
//! every frame, picks the nearest selectable target and turns sustained
//! attention into discrete events.
//!
//! # Features
//!
//! - **Reticle**: constant apparent size at any depth, idle/hover blend
//! - **Fuse**: frame-rate independent dwell timer with a progress sweep
//! - **Selection**: nearest-hit-wins with gazeable/visibility filtering,
//!   repeatable long gaze, drag-safe click activation and proximity mode
//!
//! # Example
//!
//! ```rust,no_run
//! use reticulum_camera::Camera;
//! use reticulum_ui3d::{Bounds, GazeOptions, Reticulum, ReticulumOptions, SceneObject};
//! use glam::Vec3;
//!
//! let mut engine = Reticulum::new(Camera::default(), ReticulumOptions::default())?;
//! let door = SceneObject::named("door", Bounds::sphere(Vec3::new(0.0, 0.0, -3.0), 0.5));
//! engine.add(&door, GazeOptions::new().on_gaze_long(|| println!("open")))?;
//!
//! // In your frame loop:
//! engine.update(1.0 / 60.0)?;
//! # Ok::<(), reticulum_core::ReticulumError>(())
//! ```

pub mod components;
pub mod config;
pub mod interaction;
pub mod manager;

// Re-export commonly used types
pub use components::{Fuse, Indicator, Reticle, RingGeometry, Transform3D};
pub use config::{
    FuseOptions, FuseSettings, ReticleHoverOptions, ReticleOptions, ReticleSettings,
    ReticulumOptions, TargetOptions, TargetSettings,
};
pub use interaction::{
    Aabb, Bounds, GazeCallback, GazeOptions, Intersection, Raycaster, SceneObject,
};
pub use manager::{AimSource, Reticulum, ReticulumBuilder, ReticulumCommands};

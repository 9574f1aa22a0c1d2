//! Gaze interaction: raycasting and target registration.

mod raycaster;
mod target;

pub use raycaster::{
    ray_sphere, raycast_billboard_quad, Aabb, Bounds, Intersection, Raycaster,
};
pub use target::{GazeCallback, GazeOptions, SceneObject};

pub(crate) use target::Registration;

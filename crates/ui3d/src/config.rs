//! Engine options and their resolution into fully-populated settings.
//!
//! Options mirror what a host writes in configuration: every field is optional.
//! They are resolved once, at construction (engine-wide) or at `add` time
//! (per target), using explicit value → contextual default → built-in default.

use reticulum_core::{Color, ReticulumError};
use serde::{Deserialize, Serialize};

/// Default idle and hover color of the reticle and fuse.
pub const DEFAULT_COLOR: u32 = 0x00fff6;

/// Top-level engine options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReticulumOptions {
    /// Hide the reticle whenever no gazeable target is inside the view frustum.
    pub proximity: bool,
    /// Subscribe to press/release input for click activation.
    pub click_events: bool,
    /// Freeze reticle depth instead of tracking the gazed target.
    pub lock_distance: bool,
    /// Minimum hit distance; ignored unless `>= 0`.
    pub near: Option<f32>,
    /// Maximum hit distance; ignored unless `>= 0`.
    pub far: Option<f32>,
    pub reticle: ReticleOptions,
    pub fuse: FuseOptions,
}

impl Default for ReticulumOptions {
    fn default() -> Self {
        Self {
            proximity: false,
            click_events: true,
            lock_distance: false,
            near: None,
            far: None,
            reticle: ReticleOptions::default(),
            fuse: FuseOptions::default(),
        }
    }
}

/// Reticle appearance and behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReticleOptions {
    /// Idle color as `0xRRGGBB`.
    pub color: Option<u32>,
    pub inner_radius: Option<f32>,
    pub outer_radius: Option<f32>,
    pub visible: Option<bool>,
    /// Gaze-over pulse length in milliseconds; 0 disables it.
    pub vibrate: Option<u32>,
    /// Idle/hover blend rate per second.
    pub speed: Option<f32>,
    /// Depth used when nothing is hit. Defaults to the camera far plane.
    pub rest_point: Option<f32>,
    /// Skip invisible targets during hit detection and proximity.
    pub ignore_invisible: Option<bool>,
    pub hover: ReticleHoverOptions,
}

/// Hovered reticle appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReticleHoverOptions {
    pub color: Option<u32>,
    pub inner_radius: Option<f32>,
    pub outer_radius: Option<f32>,
}

/// Dwell timer appearance and behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuseOptions {
    pub color: Option<u32>,
    /// Falls back to the reticle hover inner radius.
    pub inner_radius: Option<f32>,
    /// Falls back to the reticle hover outer radius.
    pub outer_radius: Option<f32>,
    pub visible: Option<bool>,
    /// Dwell time in seconds before a long gaze fires.
    pub duration: Option<f32>,
    /// Long-gaze pulse length in milliseconds.
    pub vibrate: Option<u32>,
    /// Whether a click restarts the dwell timer, for targets that do not say.
    pub click_cancel: Option<bool>,
    /// Hide the fuse once a dwell completes.
    pub hide_after_end: Option<bool>,
}

/// Per-target data options. Callbacks live on [`crate::GazeOptions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetOptions {
    pub reticle_hover_color: Option<u32>,
    pub fuse_color: Option<u32>,
    pub fuse_duration: Option<f32>,
    pub fuse_visible: Option<bool>,
    pub click_cancel_fuse: Option<bool>,
}

/// Resolved reticle settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReticleSettings {
    pub color: Color,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub visible: bool,
    pub vibrate: u32,
    pub speed: f32,
    pub rest_point: f32,
    pub ignore_invisible: bool,
    pub hover_color: Color,
    pub hover_inner_radius: f32,
    pub hover_outer_radius: f32,
}

impl ReticleSettings {
    /// Resolve against the camera's far plane (the rest point fallback).
    pub fn resolve(options: &ReticleOptions, camera_far: f32) -> Result<Self, ReticulumError> {
        Ok(Self {
            color: Color::from_hex(options.color.unwrap_or(DEFAULT_COLOR)),
            inner_radius: non_negative("reticle.inner_radius", options.inner_radius, 0.0004)?,
            outer_radius: non_negative("reticle.outer_radius", options.outer_radius, 0.003)?,
            visible: options.visible.unwrap_or(true),
            vibrate: options.vibrate.unwrap_or(50),
            speed: non_negative("reticle.speed", options.speed, 5.0)?,
            rest_point: finite("reticle.rest_point", options.rest_point, camera_far)?,
            ignore_invisible: options.ignore_invisible.unwrap_or(true),
            hover_color: Color::from_hex(options.hover.color.unwrap_or(DEFAULT_COLOR)),
            hover_inner_radius: non_negative(
                "reticle.hover.inner_radius",
                options.hover.inner_radius,
                0.03,
            )?,
            hover_outer_radius: non_negative(
                "reticle.hover.outer_radius",
                options.hover.outer_radius,
                0.036,
            )?,
        })
    }
}

/// Resolved fuse settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuseSettings {
    pub color: Color,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub visible: bool,
    pub duration: f32,
    pub vibrate: u32,
    pub click_cancel: bool,
    pub hide_after_end: bool,
}

impl FuseSettings {
    /// Radii fall back to the reticle's hover ring before the built-in zero.
    pub fn resolve(
        options: &FuseOptions,
        reticle: &ReticleSettings,
    ) -> Result<Self, ReticulumError> {
        Ok(Self {
            color: Color::from_hex(options.color.unwrap_or(DEFAULT_COLOR)),
            inner_radius: non_negative(
                "fuse.inner_radius",
                options.inner_radius,
                reticle.hover_inner_radius,
            )?,
            outer_radius: non_negative(
                "fuse.outer_radius",
                options.outer_radius,
                reticle.hover_outer_radius,
            )?,
            visible: options.visible.unwrap_or(true),
            duration: positive("fuse.duration", options.duration, 2.5)?,
            vibrate: options.vibrate.unwrap_or(100),
            click_cancel: options.click_cancel.unwrap_or(false),
            hide_after_end: options.hide_after_end.unwrap_or(true),
        })
    }
}

/// Per-target settings, fully resolved at registration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSettings {
    pub hover_color: Color,
    pub fuse_color: Color,
    pub fuse_duration: f32,
    pub fuse_visible: bool,
    pub click_cancel_fuse: bool,
}

impl TargetSettings {
    pub fn resolve(
        options: &TargetOptions,
        reticle: &ReticleSettings,
        fuse: &FuseSettings,
    ) -> Result<Self, ReticulumError> {
        Ok(Self {
            hover_color: options
                .reticle_hover_color
                .map(Color::from_hex)
                .unwrap_or(reticle.hover_color),
            fuse_color: options.fuse_color.map(Color::from_hex).unwrap_or(fuse.color),
            fuse_duration: positive("fuse_duration", options.fuse_duration, fuse.duration)?,
            fuse_visible: options.fuse_visible.unwrap_or(fuse.visible),
            click_cancel_fuse: options.click_cancel_fuse.unwrap_or(fuse.click_cancel),
        })
    }
}

fn finite(name: &'static str, value: Option<f32>, default: f32) -> Result<f32, ReticulumError> {
    match value {
        Some(v) if !v.is_finite() => {
            Err(ReticulumError::invalid(name, format!("{v} is not finite")))
        }
        Some(v) => Ok(v),
        None => Ok(default),
    }
}

fn non_negative(
    name: &'static str,
    value: Option<f32>,
    default: f32,
) -> Result<f32, ReticulumError> {
    let v = finite(name, value, default)?;
    if v < 0.0 {
        return Err(ReticulumError::invalid(name, format!("{v} is negative")));
    }
    Ok(v)
}

fn positive(name: &'static str, value: Option<f32>, default: f32) -> Result<f32, ReticulumError> {
    let v = non_negative(name, value, default)?;
    if v == 0.0 {
        return Err(ReticulumError::invalid(name, "must be greater than zero"));
    }
    Ok(v)
}

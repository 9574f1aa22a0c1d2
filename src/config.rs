use anyhow::{Context, Result};
use glam::Vec3;
use reticulum_camera::Camera;
use reticulum_ui3d::ReticulumOptions;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_SESSION_PATH: &str = "config/session.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frames per second the headless session steps at.
    pub fps: u32,
    pub camera: CameraConfig,
    pub engine: ReticulumOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            camera: CameraConfig::default(),
            engine: ReticulumOptions::default(),
        }
    }
}

/// Viewer camera; defaults match a phone or headset magic-window scene.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 11.0,
            position: [0.0, 0.0, 0.01],
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera::new(Vec3::from_array(self.position)).with_projection(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

impl SessionConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SessionConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SessionConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_SESSION_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Session config not found at {}. Using defaults",
                        path.display()
                    );
                }
                SessionConfig::default()
            }
        }
    }

    /// Save session configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self).context("Failed to serialize session config")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "reticulum-{name}-{}.toml",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = SessionConfig::load_from_path(&temp_path("missing"));
        assert_eq!(cfg, SessionConfig::default());
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let path = temp_path("garbage");
        fs::write(&path, "fps = [not toml").unwrap();
        assert_eq!(SessionConfig::load_from_path(&path), SessionConfig::default());
    }

    #[test]
    fn save_then_load_keeps_overrides() {
        let path = temp_path("roundtrip");
        let mut cfg = SessionConfig::default();
        cfg.fps = 30;
        cfg.engine.proximity = true;
        cfg.engine.fuse.duration = Some(1.5);
        cfg.engine.reticle.hover.color = Some(0xcc0000);
        cfg.save_to_path(&path).unwrap();

        let loaded = SessionConfig::load_from_path(&path);
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = temp_path("partial");
        fs::write(&path, "[engine.fuse]\nduration = 0.75\n").unwrap();
        let cfg = SessionConfig::load_from_path(&path);
        assert_eq!(cfg.fps, 60);
        assert_eq!(cfg.engine.fuse.duration, Some(0.75));
        assert!(cfg.engine.click_events);
    }

    #[test]
    fn camera_config_builds_projection() {
        let camera = CameraConfig::default().to_camera();
        assert!((camera.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(camera.far, 11.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 0.01));
    }
}

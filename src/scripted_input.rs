use anyhow::{bail, Context, Result};
use glam::{Vec2, Vec3};
use reticulum_ui3d::{Aabb, Bounds, TargetOptions};
use serde::Deserialize;
use std::collections::HashSet;
use std::{fs, path::Path};

/// Slack for step boundaries so fixed-step float sums do not miss a frame.
const STEP_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Deserialize)]
pub struct GazeScript {
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    pub steps: Vec<GazeStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetSpec {
    pub name: String,
    pub bounds: BoundsSpec,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub gazeable: bool,
    #[serde(default, flatten)]
    pub options: TargetOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BoundsSpec {
    Sphere { center: [f32; 3], radius: f32 },
    Box { center: [f32; 3], size: [f32; 3] },
    Billboard { center: [f32; 3], width: f32, height: f32 },
}

impl BoundsSpec {
    pub fn to_bounds(&self) -> Bounds {
        match *self {
            Self::Sphere { center, radius } => Bounds::sphere(Vec3::from_array(center), radius),
            Self::Box { center, size } => Bounds::Box(Aabb::from_center_size(
                Vec3::from_array(center),
                Vec3::from_array(size),
            )),
            Self::Billboard {
                center,
                width,
                height,
            } => Bounds::Billboard {
                center: Vec3::from_array(center),
                size: Vec2::new(width, height),
            },
        }
    }
}

/// One timed step. Actions apply once, on the step's first frame.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GazeStep {
    pub duration: f32,
    /// Head yaw in degrees (positive turns left).
    #[serde(default)]
    pub yaw: f32,
    /// Head pitch in degrees (positive looks up).
    #[serde(default)]
    pub pitch: f32,
    #[serde(default)]
    pub press: bool,
    #[serde(default)]
    pub release: bool,
    #[serde(default)]
    pub hide: Vec<String>,
    #[serde(default)]
    pub show: Vec<String>,
    #[serde(default)]
    pub disable: Vec<String>,
    #[serde(default)]
    pub enable: Vec<String>,
}

impl GazeStep {
    fn referenced_names(&self) -> impl Iterator<Item = &String> {
        self.hide
            .iter()
            .chain(&self.show)
            .chain(&self.disable)
            .chain(&self.enable)
    }
}

fn default_true() -> bool {
    true
}

impl GazeScript {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read gaze script {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Invalid gaze script {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let script: GazeScript = serde_json::from_str(contents)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            bail!("gaze script contains no steps");
        }

        let mut names = HashSet::new();
        for target in &self.targets {
            if !names.insert(target.name.as_str()) {
                bail!("duplicate target name `{}`", target.name);
            }
        }

        for (i, step) in self.steps.iter().enumerate() {
            if !step.duration.is_finite() || step.duration < 0.0 {
                bail!("step {i}: duration must be a non-negative number");
            }
            if let Some(name) = step.referenced_names().find(|n| !names.contains(n.as_str())) {
                bail!("step {i}: unknown target `{name}`");
            }
        }
        Ok(())
    }
}

/// The step active this frame, and whether this is its first frame.
#[derive(Debug, Clone, Copy)]
pub struct ScriptFrame<'a> {
    pub index: usize,
    pub step: &'a GazeStep,
    pub entered: bool,
}

pub struct GazeScriptPlayer {
    steps: Vec<GazeStep>,
    index: usize,
    time_in_step: f32,
    entered: bool,
}

impl GazeScriptPlayer {
    pub fn new(steps: Vec<GazeStep>) -> Self {
        Self {
            steps,
            index: 0,
            time_in_step: 0.0,
            entered: false,
        }
    }

    /// Step for the next frame of length `dt`, or `None` once the script ended.
    /// Every step gets at least one frame.
    pub fn advance(&mut self, dt: f32) -> Option<ScriptFrame<'_>> {
        let index = self.index;
        if index >= self.steps.len() {
            return None;
        }

        let entered = !self.entered;
        self.entered = true;
        self.time_in_step += dt;

        let duration = self.steps[index].duration;
        if self.time_in_step + STEP_EPSILON >= duration {
            self.time_in_step = (self.time_in_step - duration).max(0.0);
            self.index += 1;
            self.entered = false;
        }

        Some(ScriptFrame {
            index,
            step: &self.steps[index],
            entered,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "targets": [
            { "name": "door", "bounds": { "shape": "sphere", "center": [0, 0, -2], "radius": 0.5 },
              "fuse_duration": 1.0 },
            { "name": "sign",
              "bounds": { "shape": "billboard", "center": [2, 0, -2], "width": 1, "height": 0.5 },
              "visible": false }
        ],
        "steps": [
            { "duration": 0.5 },
            { "duration": 1.0, "yaw": -45, "show": ["sign"], "press": true }
        ]
    }"#;

    #[test]
    fn parses_targets_and_steps() {
        let script = GazeScript::from_json(SCRIPT).unwrap();
        assert_eq!(script.targets.len(), 2);
        assert_eq!(script.targets[0].options.fuse_duration, Some(1.0));
        assert!(script.targets[0].visible);
        assert!(!script.targets[1].visible);
        assert!(matches!(
            script.targets[1].bounds.to_bounds(),
            Bounds::Billboard { .. }
        ));
        assert_eq!(script.steps[1].yaw, -45.0);
        assert!(script.steps[1].press);
        assert!(!script.steps[1].release);
    }

    #[test]
    fn rejects_unknown_names_and_empty_scripts() {
        let unknown = r#"{ "steps": [ { "duration": 1.0, "hide": ["ghost"] } ] }"#;
        assert!(GazeScript::from_json(unknown).is_err());
        assert!(GazeScript::from_json(r#"{ "steps": [] }"#).is_err());
        let negative = r#"{ "steps": [ { "duration": -1.0 } ] }"#;
        assert!(GazeScript::from_json(negative).is_err());
    }

    #[test]
    fn player_enters_each_step_once() {
        let script = GazeScript::from_json(SCRIPT).unwrap();
        let mut player = GazeScriptPlayer::new(script.steps);
        let mut entered = Vec::new();
        let mut frames = 0;
        while let Some(frame) = player.advance(0.25) {
            if frame.entered {
                entered.push(frame.index);
            }
            frames += 1;
        }
        assert_eq!(entered, vec![0, 1]);
        assert_eq!(frames, 6);
        assert!(player.is_finished());
    }

    #[test]
    fn zero_length_step_still_gets_a_frame() {
        let mut player = GazeScriptPlayer::new(vec![
            GazeStep::default(),
            GazeStep {
                duration: 0.1,
                ..GazeStep::default()
            },
        ]);
        let first = player.advance(1.0 / 60.0).unwrap();
        assert!(first.entered);
        assert_eq!(first.index, 0);
        let second = player.advance(1.0 / 60.0).unwrap();
        assert_eq!(second.index, 1);
        assert!(second.entered);
    }
}

use crate::config::SessionConfig;
use crate::scripted_input::{GazeScript, GazeScriptPlayer, GazeStep};
use anyhow::{Context, Result};
use reticulum_core::{GazeEventKind, GazeEventRecord, TargetId};
use reticulum_input::{InputEvent, InputHub, PressSource};
use reticulum_testkit::{FrameDriver, JsonlSink};
use reticulum_ui3d::{GazeOptions, Reticulum, SceneObject};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{debug, info};

pub struct HeadlessConfig {
    pub session: SessionConfig,
    pub script: GazeScript,
    pub events: Option<PathBuf>,
    pub max_frames: Option<u64>,
}

/// Per-target event tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub over: u32,
    pub out: u32,
    pub long: u32,
    pub click: u32,
}

impl EventCounts {
    fn record(&mut self, kind: GazeEventKind) {
        let slot = match kind {
            GazeEventKind::Over => &mut self.over,
            GazeEventKind::Out => &mut self.out,
            GazeEventKind::Long => &mut self.long,
            GazeEventKind::Click => &mut self.click,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub frames: u64,
    pub elapsed: f64,
    pub script_finished: bool,
    /// Keyed by target name; every scripted target appears.
    pub targets: BTreeMap<String, EventCounts>,
    pub events: Vec<GazeEventRecord>,
}

struct Scene {
    objects: HashMap<String, SceneObject>,
    names: HashMap<TargetId, String>,
}

impl Scene {
    fn object(&self, name: &str) -> Result<&SceneObject> {
        self.objects
            .get(name)
            .with_context(|| format!("unknown target `{name}`"))
    }

    fn name_of(&self, id: TargetId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

pub fn run(cfg: HeadlessConfig) -> Result<SessionSummary> {
    let hub = InputHub::new();
    let mut engine = Reticulum::builder()
        .camera(cfg.session.camera.to_camera())
        .options(cfg.session.engine.clone())
        .input(&hub)
        .build()
        .context("Failed to build selection engine")?;

    let scene = populate(&mut engine, &cfg.script)?;
    let mut sink = cfg.events.as_ref().map(JsonlSink::create).transpose()?;

    let mut targets: BTreeMap<String, EventCounts> = scene
        .objects
        .keys()
        .map(|name| (name.clone(), EventCounts::default()))
        .collect();
    let mut events = Vec::new();

    let mut driver = FrameDriver::new(cfg.session.fps);
    let mut player = GazeScriptPlayer::new(cfg.script.steps.clone());
    info!(
        fps = cfg.session.fps,
        targets = scene.objects.len(),
        steps = cfg.script.steps.len(),
        "headless session started"
    );

    loop {
        if cfg.max_frames.is_some_and(|max| driver.frames() >= max) {
            info!(frames = driver.frames(), "frame limit reached");
            break;
        }
        let Some(frame) = player.advance(driver.dt()) else {
            break;
        };
        if frame.entered {
            debug!(step = frame.index, "entering step");
            apply_step(frame.step, &mut engine, &hub, &scene)?;
        }

        driver.step(|dt| engine.update(dt))?;

        for event in engine.take_events() {
            let name = scene.name_of(event.target);
            info!(
                target_name = %name,
                event = event.kind.as_str(),
                time = event.time,
                "gaze event"
            );
            if let Some(sink) = sink.as_mut() {
                sink.write(&event)?;
            }
            targets.entry(name).or_default().record(event.kind);
            events.push(event);
        }
    }

    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }
    engine.destroy();

    Ok(SessionSummary {
        frames: driver.frames(),
        elapsed: engine.elapsed(),
        script_finished: player.is_finished(),
        targets,
        events,
    })
}

fn populate(engine: &mut Reticulum, script: &GazeScript) -> Result<Scene> {
    let mut objects = HashMap::new();
    let mut names = HashMap::new();

    for spec in &script.targets {
        let object = SceneObject::named(&spec.name, spec.bounds.to_bounds());
        object.set_visible(spec.visible);
        engine
            .add(&object, GazeOptions::from_options(spec.options.clone()))
            .with_context(|| format!("Failed to register target `{}`", spec.name))?;
        if !spec.gazeable {
            engine.set_gazeable(object.id(), false)?;
        }
        names.insert(object.id(), spec.name.clone());
        objects.insert(spec.name.clone(), object);
    }

    Ok(Scene { objects, names })
}

fn apply_step(
    step: &GazeStep,
    engine: &mut Reticulum,
    hub: &InputHub,
    scene: &Scene,
) -> Result<()> {
    engine
        .camera_mut()
        .set_yaw_pitch(step.yaw.to_radians(), step.pitch.to_radians());

    for name in &step.hide {
        scene.object(name)?.set_visible(false);
    }
    for name in &step.show {
        scene.object(name)?.set_visible(true);
    }
    for name in &step.disable {
        engine.set_gazeable(scene.object(name)?.id(), false)?;
    }
    for name in &step.enable {
        engine.set_gazeable(scene.object(name)?.id(), true)?;
    }

    // Queued on the hub; the engine drains them at the start of its next update
    if step.press {
        hub.dispatch(InputEvent::Press(PressSource::Mouse));
    }
    if step.release {
        hub.dispatch(InputEvent::Release(PressSource::Mouse));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(json: &str, session: SessionConfig) -> SessionSummary {
        run(HeadlessConfig {
            session,
            script: GazeScript::from_json(json).unwrap(),
            events: None,
            max_frames: None,
        })
        .unwrap()
    }

    #[test]
    fn dwell_and_look_away() {
        let mut session = SessionConfig::default();
        session.fps = 10;
        let summary = run_script(
            r#"{
                "targets": [
                    { "name": "door",
                      "bounds": { "shape": "sphere", "center": [0, 0, -3], "radius": 0.5 },
                      "fuse_duration": 1.0 }
                ],
                "steps": [
                    { "duration": 1.5 },
                    { "duration": 0.5, "yaw": 180 }
                ]
            }"#,
            session,
        );

        let door = summary.targets["door"];
        assert_eq!(door.over, 1);
        assert_eq!(door.long, 1);
        assert_eq!(door.out, 1);
        assert!(summary.script_finished);
        assert_eq!(summary.frames, 20);
    }

    #[test]
    fn frame_limit_stops_early() {
        let summary = run(HeadlessConfig {
            session: SessionConfig::default(),
            script: GazeScript::from_json(r#"{ "steps": [ { "duration": 10.0 } ] }"#).unwrap(),
            events: None,
            max_frames: Some(5),
        })
        .unwrap();
        assert_eq!(summary.frames, 5);
        assert!(!summary.script_finished);
    }
}

//! Property tests for target selection and the indicator math
//!
//! Targets are placed on the view axis at random distances with random
//! gazeable/visible flags; the engine must always pick the nearest valid one.

use glam::Vec3;
use proptest::prelude::*;
use reticulum_camera::{Camera, Ray};
use reticulum_core::GazeEventKind;
use reticulum_testkit::EventRecorder;
use reticulum_ui3d::{Bounds, GazeOptions, Raycaster, Reticulum, ReticulumOptions, SceneObject};

const RADIUS: f32 = 0.25;

fn target_strategy() -> impl Strategy<Value = (f32, bool, bool)> {
    // distance, gazeable, visible
    (1.0f32..50.0, any::<bool>(), any::<bool>())
}

proptest! {
    /// Property: the intersected target is the nearest gazeable and visible one
    #[test]
    fn nearest_valid_target_wins(
        targets in prop::collection::vec(target_strategy(), 1..8),
    ) {
        let recorder = EventRecorder::new();
        let mut engine = Reticulum::new(Camera::default(), ReticulumOptions::default()).unwrap();

        let mut objects = Vec::new();
        for (i, (distance, gazeable, visible)) in targets.iter().enumerate() {
            let object = SceneObject::named(
                format!("t{i}"),
                Bounds::sphere(Vec3::new(0.0, 0.0, -distance), RADIUS),
            );
            object.set_visible(*visible);
            let label = object.name().to_string();
            let options =
                GazeOptions::new().on_gaze_over(recorder.callback(&label, GazeEventKind::Over));
            engine.add(&object, options).unwrap();
            engine.set_gazeable(object.id(), *gazeable).unwrap();
            objects.push((object, *distance, *gazeable && *visible));
        }

        engine.update(0.1).unwrap();

        let expected = objects
            .iter()
            .filter(|(_, _, valid)| *valid)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(object, _, _)| object.id());
        prop_assert_eq!(engine.intersected(), expected);

        // Nobody but the winner heard anything
        for (object, _, _) in &objects {
            let heard = recorder.touched(object.name());
            prop_assert_eq!(heard, Some(object.id()) == expected);
        }
    }

    /// Property: ray hits come back sorted by distance
    #[test]
    fn raycaster_orders_hits(
        distances in prop::collection::vec(1.0f32..100.0, 0..12),
    ) {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let targets: Vec<_> = distances
            .iter()
            .map(|d| {
                let bounds = Bounds::sphere(Vec3::new(0.0, 0.0, -d), RADIUS);
                (reticulum_core::TargetId::next(), bounds)
            })
            .collect();
        let hits = Raycaster::default().intersect(&ray, Vec3::ZERO, targets);

        prop_assert_eq!(hits.len(), distances.len());
        for pair in hits.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
        }
    }

    /// Property: removing a target any number of times never errors and leaves it unregistered
    #[test]
    fn repeated_remove_is_harmless(times in 1usize..5, gaze_first in any::<bool>()) {
        let mut engine = Reticulum::new(Camera::default(), ReticulumOptions::default()).unwrap();
        let object = SceneObject::new(Bounds::sphere(Vec3::new(0.0, 0.0, -2.0), RADIUS));
        engine.add(&object, GazeOptions::new()).unwrap();
        if gaze_first {
            engine.update(0.1).unwrap();
        }

        for _ in 0..times {
            engine.remove(object.id());
        }
        engine.update(0.1).unwrap();

        prop_assert!(!engine.is_registered(object.id()));
        prop_assert_eq!(engine.intersected(), None);
        let outs = engine
            .events()
            .iter()
            .filter(|e| e.kind == GazeEventKind::Out)
            .count();
        prop_assert_eq!(outs, usize::from(gaze_first));
    }

    /// Property: the reticle blend stays in [0, 1] for any frame deltas
    #[test]
    fn reticle_blend_stays_in_range(
        deltas in prop::collection::vec(-1.0f32..1.0, 1..40),
    ) {
        let mut engine = Reticulum::new(Camera::default(), ReticulumOptions::default()).unwrap();
        let object = SceneObject::new(Bounds::sphere(Vec3::new(0.0, 0.0, -3.0), RADIUS));
        engine.add(&object, GazeOptions::new()).unwrap();

        for (i, dt) in deltas.iter().enumerate() {
            object.set_visible(i % 7 < 4);
            engine.update(*dt).unwrap();
            let blend = engine.reticle().blend();
            prop_assert!((0.0..=1.0).contains(&blend));
        }
    }

    /// Property: the reticle never sits closer than the near plane margin
    #[test]
    fn reticle_depth_clamped(distance in 0.3f32..20.0, radius in 0.01f32..0.25) {
        let mut engine = Reticulum::new(Camera::default(), ReticulumOptions::default()).unwrap();
        let object = SceneObject::new(Bounds::sphere(Vec3::new(0.0, 0.0, -distance), radius));
        engine.add(&object, GazeOptions::new()).unwrap();
        engine.update(0.1).unwrap();
        engine.update(0.1).unwrap();

        let near = engine.camera().near;
        prop_assert!(engine.reticle().depth() >= near + 0.1 - 1e-6);
        prop_assert!(engine.reticle().depth().is_finite());
    }
}

//! Session-level behavior of the viewer, driven through the recording backend

use primview::prelude::*;

const TRIANGLE_OBJ: &[u8] = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

fn viewer_with(config: ViewerConfig) -> ViewerState<RecordingBackend> {
    ViewerState::new(
        ViewerConfig {
            seed: Some(7),
            ..config
        },
        RecordingBackend::new(),
    )
}

fn stopped_viewer() -> ViewerState<RecordingBackend> {
    viewer_with(ViewerConfig {
        initial_animation: AnimationState::Stopped,
        ..ViewerConfig::default()
    })
}

#[test]
fn selecting_by_offset_cycles_back_to_start() {
    for offset in [-13i64, -1, 1, 3, 10, 27] {
        let mut viewer = stopped_viewer();
        viewer.select_by_index(4);
        let start = viewer.current_index();
        for _ in 0..viewer.catalog().len() {
            let next = viewer.current_index() as i64 + offset;
            viewer.select_by_index(next);
        }
        assert_eq!(viewer.current_index(), start, "offset {offset}");
    }
}

#[test]
fn opacity_passes_through_by_default() {
    let mut viewer = stopped_viewer();
    for value in [-0.5, 0.0, 0.3, 1.0, 2.5] {
        viewer.set_opacity(value);
        assert_eq!(viewer.material().opacity, value);
    }
}

#[test]
fn legacy_opacity_is_clamped() {
    let mut viewer = viewer_with(ViewerConfig::legacy());
    viewer.set_opacity(-0.5);
    assert_eq!(viewer.material().opacity, 0.0);
    viewer.set_opacity(2.5);
    assert_eq!(viewer.material().opacity, 1.0);
    viewer.set_opacity(0.4);
    assert_eq!(viewer.material().opacity, 0.4);
}

#[test]
fn material_kind_change_keeps_shared_parameters() {
    let mut viewer = stopped_viewer();
    viewer.set_color(0x123456);
    viewer.set_opacity(0.42);
    viewer.set_wireframe(true);

    viewer.set_material_kind(MaterialKind::Phong);

    let material = viewer.material();
    assert_eq!(material.kind, MaterialKind::Phong);
    assert_eq!(material.color, 0x123456);
    assert_eq!(material.opacity, 0.42);
    assert!(material.wireframe);
}

#[test]
fn object_does_not_drift_while_stopped() {
    let mut viewer = viewer_with(ViewerConfig::default());
    assert!(viewer.is_running());
    for _ in 0..5 {
        viewer.tick();
    }

    viewer.stop();
    let stopped_at = viewer.transform();
    for _ in 0..5 {
        assert!(!viewer.tick());
    }
    viewer.start();
    assert_eq!(viewer.transform(), stopped_at);
}

#[test]
fn three_steps_back_from_cube_is_index_seven() {
    let mut viewer = stopped_viewer();
    assert_eq!(viewer.catalog().len(), 10);
    assert_eq!(viewer.label(), "Cube");

    for _ in 0..3 {
        viewer.select_previous();
    }
    assert_eq!(viewer.current_index(), 7);
    assert_eq!(viewer.label(), "Octahedron");
}

#[test]
fn last_color_write_wins() {
    let mut viewer = stopped_viewer();
    viewer.set_color(0xFF0000);
    viewer.randomize_color();
    viewer.set_color(0xFF0000);
    assert_eq!(viewer.material().color, 0xFF0000);
}

#[test]
fn reset_restores_identity_from_any_state() {
    let mut viewer = viewer_with(ViewerConfig::default());
    viewer.set_scale(-3.0);
    viewer.rotate_y(1.2);
    viewer.tick();

    viewer.reset_transform();

    let transform = viewer.transform();
    assert_eq!(transform.scale, cgmath::Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(transform.rotation, cgmath::Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(transform.position, cgmath::Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn scale_is_uniform_and_unbounded() {
    let mut viewer = stopped_viewer();
    for s in [-2.0f32, 0.0, 3.5] {
        viewer.set_scale(s);
        assert_eq!(viewer.transform().scale, cgmath::Vector3::new(s, s, s));
    }
}

#[test]
fn selection_keeps_material_but_replaces_object() {
    let mut viewer = stopped_viewer();
    viewer.set_color(0x00ffff);
    let first = viewer.current_object().map(|o| o.id);

    viewer.select_next();

    assert_ne!(viewer.current_object().map(|o| o.id), first);
    assert_eq!(viewer.material().color, 0x00ffff);
    assert_eq!(viewer.backend().attached_count(), 1);
    assert_eq!(viewer.backend().attached_names(), vec!["Sphere"]);
}

#[test]
fn mutations_redraw_only_when_stopped() {
    let mut running = viewer_with(ViewerConfig::default());
    let before = running.backend().render_calls;
    running.set_color(0xabcdef);
    running.set_scale(2.0);
    assert_eq!(running.backend().render_calls, before);

    let mut stopped = stopped_viewer();
    let before = stopped.backend().render_calls;
    stopped.set_color(0xabcdef);
    stopped.set_scale(2.0);
    assert_eq!(stopped.backend().render_calls, before + 2);
}

#[test]
fn stop_cancels_the_pending_frame() {
    let mut viewer = viewer_with(ViewerConfig::default());
    assert!(viewer.backend().pending_frame.is_some());

    viewer.stop();

    assert!(viewer.backend().pending_frame.is_none());
    assert_eq!(viewer.backend().frames_cancelled, 1);
}

#[test]
fn imported_model_replaces_primitive_at_half_scale() {
    let mut viewer = stopped_viewer();
    viewer.import_model("triangle.obj", TRIANGLE_OBJ.to_vec());
    assert!(viewer.current_object().is_none());
    assert_eq!(viewer.label(), "Loading triangle.obj");

    let id = viewer
        .wait_for_import()
        .expect("an import was pending")
        .expect("triangle parses");

    let object = viewer.current_object().expect("model attached");
    assert_eq!(object.id, id);
    assert_eq!(object.name, "triangle.obj");
    assert_eq!(object.geometry.triangle_count(), 1);
    assert_eq!(object.transform.scale.x, 0.5);
    assert!(viewer.backend().is_attached(id));
}

#[test]
fn failed_import_restores_primitive() {
    let mut viewer = stopped_viewer();
    viewer.select_by_index(2);
    viewer.import_model("broken.obj", b"this is not a model\n".to_vec());

    let result = viewer.wait_for_import().expect("an import was pending");

    assert!(result.is_err());
    assert_eq!(viewer.label(), "Cylinder");
    assert_eq!(viewer.current_index(), 2);
    assert_eq!(viewer.backend().attached_count(), 1);
}

#[test]
fn screenshot_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.png");
    let mut viewer = viewer_with(ViewerConfig {
        screenshot_path: path.clone(),
        ..ViewerConfig::default()
    });
    viewer.set_color(0xff0000);

    let written = viewer.capture_screenshot().unwrap();

    assert_eq!(written, path);
    let image = image::open(&path).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (4, 4));
    assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
}

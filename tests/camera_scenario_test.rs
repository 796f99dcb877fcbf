mod common;

use cgmath::Deg;
use diorama::{
    camera::{Camera, CameraMovement, CameraUniform, Projection, ProjectionMode},
    input::{FrameState, HeldKeys, KeyBindings},
};
use winit::{event::ElementState, keyboard::KeyCode};

use crate::common::test_utils::assert_close;

#[test]
fn forward_for_one_second_moves_two_and_a_half_units() {
    let mut camera = Camera::new((0.0, 0.2, 4.0), Deg(-90.0), Deg(0.0)).with_speed(2.5);
    camera.process_keyboard(CameraMovement::Forward, 1.0);

    assert_close(camera.position.x, 0.0, "x");
    assert_close(camera.position.y, 0.2, "y");
    assert_close(camera.position.z, 1.5, "z");
}

#[test]
fn held_key_frames_add_up_to_the_same_distance() {
    let mut camera = Camera::default();
    let mut frame = FrameState::new();
    let mut held = HeldKeys::default();
    held.update(KeyCode::KeyW, ElementState::Pressed);

    frame.delta_time = instant::Duration::from_millis(250);
    for _ in 0..4 {
        frame.process_held_keys(&KeyBindings::default(), &held, &mut camera);
    }

    assert_close(camera.position.x, 0.0, "x");
    assert_close(camera.position.z, 1.5, "z");
}

#[test]
fn first_mouse_sample_leaves_view_untouched() {
    let mut camera = Camera::default();
    let view_before = camera.view_matrix();
    let mut frame = FrameState::new();

    frame.process_mouse_motion((10.0, 10.0), &mut camera);

    assert_eq!(camera.view_matrix(), view_before);
}

#[test]
fn orthographic_toggle_keeps_view() {
    let mut camera = Camera::default();
    let mut frame = FrameState::new();
    let projection = Projection::new(1600, 900, 0.1, 100.0);
    let mut held = HeldKeys::default();

    let mut before = CameraUniform::new();
    before.update_view_proj(&camera, &projection, frame.projection);

    held.update(KeyCode::KeyP, ElementState::Pressed);
    frame.process_held_keys(&KeyBindings::default(), &held, &mut camera);
    assert_eq!(frame.projection, ProjectionMode::Orthographic);

    let mut after = CameraUniform::new();
    after.update_view_proj(&camera, &projection, frame.projection);

    assert_eq!(before.view(), after.view());
    assert_ne!(before.proj(), after.proj());
}

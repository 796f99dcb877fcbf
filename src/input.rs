//! Keyboard and mouse handling between winit and the camera.
//!
//! Keys are polled: winit press/release events only maintain the set of held
//! keys, and once per frame every held key fires its bound action again.
//! Camera rotation follows raw device motion, except for the very first mouse
//! sample which is dropped.

use std::collections::HashSet;

use cgmath::Vector2;
use instant::Duration;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta},
    keyboard::KeyCode,
};

use crate::{
    camera::{Camera, CameraMovement, ProjectionMode},
    data_structures::scene::INITIAL_UV_SCALE,
};

/// Change of the texture coordinate scale per frame a bracket key is held.
pub const UV_STEP: f32 = 0.1;
/// Pixels counted as one scroll line for touchpads reporting pixel deltas.
pub const PIXELS_PER_LINE: f64 = 20.0;

/// Turns raw mouse motion into offsets for the camera.
///
/// Motion comes from the device rather than the window, so it keeps arriving
/// while the cursor is pinned at a window edge. The first sample of either
/// kind only marks the tracker as started.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorTracker {
    first_mouse: bool,
}

impl Default for CursorTracker {
    fn default() -> Self {
        Self { first_mouse: true }
    }
}

impl CursorTracker {
    /// A window cursor sample. It never rotates the camera.
    pub fn on_cursor_moved(&mut self, _position: PhysicalPosition<f64>) {
        self.first_mouse = false;
    }

    /// The offset of one device motion event, y growing upwards.
    ///
    /// Returns `None` for the first sample ever seen.
    pub fn on_mouse_motion(&mut self, (dx, dy): (f64, f64)) -> Option<(f32, f32)> {
        if self.first_mouse {
            self.first_mouse = false;
            return None;
        }
        // reversed since device y grows downwards
        Some((dx as f32, -dy as f32))
    }

    pub fn is_first_sample_pending(&self) -> bool {
        self.first_mouse
    }
}

/// Vertical scroll in lines.
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => (y / PIXELS_PER_LINE) as f32,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Move(CameraMovement),
    Projection(ProjectionMode),
    UvGrow,
    UvShrink,
    Close,
}

/// Key to action table. Bindings fire in table order.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyBindings {
    bindings: Vec<(KeyCode, KeyAction)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use CameraMovement::*;
        Self {
            bindings: vec![
                (KeyCode::Escape, KeyAction::Close),
                (KeyCode::KeyW, KeyAction::Move(Forward)),
                (KeyCode::KeyS, KeyAction::Move(Backward)),
                (KeyCode::KeyA, KeyAction::Move(Left)),
                (KeyCode::KeyD, KeyAction::Move(Right)),
                (KeyCode::KeyE, KeyAction::Move(Up)),
                (KeyCode::KeyQ, KeyAction::Move(Down)),
                (KeyCode::KeyP, KeyAction::Projection(ProjectionMode::Orthographic)),
                (KeyCode::KeyO, KeyAction::Projection(ProjectionMode::Perspective)),
                (KeyCode::BracketRight, KeyAction::UvGrow),
                (KeyCode::BracketLeft, KeyAction::UvShrink),
            ],
        }
    }
}

impl KeyBindings {
    pub fn new(bindings: Vec<(KeyCode, KeyAction)>) -> Self {
        Self { bindings }
    }

    /// Actions of all held keys, in binding order.
    ///
    /// Growing the texture scale wins over shrinking it when both are held.
    pub fn actions(&self, held: &HeldKeys) -> Vec<KeyAction> {
        let mut actions: Vec<KeyAction> = self
            .bindings
            .iter()
            .filter(|(key, _)| held.is_held(*key))
            .map(|(_, action)| *action)
            .collect();
        if actions.contains(&KeyAction::UvGrow) {
            actions.retain(|action| *action != KeyAction::UvShrink);
        }
        actions
    }
}

/// Keyboard state as seen at the start of a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeldKeys {
    keys: HashSet<KeyCode>,
}

impl HeldKeys {
    pub fn update(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => self.keys.insert(key),
            ElementState::Released => self.keys.remove(&key),
        };
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Forget everything, e.g. when the window loses focus and releases go missing.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// Per-frame mutable state owned by the run loop.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    pub delta_time: Duration,
    pub projection: ProjectionMode,
    pub uv_scale: Vector2<f32>,
    pub cursor: CursorTracker,
    pub close_requested: bool,
}

impl Default for FrameState {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameState {
    pub fn new() -> Self {
        Self {
            delta_time: Duration::ZERO,
            projection: ProjectionMode::Perspective,
            uv_scale: INITIAL_UV_SCALE,
            cursor: CursorTracker::default(),
            close_requested: false,
        }
    }

    pub fn apply(&mut self, action: KeyAction, camera: &mut Camera) {
        match action {
            KeyAction::Move(direction) => {
                camera.process_keyboard(direction, self.delta_time.as_secs_f32())
            }
            KeyAction::Projection(mode) => {
                if self.projection != mode {
                    log::info!("switched to {mode:?} projection");
                    self.projection = mode;
                }
            }
            KeyAction::UvGrow => self.adjust_uv_scale(UV_STEP),
            KeyAction::UvShrink => self.adjust_uv_scale(-UV_STEP),
            KeyAction::Close => self.close_requested = true,
        }
    }

    /// Fire every held key once for this frame.
    pub fn process_held_keys(&mut self, bindings: &KeyBindings, held: &HeldKeys, camera: &mut Camera) {
        for action in bindings.actions(held) {
            self.apply(action, camera);
        }
    }

    /// Feed a device motion sample to the camera, skipping the first sample.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64), camera: &mut Camera) {
        if let Some((xoffset, yoffset)) = self.cursor.on_mouse_motion(delta) {
            camera.process_mouse_movement(xoffset, yoffset);
        }
    }

    fn adjust_uv_scale(&mut self, step: f32) {
        self.uv_scale += Vector2::new(step, step);
        log::info!("uv scale {:.2}, {:.2}", self.uv_scale.x, self.uv_scale.y);
    }
}

pub fn log_mouse_button(button: MouseButton, state: ElementState) {
    let action = match state {
        ElementState::Pressed => "pressed",
        ElementState::Released => "released",
    };
    match button {
        MouseButton::Left => log::debug!("left mouse button {action}"),
        MouseButton::Middle => log::debug!("middle mouse button {action}"),
        MouseButton::Right => log::debug!("right mouse button {action}"),
        other => log::debug!("mouse button {other:?} {action}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(keys: &[KeyCode]) -> HeldKeys {
        let mut held = HeldKeys::default();
        for key in keys {
            held.update(*key, ElementState::Pressed);
        }
        held
    }

    #[test]
    fn first_mouse_sample_does_not_rotate() {
        let mut frame = FrameState::new();
        let mut camera = Camera::default();
        let before = camera.clone();
        frame.process_mouse_motion((400.0, -350.0), &mut camera);
        assert_eq!(camera.yaw(), before.yaw());
        assert_eq!(camera.pitch(), before.pitch());
        assert!(!frame.cursor.is_first_sample_pending());

        frame.process_mouse_motion((10.0, -10.0), &mut camera);
        assert!((camera.yaw().0 - (before.yaw().0 + 1.0)).abs() < 1e-4);
        assert!((camera.pitch().0 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn cursor_position_only_starts_tracking() {
        let mut frame = FrameState::new();
        let mut camera = Camera::default();
        let before = camera.clone();
        frame.cursor.on_cursor_moved(PhysicalPosition::new(800.0, 450.0));
        assert!(!frame.cursor.is_first_sample_pending());

        frame.process_mouse_motion((5.0, 0.0), &mut camera);
        assert!((camera.yaw().0 - (before.yaw().0 + 0.5)).abs() < 1e-4);
    }

    #[test]
    fn motion_offsets_reverse_y() {
        let mut tracker = CursorTracker::default();
        assert_eq!(tracker.on_mouse_motion((1.0, 1.0)), None);
        assert_eq!(tracker.on_mouse_motion((5.0, -10.0)), Some((5.0, 10.0)));
        assert_eq!(tracker.on_mouse_motion((-5.0, 20.0)), Some((-5.0, -20.0)));
    }

    #[test]
    fn yaw_keeps_turning_with_cursor_pinned_at_edge() {
        let mut frame = FrameState::new();
        let mut camera = Camera::default();
        // a confined cursor sits at the right edge while the mouse keeps moving
        frame.cursor.on_cursor_moved(PhysicalPosition::new(1600.0, 450.0));
        for _ in 0..400 {
            frame.cursor.on_cursor_moved(PhysicalPosition::new(1600.0, 450.0));
            frame.process_mouse_motion((10.0, 0.0), &mut camera);
        }
        // 400 samples of 10 px at 0.1 degrees per px
        assert!((camera.yaw().0 - (-90.0 + 400.0)).abs() < 1e-2);
    }

    #[test]
    fn scroll_deltas_in_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        assert_eq!(
            scroll_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0))),
            -2.0
        );
    }

    #[test]
    fn held_keys_fire_every_frame() {
        let bindings = KeyBindings::default();
        let keys = held(&[KeyCode::KeyW]);
        let mut frame = FrameState::new();
        frame.delta_time = Duration::from_millis(100);
        let mut camera = Camera::default();
        for _ in 0..10 {
            frame.process_held_keys(&bindings, &keys, &mut camera);
        }
        assert!((camera.position.z - 1.5).abs() < 1e-4);
    }

    #[test]
    fn released_keys_stop_firing() {
        let mut keys = held(&[KeyCode::KeyD, KeyCode::KeyE]);
        keys.update(KeyCode::KeyD, ElementState::Released);
        let actions = KeyBindings::default().actions(&keys);
        assert_eq!(actions, vec![KeyAction::Move(CameraMovement::Up)]);
    }

    #[test]
    fn uv_grow_wins_over_shrink() {
        let keys = held(&[KeyCode::BracketLeft, KeyCode::BracketRight]);
        let actions = KeyBindings::default().actions(&keys);
        assert_eq!(actions, vec![KeyAction::UvGrow]);
    }

    #[test]
    fn uv_scale_repeats_while_held() {
        let bindings = KeyBindings::default();
        let keys = held(&[KeyCode::BracketRight]);
        let mut frame = FrameState::new();
        let mut camera = Camera::default();
        for _ in 0..3 {
            frame.process_held_keys(&bindings, &keys, &mut camera);
        }
        assert!((frame.uv_scale.x - 2.3).abs() < 1e-5);
        assert!((frame.uv_scale.y - 2.3).abs() < 1e-5);

        let keys = held(&[KeyCode::BracketLeft]);
        frame.process_held_keys(&bindings, &keys, &mut camera);
        assert!((frame.uv_scale.x - 2.2).abs() < 1e-5);
    }

    #[test]
    fn projection_keys_switch_mode() {
        let bindings = KeyBindings::default();
        let mut frame = FrameState::new();
        let mut camera = Camera::default();
        frame.process_held_keys(&bindings, &held(&[KeyCode::KeyP]), &mut camera);
        assert_eq!(frame.projection, ProjectionMode::Orthographic);
        frame.process_held_keys(&bindings, &held(&[KeyCode::KeyP]), &mut camera);
        assert_eq!(frame.projection, ProjectionMode::Orthographic);
        frame.process_held_keys(&bindings, &held(&[KeyCode::KeyO]), &mut camera);
        assert_eq!(frame.projection, ProjectionMode::Perspective);
    }

    #[test]
    fn actions_are_distinct_set_members() {
        let actions: HashSet<KeyAction> = KeyBindings::default()
            .bindings
            .iter()
            .map(|(_, action)| *action)
            .collect();
        assert!(actions.contains(&KeyAction::Projection(ProjectionMode::Orthographic)));
        assert!(actions.contains(&KeyAction::Projection(ProjectionMode::Perspective)));
        assert!(actions.contains(&KeyAction::Close));
    }

    #[test]
    fn escape_requests_close() {
        let mut frame = FrameState::new();
        let mut camera = Camera::default();
        frame.process_held_keys(&KeyBindings::default(), &held(&[KeyCode::Escape]), &mut camera);
        assert!(frame.close_requested);
    }

    #[test]
    fn custom_bindings() {
        let bindings = KeyBindings::new(vec![(KeyCode::ArrowUp, KeyAction::Move(CameraMovement::Forward))]);
        assert_eq!(
            bindings.actions(&held(&[KeyCode::ArrowUp, KeyCode::KeyW])),
            vec![KeyAction::Move(CameraMovement::Forward)]
        );
    }
}

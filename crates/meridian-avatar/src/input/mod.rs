//! Input aggregation
//!
//! Normalizes keyboard, virtual-joystick, and touch-button input into one
//! per-tick movement snapshot, honoring the hybrid-device policy (physical
//! keys win per axis; jump/boost OR across sources).

mod bindings;
mod touch;

pub use bindings::{InputAction, InputBindings};
pub use touch::{TouchButtons, VirtualJoystick};

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Joystick axis values below this are treated as noise.
const AXIS_THRESHOLD: f32 = 0.1;

/// Device capabilities decided once at session start and injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputProfile {
    /// Touch screen present (virtual joystick and buttons active)
    pub has_touch: bool,
    /// Physical keyboard present
    pub has_physical_keyboard: bool,
}

impl InputProfile {
    /// Desktop: keyboard only
    pub fn desktop() -> Self {
        Self {
            has_touch: false,
            has_physical_keyboard: true,
        }
    }

    /// Phone or tablet without an external keyboard
    pub fn touch_only() -> Self {
        Self {
            has_touch: true,
            has_physical_keyboard: false,
        }
    }

    /// Tablet with an attached physical keyboard
    pub fn hybrid() -> Self {
        Self {
            has_touch: true,
            has_physical_keyboard: true,
        }
    }
}

/// Transient per-tick input state.
#[derive(Debug, Clone, Copy)]
pub struct InputSnapshot {
    /// Local-space movement direction (x = strafe, z = forward), before yaw
    pub move_direction: Vec3,
    /// Jump requested
    pub want_jump: bool,
    /// Boost requested
    pub want_boost: bool,
}

impl InputSnapshot {
    /// Whether the movement input is effectively zero
    pub fn is_idle(&self) -> bool {
        self.move_direction.length() < AXIS_THRESHOLD
    }
}

/// Aggregates raw device input into per-tick snapshots.
pub struct InputAggregator {
    profile: InputProfile,
    bindings: InputBindings,
    held: HashSet<InputAction>,
    joystick: VirtualJoystick,
    buttons: TouchButtons,
    direction: Vec3,
    want_jump: bool,
    want_boost: bool,
    capsule_toggle_requested: bool,
    camera_reset_requested: bool,
}

impl InputAggregator {
    pub fn new(profile: InputProfile) -> Self {
        Self {
            profile,
            bindings: InputBindings::default(),
            held: HashSet::new(),
            joystick: VirtualJoystick::default(),
            buttons: TouchButtons::default(),
            direction: Vec3::ZERO,
            want_jump: false,
            want_boost: false,
            capsule_toggle_requested: false,
            camera_reset_requested: false,
        }
    }

    /// The injected device capabilities
    pub fn profile(&self) -> InputProfile {
        self.profile
    }

    /// Replace the key bindings
    pub fn set_bindings(&mut self, bindings: InputBindings) {
        self.bindings = bindings;
    }

    /// Handle a winit keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, state: ElementState) {
        if let PhysicalKey::Code(code) = physical_key {
            match state {
                ElementState::Pressed => self.key_down(code),
                ElementState::Released => self.key_up(code),
            }
        }
    }

    /// Handle a physical key press edge
    pub fn key_down(&mut self, key: KeyCode) {
        let Some(action) = self.bindings.action(key) else {
            return;
        };
        self.held.insert(action);

        match action {
            InputAction::MoveForward => self.direction.z = 1.0,
            InputAction::MoveBackward => self.direction.z = -1.0,
            InputAction::StrafeLeft => self.direction.x = -1.0,
            InputAction::StrafeRight => self.direction.x = 1.0,
            InputAction::Jump => self.want_jump = true,
            InputAction::Boost => self.want_boost = true,
            InputAction::ToggleCapsule => self.capsule_toggle_requested = true,
            InputAction::ResetCamera => self.camera_reset_requested = true,
            InputAction::TurnLeft | InputAction::TurnRight => {}
        }
    }

    /// Handle a physical key release edge
    pub fn key_up(&mut self, key: KeyCode) {
        let Some(action) = self.bindings.action(key) else {
            return;
        };
        self.held.remove(&action);

        match action {
            InputAction::MoveForward | InputAction::MoveBackward => self.direction.z = 0.0,
            InputAction::StrafeLeft
            | InputAction::StrafeRight
            | InputAction::TurnLeft
            | InputAction::TurnRight => self.direction.x = 0.0,
            InputAction::Jump => self.want_jump = false,
            InputAction::Boost => self.want_boost = false,
            InputAction::ToggleCapsule | InputAction::ResetCamera => {}
        }
    }

    /// Feed a joystick displacement sample (pixels from pad center)
    pub fn joystick_sample(&mut self, offset: Vec2) {
        self.joystick.sample(offset);
    }

    /// The joystick touch ended
    pub fn joystick_release(&mut self) {
        self.joystick.release();
    }

    /// Set the virtual jump button state
    pub fn set_jump_button(&mut self, pressed: bool) {
        self.buttons.jump = pressed;
    }

    /// Set the virtual boost button state
    pub fn set_boost_button(&mut self, pressed: bool) {
        self.buttons.boost = pressed;
    }

    /// Global touch-end safety net: release all virtual controls
    pub fn release_touch(&mut self) {
        self.joystick.release();
        self.buttons.clear();
    }

    /// Build this tick's snapshot, merging touch input per device policy.
    pub fn snapshot(&mut self) -> InputSnapshot {
        self.merge_touch();
        InputSnapshot {
            move_direction: self.direction,
            want_jump: self.want_jump,
            want_boost: self.want_boost,
        }
    }

    /// Yaw steering input in [-1, 1]: turn keys plus joystick X on touch.
    pub fn steer_axis(&self) -> f32 {
        let mut steer = 0.0;
        if self.held.contains(&InputAction::TurnLeft) {
            steer -= 1.0;
        }
        if self.held.contains(&InputAction::TurnRight) {
            steer += 1.0;
        }

        if self.profile.has_touch {
            let x = self.joystick.direction().x;
            if x.abs() > AXIS_THRESHOLD {
                steer += x;
            }
        }
        steer.clamp(-1.0, 1.0)
    }

    /// Whether any movement input is active for this device class.
    pub fn is_moving(&self) -> bool {
        let keyboard_moving = [
            InputAction::MoveForward,
            InputAction::MoveBackward,
            InputAction::TurnLeft,
            InputAction::TurnRight,
            InputAction::StrafeLeft,
            InputAction::StrafeRight,
        ]
        .iter()
        .any(|action| self.held.contains(action));

        if self.profile.has_touch {
            let touch_moving =
                self.joystick.is_active() && self.joystick.direction().length() > AXIS_THRESHOLD;
            if self.profile.has_physical_keyboard {
                keyboard_moving || touch_moving
            } else {
                touch_moving
            }
        } else {
            keyboard_moving
        }
    }

    /// Take the pending debug-capsule toggle request, if any
    pub fn take_capsule_toggle(&mut self) -> bool {
        std::mem::take(&mut self.capsule_toggle_requested)
    }

    /// Take the pending camera reset request, if any
    pub fn take_camera_reset(&mut self) -> bool {
        std::mem::take(&mut self.camera_reset_requested)
    }

    /// Reset movement state on character (re)spawn, keeping held keys
    pub fn clear_movement(&mut self) {
        self.direction = Vec3::ZERO;
        self.want_jump = false;
        self.want_boost = false;
        self.buttons.clear();
        self.joystick.release();
    }

    /// Clear everything (teardown)
    pub fn clear_all(&mut self) {
        self.clear_movement();
        self.held.clear();
        self.capsule_toggle_requested = false;
        self.camera_reset_requested = false;
    }

    fn merge_touch(&mut self) {
        if !self.profile.has_touch {
            return;
        }

        let joy = self.joystick.direction();

        if self.profile.has_physical_keyboard {
            // Physical keys own any axis they hold; the joystick only fills
            // the gaps, and virtual buttons OR with still-held keys.
            let keyboard_forward = self.held.contains(&InputAction::MoveForward)
                || self.held.contains(&InputAction::MoveBackward);
            if !keyboard_forward {
                self.direction.z = if joy.z.abs() > AXIS_THRESHOLD { joy.z } else { 0.0 };
            }

            if !self.held.contains(&InputAction::Jump) {
                self.want_jump = self.buttons.jump;
            }
            if !self.held.contains(&InputAction::Boost) {
                self.want_boost = self.buttons.boost;
            }
        } else {
            // Touch-only: joystick Z drives forward motion, joystick X steers
            // (consumed via steer_axis), and buttons own jump/boost outright.
            self.direction.z = if joy.z.abs() > AXIS_THRESHOLD { joy.z } else { 0.0 };
            self.direction.x = 0.0;
            self.want_jump = self.buttons.jump;
            self.want_boost = self.buttons.boost;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_movement() {
        let mut input = InputAggregator::new(InputProfile::desktop());
        input.key_down(KeyCode::KeyW);
        let snapshot = input.snapshot();
        assert_eq!(snapshot.move_direction.z, 1.0);
        assert!(input.is_moving());

        input.key_up(KeyCode::KeyW);
        let snapshot = input.snapshot();
        assert_eq!(snapshot.move_direction.z, 0.0);
        assert!(!input.is_moving());
    }

    #[test]
    fn test_turn_keys_do_not_strafe() {
        let mut input = InputAggregator::new(InputProfile::desktop());
        input.key_down(KeyCode::KeyA);
        let snapshot = input.snapshot();
        assert_eq!(snapshot.move_direction.x, 0.0);
        assert!(input.steer_axis() < 0.0);
        assert!(input.is_moving());
    }

    #[test]
    fn test_hybrid_keyboard_wins_forward_axis() {
        let mut input = InputAggregator::new(InputProfile::hybrid());
        input.key_down(KeyCode::KeyS);
        input.joystick_sample(Vec2::new(0.0, -40.0)); // full forward
        let snapshot = input.snapshot();
        assert_eq!(snapshot.move_direction.z, -1.0);
    }

    #[test]
    fn test_hybrid_joystick_fills_idle_axis() {
        let mut input = InputAggregator::new(InputProfile::hybrid());
        input.joystick_sample(Vec2::new(0.0, -40.0));
        let snapshot = input.snapshot();
        assert!(snapshot.move_direction.z > 0.99);
    }

    #[test]
    fn test_virtual_release_keeps_held_key_jump() {
        let mut input = InputAggregator::new(InputProfile::hybrid());
        input.key_down(KeyCode::Space);
        input.set_jump_button(true);
        input.set_jump_button(false);
        let snapshot = input.snapshot();
        assert!(snapshot.want_jump);
    }

    #[test]
    fn test_key_release_keeps_held_button_jump() {
        let mut input = InputAggregator::new(InputProfile::hybrid());
        input.set_jump_button(true);
        input.key_down(KeyCode::Space);
        input.key_up(KeyCode::Space);
        let snapshot = input.snapshot();
        assert!(snapshot.want_jump);
    }

    #[test]
    fn test_touch_only_ignores_strafe() {
        let mut input = InputAggregator::new(InputProfile::touch_only());
        input.joystick_sample(Vec2::new(40.0, -40.0));
        let snapshot = input.snapshot();
        assert_eq!(snapshot.move_direction.x, 0.0);
        assert!(snapshot.move_direction.z > 0.5);
        assert!(input.steer_axis() > 0.0);
    }

    #[test]
    fn test_winit_event_entry_point() {
        let mut input = InputAggregator::new(InputProfile::desktop());
        input.handle_keyboard(PhysicalKey::Code(KeyCode::Space), ElementState::Pressed);
        assert!(input.snapshot().want_jump);
        input.handle_keyboard(PhysicalKey::Code(KeyCode::Space), ElementState::Released);
        assert!(!input.snapshot().want_jump);
    }

    #[test]
    fn test_spawn_reset_clears_flags() {
        let mut input = InputAggregator::new(InputProfile::desktop());
        input.key_down(KeyCode::Space);
        input.key_down(KeyCode::ShiftLeft);
        input.clear_movement();
        let snapshot = input.snapshot();
        assert!(!snapshot.want_jump);
        assert!(!snapshot.want_boost);
    }
}

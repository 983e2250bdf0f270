//! Physical key bindings for avatar control.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

/// Avatar actions that can be triggered by physical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W / Up by default)
    MoveForward,
    /// Move backward (S / Down by default)
    MoveBackward,
    /// Turn the avatar left (A / Left by default)
    TurnLeft,
    /// Turn the avatar right (D / Right by default)
    TurnRight,
    /// Strafe left (Q by default)
    StrafeLeft,
    /// Strafe right (E by default)
    StrafeRight,
    /// Jump (Space by default)
    Jump,
    /// Boost modifier (Shift by default)
    Boost,
    /// Toggle the debug capsule display (0 by default)
    ToggleCapsule,
    /// Reset the follow camera to its default offset (1 by default)
    ResetCamera,
}

/// Maps physical keys to avatar actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    bindings: HashMap<KeyCode, InputAction>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, InputAction::TurnLeft);
        bindings.bind(KeyCode::KeyD, InputAction::TurnRight);

        // Arrow keys as alternative
        bindings.bind(KeyCode::ArrowUp, InputAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, InputAction::MoveBackward);
        bindings.bind(KeyCode::ArrowLeft, InputAction::TurnLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::TurnRight);

        bindings.bind(KeyCode::KeyQ, InputAction::StrafeLeft);
        bindings.bind(KeyCode::KeyE, InputAction::StrafeRight);

        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Boost);
        bindings.bind(KeyCode::ShiftRight, InputAction::Boost);

        bindings.bind(KeyCode::Digit0, InputAction::ToggleCapsule);
        bindings.bind(KeyCode::Digit1, InputAction::ResetCamera);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.bindings.insert(key, action);
    }

    /// Unbind a key
    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }

    /// Get the action for a key, if any
    pub fn action(&self, key: KeyCode) -> Option<InputAction> {
        self.bindings.get(&key).copied()
    }
}

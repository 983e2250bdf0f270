//! Virtual joystick and momentary touch buttons.

use glam::{Vec2, Vec3};

/// On-screen joystick sampled from touch displacement.
///
/// Samples are pixel offsets from the joystick center, screen convention
/// (Y grows downward). Displacements inside the deadzone produce a zero
/// direction; beyond it the direction is normalized to unit length.
#[derive(Debug, Clone)]
pub struct VirtualJoystick {
    /// Joystick pad radius in pixels
    pub radius: f32,
    /// Deadzone radius in pixels
    pub deadzone: f32,
    /// Current direction (x = right, z = forward), zero or unit length
    direction: Vec3,
    /// Whether a touch is currently on the pad
    active: bool,
}

impl VirtualJoystick {
    pub fn new(radius: f32, deadzone: f32) -> Self {
        Self {
            radius,
            deadzone,
            direction: Vec3::ZERO,
            active: false,
        }
    }

    /// Feed a touch displacement from the joystick center.
    pub fn sample(&mut self, offset: Vec2) {
        self.active = true;

        let distance = offset.length();
        if distance < self.deadzone {
            self.direction = Vec3::ZERO;
            return;
        }

        let normalized = offset / distance;
        self.direction = Vec3::new(normalized.x, 0.0, -normalized.y);
    }

    /// The touch left the pad.
    pub fn release(&mut self) {
        self.active = false;
        self.direction = Vec3::ZERO;
    }

    /// Current direction (x = right, z = forward)
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Whether a touch is currently on the pad
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for VirtualJoystick {
    fn default() -> Self {
        Self::new(60.0, 10.0)
    }
}

/// Momentary on-screen jump/boost buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchButtons {
    pub jump: bool,
    pub boost: bool,
}

impl TouchButtons {
    /// Release everything (global touch-end safety net).
    pub fn clear(&mut self) {
        self.jump = false;
        self.boost = false;
    }

    /// Whether any button is currently pressed
    pub fn any_active(&self) -> bool {
        self.jump || self.boost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone_filters_small_displacements() {
        let mut joystick = VirtualJoystick::new(60.0, 10.0);
        joystick.sample(Vec2::new(3.0, -4.0));
        assert!(joystick.is_active());
        assert_eq!(joystick.direction(), Vec3::ZERO);
    }

    #[test]
    fn test_direction_is_normalized() {
        let mut joystick = VirtualJoystick::new(60.0, 10.0);
        joystick.sample(Vec2::new(30.0, 0.0));
        let dir = joystick.direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x > 0.99);
    }

    #[test]
    fn test_screen_up_maps_to_forward() {
        let mut joystick = VirtualJoystick::new(60.0, 10.0);
        joystick.sample(Vec2::new(0.0, -40.0));
        assert!(joystick.direction().z > 0.99);
    }

    #[test]
    fn test_release_zeroes_direction() {
        let mut joystick = VirtualJoystick::new(60.0, 10.0);
        joystick.sample(Vec2::new(40.0, 0.0));
        joystick.release();
        assert!(!joystick.is_active());
        assert_eq!(joystick.direction(), Vec3::ZERO);
    }
}

//! Per-state desired-velocity computation.
//!
//! Speeds, friction, air resistance, and jump impulses all scale with the
//! character's mass; the resulting velocity is handed to the physics
//! integrator and never mutated anywhere else.

use glam::{Quat, Vec3};
use tracing::warn;

use meridian_physics::{CharacterPhysics, SupportInfo};

use crate::input::InputSnapshot;
use crate::profile::CharacterProfile;

use super::state::{next_state, MotionState};

/// Gravity applied to characters (stronger than world gravity).
pub const CHARACTER_GRAVITY: Vec3 = Vec3::new(0.0, -18.0, 0.0);

/// Jump apex height while boosting, replacing the profile value.
pub const BOOST_JUMP_HEIGHT: f32 = 10.0;

const BASE_AIR_RESISTANCE: f32 = 0.98;
const AIR_RESISTANCE_PER_MASS: f32 = 0.01;
const BASE_GROUND_FRICTION: f32 = 0.95;
const GROUND_FRICTION_PER_MASS: f32 = 0.02;
const BASE_IDLE_DAMPING: f32 = 0.9;
const IDLE_DAMPING_PER_MASS: f32 = 0.05;
const MAX_SPEED_FACTOR: f32 = 2.0;
const SLOPE_EPSILON: f32 = 1e-3;
const IDLE_INPUT_THRESHOLD: f32 = 0.1;

/// The locomotion state machine and its velocity model.
///
/// Owns the active character profile; with none set, every velocity
/// computation degrades to returning the current velocity unchanged so the
/// simulation loop stays alive.
pub struct Locomotion {
    profile: Option<CharacterProfile>,
    state: MotionState,
    gravity: Vec3,
}

impl Locomotion {
    pub fn new() -> Self {
        Self {
            profile: None,
            state: MotionState::Airborne,
            gravity: CHARACTER_GRAVITY,
        }
    }

    /// Install a character profile, forcing a fresh airborne spawn state.
    pub fn set_profile(&mut self, profile: CharacterProfile) {
        self.profile = Some(profile);
        self.state = MotionState::Airborne;
    }

    /// The active character profile, if any
    pub fn profile(&self) -> Option<&CharacterProfile> {
        self.profile.as_ref()
    }

    /// Force the airborne spawn state, keeping the profile (respawn).
    pub fn reset(&mut self) {
        self.state = MotionState::Airborne;
    }

    /// The current motion state
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Gravity applied to the character
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Advance the state machine and compute this tick's desired velocity.
    ///
    /// Must run strictly after `support` was queried for the current tick
    /// and strictly before the body integrates.
    pub fn desired_velocity<B: CharacterPhysics>(
        &mut self,
        body: &mut B,
        world: &B::World,
        dt: f32,
        input: &InputSnapshot,
        yaw: f32,
        support: &SupportInfo,
    ) -> Vec3 {
        self.state = next_state(self.state, support, input.want_jump);

        let up = (-self.gravity).normalize_or_zero();
        let orientation = Quat::from_rotation_y(yaw);
        let forward = orientation * Vec3::Z;
        let current = body.velocity();

        match self.state {
            MotionState::Airborne => {
                self.air_velocity(body, world, dt, input, orientation, forward, up, current)
            }
            MotionState::Grounded => self.ground_velocity(
                body,
                world,
                dt,
                input,
                orientation,
                forward,
                up,
                current,
                support,
            ),
            MotionState::JumpStart => self.jump_velocity(current, up, input.want_boost),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn air_velocity<B: CharacterPhysics>(
        &mut self,
        body: &mut B,
        world: &B::World,
        dt: f32,
        input: &InputSnapshot,
        orientation: Quat,
        forward: Vec3,
        up: Vec3,
        current: Vec3,
    ) -> Vec3 {
        let Some(profile) = &self.profile else {
            warn!("no character profile set; skipping air velocity update");
            return current;
        };
        let mass = profile.mass;

        let mut output = current;

        if input.want_boost {
            // Boost gives air control; the solver still blocks it on obstacles.
            let speed = profile.speed.in_air * profile.speed.boost_multiplier / mass.sqrt();
            let desired = orientation * (input.move_direction * speed);
            output = body.resolve_movement(world, dt, forward, up, current, Vec3::ZERO, desired, up);
        }

        let resistance = BASE_AIR_RESISTANCE - (mass - 1.0) * AIR_RESISTANCE_PER_MASS;
        output *= resistance;

        // Resistance is horizontal only: restore the previous vertical component.
        output += up * (current.dot(up) - output.dot(up));

        output + self.gravity * dt
    }

    #[allow(clippy::too_many_arguments)]
    fn ground_velocity<B: CharacterPhysics>(
        &mut self,
        body: &mut B,
        world: &B::World,
        dt: f32,
        input: &InputSnapshot,
        orientation: Quat,
        forward: Vec3,
        up: Vec3,
        current: Vec3,
        support: &SupportInfo,
    ) -> Vec3 {
        let Some(profile) = &self.profile else {
            warn!("no character profile set; skipping ground velocity update");
            return current;
        };
        let mass = profile.mass;

        let base_speed = if input.want_boost {
            profile.speed.on_ground * profile.speed.boost_multiplier
        } else {
            profile.speed.on_ground
        };
        let speed = base_speed / mass.sqrt();

        let desired = orientation * (input.move_direction * speed);
        let mut output = body.resolve_movement(
            world,
            dt,
            forward,
            support.average_surface_normal,
            current,
            support.average_surface_velocity,
            desired,
            up,
        );
        output -= support.average_surface_velocity;

        let friction = BASE_GROUND_FRICTION + (mass - 1.0) * GROUND_FRICTION_PER_MASS;
        output *= friction;

        let max_speed = speed * MAX_SPEED_FACTOR;
        let current_speed = output.length();
        if current_speed > max_speed {
            output = output / current_speed * max_speed;
        }

        if input.move_direction.length() < IDLE_INPUT_THRESHOLD {
            let damping = BASE_IDLE_DAMPING + (mass - 1.0) * IDLE_DAMPING_PER_MASS;
            output *= damping;
        }

        // Kill any component pushing up out of the ground plane: re-project
        // onto the surface so slopes never launch the character.
        if output.dot(up) > SLOPE_EPSILON {
            let length = output.length();
            if length > 0.0 {
                let unit = output / length;
                let horizontal = length / support.average_surface_normal.dot(up);
                let tangent = support.average_surface_normal.cross(unit);
                return tangent.cross(up) * horizontal;
            }
        }

        output + support.average_surface_velocity
    }

    fn jump_velocity(&mut self, current: Vec3, up: Vec3, boosting: bool) -> Vec3 {
        let Some(profile) = &self.profile else {
            warn!("no character profile set; skipping jump velocity update");
            return current;
        };

        let jump_height = if boosting {
            BOOST_JUMP_HEIGHT
        } else {
            profile.jump_height
        };
        let mass_adjusted_height = jump_height / profile.mass.sqrt();

        let launch = (2.0 * self.gravity.length() * mass_adjusted_height).sqrt();
        let vertical = current.dot(up);
        current + up * (launch - vertical)
    }
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new()
    }
}

//! Character body contract and its rapier3d implementation.

use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use crate::support::{SupportInfo, SupportState};
use crate::PhysicsWorld;

/// Narrow contract the locomotion logic consumes from the physics solver.
///
/// The locomotion layer computes a desired velocity from input and hands it
/// back through `set_velocity` + `integrate`; everything the solver knows
/// about collisions stays behind this trait. `World` is the solver's shared
/// simulation state (`()` for test doubles).
pub trait CharacterPhysics {
    type World;

    /// Probe along `down` and report how the character is supported this tick.
    fn check_support(&mut self, world: &Self::World, dt: f32, down: Vec3) -> SupportInfo;

    /// Advance the body by its current velocity, resolving collisions.
    fn integrate(&mut self, world: &mut Self::World, dt: f32, support: &SupportInfo, gravity: Vec3);

    /// Reconcile a desired velocity against obstacles and return what the
    /// body can actually achieve.
    #[allow(clippy::too_many_arguments)]
    fn resolve_movement(
        &mut self,
        world: &Self::World,
        dt: f32,
        forward: Vec3,
        support_normal: Vec3,
        current_velocity: Vec3,
        surface_velocity: Vec3,
        desired_velocity: Vec3,
        gravity_up: Vec3,
    ) -> Vec3;

    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn position(&self) -> Vec3;
    fn set_position(&mut self, world: &mut Self::World, position: Vec3);

    /// Resize the capsule (on character switch).
    fn set_capsule(&mut self, world: &mut Self::World, height: f32, radius: f32);
}

/// Character body configuration
#[derive(Debug, Clone)]
pub struct AvatarBodyConfig {
    /// Capsule height (default: 1.8m)
    pub height: f32,
    /// Capsule radius (default: 0.6m)
    pub radius: f32,
    /// Maximum walkable slope angle in degrees (default: 50)
    pub max_slope_angle: f32,
    /// Step height for climbing stairs (default: 0.25m)
    pub step_height: f32,
    /// Skin width for collision detection (default: 0.02m)
    pub skin_width: f32,
    /// Distance of the downward support probe (default: 0.15m)
    pub support_probe: f32,
    /// Maximum ground snap distance
    pub ground_snap_distance: f32,
}

impl Default for AvatarBodyConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.6,
            max_slope_angle: 50.0,
            step_height: 0.25,
            skin_width: 0.02,
            support_probe: 0.15,
            ground_snap_distance: 0.2,
        }
    }
}

/// Kinematic character body backed by rapier3d.
///
/// `position` is the capsule's foot point; the collider is centered half the
/// capsule height above it.
pub struct AvatarBody {
    /// Configuration
    pub config: AvatarBodyConfig,
    /// Current foot position
    position: Vec3,
    /// Current velocity
    velocity: Vec3,
    /// Whether the last integration ended on the ground
    grounded: bool,
    /// The collider handle for this character
    collider_handle: Option<ColliderHandle>,
    /// Rapier's kinematic character controller
    controller: KinematicCharacterController,
}

impl AvatarBody {
    /// Create a new body with default config
    pub fn new() -> Self {
        Self::with_config(AvatarBodyConfig::default())
    }

    /// Create a new body with custom config
    pub fn with_config(config: AvatarBodyConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        controller.min_slope_slide_angle = config.max_slope_angle.to_radians();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(config.step_height),
            min_width: CharacterLength::Relative(0.5),
            include_dynamic_bodies: true,
        });
        controller.snap_to_ground = Some(CharacterLength::Absolute(config.ground_snap_distance));
        controller.offset = CharacterLength::Absolute(config.skin_width);

        Self {
            config,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            grounded: false,
            collider_handle: None,
            controller,
        }
    }

    /// Spawn the body in the physics world at a foot position
    pub fn spawn(&mut self, world: &mut PhysicsWorld, position: Vec3) -> ColliderHandle {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.create_collider(world)
    }

    /// Whether the last integration ended supported by the ground
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Get the center position (middle of the capsule)
    pub fn center_position(&self) -> Vec3 {
        self.position + Vec3::Y * (self.config.height / 2.0)
    }

    fn create_collider(&mut self, world: &mut PhysicsWorld) -> ColliderHandle {
        let half_height = ((self.config.height - 2.0 * self.config.radius) / 2.0).max(0.01);
        let center = self.center_position();
        let collider = ColliderBuilder::capsule_y(half_height, self.config.radius)
            .translation(vector![center.x, center.y, center.z])
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = world.add_static_collider(collider);
        self.collider_handle = Some(handle);
        handle
    }

    fn sync_collider(&self, world: &mut PhysicsWorld) {
        if let Some(handle) = self.collider_handle {
            if let Some(collider) = world.collider_set.get_mut(handle) {
                let center = self.center_position();
                collider.set_translation(vector![center.x, center.y, center.z]);
            }
        }
    }

    /// Run rapier's collision-aware shape movement without committing it.
    fn shape_movement(
        &self,
        world: &PhysicsWorld,
        dt: f32,
        translation: Vec3,
    ) -> Option<rapier3d::control::EffectiveCharacterMovement> {
        let handle = self.collider_handle?;
        let collider = world.collider_set.get(handle)?;
        let center = self.center_position();
        let pose = Isometry::translation(center.x, center.y, center.z);

        Some(self.controller.move_shape(
            dt,
            &world.rigid_body_set,
            &world.collider_set,
            &world.query_pipeline,
            collider.shape(),
            &pose,
            vector![translation.x, translation.y, translation.z],
            QueryFilter::default().exclude_collider(handle),
            |_| {},
        ))
    }
}

impl CharacterPhysics for AvatarBody {
    type World = PhysicsWorld;

    fn check_support(&mut self, world: &PhysicsWorld, dt: f32, down: Vec3) -> SupportInfo {
        let Some(handle) = self.collider_handle else {
            return SupportInfo::unsupported();
        };
        let Some(collider) = world.collider_set.get(handle) else {
            return SupportInfo::unsupported();
        };

        let center = self.center_position();
        let pose = Isometry::translation(center.x, center.y, center.z);
        let falling = self.velocity.dot(down).max(0.0);
        let probe = self.config.support_probe + falling * dt;

        let options = ShapeCastOptions {
            max_time_of_impact: probe,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };

        let hit = world.query_pipeline.cast_shape(
            &world.rigid_body_set,
            &world.collider_set,
            &pose,
            &vector![down.x, down.y, down.z],
            collider.shape(),
            options,
            QueryFilter::default().exclude_collider(handle),
        );

        let Some((hit_handle, hit)) = hit else {
            return SupportInfo::unsupported();
        };

        let mut normal = Vec3::new(hit.normal2.x, hit.normal2.y, hit.normal2.z);
        if normal.dot(down) > 0.0 {
            normal = -normal;
        }

        let surface_velocity = world
            .collider_set
            .get(hit_handle)
            .and_then(|c| c.parent())
            .and_then(|body| world.rigid_body_set.get(body))
            .map(|body| {
                let v = body.linvel();
                Vec3::new(v.x, v.y, v.z)
            })
            .unwrap_or(Vec3::ZERO);

        let up = -down;
        let max_slope_cos = self.config.max_slope_angle.to_radians().cos();
        let state = if normal.dot(up) >= max_slope_cos {
            SupportState::Supported
        } else {
            SupportState::Sliding
        };

        SupportInfo {
            state,
            average_surface_normal: normal,
            average_surface_velocity: surface_velocity,
        }
    }

    fn integrate(&mut self, world: &mut PhysicsWorld, dt: f32, support: &SupportInfo, gravity: Vec3) {
        if dt <= 0.0 {
            return;
        }

        // Press against the surface while supported so slope descent keeps
        // contact; airborne gravity is already integrated into the velocity.
        let mut translation = self.velocity * dt;
        if support.is_supported() {
            translation += gravity.normalize_or_zero() * (self.config.ground_snap_distance * dt);
        }

        let Some(movement) = self.shape_movement(world, dt, translation) else {
            self.position += self.velocity * dt;
            return;
        };

        self.grounded = movement.grounded;
        self.position += Vec3::new(
            movement.translation.x,
            movement.translation.y,
            movement.translation.z,
        );
        self.sync_collider(world);
    }

    fn resolve_movement(
        &mut self,
        world: &PhysicsWorld,
        dt: f32,
        _forward: Vec3,
        _support_normal: Vec3,
        current_velocity: Vec3,
        surface_velocity: Vec3,
        desired_velocity: Vec3,
        _gravity_up: Vec3,
    ) -> Vec3 {
        if dt <= 0.0 {
            return current_velocity;
        }

        let candidate = desired_velocity + surface_velocity;
        match self.shape_movement(world, dt, candidate * dt) {
            Some(movement) => Vec3::new(
                movement.translation.x / dt,
                movement.translation.y / dt,
                movement.translation.z / dt,
            ),
            None => current_velocity,
        }
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, world: &mut PhysicsWorld, position: Vec3) {
        self.position = position;
        self.sync_collider(world);
    }

    fn set_capsule(&mut self, world: &mut PhysicsWorld, height: f32, radius: f32) {
        self.config.height = height;
        self.config.radius = radius;

        if let Some(handle) = self.collider_handle.take() {
            world.remove_collider(handle);
        }
        self.create_collider(world);
    }
}

impl Default for AvatarBody {
    fn default() -> Self {
        Self::new()
    }
}

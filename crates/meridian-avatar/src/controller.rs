//! Avatar orchestration: one controller instance per active avatar.

use glam::Vec3;
use tracing::{debug, info};

use meridian_core::{EntityId, Transform};
use meridian_physics::CharacterPhysics;

use crate::animation::{AnimationAction, AnimationBlendController, ClipLibrary};
use crate::camera::CameraFollowController;
use crate::input::{InputAggregator, InputProfile};
use crate::locomotion::{Locomotion, MotionState};
use crate::profile::CharacterProfile;

/// Effect hook toggled by boost state (particle trail, thruster sound).
pub trait BoostEmitter {
    fn set_active(&mut self, active: bool);
}

/// Drives one avatar: input, locomotion, camera reconciliation, animation.
///
/// Two ordered callbacks run per frame. `pre_render_update` reads input and
/// updates camera and animation from the previous tick's resolved transform;
/// `post_physics_update` queries support, computes the desired velocity, and
/// hands it to the integrator. Velocity is always computed strictly after
/// support is known and strictly before the body integrates.
pub struct AvatarController<B: CharacterPhysics> {
    id: EntityId,
    body: B,
    locomotion: Locomotion,
    input: InputAggregator,
    animation: AnimationBlendController,
    clips: ClipLibrary,
    camera: Option<CameraFollowController>,
    boost_emitters: Vec<Box<dyn BoostEmitter>>,
    yaw: f32,
    target_yaw: f32,
    paused: bool,
    boost_active: bool,
    capsule_visible: bool,
}

impl<B: CharacterPhysics> AvatarController<B> {
    pub fn new(body: B, input_profile: InputProfile) -> Self {
        Self {
            id: EntityId::new(),
            body,
            locomotion: Locomotion::new(),
            input: InputAggregator::new(input_profile),
            animation: AnimationBlendController::new(),
            clips: ClipLibrary::default(),
            camera: None,
            boost_emitters: Vec::new(),
            yaw: 0.0,
            target_yaw: 0.0,
            paused: false,
            boost_active: false,
            capsule_visible: false,
        }
    }

    /// This avatar's entity id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Install (or replace) the active character and spawn it.
    ///
    /// Resets velocity, input, and jump/boost flags, resizes the capsule,
    /// and forces the locomotion state back to airborne so the spawn always
    /// resolves through a landing check.
    pub fn set_character(
        &mut self,
        world: &mut B::World,
        profile: CharacterProfile,
        spawn_point: Vec3,
        clips: ClipLibrary,
    ) {
        info!("avatar {}: installing character '{}'", self.id, profile.name);

        self.body.set_capsule(world, profile.height, profile.radius);
        self.body.set_position(world, spawn_point);
        self.body.set_velocity(Vec3::ZERO);
        self.input.clear_movement();

        self.clips = clips;
        self.animation.set_character(&profile, &mut self.clips);
        self.locomotion.set_profile(profile);
    }

    /// Reposition the current character (fall rescue, level change).
    pub fn respawn(&mut self, world: &mut B::World, spawn_point: Vec3) {
        self.body.set_position(world, spawn_point);
        self.body.set_velocity(Vec3::ZERO);
        self.input.clear_movement();
        self.locomotion.reset();
    }

    /// Attach the follow camera
    pub fn attach_camera(&mut self, camera: CameraFollowController) {
        self.camera = Some(camera);
    }

    /// Attach a boost-toggled effect emitter (starts inactive)
    pub fn attach_boost_emitter(&mut self, mut emitter: Box<dyn BoostEmitter>) {
        emitter.set_active(false);
        self.boost_emitters.push(emitter);
    }

    /// Pre-render callback: input, camera, yaw smoothing, animation.
    pub fn pre_render_update(&mut self, dt: f32) {
        if self.input.take_camera_reset() {
            if let Some(camera) = &mut self.camera {
                camera.reset_to_default_offset();
            }
        }
        if self.input.take_capsule_toggle() {
            self.capsule_visible = !self.capsule_visible;
            debug!("avatar {}: debug capsule visible: {}", self.id, self.capsule_visible);
        }

        let snapshot = self.input.snapshot();
        self.update_boost_effects(snapshot.want_boost);

        if let Some(camera) = &mut self.camera {
            camera.update(dt, self.body.position(), &mut self.yaw);
        }

        self.update_rotation();
        self.update_animations(dt);
    }

    /// Post-physics callback: support query, desired velocity, integration.
    pub fn post_physics_update(&mut self, world: &mut B::World, dt: f32) {
        if dt <= 0.0 || self.paused {
            return;
        }

        let gravity = self.locomotion.gravity();
        let down = gravity.normalize_or_zero();
        let support = self.body.check_support(world, dt, down);

        let snapshot = self.input.snapshot();
        let velocity = self.locomotion.desired_velocity(
            &mut self.body,
            world,
            dt,
            &snapshot,
            self.yaw,
            &support,
        );

        self.body.set_velocity(velocity);
        self.body.integrate(world, dt, &support, gravity);
    }

    fn update_rotation(&mut self) {
        // The camera's eased rotation owns the yaw while it is in flight.
        if self.camera.as_ref().is_some_and(|c| c.is_rotating_avatar()) {
            self.target_yaw = self.yaw;
            return;
        }
        if self.locomotion.state() == MotionState::Airborne {
            return;
        }
        let Some(profile) = self.locomotion.profile() else {
            return;
        };

        self.target_yaw += profile.rotation_speed * self.input.steer_axis();
        self.yaw += (self.target_yaw - self.yaw) * profile.rotation_smoothing;
    }

    fn update_animations(&mut self, dt: f32) {
        let moving = self.input.is_moving();
        self.animation
            .update_animation(&mut self.clips, moving, self.locomotion.state());
        self.animation.update_blend(&mut self.clips, dt);

        if moving {
            if let Some(camera) = &mut self.camera {
                camera.notify_movement_started(self.body.position(), self.yaw);
            }
        }
    }

    fn update_boost_effects(&mut self, active: bool) {
        if active == self.boost_active {
            return;
        }
        self.boost_active = active;
        for emitter in &mut self.boost_emitters {
            emitter.set_active(active);
        }
    }

    /// Pause physics: zero the velocity once and skip integration.
    ///
    /// The motion state is preserved so resuming continues seamlessly.
    pub fn pause_physics(&mut self) {
        if !self.paused {
            self.paused = true;
            self.body.set_velocity(Vec3::ZERO);
        }
    }

    /// Resume physics
    pub fn resume_physics(&mut self) {
        self.paused = false;
    }

    /// Whether physics is paused
    pub fn is_physics_paused(&self) -> bool {
        self.paused
    }

    /// Whether any movement input is active
    pub fn is_moving(&self) -> bool {
        self.input.is_moving()
    }

    /// Whether boost is active
    pub fn is_boosting(&self) -> bool {
        self.boost_active
    }

    /// Current motion state
    pub fn state(&self) -> MotionState {
        self.locomotion.state()
    }

    /// Whether the character stands on the ground
    pub fn is_on_ground(&self) -> bool {
        self.locomotion.state() == MotionState::Grounded
    }

    /// Current foot position
    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    /// Teleport the body
    pub fn set_position(&mut self, world: &mut B::World, position: Vec3) {
        self.body.set_position(world, position);
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.body.velocity()
    }

    /// Override the body velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.body.set_velocity(velocity);
    }

    /// Display transform (physics position + smoothed yaw)
    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.body.position(), self.yaw)
    }

    /// Current yaw heading
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Whether the debug capsule is visible
    pub fn capsule_visible(&self) -> bool {
        self.capsule_visible
    }

    /// The physics body
    pub fn body(&self) -> &B {
        &self.body
    }

    /// The physics body, mutable
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// The input aggregator (feed key/touch events here)
    pub fn input_mut(&mut self) -> &mut InputAggregator {
        &mut self.input
    }

    /// The attached camera, if any
    pub fn camera(&self) -> Option<&CameraFollowController> {
        self.camera.as_ref()
    }

    /// The attached camera, mutable
    pub fn camera_mut(&mut self) -> Option<&mut CameraFollowController> {
        self.camera.as_mut()
    }

    /// Clip playback state for the render layer
    pub fn clips(&self) -> &ClipLibrary {
        &self.clips
    }

    /// The animation action currently playing, if any
    pub fn animation_action(&self) -> Option<AnimationAction> {
        self.animation.current_action()
    }

    /// Release attached collaborators and input state.
    pub fn dispose(&mut self) {
        self.camera = None;
        self.boost_emitters.clear();
        self.input.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use meridian_physics::SupportInfo;
    use winit::keyboard::KeyCode;

    use crate::animation::AnimationAction;

    const DT: f32 = 1.0 / 60.0;

    /// Body double with scripted support.
    struct MockBody {
        position: Vec3,
        velocity: Vec3,
        support: SupportInfo,
    }

    impl MockBody {
        fn new() -> Self {
            Self {
                position: Vec3::ZERO,
                velocity: Vec3::ZERO,
                support: SupportInfo::unsupported(),
            }
        }

        fn on_ground() -> Self {
            Self {
                support: SupportInfo::supported(Vec3::Y, Vec3::ZERO),
                ..Self::new()
            }
        }
    }

    impl CharacterPhysics for MockBody {
        type World = ();

        fn check_support(&mut self, _world: &(), _dt: f32, _down: Vec3) -> SupportInfo {
            self.support
        }

        fn integrate(&mut self, _world: &mut (), dt: f32, _support: &SupportInfo, _gravity: Vec3) {
            self.position += self.velocity * dt;
        }

        fn resolve_movement(
            &mut self,
            _world: &(),
            _dt: f32,
            _forward: Vec3,
            _support_normal: Vec3,
            _current_velocity: Vec3,
            surface_velocity: Vec3,
            desired_velocity: Vec3,
            _gravity_up: Vec3,
        ) -> Vec3 {
            desired_velocity + surface_velocity
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

        fn set_position(&mut self, _world: &mut (), position: Vec3) {
            self.position = position;
        }

        fn set_capsule(&mut self, _world: &mut (), _height: f32, _radius: f32) {}
    }

    struct FlagEmitter(Rc<Cell<bool>>);

    impl BoostEmitter for FlagEmitter {
        fn set_active(&mut self, active: bool) {
            self.0.set(active);
        }
    }

    fn spawn_avatar(body: MockBody) -> AvatarController<MockBody> {
        let mut avatar = AvatarController::new(body, InputProfile::desktop());
        avatar.set_character(
            &mut (),
            CharacterProfile::default(),
            Vec3::ZERO,
            ClipLibrary::from_names(["Idle", "Walk", "Jump"]),
        );
        avatar
    }

    #[test]
    fn test_spawn_forces_airborne_and_clears_input() {
        let mut avatar = AvatarController::new(MockBody::on_ground(), InputProfile::desktop());
        avatar.input_mut().key_down(KeyCode::Space);
        avatar.input_mut().key_down(KeyCode::ShiftLeft);

        avatar.set_character(
            &mut (),
            CharacterProfile::default(),
            Vec3::new(0.0, 5.0, 0.0),
            ClipLibrary::from_names(["Idle", "Walk", "Jump"]),
        );

        assert_eq!(avatar.state(), MotionState::Airborne);
        assert_eq!(avatar.position(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(avatar.velocity(), Vec3::ZERO);
        let snapshot = avatar.input_mut().snapshot();
        assert!(!snapshot.want_jump);
        assert!(!snapshot.want_boost);
    }

    #[test]
    fn test_jump_sequence() {
        let mut avatar = spawn_avatar(MockBody::on_ground());

        // Land first.
        avatar.post_physics_update(&mut (), DT);
        assert_eq!(avatar.state(), MotionState::Grounded);

        avatar.input_mut().key_down(KeyCode::Space);
        avatar.post_physics_update(&mut (), DT);
        assert_eq!(avatar.state(), MotionState::JumpStart);

        let launch = (2.0_f32 * 18.0 * CharacterProfile::default().jump_height).sqrt();
        assert!((avatar.velocity().y - launch).abs() < 1e-3);

        avatar.post_physics_update(&mut (), DT);
        assert_eq!(avatar.state(), MotionState::Airborne);
    }

    #[test]
    fn test_pause_skips_integration_and_keeps_state() {
        let mut avatar = spawn_avatar(MockBody::on_ground());
        avatar.post_physics_update(&mut (), DT);
        assert_eq!(avatar.state(), MotionState::Grounded);

        avatar.input_mut().key_down(KeyCode::KeyW);
        avatar.post_physics_update(&mut (), DT);
        assert!(avatar.velocity().length() > 0.0);

        avatar.pause_physics();
        assert_eq!(avatar.velocity(), Vec3::ZERO);
        let frozen = avatar.position();
        for _ in 0..10 {
            avatar.post_physics_update(&mut (), DT);
        }
        assert_eq!(avatar.position(), frozen);
        assert_eq!(avatar.state(), MotionState::Grounded);

        avatar.resume_physics();
        avatar.post_physics_update(&mut (), DT);
        assert!(avatar.velocity().length() > 0.0);
    }

    #[test]
    fn test_boost_emitters_follow_boost_edges() {
        let flag = Rc::new(Cell::new(true));
        let mut avatar = spawn_avatar(MockBody::on_ground());
        avatar.attach_boost_emitter(Box::new(FlagEmitter(flag.clone())));
        assert!(!flag.get());

        avatar.input_mut().key_down(KeyCode::ShiftLeft);
        avatar.pre_render_update(DT);
        assert!(flag.get());
        assert!(avatar.is_boosting());

        avatar.input_mut().key_up(KeyCode::ShiftLeft);
        avatar.pre_render_update(DT);
        assert!(!flag.get());
        assert!(!avatar.is_boosting());
    }

    #[test]
    fn test_turn_keys_steer_yaw_when_grounded() {
        let mut avatar = spawn_avatar(MockBody::on_ground());
        avatar.post_physics_update(&mut (), DT);
        assert_eq!(avatar.state(), MotionState::Grounded);

        avatar.input_mut().key_down(KeyCode::KeyD);
        for _ in 0..10 {
            avatar.pre_render_update(DT);
        }
        assert!(avatar.yaw() > 0.0);

        // Airborne characters keep their heading.
        avatar.body_mut().support = SupportInfo::unsupported();
        avatar.post_physics_update(&mut (), DT);
        assert_eq!(avatar.state(), MotionState::Airborne);
        let frozen = avatar.yaw();
        avatar.pre_render_update(DT);
        assert_eq!(avatar.yaw(), frozen);
    }

    #[test]
    fn test_camera_reset_key_passthrough() {
        let mut avatar = spawn_avatar(MockBody::on_ground());
        let mut camera = CameraFollowController::new();
        camera.zoom_by(-500.0);
        let default_offset = camera.config.default_offset;
        avatar.attach_camera(camera);

        avatar.input_mut().key_down(KeyCode::Digit1);
        avatar.pre_render_update(DT);
        assert_eq!(avatar.camera().unwrap().offset(), default_offset);
    }

    #[test]
    fn test_capsule_toggle_passthrough() {
        let mut avatar = spawn_avatar(MockBody::on_ground());
        assert!(!avatar.capsule_visible());
        avatar.input_mut().key_down(KeyCode::Digit0);
        avatar.pre_render_update(DT);
        assert!(avatar.capsule_visible());
    }

    #[test]
    fn test_animation_follows_motion() {
        let mut avatar = spawn_avatar(MockBody::on_ground());
        avatar.post_physics_update(&mut (), DT);
        avatar.pre_render_update(DT);
        assert_eq!(
            avatar.animation_action(),
            Some(AnimationAction::Idle)
        );

        avatar.input_mut().key_down(KeyCode::KeyW);
        avatar.post_physics_update(&mut (), DT);
        avatar.pre_render_update(DT);
        assert_eq!(
            avatar.animation_action(),
            Some(AnimationAction::Walk)
        );
    }

    #[test]
    fn test_dispose_releases_collaborators() {
        let mut avatar = spawn_avatar(MockBody::on_ground());
        avatar.attach_camera(CameraFollowController::new());
        avatar.attach_boost_emitter(Box::new(FlagEmitter(Rc::new(Cell::new(false)))));

        avatar.dispose();
        assert!(avatar.camera().is_none());
    }

    #[test]
    fn test_no_profile_keeps_simulation_alive() {
        let mut avatar = AvatarController::new(MockBody::on_ground(), InputProfile::desktop());
        avatar.body_mut().set_velocity(Vec3::new(0.0, -3.0, 0.0));
        avatar.post_physics_update(&mut (), DT);
        // No profile: the velocity passes through unmodified.
        assert_eq!(avatar.velocity(), Vec3::new(0.0, -3.0, 0.0));
        avatar.pre_render_update(DT);
    }
}

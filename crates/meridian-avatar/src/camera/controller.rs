//! Smooth-follow camera with user-driven orbiting.

use glam::{Quat, Vec2, Vec3};

use meridian_core::ease::{ease_in_out_cubic, lerp, wrap_angle};

use super::CameraConfig;

/// Mouse-wheel zoom scale on top of the drag sensitivity.
const ZOOM_WHEEL_FACTOR: f32 = 0.2;
/// Two-finger pan scale on top of the drag sensitivity.
const PAN_FACTOR: f32 = 4.0;

/// Follow camera anchored to the avatar by a yaw-rotated offset.
///
/// While the user drags, the camera moves along its own axes and follow is
/// bypassed; releasing the drag arms an eased avatar rotation that fires the
/// next time movement starts, so walking out of a free-look never snaps the
/// character's heading.
pub struct CameraFollowController {
    /// Configuration
    pub config: CameraConfig,
    /// Current offset from the avatar (mutable via zoom/pan)
    offset: Vec3,
    /// Camera world position
    position: Vec3,
    /// Point the camera looks at (the avatar)
    look_target: Vec3,
    /// Whether a pointer drag is in progress
    dragging: bool,
    /// Rotate the avatar toward the camera heading when movement resumes
    pending_walk_rotation: bool,
    /// Whether the eased avatar rotation is in flight
    rotating_avatar: bool,
    rotation_start: f32,
    rotation_target: f32,
    rotation_elapsed: f32,
}

impl CameraFollowController {
    /// Create a controller with default config
    pub fn new() -> Self {
        Self::with_config(CameraConfig::default())
    }

    /// Create a controller with custom config
    pub fn with_config(config: CameraConfig) -> Self {
        let offset = config.default_offset;
        Self {
            config,
            offset,
            position: Vec3::ZERO,
            look_target: Vec3::ZERO,
            dragging: false,
            pending_walk_rotation: false,
            rotating_avatar: false,
            rotation_start: 0.0,
            rotation_target: 0.0,
            rotation_elapsed: 0.0,
        }
    }

    /// Camera world position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Place the camera directly (scene setup)
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Current offset from the avatar
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Point the camera looks at (always the avatar position)
    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether the eased avatar rotation is in flight
    pub fn is_rotating_avatar(&self) -> bool {
        self.rotating_avatar
    }

    /// Per-tick update: smooth follow, drag bookkeeping, and the avatar
    /// rotation-lerp (which writes `avatar_yaw` while in flight).
    pub fn update(&mut self, dt: f32, avatar_position: Vec3, avatar_yaw: &mut f32) {
        self.look_target = avatar_position;

        if self.dragging {
            self.offset.y = self.position.y - avatar_position.y;
        } else if !self.pending_walk_rotation {
            self.smooth_follow(avatar_position, *avatar_yaw);
        }

        self.update_rotation_lerp(dt, avatar_yaw);
    }

    fn smooth_follow(&mut self, avatar_position: Vec3, avatar_yaw: f32) {
        if self.rotating_avatar {
            return;
        }

        let rotated = Quat::from_rotation_y(avatar_yaw) * self.offset;
        let desired = avatar_position + rotated;

        // Interpolation factor scales with zoom distance: tight up close,
        // loose far out.
        let range = self.config.zoom_min - self.config.zoom_max;
        let t = if range.abs() > f32::EPSILON {
            ((self.offset.z - self.config.zoom_max) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let smoothing = lerp(self.config.near_smoothing, self.config.far_smoothing, t);

        self.position = self.position.lerp(desired, smoothing);
    }

    /// A pointer drag started
    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Pointer moved during a drag: orbit along the camera's own axes
    pub fn drag_by(&mut self, delta: Vec2, avatar_position: Vec3) {
        if !self.dragging {
            return;
        }

        let (right, up) = self.local_axes(avatar_position);
        self.position += right * (-delta.x * self.config.drag_sensitivity);
        self.position += up * (delta.y * self.config.drag_sensitivity);
    }

    /// The pointer drag ended; arm the rotate-on-walk reconciliation
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.pending_walk_rotation = true;
    }

    /// Mouse-wheel zoom: adjusts the offset depth within the zoom range
    pub fn zoom_by(&mut self, wheel_delta: f32) {
        self.offset.z += wheel_delta * self.config.drag_sensitivity * ZOOM_WHEEL_FACTOR;
        self.offset.z = self.offset.z.clamp(self.config.zoom_min, self.config.zoom_max);
    }

    /// Two-finger pan: shifts the offset along the camera's right/forward axes
    pub fn pan_by(&mut self, delta: Vec2, avatar_position: Vec3) {
        let (right, _up) = self.local_axes(avatar_position);
        let forward = (avatar_position - self.position).normalize_or_zero();

        self.offset += right * (-delta.x * self.config.drag_sensitivity * PAN_FACTOR);
        self.offset += forward * (delta.y * self.config.drag_sensitivity * PAN_FACTOR);
    }

    /// Movement started; if a drag just ended, ease the avatar to face away
    /// from the camera instead of snapping.
    pub fn notify_movement_started(&mut self, avatar_position: Vec3, avatar_yaw: f32) {
        if !self.pending_walk_rotation {
            return;
        }
        self.pending_walk_rotation = false;
        self.start_rotation_lerp(avatar_position, avatar_yaw);
    }

    fn start_rotation_lerp(&mut self, avatar_position: Vec3, avatar_yaw: f32) {
        let to_camera = (self.position - avatar_position).normalize_or_zero();
        let target_yaw = (-to_camera.x).atan2(-to_camera.z);
        let difference = wrap_angle(target_yaw - avatar_yaw);

        self.rotating_avatar = true;
        self.rotation_start = avatar_yaw;
        self.rotation_target = avatar_yaw + difference;
        self.rotation_elapsed = 0.0;
    }

    fn update_rotation_lerp(&mut self, dt: f32, avatar_yaw: &mut f32) {
        if !self.rotating_avatar {
            return;
        }

        self.rotation_elapsed += dt;
        let progress = (self.rotation_elapsed / self.config.rotation_duration).min(1.0);
        let eased = ease_in_out_cubic(progress);

        *avatar_yaw = lerp(self.rotation_start, self.rotation_target, eased);

        if progress >= 1.0 {
            self.rotating_avatar = false;
        }
    }

    /// Clear drag/rotation state and resume automatic follow immediately
    pub fn force_activate_follow(&mut self) {
        self.pending_walk_rotation = false;
        self.rotating_avatar = false;
        self.dragging = false;
    }

    /// Restore the configured default offset, with no easing
    pub fn reset_to_default_offset(&mut self) {
        self.offset = self.config.default_offset;
        self.force_activate_follow();
    }

    fn local_axes(&self, avatar_position: Vec3) -> (Vec3, Vec3) {
        let forward = (avatar_position - self.position).normalize_or_zero();
        if forward.length_squared() < f32::EPSILON {
            return (Vec3::X, Vec3::Y);
        }
        let right = Vec3::Y.cross(forward).normalize_or_zero();
        let up = forward.cross(right);
        (right, up)
    }
}

impl Default for CameraFollowController {
    fn default() -> Self {
        Self::new()
    }
}

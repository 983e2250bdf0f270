//! Camera follow configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera follow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Default offset from the avatar (rotated by avatar yaw)
    pub default_offset: Vec3,
    /// Pointer drag sensitivity (world units per pixel)
    pub drag_sensitivity: f32,
    /// Farthest zoom (most negative offset Z)
    pub zoom_min: f32,
    /// Closest zoom (least negative offset Z)
    pub zoom_max: f32,
    /// Follow interpolation factor at the closest zoom
    pub near_smoothing: f32,
    /// Follow interpolation factor at the farthest zoom
    pub far_smoothing: f32,
    /// Duration of the eased avatar rotation after free-look (seconds)
    pub rotation_duration: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_offset: Vec3::new(0.0, 1.2, -3.0),
            drag_sensitivity: 0.02,
            zoom_min: -15.0,
            zoom_max: -2.0,
            near_smoothing: 0.05,
            far_smoothing: 0.25,
            rotation_duration: 0.5,
        }
    }
}

//! Camera follow system
//!
//! Keeps the camera anchored to the avatar with smooth interpolation while
//! allowing free user-driven orbiting, zooming, and panning.

mod config;
mod controller;

pub use config::CameraConfig;
pub use controller::CameraFollowController;

//! Meridian Core - Core types and utilities shared across the engine
//!
//! This crate provides the foundational pieces used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component for entity positioning
//! - Time system driving the fixed-tick simulation loop
//! - Easing and angle helpers

pub mod ease;
pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{GameTime, TimeConfig};
pub use types::{EntityId, Transform};

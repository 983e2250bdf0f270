//! Ground support reporting for character bodies.

use glam::Vec3;

/// How the character currently rests on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportState {
    /// Standing on a walkable surface.
    Supported,
    /// Touching a surface too steep to stand on.
    Sliding,
    /// No surface within the support probe.
    Unsupported,
}

/// Physics-reported description of the character's ground contact.
#[derive(Debug, Clone, Copy)]
pub struct SupportInfo {
    /// Support classification for this tick.
    pub state: SupportState,
    /// Average normal of the supporting surface (world up when unsupported).
    pub average_surface_normal: Vec3,
    /// Average velocity of the supporting surface (moving platforms).
    pub average_surface_velocity: Vec3,
}

impl SupportInfo {
    /// Support info for a character with no surface under it.
    pub fn unsupported() -> Self {
        Self {
            state: SupportState::Unsupported,
            average_surface_normal: Vec3::Y,
            average_surface_velocity: Vec3::ZERO,
        }
    }

    /// Support info for a character standing on a surface.
    pub fn supported(normal: Vec3, surface_velocity: Vec3) -> Self {
        Self {
            state: SupportState::Supported,
            average_surface_normal: normal,
            average_surface_velocity: surface_velocity,
        }
    }

    /// Whether the character can stand on the current contact.
    pub fn is_supported(&self) -> bool {
        self.state == SupportState::Supported
    }
}

impl Default for SupportInfo {
    fn default() -> Self {
        Self::unsupported()
    }
}

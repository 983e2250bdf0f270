//! Motion states and the transition table between them.

use meridian_physics::SupportInfo;

/// The character's motion state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Falling or flying; no ground contact
    Airborne,
    /// Standing on a walkable surface
    Grounded,
    /// Launching this tick; becomes Airborne on the next evaluation
    JumpStart,
}

/// Evaluate the transition table for one tick.
pub fn next_state(state: MotionState, support: &SupportInfo, want_jump: bool) -> MotionState {
    match state {
        MotionState::Airborne => {
            if support.is_supported() {
                MotionState::Grounded
            } else {
                MotionState::Airborne
            }
        }
        MotionState::Grounded => {
            if !support.is_supported() {
                MotionState::Airborne
            } else if want_jump {
                MotionState::JumpStart
            } else {
                MotionState::Grounded
            }
        }
        MotionState::JumpStart => MotionState::Airborne,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use meridian_physics::SupportState;

    fn supported() -> SupportInfo {
        SupportInfo::supported(Vec3::Y, Vec3::ZERO)
    }

    fn unsupported() -> SupportInfo {
        SupportInfo::unsupported()
    }

    fn sliding() -> SupportInfo {
        SupportInfo {
            state: SupportState::Sliding,
            average_surface_normal: Vec3::new(0.8, 0.6, 0.0),
            average_surface_velocity: Vec3::ZERO,
        }
    }

    #[test]
    fn test_landing() {
        assert_eq!(
            next_state(MotionState::Airborne, &supported(), false),
            MotionState::Grounded
        );
        assert_eq!(
            next_state(MotionState::Airborne, &unsupported(), true),
            MotionState::Airborne
        );
    }

    #[test]
    fn test_walking_off_an_edge() {
        assert_eq!(
            next_state(MotionState::Grounded, &unsupported(), false),
            MotionState::Airborne
        );
    }

    #[test]
    fn test_jump_request() {
        assert_eq!(
            next_state(MotionState::Grounded, &supported(), true),
            MotionState::JumpStart
        );
        assert_eq!(
            next_state(MotionState::Grounded, &supported(), false),
            MotionState::Grounded
        );
    }

    #[test]
    fn test_jump_start_always_lifts_off() {
        for support in [supported(), unsupported(), sliding()] {
            for want_jump in [true, false] {
                assert_eq!(
                    next_state(MotionState::JumpStart, &support, want_jump),
                    MotionState::Airborne
                );
            }
        }
    }

    #[test]
    fn test_sliding_counts_as_unsupported() {
        assert_eq!(
            next_state(MotionState::Grounded, &sliding(), false),
            MotionState::Airborne
        );
        assert_eq!(
            next_state(MotionState::Airborne, &sliding(), false),
            MotionState::Airborne
        );
    }

    #[test]
    fn test_full_jump_sequence() {
        let mut state = MotionState::Grounded;
        state = next_state(state, &supported(), true);
        assert_eq!(state, MotionState::JumpStart);
        state = next_state(state, &supported(), true);
        assert_eq!(state, MotionState::Airborne);
    }
}

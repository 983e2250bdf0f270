//! Animation selection and weighted crossfading.

use tracing::warn;

use meridian_core::ease::ease_in_out_cubic;

use crate::locomotion::MotionState;
use crate::profile::CharacterProfile;

use super::clips::{AnimationAction, ClipId, ClipLibrary};

/// Selects the target clip from motion state and crossfades toward it.
///
/// Times are driven by an internal clock advanced with the tick delta, so
/// behavior is deterministic under a fixed-step loop.
pub struct AnimationBlendController {
    active: bool,
    idle_clip: Option<ClipId>,
    walk_clip: Option<ClipId>,
    jump_clip: Option<ClipId>,
    /// Crossfade duration in seconds (0 = hard switch)
    blend_duration: f32,
    /// Jump animation suppression window after going airborne, seconds
    jump_delay: f32,
    current: Option<AnimationAction>,
    previous: Option<AnimationAction>,
    blending: bool,
    blend_start: f64,
    jump_delayed: bool,
    jump_delay_start: f64,
    last_state: Option<MotionState>,
    clock: f64,
}

impl AnimationBlendController {
    pub fn new() -> Self {
        Self {
            active: false,
            idle_clip: None,
            walk_clip: None,
            jump_clip: None,
            blend_duration: 0.4,
            jump_delay: 0.1,
            current: None,
            previous: None,
            blending: false,
            blend_start: 0.0,
            jump_delayed: false,
            jump_delay_start: 0.0,
            last_state: None,
            clock: 0.0,
        }
    }

    /// Install a character: stop everything and re-resolve its clips.
    pub fn set_character(&mut self, profile: &CharacterProfile, library: &mut ClipLibrary) {
        self.blend_duration = profile.blend_ms / 1000.0;
        self.jump_delay = profile.jump_delay_ms / 1000.0;

        self.current = None;
        self.previous = None;
        self.blending = false;
        self.jump_delayed = false;
        self.jump_delay_start = 0.0;
        self.last_state = None;

        library.stop_all();

        self.idle_clip = library.resolve(&profile.clips.idle, AnimationAction::Idle);
        self.walk_clip = library.resolve(&profile.clips.walk, AnimationAction::Walk);
        self.jump_clip = library.resolve(&profile.clips.jump, AnimationAction::Jump);

        if self.idle_clip.is_none() || self.walk_clip.is_none() {
            warn!(
                "animation mapping for '{}' incomplete; available clips: {:?}",
                profile.name,
                library.names().collect::<Vec<_>>()
            );
        }

        self.active = true;
    }

    /// The action currently playing, if any
    pub fn current_action(&self) -> Option<AnimationAction> {
        self.current
    }

    /// Whether a crossfade is in flight
    pub fn is_blending(&self) -> bool {
        self.blending
    }

    fn clip_for(&self, action: AnimationAction) -> Option<ClipId> {
        match action {
            AnimationAction::Idle => self.idle_clip,
            AnimationAction::Walk => self.walk_clip,
            AnimationAction::Jump => self.jump_clip,
        }
    }

    /// Pick this tick's target clip and begin a transition if it changed.
    pub fn update_animation(
        &mut self,
        library: &mut ClipLibrary,
        is_moving: bool,
        state: MotionState,
    ) {
        if !self.active {
            return;
        }

        self.handle_jump_delay(state);

        let target = if state == MotionState::Airborne && !self.jump_delayed {
            AnimationAction::Jump
        } else if is_moving {
            AnimationAction::Walk
        } else {
            AnimationAction::Idle
        };

        if self.current == Some(target) && !self.blending {
            return;
        }

        if self.current.is_none() {
            self.start_action(library, target);
            return;
        }

        // Mid-blend target changes are ignored until the fade completes.
        if self.blending {
            return;
        }

        if self.blend_duration == 0.0 {
            self.switch_directly(library, target);
            return;
        }

        self.start_weighted_blend(library, target);
    }

    fn start_action(&mut self, library: &mut ClipLibrary, target: AnimationAction) {
        let Some(id) = self.clip_for(target) else {
            warn!("animation clip not resolved for {target:?}");
            return;
        };

        library.stop_all();
        library.play(id);

        self.current = Some(target);
        self.previous = None;
        self.blending = false;
    }

    fn switch_directly(&mut self, library: &mut ClipLibrary, target: AnimationAction) {
        let (Some(current), Some(current_id)) =
            (self.current, self.current.and_then(|a| self.clip_for(a)))
        else {
            return;
        };
        let Some(target_id) = self.clip_for(target) else {
            warn!("animation clip not resolved for {target:?}");
            return;
        };

        if current_id == target_id {
            self.current = Some(target);
            return;
        }

        library.stop(current_id);
        library.play(target_id);

        self.previous = Some(current);
        self.current = Some(target);
        self.blending = false;
    }

    fn start_weighted_blend(&mut self, library: &mut ClipLibrary, target: AnimationAction) {
        let (Some(current), Some(current_id)) =
            (self.current, self.current.and_then(|a| self.clip_for(a)))
        else {
            return;
        };
        let Some(target_id) = self.clip_for(target) else {
            warn!("animation clip not resolved for {target:?}");
            return;
        };

        if current_id == target_id {
            self.current = Some(target);
            return;
        }

        library.play(current_id);
        library.play(target_id);
        library.set_weight(current_id, 1.0);
        library.set_weight(target_id, 0.0);

        self.previous = Some(current);
        self.current = Some(target);
        self.blend_start = self.clock;
        self.blending = true;
    }

    /// Advance the internal clock and the in-flight crossfade, if any.
    pub fn update_blend(&mut self, library: &mut ClipLibrary, dt: f32) {
        self.clock += dt as f64;

        if !self.blending {
            return;
        }

        let elapsed = (self.clock - self.blend_start) as f32;
        let progress = (elapsed / self.blend_duration).min(1.0);
        let eased = ease_in_out_cubic(progress);

        if let (Some(previous_id), Some(current_id)) = (
            self.previous.and_then(|a| self.clip_for(a)),
            self.current.and_then(|a| self.clip_for(a)),
        ) {
            library.set_weight(previous_id, 1.0 - eased);
            library.set_weight(current_id, eased);
        }

        if progress >= 1.0 {
            self.complete_blend(library);
        }
    }

    fn complete_blend(&mut self, library: &mut ClipLibrary) {
        if let Some(previous_id) = self.previous.and_then(|a| self.clip_for(a)) {
            library.stop(previous_id);
        }
        if let Some(current_id) = self.current.and_then(|a| self.clip_for(a)) {
            library.set_weight(current_id, 1.0);
        }

        self.blending = false;
        self.previous = None;
    }

    /// Suppress the jump clip for a window after going airborne, so a brief
    /// hop or step off a curb does not trigger a full jump animation.
    fn handle_jump_delay(&mut self, state: MotionState) {
        let entering_air =
            state == MotionState::Airborne && self.last_state != Some(MotionState::Airborne);
        let leaving_air =
            state != MotionState::Airborne && self.last_state == Some(MotionState::Airborne);

        if entering_air {
            self.jump_delayed = true;
            self.jump_delay_start = self.clock;
        } else if leaving_air {
            self.jump_delayed = false;
            self.jump_delay_start = 0.0;
        } else if self.jump_delayed && state == MotionState::Airborne {
            let elapsed = (self.clock - self.jump_delay_start) as f32;
            if elapsed >= self.jump_delay {
                self.jump_delayed = false;
            }
        }

        self.last_state = Some(state);
    }
}

impl Default for AnimationBlendController {
    fn default() -> Self {
        Self::new()
    }
}

//! Animation clip registry and name resolution.

use tracing::warn;

/// Semantic locomotion actions, each associated with one resolved clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationAction {
    Idle,
    Walk,
    Jump,
}

impl AnimationAction {
    /// Fallback keywords used when no direct name match exists.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            AnimationAction::Idle => &["idle", "stand"],
            AnimationAction::Walk => &["walk", "run", "move"],
            AnimationAction::Jump => &["jump", "leap", "hop"],
        }
    }
}

/// Handle to a clip in a [`ClipLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(usize);

#[derive(Debug, Clone)]
struct ClipState {
    name: String,
    playing: bool,
    weight: f32,
}

/// Playback state for the clips loaded with the current character.
///
/// The render layer reads playing flags and weights from here; this core
/// never touches meshes or skeletons.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: Vec<ClipState>,
}

impl ClipLibrary {
    /// Build a library from the loaded clip names, in load order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            clips: names
                .into_iter()
                .map(|name| ClipState {
                    name: name.into(),
                    playing: false,
                    weight: 0.0,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// All clip names in load order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|clip| clip.name.as_str())
    }

    /// Name of a clip
    pub fn name(&self, id: ClipId) -> Option<&str> {
        self.clips.get(id.0).map(|clip| clip.name.as_str())
    }

    /// Start a clip at full weight
    pub fn play(&mut self, id: ClipId) {
        if let Some(clip) = self.clips.get_mut(id.0) {
            clip.playing = true;
            clip.weight = 1.0;
        }
    }

    /// Stop a clip
    pub fn stop(&mut self, id: ClipId) {
        if let Some(clip) = self.clips.get_mut(id.0) {
            clip.playing = false;
            clip.weight = 0.0;
        }
    }

    /// Stop every clip
    pub fn stop_all(&mut self) {
        for clip in &mut self.clips {
            clip.playing = false;
            clip.weight = 0.0;
        }
    }

    /// Whether a clip is currently playing
    pub fn is_playing(&self, id: ClipId) -> bool {
        self.clips.get(id.0).map(|clip| clip.playing).unwrap_or(false)
    }

    /// Set a clip's blend weight
    pub fn set_weight(&mut self, id: ClipId, weight: f32) {
        if let Some(clip) = self.clips.get_mut(id.0) {
            clip.weight = weight;
        }
    }

    /// A clip's current blend weight
    pub fn weight(&self, id: ClipId) -> f32 {
        self.clips.get(id.0).map(|clip| clip.weight).unwrap_or(0.0)
    }

    /// Resolve a configured clip name against the loaded clips.
    ///
    /// Ordered matchers, first match wins: exact name, case-insensitive
    /// substring (either direction), then the action's semantic keywords.
    pub fn resolve(&self, name: &str, action: AnimationAction) -> Option<ClipId> {
        if let Some(index) = self.clips.iter().position(|clip| clip.name == name) {
            return Some(ClipId(index));
        }

        let wanted = name.to_lowercase();
        if let Some(index) = self.clips.iter().position(|clip| {
            let loaded = clip.name.to_lowercase();
            loaded.contains(&wanted) || wanted.contains(&loaded)
        }) {
            return Some(ClipId(index));
        }

        let keywords = action.keywords();
        if let Some(index) = self.clips.iter().position(|clip| {
            let loaded = clip.name.to_lowercase();
            keywords.iter().any(|keyword| loaded.contains(keyword))
        }) {
            return Some(ClipId(index));
        }

        warn!("no clip found for '{name}' ({action:?})");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_beats_substring() {
        let library = ClipLibrary::from_names(["WalkFast", "Walk"]);
        let id = library.resolve("Walk", AnimationAction::Walk).unwrap();
        assert_eq!(library.name(id), Some("Walk"));
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let library = ClipLibrary::from_names(["Standing", "Walking_Loop", "Leap_Up"]);
        let id = library.resolve("walk", AnimationAction::Walk).unwrap();
        assert_eq!(library.name(id), Some("Walking_Loop"));
    }

    #[test]
    fn test_keyword_fallback() {
        let library = ClipLibrary::from_names(["Standing", "Locomotion", "Leap_Up"]);

        let idle = library.resolve("Idle", AnimationAction::Idle).unwrap();
        assert_eq!(library.name(idle), Some("Standing"));

        let jump = library.resolve("Jump", AnimationAction::Jump).unwrap();
        assert_eq!(library.name(jump), Some("Leap_Up"));
    }

    #[test]
    fn test_first_match_wins_on_ties() {
        let library = ClipLibrary::from_names(["IdleA", "IdleB"]);
        let id = library.resolve("idle", AnimationAction::Idle).unwrap();
        assert_eq!(library.name(id), Some("IdleA"));
    }

    #[test]
    fn test_unresolvable_name() {
        let library = ClipLibrary::from_names(["Swim", "Fly"]);
        assert!(library.resolve("Jump", AnimationAction::Jump).is_none());
    }

    #[test]
    fn test_playback_state() {
        let mut library = ClipLibrary::from_names(["Idle", "Walk"]);
        let idle = library.resolve("Idle", AnimationAction::Idle).unwrap();

        library.play(idle);
        assert!(library.is_playing(idle));
        assert_eq!(library.weight(idle), 1.0);

        library.set_weight(idle, 0.4);
        assert_eq!(library.weight(idle), 0.4);

        library.stop_all();
        assert!(!library.is_playing(idle));
        assert_eq!(library.weight(idle), 0.0);
    }
}

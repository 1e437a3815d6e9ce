// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation keyframes for 3D clips.
//!
//! A keyframe records which animation a model plays from its time onward.
//! Keyframes are discrete: evaluation picks the most recent keyframe at or
//! before the clip-local time and never blends between neighbours.

use crate::properties::AnimationState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// An animation-selection keyframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Clip-local time in seconds
    pub time: f32,
    /// Animation playing from this keyframe on, if any
    pub active: Option<String>,
    /// Playback speed multiplier
    pub speed: f32,
    /// Whether the animation loops
    pub looping: bool,
}

impl Keyframe {
    /// Create a new keyframe at normal speed, looping
    pub fn new(time: f32, active: Option<String>) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            active,
            speed: 1.0,
            looping: true,
        }
    }

    /// Snapshot an animation state into a keyframe
    pub fn from_state(time: f32, state: &AnimationState) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            active: state.active.clone(),
            speed: state.speed,
            looping: state.looping,
        }
    }

    /// Set the playback speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set looping
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

/// Partial edit of a keyframe; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeUpdate {
    /// New clip-local time
    pub time: Option<f32>,
    /// New active animation (`Some(None)` clears it)
    pub active: Option<Option<String>>,
    /// New speed
    pub speed: Option<f32>,
    /// New looping flag
    pub looping: Option<bool>,
}

impl KeyframeUpdate {
    /// Update that only moves the keyframe
    pub fn time(time: f32) -> Self {
        Self {
            time: Some(time),
            ..Default::default()
        }
    }

    fn apply(&self, keyframe: &mut Keyframe) {
        if let Some(time) = self.time {
            keyframe.time = time;
        }
        if let Some(active) = &self.active {
            keyframe.active.clone_from(active);
        }
        if let Some(speed) = self.speed {
            keyframe.speed = speed;
        }
        if let Some(looping) = self.looping {
            keyframe.looping = looping;
        }
    }
}

/// Keyframes of one clip, always sorted ascending by time.
///
/// Keyframes sharing a time keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct KeyframeTrack {
    keyframes: Vec<Keyframe>,
}

impl KeyframeTrack {
    /// Create an empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyframe, keeping time order
    pub fn insert(&mut self, keyframe: Keyframe) -> KeyframeId {
        let id = keyframe.id;
        self.keyframes.push(keyframe);
        self.sort();
        id
    }

    /// Remove a keyframe
    pub fn remove(&mut self, id: KeyframeId) -> Option<Keyframe> {
        let idx = self.keyframes.iter().position(|k| k.id == id)?;
        Some(self.keyframes.remove(idx))
    }

    /// Edit a keyframe and restore time order
    pub fn update(&mut self, id: KeyframeId, update: &KeyframeUpdate) -> bool {
        let Some(keyframe) = self.keyframes.iter_mut().find(|k| k.id == id) else {
            return false;
        };
        update.apply(keyframe);
        self.sort();
        true
    }

    /// Get keyframe by ID
    pub fn get(&self, id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == id)
    }

    /// The keyframe in effect at a clip-local time: the last one with
    /// `time <= local_time`
    pub fn active_at(&self, local_time: f32) -> Option<&Keyframe> {
        self.keyframes.iter().rfind(|k| k.time <= local_time)
    }

    /// Clamp every keyframe into `[0, duration]`
    pub fn clamp_to(&mut self, duration: f32) {
        for kf in &mut self.keyframes {
            kf.time = kf.time.clamp(0.0, duration);
        }
        self.sort();
    }

    /// Get all keyframes
    pub fn as_slice(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Iterate over keyframes in time order
    pub fn iter(&self) -> impl Iterator<Item = &Keyframe> {
        self.keyframes.iter()
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Check if there are no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    fn sort(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

impl From<Vec<Keyframe>> for KeyframeTrack {
    fn from(keyframes: Vec<Keyframe>) -> Self {
        let mut track = Self { keyframes };
        track.sort();
        track
    }
}

impl From<KeyframeTrack> for Vec<Keyframe> {
    fn from(track: KeyframeTrack) -> Self {
        track.keyframes
    }
}

impl FromIterator<Keyframe> for KeyframeTrack {
    fn from_iter<I: IntoIterator<Item = Keyframe>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(time: f32, name: &str) -> Keyframe {
        Keyframe::new(time, Some(name.to_string()))
    }

    fn times(track: &KeyframeTrack) -> Vec<f32> {
        track.iter().map(|k| k.time).collect()
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let frames = [named(3.0, "Run"), named(1.0, "Walk"), named(2.0, "Jump")];

        let mut forward = KeyframeTrack::new();
        for kf in frames.iter().cloned() {
            forward.insert(kf);
        }
        let mut backward = KeyframeTrack::new();
        for kf in frames.iter().rev().cloned() {
            backward.insert(kf);
        }

        assert_eq!(times(&forward), vec![1.0, 2.0, 3.0]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_active_at_is_a_step_function() {
        let track: KeyframeTrack = [named(1.0, "Walk"), named(3.0, "Run")].into_iter().collect();

        assert!(track.active_at(0.5).is_none());
        assert_eq!(track.active_at(1.0).and_then(|k| k.active.as_deref()), Some("Walk"));
        assert_eq!(track.active_at(2.999).and_then(|k| k.active.as_deref()), Some("Walk"));
        assert_eq!(track.active_at(3.0).and_then(|k| k.active.as_deref()), Some("Run"));
        assert_eq!(track.active_at(100.0).and_then(|k| k.active.as_deref()), Some("Run"));
    }

    #[test]
    fn test_same_time_keyframes_latest_inserted_wins() {
        let mut track = KeyframeTrack::new();
        track.insert(named(1.0, "Walk"));
        track.insert(named(1.0, "Wave"));

        assert_eq!(track.active_at(1.5).and_then(|k| k.active.as_deref()), Some("Wave"));
    }

    #[test]
    fn test_update_moves_and_resorts() {
        let mut track = KeyframeTrack::new();
        let walk = track.insert(named(1.0, "Walk"));
        track.insert(named(3.0, "Run"));

        assert!(track.update(walk, &KeyframeUpdate::time(4.0)));
        assert_eq!(times(&track), vec![3.0, 4.0]);
        assert_eq!(track.as_slice()[1].id, walk);

        assert!(!track.update(KeyframeId::new(), &KeyframeUpdate::time(0.0)));
    }

    #[test]
    fn test_update_can_clear_animation() {
        let mut track = KeyframeTrack::new();
        let id = track.insert(named(1.0, "Walk").with_speed(2.0));
        let update = KeyframeUpdate {
            active: Some(None),
            looping: Some(false),
            ..Default::default()
        };

        assert!(track.update(id, &update));
        let kf = track.get(id).cloned();
        assert_eq!(kf.as_ref().and_then(|k| k.active.clone()), None);
        assert_eq!(kf.as_ref().map(|k| (k.speed, k.looping)), Some((2.0, false)));
    }

    #[test]
    fn test_remove() {
        let mut track = KeyframeTrack::new();
        let id = track.insert(named(1.0, "Walk"));
        assert!(track.remove(id).is_some());
        assert!(track.remove(id).is_none());
        assert!(track.is_empty());
    }

    #[test]
    fn test_clamp_to_duration() {
        let mut track: KeyframeTrack = [named(-1.0, "A"), named(2.0, "B"), named(9.0, "C")]
            .into_iter()
            .collect();
        track.clamp_to(5.0);
        assert_eq!(times(&track), vec![0.0, 2.0, 5.0]);
    }

    #[test]
    fn test_deserialization_restores_order() {
        let unsorted = vec![named(3.0, "Run"), named(1.0, "Walk")];
        let ron_str = ron::to_string(&unsorted).unwrap();
        let track: KeyframeTrack = ron::from_str(&ron_str).unwrap();
        assert_eq!(times(&track), vec![1.0, 3.0]);
    }
}

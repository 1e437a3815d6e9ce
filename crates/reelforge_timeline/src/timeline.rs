// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline containing ordered tracks of clips.

use crate::asset::{AssetRegistry, AssetType};
use crate::clip::{Clip, ClipEdge, ClipId, ClipUpdate, MIN_CLIP_DURATION};
use crate::error::{Result, TimelineError};
use crate::keyframe::{Keyframe, KeyframeId, KeyframeUpdate};
use crate::properties::ModelProperties;
use crate::track::{Track, TrackId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How clip insertion treats time ranges already occupied on the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Overlapping clips are allowed and all become active
    #[default]
    Permit,
    /// Insertion into an occupied range fails with [`TimelineError::Overlap`]
    Reject,
}

/// Ordered set of tracks. Track order is the compositing order: later
/// tracks draw over earlier ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    tracks: IndexMap<TrackId, Track>,
    /// Overlap handling on insertion
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timeline with one video, image, 3D and audio track
    pub fn with_starter_tracks() -> Self {
        let mut timeline = Self::new();
        timeline.add_track(Track::new("Video Track 1", AssetType::Video));
        timeline.add_track(Track::new("Image Track 1", AssetType::Image));
        timeline.add_track(Track::new("3D Track 1", AssetType::Model3d));
        timeline.add_track(Track::new("Audio Track 1", AssetType::Audio));
        timeline
    }

    /// Set the overlap policy
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Add a track on top of the existing ones
    pub fn add_track(&mut self, track: Track) -> TrackId {
        let id = track.id;
        self.tracks.insert(id, track);
        id
    }

    /// Remove a track and its clips, keeping the order of the rest
    pub fn remove_track(&mut self, track_id: TrackId) -> Option<Track> {
        self.tracks.shift_remove(&track_id)
    }

    /// Get a track
    pub fn track(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    /// Get a mutable track
    pub fn track_mut(&mut self, track_id: TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(&track_id)
    }

    /// Get all tracks, bottom to top
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Get track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// First track accepting an asset type
    pub fn first_track_for(&self, asset_type: AssetType) -> Option<&Track> {
        self.tracks.values().find(|t| t.accepts(asset_type))
    }

    /// Place a clip on a track.
    ///
    /// The clip's asset must exist and match the track's accepted type.
    /// On error nothing is changed.
    pub fn add_clip(
        &mut self,
        track_id: TrackId,
        clip: Clip,
        assets: &AssetRegistry,
    ) -> Result<ClipId> {
        if self.clip(clip.id).is_some() {
            return Err(TimelineError::DuplicateClip(clip.id));
        }
        let asset = assets
            .get(clip.asset_id)
            .ok_or(TimelineError::UnknownAsset(clip.asset_id))?;
        let track = self
            .tracks
            .get_mut(&track_id)
            .ok_or(TimelineError::UnknownTrack(track_id))?;

        if !track.accepts(asset.asset_type) {
            return Err(TimelineError::TypeMismatch {
                asset_type: asset.asset_type,
                track_type: track.accepted_type,
            });
        }
        if track.locked {
            return Err(TimelineError::TrackLocked(track_id));
        }
        if self.overlap_policy == OverlapPolicy::Reject {
            if let Some(existing) = track.overlapping(&clip) {
                return Err(TimelineError::Overlap { existing: existing.id });
            }
        }

        Ok(track.push_clip(clip))
    }

    /// Remove a clip from whichever track holds it
    pub fn remove_clip(&mut self, clip_id: ClipId) -> Option<Clip> {
        self.tracks
            .values_mut()
            .find_map(|track| track.remove_clip(clip_id))
    }

    /// Get a clip by ID
    pub fn clip(&self, clip_id: ClipId) -> Option<&Clip> {
        self.tracks.values().find_map(|track| track.clip(clip_id))
    }

    /// Get a mutable clip by ID
    pub fn clip_mut(&mut self, clip_id: ClipId) -> Option<&mut Clip> {
        self.tracks
            .values_mut()
            .find_map(|track| track.clip_mut(clip_id))
    }

    /// Track holding a clip
    pub fn find_clip_track(&self, clip_id: ClipId) -> Option<&Track> {
        self.tracks.values().find(|track| track.clip(clip_id).is_some())
    }

    /// Iterate over every clip in painter's order
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.values().flat_map(|t| t.clips().iter())
    }

    /// Apply a partial update to a clip. Returns false if the clip is unknown.
    pub fn update_clip(&mut self, clip_id: ClipId, update: ClipUpdate) -> bool {
        match self.clip_mut(clip_id) {
            Some(clip) => {
                update.apply(clip);
                true
            }
            None => false,
        }
    }

    /// Put back a previously captured copy of a clip in place. The copy must
    /// still belong to the track holding the clip.
    pub fn restore_clip(&mut self, snapshot: Clip) -> bool {
        match self.clip_mut(snapshot.id) {
            Some(clip) if clip.track_id == snapshot.track_id => {
                *clip = snapshot;
                true
            }
            _ => false,
        }
    }

    /// Clips active at a global time, in track order then insertion order
    pub fn active_clips_at(&self, time: f32) -> Vec<&Clip> {
        self.tracks
            .values()
            .flat_map(|track| track.clips_at(time))
            .collect()
    }

    /// Drag one edge of a clip to a global time.
    ///
    /// Dragging the start keeps the end fixed; dragging the end keeps the
    /// start fixed and never exceeds the asset's natural duration. The
    /// duration never drops below [`MIN_CLIP_DURATION`] and the start never
    /// goes negative.
    pub fn resize_clip(
        &mut self,
        clip_id: ClipId,
        edge: ClipEdge,
        time: f32,
        assets: &AssetRegistry,
    ) -> bool {
        let Some(clip) = self.clip_mut(clip_id) else {
            return false;
        };

        match edge {
            ClipEdge::Start => {
                let end = clip.end_time();
                let start = time.min(end - MIN_CLIP_DURATION).max(0.0);
                clip.start_time = start;
                clip.duration = (end - start).max(MIN_CLIP_DURATION);
            }
            ClipEdge::End => {
                let mut duration = (time - clip.start_time).max(MIN_CLIP_DURATION);
                let natural = assets.get(clip.asset_id).and_then(|a| a.natural_duration);
                if let Some(natural) = natural {
                    duration = duration.min(natural.max(MIN_CLIP_DURATION));
                }
                clip.duration = duration;
            }
        }
        clip.normalize();
        true
    }

    fn model_mut(&mut self, clip_id: ClipId) -> Option<(f32, &mut ModelProperties)> {
        let clip = self.clip_mut(clip_id)?;
        let duration = clip.duration;
        clip.properties.model_mut().map(|m| (duration, m))
    }

    /// Add an animation keyframe to a 3D clip whose animations are known.
    /// Its time is clamped into the clip's duration.
    pub fn add_keyframe(&mut self, clip_id: ClipId, mut keyframe: Keyframe) -> Option<KeyframeId> {
        let (duration, model) = self.model_mut(clip_id)?;
        if model.animation.available.is_empty() {
            return None;
        }
        keyframe.time = keyframe.time.clamp(0.0, duration);
        Some(model.keyframes.insert(keyframe))
    }

    /// Record the clip's current default animation as a keyframe at the
    /// clip-local position of a global time. Needs known animations, like
    /// [`Timeline::add_keyframe`].
    pub fn capture_keyframe(&mut self, clip_id: ClipId, time: f32) -> Option<KeyframeId> {
        let clip = self.clip_mut(clip_id)?;
        let local = clip.local_time(time);
        let model = clip.properties.model_mut()?;
        if model.animation.available.is_empty() {
            return None;
        }
        Some(model.keyframes.insert(Keyframe::from_state(local, &model.animation)))
    }

    /// Remove a keyframe from a 3D clip
    pub fn remove_keyframe(
        &mut self,
        clip_id: ClipId,
        keyframe_id: KeyframeId,
    ) -> Option<Keyframe> {
        let (_, model) = self.model_mut(clip_id)?;
        model.keyframes.remove(keyframe_id)
    }

    /// Edit a keyframe of a 3D clip. A new time is clamped into the clip's
    /// duration.
    pub fn update_keyframe(
        &mut self,
        clip_id: ClipId,
        keyframe_id: KeyframeId,
        mut update: KeyframeUpdate,
    ) -> bool {
        let Some((duration, model)) = self.model_mut(clip_id) else {
            return false;
        };
        update.time = update.time.map(|t| t.clamp(0.0, duration));
        model.keyframes.update(keyframe_id, &update)
    }

    /// Store the animation names a 3D asset exposes. Only the first report
    /// for a clip is written; returns whether it was.
    pub fn record_animations(&mut self, clip_id: ClipId, names: &[String]) -> bool {
        let Some((_, model)) = self.model_mut(clip_id) else {
            return false;
        };
        if !model.animation.available.is_empty() || names.is_empty() {
            return false;
        }
        model.animation.available = names.to_vec();
        true
    }

    /// End of the last clip on any track
    pub fn content_duration(&self) -> f32 {
        self.tracks.values().map(Track::duration).fold(0.0, f32::max)
    }

    /// Check the invariants insertion enforces on a timeline that was built
    /// some other way, e.g. deserialized.
    ///
    /// Clips referencing an unregistered asset pass; they are skipped when
    /// evaluated.
    pub fn validate(&self, assets: &AssetRegistry) -> Result<()> {
        let mut seen = HashSet::new();
        for track in self.tracks.values() {
            for clip in track.clips() {
                if !seen.insert(clip.id) {
                    return Err(TimelineError::DuplicateClip(clip.id));
                }
                if clip.track_id != track.id {
                    return Err(TimelineError::MisplacedClip {
                        clip: clip.id,
                        track: track.id,
                    });
                }
                let range_ok = clip.start_time.is_finite()
                    && clip.start_time >= 0.0
                    && clip.duration.is_finite()
                    && clip.duration >= MIN_CLIP_DURATION;
                if !range_ok {
                    return Err(TimelineError::InvalidRange(clip.id));
                }
                if let Some(asset) = assets.get(clip.asset_id) {
                    if !track.accepts(asset.asset_type) {
                        return Err(TimelineError::TypeMismatch {
                            asset_type: asset.asset_type,
                            track_type: track.accepted_type,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

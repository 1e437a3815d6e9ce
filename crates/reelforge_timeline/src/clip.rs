// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clips: time-bounded placements of an asset on a track.

use crate::asset::{Asset, AssetId};
use crate::properties::{ClipProperties, PropertiesUpdate};
use crate::track::TrackId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest duration a clip may have, in seconds
pub const MIN_CLIP_DURATION: f32 = 0.1;

/// Unique identifier for a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub Uuid);

impl ClipId {
    /// Create a new random clip ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

/// Edge of a clip grabbed by a resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEdge {
    /// Leading edge; the clip's end stays fixed
    Start,
    /// Trailing edge; the clip's start stays fixed
    End,
}

/// A clip on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Referenced asset (not owned)
    pub asset_id: AssetId,
    /// Track holding this clip
    pub track_id: TrackId,
    /// Start on the global timeline, in seconds
    pub start_time: f32,
    /// Length in seconds
    pub duration: f32,
    /// Visual and audio parameters
    pub properties: ClipProperties,
}

impl Clip {
    /// Create a clip for an asset with default properties for its type
    pub fn new(track_id: TrackId, asset: &Asset, start_time: f32, duration: f32) -> Self {
        Self {
            id: ClipId::new(),
            asset_id: asset.id,
            track_id,
            start_time: start_time.max(0.0),
            duration: duration.max(MIN_CLIP_DURATION),
            properties: ClipProperties::for_asset_type(asset.asset_type),
        }
    }

    /// End on the global timeline (exclusive)
    pub fn end_time(&self) -> f32 {
        self.start_time + self.duration
    }

    /// Whether the clip is active at a global time: `start <= time < end`
    pub fn is_active_at(&self, time: f32) -> bool {
        self.start_time <= time && time < self.end_time()
    }

    /// Clip-local time for a global time, clamped into `[0, duration]`
    pub fn local_time(&self, time: f32) -> f32 {
        (time - self.start_time).clamp(0.0, self.duration)
    }

    /// Whether the two clips share any instant
    pub fn overlaps(&self, other: &Clip) -> bool {
        self.start_time < other.end_time() && other.start_time < self.end_time()
    }

    /// Re-establish the clip's range invariants after an edit
    pub(crate) fn normalize(&mut self) {
        self.start_time = self.start_time.max(0.0);
        self.duration = self.duration.max(MIN_CLIP_DURATION);
        let duration = self.duration;
        if let Some(model) = self.properties.model_mut() {
            model.keyframes.clamp_to(duration);
        }
    }
}

/// Partial edit of a clip; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipUpdate {
    /// New start time
    pub start_time: Option<f32>,
    /// New duration
    pub duration: Option<f32>,
    /// Shallow property edit
    pub properties: Option<PropertiesUpdate>,
}

impl ClipUpdate {
    /// Update that only edits properties
    pub fn properties(properties: PropertiesUpdate) -> Self {
        Self {
            properties: Some(properties),
            ..Default::default()
        }
    }

    /// Update that only moves the clip
    pub fn move_to(start_time: f32) -> Self {
        Self {
            start_time: Some(start_time),
            ..Default::default()
        }
    }

    pub(crate) fn apply(self, clip: &mut Clip) {
        if let Some(start) = self.start_time {
            clip.start_time = start;
        }
        if let Some(duration) = self.duration {
            clip.duration = duration;
        }
        if let Some(properties) = self.properties {
            properties.apply(&mut clip.properties);
        }
        clip.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetType;

    fn clip(start: f32, duration: f32) -> Clip {
        let asset = Asset::new("clip.mp4", AssetType::Video, "blob:clip");
        Clip::new(TrackId::new(), &asset, start, duration)
    }

    #[test]
    fn test_active_interval_is_half_open() {
        let c = clip(2.0, 5.0);
        assert!(!c.is_active_at(1.9));
        assert!(c.is_active_at(2.0));
        assert!(c.is_active_at(6.9));
        assert!(!c.is_active_at(7.0));
    }

    #[test]
    fn test_local_time_is_clamped() {
        let c = clip(2.0, 5.0);
        assert_eq!(c.local_time(1.0), 0.0);
        assert_eq!(c.local_time(3.5), 1.5);
        assert_eq!(c.local_time(10.0), 5.0);
    }

    #[test]
    fn test_overlap() {
        let a = clip(0.0, 2.0);
        assert!(a.overlaps(&clip(1.0, 2.0)));
        assert!(!a.overlaps(&clip(2.0, 2.0)));
    }

    #[test]
    fn test_new_clamps_range() {
        let c = clip(-3.0, 0.0);
        assert_eq!(c.start_time, 0.0);
        assert_eq!(c.duration, MIN_CLIP_DURATION);
    }
}

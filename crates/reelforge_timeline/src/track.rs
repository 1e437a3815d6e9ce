// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track definitions.

use crate::asset::AssetType;
use crate::clip::{Clip, ClipId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// A type-constrained lane of clips; also a compositing layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Track name
    pub name: String,
    /// Asset type this track accepts
    pub accepted_type: AssetType,
    /// Clips in insertion order
    clips: Vec<Clip>,
    /// Whether the track is muted
    pub muted: bool,
    /// Whether the track is locked
    pub locked: bool,
}

impl Track {
    /// Create a new empty track
    pub fn new(name: impl Into<String>, accepted_type: AssetType) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            accepted_type,
            clips: Vec::new(),
            muted: false,
            locked: false,
        }
    }

    /// Check whether clips of an asset type may be placed here
    pub fn accepts(&self, asset_type: AssetType) -> bool {
        self.accepted_type == asset_type
    }

    /// Append a clip. Type and overlap checks belong to the timeline.
    pub(crate) fn push_clip(&mut self, mut clip: Clip) -> ClipId {
        clip.track_id = self.id;
        let id = clip.id;
        self.clips.push(clip);
        id
    }

    /// Remove a clip
    pub fn remove_clip(&mut self, clip_id: ClipId) -> Option<Clip> {
        let idx = self.clips.iter().position(|c| c.id == clip_id)?;
        Some(self.clips.remove(idx))
    }

    /// Get clip by ID
    pub fn clip(&self, clip_id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    /// Get mutable clip by ID
    pub fn clip_mut(&mut self, clip_id: ClipId) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == clip_id)
    }

    /// Get all clips in insertion order
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Clips active at a global time, in insertion order
    pub fn clips_at(&self, time: f32) -> impl Iterator<Item = &Clip> {
        self.clips.iter().filter(move |c| c.is_active_at(time))
    }

    /// First clip (other than `clip` itself) sharing time with `clip`
    pub fn overlapping(&self, clip: &Clip) -> Option<&Clip> {
        self.clips
            .iter()
            .find(|c| c.id != clip.id && c.overlaps(clip))
    }

    /// End of the last clip
    pub fn duration(&self) -> f32 {
        self.clips.iter().map(Clip::end_time).fold(0.0, f32::max)
    }

    /// Get clip count
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }
}

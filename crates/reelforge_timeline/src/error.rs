// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline errors.

use crate::asset::{AssetId, AssetType};
use crate::clip::ClipId;
use crate::track::TrackId;
use thiserror::Error;

/// Reasons a timeline mutation is rejected. The timeline is unchanged when
/// any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// Asset type does not match the track's accepted type
    #[error("{asset_type} clips cannot be placed on a {track_type} track")]
    TypeMismatch {
        /// Type of the asset being placed
        asset_type: AssetType,
        /// Type the track accepts
        track_type: AssetType,
    },

    /// Track not found
    #[error("Track not found: {0:?}")]
    UnknownTrack(TrackId),

    /// Asset not found
    #[error("Asset not found: {0:?}")]
    UnknownAsset(AssetId),

    /// Track is locked against edits
    #[error("Track is locked: {0:?}")]
    TrackLocked(TrackId),

    /// A clip with this ID is already on the timeline
    #[error("Clip already on the timeline: {0:?}")]
    DuplicateClip(ClipId),

    /// Clip records a different track than the one holding it
    #[error("Clip {clip:?} is stored on track {track:?} but points at another track")]
    MisplacedClip {
        /// The clip
        clip: ClipId,
        /// Track actually holding it
        track: TrackId,
    },

    /// Clip starts before zero or is shorter than the minimum duration
    #[error("Clip {0:?} has an invalid time range")]
    InvalidRange(ClipId),

    /// Clip would overlap an existing clip under a rejecting overlap policy
    #[error("Clip overlaps existing clip {existing:?}")]
    Overlap {
        /// The clip already occupying the time range
        existing: ClipId,
    },
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Project persistence.
//!
//! A project file holds the asset registry and the timeline as RON. Asset
//! sources are stored as opaque handles; the media itself is not embedded.

use crate::config::EditorConfig;
use crate::playback::MAX_SESSION_DURATION;
use crate::state::EditorState;
use reelforge_timeline::{AssetRegistry, OverlapPolicy, Timeline, TimelineError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current project format version
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Project file errors
#[derive(Debug, Error)]
pub enum ProjectError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(#[from] ron::error::SpannedError),

    /// Timeline breaks an invariant clip insertion enforces
    #[error("Invalid timeline: {0}")]
    Invalid(#[from] TimelineError),

    /// Session duration is not a usable number of seconds
    #[error("Invalid session duration: {0}")]
    InvalidDuration(f32),

    /// File was written by a newer format
    #[error("Project version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Saved editing session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Format version
    pub version: u32,
    /// Project name
    pub name: String,
    /// Session duration in seconds
    pub total_duration: f32,
    /// Imported assets
    pub assets: AssetRegistry,
    /// Tracks and clips
    pub timeline: Timeline,
}

impl ProjectFile {
    /// Empty project with the starter tracks
    pub fn new(name: impl Into<String>, total_duration: f32) -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION,
            name: name.into(),
            total_duration,
            assets: AssetRegistry::new(),
            timeline: Timeline::with_starter_tracks(),
        }
    }

    /// Capture a session
    pub fn from_state(name: impl Into<String>, state: &EditorState) -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION,
            name: name.into(),
            total_duration: state.clock().total_duration(),
            assets: state.assets().clone(),
            timeline: state.timeline().clone(),
        }
    }

    /// Open as a session. The project's duration overrides the config's;
    /// either side can turn on [`OverlapPolicy::Reject`].
    pub fn into_state(self, config: EditorConfig) -> EditorState {
        let overlap_policy = match config.overlap_policy {
            OverlapPolicy::Reject => OverlapPolicy::Reject,
            OverlapPolicy::Permit => self.timeline.overlap_policy,
        };
        let config = EditorConfig {
            total_duration: self.total_duration,
            overlap_policy,
            ..config
        };
        EditorState::from_parts(config, self.assets, self.timeline)
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, ProjectError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from RON, refusing newer format versions and invalid
    /// content
    pub fn from_ron(source: &str) -> Result<Self, ProjectError> {
        let project: Self = ron::from_str(source)?;
        if project.version > PROJECT_FORMAT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: project.version,
                supported: PROJECT_FORMAT_VERSION,
            });
        }
        project.validate()?;
        Ok(project)
    }

    /// Check the session duration and the timeline invariants
    pub fn validate(&self) -> Result<(), ProjectError> {
        let duration_ok = self.total_duration.is_finite()
            && self.total_duration > 0.0
            && self.total_duration <= MAX_SESSION_DURATION;
        if !duration_ok {
            return Err(ProjectError::InvalidDuration(self.total_duration));
        }
        self.timeline.validate(&self.assets)?;
        Ok(())
    }

    /// Write to a file
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!("Saved project '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Read from a file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let source = std::fs::read_to_string(path)?;
        let project = Self::from_ron(&source)?;
        tracing::info!("Loaded project '{}' from {}", project.name, path.display());
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelforge_timeline::{Asset, AssetType, Keyframe, TextSpec, TrackId};

    fn track_for(state: &EditorState, asset_type: AssetType) -> TrackId {
        state
            .timeline()
            .first_track_for(asset_type)
            .map(|t| t.id)
            .unwrap()
    }

    fn sample_state() -> EditorState {
        let mut state = EditorState::default();
        let video = Asset::new("a.mp4", AssetType::Video, "blob:a").with_duration(10.0);
        let video = state.add_asset(video);
        let model = state.add_asset(Asset::new("robot.glb", AssetType::Model3d, "blob:robot"));
        state.add_asset(Asset::text(TextSpec::new("Hello")));

        let video_track = track_for(&state, AssetType::Video);
        let model_track = track_for(&state, AssetType::Model3d);
        state.place_asset(video_track, video, 1.0).unwrap();
        let clip = state.place_asset(model_track, model, 0.0).unwrap();
        state.record_animations(clip, vec!["Idle".into(), "Walk".into()]);
        state.add_keyframe(clip, Keyframe::new(2.0, Some("Walk".into())));
        state
    }

    #[test]
    fn test_ron_round_trip_preserves_frames() {
        let state = sample_state();
        let project = ProjectFile::from_state("demo", &state);
        let loaded = ProjectFile::from_ron(&project.to_ron().unwrap()).unwrap();

        assert_eq!(loaded.name, "demo");
        assert_eq!(loaded.assets.len(), 3);
        assert_eq!(loaded.timeline.track_count(), 4);

        let reopened = loaded.into_state(EditorConfig::default());
        for t in [0.0, 1.5, 2.5, 9.0, 11.5] {
            assert_eq!(reopened.evaluate_at(t), state.evaluate_at(t));
        }
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut project = ProjectFile::new("future", 30.0);
        project.version = PROJECT_FORMAT_VERSION + 1;
        let source = project.to_ron().unwrap();

        let err = ProjectFile::from_ron(&source).unwrap_err();
        assert!(matches!(err, ProjectError::UnsupportedVersion { found: 2, supported: 1 }));
    }

    #[test]
    fn test_retyped_track_rejected_on_load() {
        let mut state = EditorState::default();
        let image = state.add_asset(Asset::new("b.png", AssetType::Image, "blob:b"));
        let image_track = track_for(&state, AssetType::Image);
        state.place_asset(image_track, image, 0.0).unwrap();

        let source = ProjectFile::from_state("edited", &state).to_ron().unwrap();
        assert_eq!(source.matches("accepted_type: Image").count(), 1);
        let tampered = source.replace("accepted_type: Image", "accepted_type: Audio");

        assert!(matches!(
            ProjectFile::from_ron(&tampered),
            Err(ProjectError::Invalid(TimelineError::TypeMismatch {
                asset_type: AssetType::Image,
                track_type: AssetType::Audio,
            }))
        ));
    }

    #[test]
    fn test_broken_clip_range_rejected_on_load() {
        let state = sample_state();
        let mut project = ProjectFile::from_state("edited", &state);
        let clip_id = project.timeline.clips().map(|c| c.id).next().unwrap();
        if let Some(clip) = project.timeline.clip_mut(clip_id) {
            clip.duration = -2.0;
        }

        let source = project.to_ron().unwrap();
        assert!(matches!(
            ProjectFile::from_ron(&source),
            Err(ProjectError::Invalid(TimelineError::InvalidRange(id))) if id == clip_id
        ));
    }

    #[test]
    fn test_session_duration_bounds_on_load() {
        for duration in [0.0, -5.0, MAX_SESSION_DURATION * 2.0] {
            let source = ProjectFile::new("bad", duration).to_ron().unwrap();
            assert!(matches!(
                ProjectFile::from_ron(&source),
                Err(ProjectError::InvalidDuration(_))
            ));
        }
        let source = ProjectFile::new("day", MAX_SESSION_DURATION).to_ron().unwrap();
        assert!(ProjectFile::from_ron(&source).is_ok());
    }

    #[test]
    fn test_project_duration_overrides_config() {
        let state = ProjectFile::new("short", 12.0).into_state(EditorConfig::default());
        assert_eq!(state.clock().total_duration(), 12.0);
        assert_eq!(state.config().total_duration, 12.0);
    }

    #[test]
    fn test_either_side_can_reject_overlap() {
        let strict = EditorConfig {
            overlap_policy: OverlapPolicy::Reject,
            ..Default::default()
        };
        let state = ProjectFile::new("a", 30.0).into_state(strict);
        assert_eq!(state.timeline().overlap_policy, OverlapPolicy::Reject);

        let mut project = ProjectFile::new("b", 30.0);
        project.timeline.overlap_policy = OverlapPolicy::Reject;
        let state = project.into_state(EditorConfig::default());
        assert_eq!(state.timeline().overlap_policy, OverlapPolicy::Reject);

        let state = ProjectFile::new("c", 30.0).into_state(EditorConfig::default());
        assert_eq!(state.timeline().overlap_policy, OverlapPolicy::Permit);
    }

    #[test]
    fn test_malformed_source_is_an_error() {
        assert!(matches!(
            ProjectFile::from_ron("(version: 1"),
            Err(ProjectError::Deserialize(_))
        ));
    }
}

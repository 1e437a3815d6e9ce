// SPDX-License-Identifier: MIT OR Apache-2.0
//! `ReelForge` editor session layer.
//!
//! Wraps the timeline model in an editing session:
//! - Editor state with change notifications
//! - Playback clock
//! - Timeline view zoom and hit-testing
//! - Cancellable resize and keyframe drags
//! - Project files and configuration
//!
//! ## Architecture
//!
//! [`EditorState`] is the single owner of session data. A presentation
//! layer calls its operations, subscribes to [`EditorEvent`]s and drives
//! [`EditorState::tick`] once per display frame to obtain the
//! [`FrameDescriptor`](reelforge_timeline::FrameDescriptor) to draw.

pub mod config;
pub mod interaction;
pub mod playback;
pub mod project;
pub mod state;
pub mod view;

pub use config::{ConfigError, EditorConfig};
pub use interaction::{KeyframeDrag, ResizeInteraction};
pub use playback::{
    format_clock, FrameClock, PlaybackClock, PlaybackState, TickOutcome, MAX_SESSION_DURATION,
};
pub use project::{ProjectError, ProjectFile, PROJECT_FORMAT_VERSION};
pub use state::{EditorEvent, EditorState, PlaybackSnapshot};
pub use view::TimelineView;

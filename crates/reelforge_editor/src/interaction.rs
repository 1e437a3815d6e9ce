// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer interactions that edit the timeline live and can be cancelled.
//!
//! Each interaction captures the clip it edits when it begins. Updates go
//! through the regular [`EditorState`] operations, so observers see every
//! intermediate edit. Cancelling puts the captured clip back as it was.

use crate::state::EditorState;
use reelforge_timeline::{Clip, ClipEdge, ClipId, KeyframeId, KeyframeUpdate};

/// Dragging one edge of a clip
#[derive(Debug, Clone)]
pub struct ResizeInteraction {
    edge: ClipEdge,
    original: Clip,
}

impl ResizeInteraction {
    /// Start resizing. Returns `None` for an unknown clip.
    pub fn begin(state: &EditorState, clip_id: ClipId, edge: ClipEdge) -> Option<Self> {
        let original = state.timeline().clip(clip_id)?.clone();
        Some(Self { edge, original })
    }

    /// Clip being resized
    pub fn clip_id(&self) -> ClipId {
        self.original.id
    }

    /// Edge being dragged
    pub fn edge(&self) -> ClipEdge {
        self.edge
    }

    /// Move the dragged edge to a global time
    pub fn update(&self, state: &mut EditorState, time: f32) -> bool {
        state.resize_clip(self.original.id, self.edge, time)
    }

    /// Keep the current edit
    pub fn commit(self, state: &EditorState) {
        if let Some(clip) = state.timeline().clip(self.original.id) {
            tracing::debug!(
                "Resized clip {:?} to {:.2}s..{:.2}s",
                clip.id,
                clip.start_time,
                clip.end_time()
            );
        }
    }

    /// Restore the clip as it was when the resize began
    pub fn cancel(self, state: &mut EditorState) -> bool {
        state.restore_clip(self.original)
    }
}

/// Dragging one keyframe of a 3D clip along the clip's local time
#[derive(Debug, Clone)]
pub struct KeyframeDrag {
    keyframe_id: KeyframeId,
    start_time: f32,
    original: Clip,
}

impl KeyframeDrag {
    /// Start dragging. Returns `None` unless the clip has that keyframe.
    pub fn begin(state: &EditorState, clip_id: ClipId, keyframe_id: KeyframeId) -> Option<Self> {
        let clip = state.timeline().clip(clip_id)?;
        let start_time = clip.properties.model()?.keyframes.get(keyframe_id)?.time;
        Some(Self {
            keyframe_id,
            start_time,
            original: clip.clone(),
        })
    }

    /// Keyframe being dragged
    pub fn keyframe_id(&self) -> KeyframeId {
        self.keyframe_id
    }

    /// Local time of the keyframe when the drag began
    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    /// Move the keyframe to a clip-local time
    pub fn update(&self, state: &mut EditorState, local_time: f32) -> bool {
        state.update_keyframe(self.original.id, self.keyframe_id, KeyframeUpdate::time(local_time))
    }

    /// Keep the current edit
    pub fn commit(self, state: &EditorState) {
        let time = state
            .timeline()
            .clip(self.original.id)
            .and_then(|c| c.properties.model())
            .and_then(|m| m.keyframes.get(self.keyframe_id))
            .map(|k| k.time);
        if let Some(time) = time {
            tracing::debug!(
                "Moved keyframe {:?} from {:.2}s to {:.2}s",
                self.keyframe_id,
                self.start_time,
                time
            );
        }
    }

    /// Restore the clip's keyframes as they were when the drag began
    pub fn cancel(self, state: &mut EditorState) -> bool {
        state.restore_clip(self.original)
    }
}

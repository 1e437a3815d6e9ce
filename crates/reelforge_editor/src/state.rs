// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor state management.
//!
//! [`EditorState`] owns everything an editing session needs: the asset
//! registry, the timeline, the playback clock, the selection and the view.
//! The host mutates it only through its operations and learns about changes
//! by subscribing to [`EditorEvent`]s.

use crate::config::EditorConfig;
use crate::playback::{PlaybackClock, TickOutcome};
use crate::view::TimelineView;
use reelforge_timeline::{
    evaluate, Asset, AssetId, AssetRegistry, Clip, ClipEdge, ClipId, ClipUpdate, EffectSpec,
    FrameDescriptor, Keyframe, KeyframeId, KeyframeUpdate, TextSpec, Timeline, TimelineError,
    Track, TrackId,
};
use serde::Serialize;
use std::sync::mpsc;

/// Playback and selection state reflected in the UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    /// Playhead time
    pub current_time: f32,
    /// Session duration
    pub total_duration: f32,
    /// Whether playback is running
    pub is_playing: bool,
    /// Selected clip
    pub selected_clip: Option<ClipId>,
}

/// Change notification sent to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Assets were added, removed or edited
    AssetsChanged,
    /// Tracks were added or removed
    TracksChanged,
    /// A clip was added, removed or edited
    ClipChanged(ClipId),
    /// A clip insertion was refused
    ClipRejected {
        /// Target track
        track_id: TrackId,
        /// Why it was refused
        reason: TimelineError,
    },
    /// Selection changed
    SelectionChanged(Option<ClipId>),
    /// Play state or playhead changed outside regular ticking
    PlaybackChanged(PlaybackSnapshot),
    /// Zoom changed
    ZoomChanged(f32),
    /// A 3D clip's animation names became known
    AnimationsDiscovered {
        /// Clip whose model exposed the animations
        clip_id: ClipId,
        /// Animation names
        names: Vec<String>,
    },
}

/// The editing session
#[derive(Debug)]
pub struct EditorState {
    config: EditorConfig,
    assets: AssetRegistry,
    timeline: Timeline,
    clock: PlaybackClock,
    view: TimelineView,
    selected_clip: Option<ClipId>,
    subscribers: Vec<mpsc::Sender<EditorEvent>>,
}

impl EditorState {
    /// Create a session from configuration
    pub fn new(config: EditorConfig) -> Self {
        let timeline = if config.starter_tracks {
            Timeline::with_starter_tracks()
        } else {
            Timeline::new()
        };
        Self::from_parts(config, AssetRegistry::new(), timeline)
    }

    /// Create a session around existing assets and timeline
    pub fn from_parts(config: EditorConfig, assets: AssetRegistry, timeline: Timeline) -> Self {
        let timeline = timeline.with_overlap_policy(config.overlap_policy);
        Self {
            clock: PlaybackClock::new(config.total_duration),
            config,
            assets,
            timeline,
            view: TimelineView::new(),
            selected_clip: None,
            subscribers: Vec::new(),
        }
    }

    /// Receive change notifications. Dropped receivers are pruned.
    pub fn subscribe(&mut self) -> mpsc::Receiver<EditorEvent> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    fn emit(&mut self, event: EditorEvent) {
        self.subscribers.retain(|s| s.send(event.clone()).is_ok());
    }

    // -- Accessors ---------------------------------------------------------

    /// Session configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Asset registry
    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Timeline
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Playback clock
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// Timeline view
    pub fn view(&self) -> &TimelineView {
        &self.view
    }

    /// Selected clip ID
    pub fn selected_clip(&self) -> Option<ClipId> {
        self.selected_clip
    }

    /// Playback and selection state for UI reflection
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_time: self.clock.current_time(),
            total_duration: self.clock.total_duration(),
            is_playing: self.clock.is_playing(),
            selected_clip: self.selected_clip,
        }
    }

    // -- Assets ------------------------------------------------------------

    /// Register an asset
    pub fn add_asset(&mut self, asset: Asset) -> AssetId {
        tracing::debug!("Added {} asset '{}'", asset.asset_type, asset.name);
        let id = self.assets.add(asset);
        self.emit(EditorEvent::AssetsChanged);
        id
    }

    /// Remove an asset. Clips referencing it stay but are no longer drawn.
    pub fn remove_asset(&mut self, id: AssetId) -> Option<Asset> {
        let removed = self.assets.remove(id)?;
        tracing::debug!("Removed asset '{}'", removed.name);
        self.emit(EditorEvent::AssetsChanged);
        Some(removed)
    }

    /// Edit a text asset's content
    pub fn set_text(&mut self, id: AssetId, spec: TextSpec) -> bool {
        let changed = self.assets.set_text(id, spec);
        if changed {
            self.emit(EditorEvent::AssetsChanged);
        }
        changed
    }

    /// Edit an effect asset's description
    pub fn set_effect(&mut self, id: AssetId, spec: EffectSpec) -> bool {
        let changed = self.assets.set_effect(id, spec);
        if changed {
            self.emit(EditorEvent::AssetsChanged);
        }
        changed
    }

    // -- Tracks ------------------------------------------------------------

    /// Add a track on top
    pub fn add_track(&mut self, track: Track) -> TrackId {
        let id = self.timeline.add_track(track);
        self.emit(EditorEvent::TracksChanged);
        id
    }

    /// Remove a track and its clips
    pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
        let removed = self.timeline.remove_track(id)?;
        if self.selected_clip.is_some_and(|c| removed.clip(c).is_some()) {
            self.set_selection(None);
        }
        self.emit(EditorEvent::TracksChanged);
        Some(removed)
    }

    // -- Clips -------------------------------------------------------------

    /// Place a clip on a track. Rejections are reported to the caller and
    /// to subscribers; the timeline is left unchanged.
    pub fn add_clip(&mut self, track_id: TrackId, clip: Clip) -> Result<ClipId, TimelineError> {
        match self.timeline.add_clip(track_id, clip, &self.assets) {
            Ok(id) => {
                tracing::debug!("Added clip {:?} to track {:?}", id, track_id);
                self.emit(EditorEvent::ClipChanged(id));
                Ok(id)
            }
            Err(reason) => {
                tracing::warn!("Rejected clip: {reason}");
                self.emit(EditorEvent::ClipRejected {
                    track_id,
                    reason: reason.clone(),
                });
                Err(reason)
            }
        }
    }

    /// Place an asset on a track at `start_time` with default properties.
    /// The clip lasts the asset's natural duration, or the configured
    /// default when it has none.
    pub fn place_asset(
        &mut self,
        track_id: TrackId,
        asset_id: AssetId,
        start_time: f32,
    ) -> Result<ClipId, TimelineError> {
        let Some(asset) = self.assets.get(asset_id) else {
            let reason = TimelineError::UnknownAsset(asset_id);
            self.emit(EditorEvent::ClipRejected {
                track_id,
                reason: reason.clone(),
            });
            return Err(reason);
        };
        let duration = asset
            .natural_duration
            .unwrap_or(self.config.default_clip_duration);
        let clip = Clip::new(track_id, asset, start_time, duration);
        self.add_clip(track_id, clip)
    }

    /// Remove a clip, clearing the selection if it was selected
    pub fn remove_clip(&mut self, clip_id: ClipId) -> Option<Clip> {
        let removed = self.timeline.remove_clip(clip_id)?;
        if self.selected_clip == Some(clip_id) {
            self.set_selection(None);
        }
        self.emit(EditorEvent::ClipChanged(clip_id));
        Some(removed)
    }

    /// Apply a shallow update to a clip
    pub fn update_clip(&mut self, clip_id: ClipId, update: ClipUpdate) -> bool {
        let changed = self.timeline.update_clip(clip_id, update);
        if changed {
            self.emit(EditorEvent::ClipChanged(clip_id));
        }
        changed
    }

    /// Drag a clip edge to a global time
    pub fn resize_clip(&mut self, clip_id: ClipId, edge: ClipEdge, time: f32) -> bool {
        let changed = self.timeline.resize_clip(clip_id, edge, time, &self.assets);
        if changed {
            self.emit(EditorEvent::ClipChanged(clip_id));
        }
        changed
    }

    /// Put back a captured copy of a clip
    pub(crate) fn restore_clip(&mut self, snapshot: Clip) -> bool {
        let id = snapshot.id;
        let changed = self.timeline.restore_clip(snapshot);
        if changed {
            self.emit(EditorEvent::ClipChanged(id));
        }
        changed
    }

    // -- Keyframes ---------------------------------------------------------

    /// Add a keyframe to a 3D clip
    pub fn add_keyframe(&mut self, clip_id: ClipId, keyframe: Keyframe) -> Option<KeyframeId> {
        let id = self.timeline.add_keyframe(clip_id, keyframe)?;
        self.emit(EditorEvent::ClipChanged(clip_id));
        Some(id)
    }

    /// Record a 3D clip's current default animation as a keyframe at the
    /// playhead
    pub fn capture_keyframe(&mut self, clip_id: ClipId) -> Option<KeyframeId> {
        let id = self
            .timeline
            .capture_keyframe(clip_id, self.clock.current_time())?;
        self.emit(EditorEvent::ClipChanged(clip_id));
        Some(id)
    }

    /// Remove a keyframe
    pub fn remove_keyframe(
        &mut self,
        clip_id: ClipId,
        keyframe_id: KeyframeId,
    ) -> Option<Keyframe> {
        let removed = self.timeline.remove_keyframe(clip_id, keyframe_id)?;
        self.emit(EditorEvent::ClipChanged(clip_id));
        Some(removed)
    }

    /// Edit a keyframe
    pub fn update_keyframe(
        &mut self,
        clip_id: ClipId,
        keyframe_id: KeyframeId,
        update: KeyframeUpdate,
    ) -> bool {
        let changed = self.timeline.update_keyframe(clip_id, keyframe_id, update);
        if changed {
            self.emit(EditorEvent::ClipChanged(clip_id));
        }
        changed
    }

    /// Store the animation names discovered for a 3D clip. Subscribers hear
    /// about it once per clip; later reports are ignored.
    pub fn record_animations(&mut self, clip_id: ClipId, names: Vec<String>) -> bool {
        if !self.timeline.record_animations(clip_id, &names) {
            return false;
        }
        tracing::info!("Discovered {} animations for clip {:?}", names.len(), clip_id);
        self.emit(EditorEvent::AnimationsDiscovered { clip_id, names });
        true
    }

    // -- Selection and view ------------------------------------------------

    fn set_selection(&mut self, clip_id: Option<ClipId>) {
        if self.selected_clip != clip_id {
            self.selected_clip = clip_id;
            self.emit(EditorEvent::SelectionChanged(clip_id));
        }
    }

    /// Select a clip, or clear the selection. Unknown clips clear it.
    pub fn select_clip(&mut self, clip_id: Option<ClipId>) {
        let clip_id = clip_id.filter(|id| self.timeline.clip(*id).is_some());
        self.set_selection(clip_id);
    }

    /// Set the timeline zoom
    pub fn set_zoom(&mut self, zoom: f32) {
        let before = self.view.zoom();
        self.view.set_zoom(zoom);
        if self.view.zoom() != before {
            self.emit(EditorEvent::ZoomChanged(self.view.zoom()));
        }
    }

    /// Handle a click on the timeline panel: select the clip under the
    /// pointer, or move the playhead there and clear the selection
    pub fn click_timeline(&mut self, x: f32, y: f32) {
        match self.view.hit_test(&self.timeline, x, y) {
            Some(clip_id) => self.set_selection(Some(clip_id)),
            None => {
                let time = self.view.time_at(x, self.clock.total_duration());
                self.seek(time);
                self.set_selection(None);
            }
        }
    }

    // -- Playback ----------------------------------------------------------

    fn playback_changed(&mut self) {
        let snapshot = self.snapshot();
        self.emit(EditorEvent::PlaybackChanged(snapshot));
    }

    /// Start playback
    pub fn play(&mut self) {
        self.clock.play();
        tracing::info!("Playback started at {:.2}s", self.clock.current_time());
        self.playback_changed();
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.clock.pause();
        tracing::info!("Playback paused at {:.2}s", self.clock.current_time());
        self.playback_changed();
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        if self.clock.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the playhead
    pub fn seek(&mut self, time: f32) {
        self.clock.seek(time);
        self.playback_changed();
    }

    /// Move the playhead relative to its position
    pub fn skip(&mut self, delta: f32) {
        self.clock.skip(delta);
        self.playback_changed();
    }

    /// Advance the clock by elapsed seconds and evaluate the new frame
    pub fn tick(&mut self, elapsed: f32) -> FrameDescriptor {
        if self.clock.tick(elapsed) == TickOutcome::Finished {
            tracing::info!("Playback reached the end");
            self.playback_changed();
        }
        self.evaluate()
    }

    /// Evaluate the frame at the playhead
    pub fn evaluate(&self) -> FrameDescriptor {
        self.evaluate_at(self.clock.current_time())
    }

    /// Evaluate the frame at any time
    pub fn evaluate_at(&self, time: f32) -> FrameDescriptor {
        evaluate(&self.timeline, &self.assets, time, self.clock.is_playing())
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

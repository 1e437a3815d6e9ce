// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame composition: evaluate the whole timeline at one instant.
//!
//! The evaluation process:
//! 1. Ask the timeline which clips are active, in painter's order.
//! 2. Resolve each clip's properties at the given time.
//! 3. Attach a playback directive to audio and video layers.
//! 4. Return the layers, back to front, for the renderer.

use crate::asset::{AssetId, AssetRegistry, AssetType};
use crate::clip::ClipId;
use crate::resolve::{resolve, ResolvedProperties};
use crate::timeline::Timeline;
use crate::track::TrackId;
use serde::Serialize;

/// Drift, in seconds, a media element may have from its directive before it
/// is re-seeked
pub const SYNC_TOLERANCE: f32 = 0.1;

/// How an external media element should be driven for one layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackDirective {
    /// Position inside the media, in seconds
    pub media_time: f32,
    /// Whether the element should be playing
    pub should_play: bool,
    /// Output volume in `[0, 1]`
    pub volume: f32,
}

impl PlaybackDirective {
    /// Whether an element currently at `position` has drifted far enough to
    /// need a seek. Small drift is tolerated to avoid stutter.
    pub fn needs_resync(&self, position: f32) -> bool {
        (position - self.media_time).abs() > SYNC_TOLERANCE
    }
}

/// One active clip in a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameLayer {
    /// Clip being drawn
    pub clip_id: ClipId,
    /// Asset the clip shows
    pub asset_id: AssetId,
    /// Track holding the clip
    pub track_id: TrackId,
    /// Asset type
    pub asset_type: AssetType,
    /// Resolved properties
    pub properties: ResolvedProperties,
    /// Media playback directive (audio/video only)
    pub playback: Option<PlaybackDirective>,
}

/// Renderer-agnostic description of the timeline at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameDescriptor {
    /// Global time of this frame
    pub time: f32,
    /// Layers, back to front
    pub layers: Vec<FrameLayer>,
}

impl FrameDescriptor {
    /// A frame with nothing active
    pub fn empty(time: f32) -> Self {
        Self {
            time,
            layers: Vec::new(),
        }
    }

    /// Whether nothing is active (the renderer shows its placeholder)
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Layers that drive a media element
    pub fn media_layers(&self) -> impl Iterator<Item = &FrameLayer> {
        self.layers.iter().filter(|l| l.playback.is_some())
    }
}

/// Evaluate the timeline at `time`.
///
/// Layers come out in the timeline's painter's order: track order, then
/// clip insertion order. Clips whose asset is no longer registered are
/// skipped. Muted tracks still draw but their media plays silently.
pub fn evaluate(
    timeline: &Timeline,
    assets: &AssetRegistry,
    time: f32,
    is_playing: bool,
) -> FrameDescriptor {
    let mut frame = FrameDescriptor::empty(time);

    for clip in timeline.active_clips_at(time) {
        let Some(asset) = assets.get(clip.asset_id) else {
            continue;
        };
        let muted = timeline.track(clip.track_id).is_some_and(|t| t.muted);
        let properties = resolve(clip, time);

        let playback = asset.asset_type.is_timed_media().then(|| PlaybackDirective {
            media_time: time - clip.start_time,
            should_play: is_playing,
            volume: if muted { 0.0 } else { properties.volume.unwrap_or(1.0) },
        });

        frame.layers.push(FrameLayer {
            clip_id: clip.id,
            asset_id: asset.id,
            track_id: clip.track_id,
            asset_type: asset.asset_type,
            properties,
            playback,
        });
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use crate::clip::{Clip, ClipUpdate};
    use crate::properties::PropertiesUpdate;

    struct Scene {
        timeline: Timeline,
        assets: AssetRegistry,
    }

    impl Scene {
        fn new() -> Self {
            Self {
                timeline: Timeline::with_starter_tracks(),
                assets: AssetRegistry::new(),
            }
        }

        fn place(&mut self, asset_type: AssetType, start: f32, duration: f32) -> ClipId {
            let asset = Asset::new("media", asset_type, "blob:media");
            let track = self.timeline.first_track_for(asset_type).map(|t| t.id).unwrap();
            let clip = Clip::new(track, &asset, start, duration);
            self.assets.add(asset);
            self.timeline.add_clip(track, clip, &self.assets).unwrap()
        }

        fn eval(&self, time: f32, playing: bool) -> FrameDescriptor {
            evaluate(&self.timeline, &self.assets, time, playing)
        }
    }

    #[test]
    fn test_empty_timeline_gives_empty_frame() {
        let scene = Scene::new();
        let frame = scene.eval(3.0, true);
        assert!(frame.is_empty());
        assert_eq!(frame.time, 3.0);
    }

    #[test]
    fn test_layers_in_painters_order() {
        let mut scene = Scene::new();
        let audio = scene.place(AssetType::Audio, 0.0, 10.0);
        let model = scene.place(AssetType::Model3d, 0.0, 10.0);
        let video = scene.place(AssetType::Video, 0.0, 10.0);
        let image = scene.place(AssetType::Image, 0.0, 10.0);

        let frame = scene.eval(1.0, false);
        let order: Vec<_> = frame.layers.iter().map(|l| l.clip_id).collect();
        assert_eq!(order, vec![video, image, model, audio]);
        assert_eq!(frame, scene.eval(1.0, false));
    }

    #[test]
    fn test_media_layers_get_directives() {
        let mut scene = Scene::new();
        let video = scene.place(AssetType::Video, 2.0, 5.0);
        scene.place(AssetType::Image, 0.0, 10.0);
        scene.timeline.update_clip(
            video,
            ClipUpdate::properties(PropertiesUpdate {
                volume: Some(0.25),
                ..Default::default()
            }),
        );

        let frame = scene.eval(3.5, true);
        let directives: Vec<_> = frame.media_layers().filter_map(|l| l.playback).collect();
        assert_eq!(
            directives,
            vec![PlaybackDirective {
                media_time: 1.5,
                should_play: true,
                volume: 0.25,
            }]
        );
    }

    #[test]
    fn test_muted_track_plays_silently() {
        let mut scene = Scene::new();
        scene.place(AssetType::Audio, 0.0, 10.0);
        let track = scene.timeline.first_track_for(AssetType::Audio).map(|t| t.id).unwrap();
        if let Some(t) = scene.timeline.track_mut(track) {
            t.muted = true;
        }

        let frame = scene.eval(1.0, true);
        assert_eq!(frame.layers[0].playback.map(|p| p.volume), Some(0.0));
    }

    #[test]
    fn test_missing_asset_is_skipped() {
        let mut scene = Scene::new();
        let clip = scene.place(AssetType::Image, 0.0, 10.0);
        let asset = scene.timeline.clip(clip).map(|c| c.asset_id).unwrap();
        scene.assets.remove(asset);

        assert!(scene.eval(1.0, false).is_empty());
    }

    #[test]
    fn test_resync_tolerance() {
        let directive = PlaybackDirective {
            media_time: 4.0,
            should_play: true,
            volume: 1.0,
        };
        assert!(!directive.needs_resync(4.05));
        assert!(!directive.needs_resync(3.95));
        assert!(directive.needs_resync(4.2));
        assert!(directive.needs_resync(0.0));
    }
}

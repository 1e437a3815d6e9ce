// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline view geometry: zoom and pointer hit-testing.
//!
//! The layout is a time ruler on top followed by one fixed-height row per
//! track. Horizontal position maps linearly to time.

use reelforge_timeline::{ClipId, Timeline};

/// Height of the time ruler in pixels
pub const RULER_HEIGHT: f32 = 30.0;
/// Height of a track row in pixels
pub const TRACK_HEIGHT: f32 = 60.0;
/// Vertical inset of a clip inside its track row
pub const CLIP_INSET: f32 = 8.0;
/// Pixels per second at zoom 1.0
pub const BASE_PIXELS_PER_SECOND: f32 = 50.0;

const MIN_ZOOM: f32 = 0.5;
const MAX_ZOOM: f32 = 3.0;
const ZOOM_STEP: f32 = 0.25;

/// Zoom state of the timeline panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineView {
    zoom: f32,
}

impl TimelineView {
    /// Create a view at 100% zoom
    pub fn new() -> Self {
        Self { zoom: 1.0 }
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set zoom, clamped to the supported range
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Zoom in one step
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    /// Zoom out one step
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Horizontal scale
    pub fn pixels_per_second(&self) -> f32 {
        BASE_PIXELS_PER_SECOND * self.zoom
    }

    /// Horizontal position of a time
    pub fn x_for(&self, time: f32) -> f32 {
        time * self.pixels_per_second()
    }

    /// Time under a horizontal position, clamped into `[0, total_duration]`
    pub fn time_at(&self, x: f32, total_duration: f32) -> f32 {
        (x / self.pixels_per_second()).clamp(0.0, total_duration)
    }

    /// Clip drawn under a point, if any
    pub fn hit_test(&self, timeline: &Timeline, x: f32, y: f32) -> Option<ClipId> {
        timeline.tracks().enumerate().find_map(|(row, track)| {
            let top = RULER_HEIGHT + row as f32 * TRACK_HEIGHT + CLIP_INSET;
            let bottom = top + TRACK_HEIGHT - 2.0 * CLIP_INSET;
            if y < top || y > bottom {
                return None;
            }
            track
                .clips()
                .iter()
                .find(|clip| {
                    let left = self.x_for(clip.start_time);
                    let right = self.x_for(clip.end_time());
                    x >= left && x <= right
                })
                .map(|clip| clip.id)
        })
    }
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::new()
    }
}

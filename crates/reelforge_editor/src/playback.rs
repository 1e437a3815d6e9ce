// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback clock for the preview.
//!
//! This module handles:
//! - Play/pause state
//! - Advancing the playhead by wall-clock time
//! - Seeking and skipping within the session duration
//! - Converting display-refresh timestamps into elapsed time

use serde::Serialize;

/// Longest supported session, in seconds. Beyond this an `f32` playhead
/// can no longer advance by one display frame.
pub const MAX_SESSION_DURATION: f32 = 86_400.0;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlaybackState {
    /// Playhead is not moving
    #[default]
    Stopped,
    /// Playhead advances on every tick
    Playing,
}

/// What a tick did to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock was stopped; nothing moved
    Idle,
    /// Playhead moved forward
    Advanced,
    /// Playhead reached the end and playback stopped
    Finished,
}

/// Drives the global playhead. It never loops: reaching the end stops it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    current_time: f32,
    total_duration: f32,
    state: PlaybackState,
}

impl PlaybackClock {
    /// Create a stopped clock at time zero. The duration is clamped into
    /// `[0, MAX_SESSION_DURATION]`.
    pub fn new(total_duration: f32) -> Self {
        let total_duration = if total_duration.is_nan() {
            0.0
        } else {
            total_duration.clamp(0.0, MAX_SESSION_DURATION)
        };
        Self {
            current_time: 0.0,
            total_duration,
            state: PlaybackState::Stopped,
        }
    }

    /// Current playhead time
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Session duration
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Start playing. From the end, playback restarts at zero.
    pub fn play(&mut self) {
        if self.current_time >= self.total_duration {
            self.current_time = 0.0;
        }
        self.state = PlaybackState::Playing;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    /// Toggle play/pause
    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Stopped => self.play(),
        }
    }

    /// Advance by elapsed wall-clock seconds. A step too small to move the
    /// playhead ends playback rather than stalling it.
    pub fn tick(&mut self, elapsed: f32) -> TickOutcome {
        if self.state != PlaybackState::Playing {
            return TickOutcome::Idle;
        }

        let elapsed = if elapsed.is_nan() { 0.0 } else { elapsed.max(0.0) };
        let next = (self.current_time + elapsed).min(self.total_duration);
        let stalled = elapsed > 0.0 && next <= self.current_time;
        self.current_time = if stalled { self.total_duration } else { next };
        if self.current_time >= self.total_duration {
            self.state = PlaybackState::Stopped;
            TickOutcome::Finished
        } else {
            TickOutcome::Advanced
        }
    }

    /// Seek to a time in `[0, total_duration]`. Play state is unchanged.
    pub fn seek(&mut self, time: f32) {
        self.current_time = if time.is_nan() {
            0.0
        } else {
            time.clamp(0.0, self.total_duration)
        };
    }

    /// Seek relative to the playhead
    pub fn skip(&mut self, delta: f32) {
        self.seek(self.current_time + delta);
    }
}

/// Turns per-frame timestamps from the presentation layer into elapsed
/// seconds between frames.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
}

impl FrameClock {
    /// Create a clock with no frame seen yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame; zero for the first frame and for
    /// timestamps that go backwards
    pub fn frame(&mut self, timestamp: f64) -> f32 {
        let elapsed = match self.last_timestamp {
            Some(last) if timestamp > last => (timestamp - last) as f32,
            _ => 0.0,
        };
        self.last_timestamp = Some(timestamp);
        elapsed
    }

    /// Forget the previous frame, e.g. after a pause
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }
}

/// Format seconds as `MM:SS`
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_only_moves_while_playing() {
        let mut clock = PlaybackClock::new(10.0);
        assert_eq!(clock.tick(1.0), TickOutcome::Idle);
        assert_eq!(clock.current_time(), 0.0);

        clock.play();
        assert_eq!(clock.tick(0.5), TickOutcome::Advanced);
        assert_eq!(clock.tick(0.25), TickOutcome::Advanced);
        assert_eq!(clock.current_time(), 0.75);

        clock.pause();
        assert_eq!(clock.tick(1.0), TickOutcome::Idle);
        assert_eq!(clock.current_time(), 0.75);
    }

    #[test]
    fn test_reaching_the_end_stops() {
        let mut clock = PlaybackClock::new(2.0);
        clock.play();
        assert_eq!(clock.tick(1.5), TickOutcome::Advanced);
        assert_eq!(clock.tick(1.5), TickOutcome::Finished);
        assert_eq!(clock.current_time(), 2.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_long_session_always_finishes() {
        let mut clock = PlaybackClock::new(2.0e6);
        assert_eq!(clock.total_duration(), MAX_SESSION_DURATION);

        clock.seek(MAX_SESSION_DURATION - 1.0);
        clock.play();
        let mut ticks = 0;
        while clock.tick(1.0 / 30.0) != TickOutcome::Finished {
            ticks += 1;
            assert!(ticks < 100, "playhead stuck at {}", clock.current_time());
        }
        assert!(!clock.is_playing());
        assert_eq!(clock.current_time(), MAX_SESSION_DURATION);
    }

    #[test]
    fn test_step_below_precision_finishes() {
        let mut clock = PlaybackClock::new(MAX_SESSION_DURATION);
        clock.seek(MAX_SESSION_DURATION - 1.0);
        clock.play();
        assert_eq!(clock.tick(1.0e-6), TickOutcome::Finished);
        assert_eq!(clock.current_time(), MAX_SESSION_DURATION);
    }

    #[test]
    fn test_play_at_end_replays_from_start() {
        let mut clock = PlaybackClock::new(5.0);
        clock.seek(5.0);
        clock.play();
        assert_eq!(clock.current_time(), 0.0);
        assert!(clock.is_playing());
    }

    #[test]
    fn test_seek_and_skip_clamp() {
        let mut clock = PlaybackClock::new(10.0);
        clock.seek(-3.0);
        assert_eq!(clock.current_time(), 0.0);
        clock.seek(42.0);
        assert_eq!(clock.current_time(), 10.0);

        clock.skip(-2.5);
        assert_eq!(clock.current_time(), 7.5);
        clock.skip(100.0);
        assert_eq!(clock.current_time(), 10.0);
        clock.seek(f32::NAN);
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn test_seek_keeps_play_state() {
        let mut clock = PlaybackClock::new(10.0);
        clock.play();
        clock.seek(3.0);
        assert!(clock.is_playing());
        clock.toggle();
        clock.seek(4.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_frame_clock() {
        let mut frames = FrameClock::new();
        assert_eq!(frames.frame(100.0), 0.0);
        assert_eq!(frames.frame(100.5), 0.5);
        assert_eq!(frames.frame(99.0), 0.0);
        frames.reset();
        assert_eq!(frames.frame(200.0), 0.0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(61.9), "01:01");
        assert_eq!(format_clock(600.0), "10:00");
    }
}

use std::time::Instant;

use crate::settings::SketchSettings;

/// Frame metadata handed to the session each redraw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Frame index within the current loop
    pub number: u64,
    /// Progress through the loop, [0, 1)
    pub playhead: f32,
    /// Seconds since playback started, never wrapped
    pub elapsed: f32,
}

impl FrameInfo {
    pub fn new(number: u64, playhead: f32, elapsed: f32) -> Self {
        Self {
            number,
            playhead,
            elapsed,
        }
    }
}

/// Turns wall-clock time into loop frames.
///
/// Animated playback yields a frame per call; still mode yields exactly one
/// frame at playhead 0 and then `None`. Time accumulates in `f64` and is
/// narrowed only when a frame is handed out.
#[derive(Debug)]
pub struct Playback {
    fps: f64,
    duration: f64,
    total_frames: u64,
    animate: bool,
    elapsed: f64,
    frames_yielded: u64,
    last_tick: Option<Instant>,
}

impl Playback {
    pub fn new(settings: &SketchSettings) -> Self {
        Self {
            fps: settings.fps as f64,
            duration: settings.duration as f64,
            total_frames: settings.total_frames(),
            animate: settings.animate,
            elapsed: 0.0,
            frames_yielded: 0,
            last_tick: None,
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn is_animated(&self) -> bool {
        self.animate
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Loop progress for an elapsed time
    pub fn playhead_at(&self, elapsed: f64) -> f32 {
        let playhead = (elapsed / self.duration).rem_euclid(1.0) as f32;
        // Rounding can land exactly on 1.0
        if playhead >= 1.0 {
            0.0
        } else {
            playhead
        }
    }

    /// Advance by `delta` seconds and describe the resulting frame
    pub fn advance(&mut self, delta: f64) -> Option<FrameInfo> {
        if !self.animate {
            if self.frames_yielded > 0 {
                return None;
            }
            self.frames_yielded = 1;
            return Some(FrameInfo::new(0, 0.0, 0.0));
        }

        // First frame starts at zero regardless of the delta
        if self.frames_yielded > 0 {
            self.elapsed += delta.max(0.0);
        }
        self.frames_yielded += 1;

        let playhead = self.playhead_at(self.elapsed);
        let number = ((playhead as f64 * self.total_frames as f64) as u64).min(self.total_frames - 1);

        Some(FrameInfo::new(number, playhead, self.elapsed as f32))
    }

    /// Advance by the wall-clock time since the previous tick
    pub fn tick(&mut self) -> Option<FrameInfo> {
        let now = Instant::now();
        let delta = self
            .last_tick
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        self.advance(delta)
    }

    /// Frame `index` of a fixed-step render at the configured fps
    pub fn frame_at(&self, index: u64) -> FrameInfo {
        let elapsed = index as f64 / self.fps;
        let number = index % self.total_frames;
        FrameInfo::new(number, number as f32 / self.total_frames as f32, elapsed as f32)
    }
}

impl Iterator for Playback {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        self.tick()
    }
}

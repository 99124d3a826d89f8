//! Session-owned audio graph: decoded track plus playback clock.
//!
//! One graph is created per editor session and passed by reference to the
//! frequency analyzer and the render-loop driver. There is no process-wide
//! audio state.

use super::loader::AudioData;

/// Decoded mono track held by the graph.
#[derive(Debug, Clone)]
struct Track {
    samples: Vec<f32>,
    sample_rate: u32,
}

/// Explicitly owned audio graph for one session.
///
/// Holds the mono-downmixed track and the playback position. The analyzer
/// reads sample windows at the playhead; the driver advances the clock.
#[derive(Debug, Default)]
pub struct AudioGraph {
    track: Option<Track>,
    current_time: f64,
    playing: bool,
}

impl AudioGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a decoded track, replacing any previous one and rewinding.
    pub fn connect(&mut self, audio: &AudioData) {
        self.track = Some(Track {
            samples: audio.to_mono(),
            sample_rate: audio.sample_rate,
        });
        self.current_time = 0.0;
        self.playing = false;
    }

    /// Disconnect the track and release its samples.
    pub fn disconnect(&mut self) {
        self.track = None;
        self.current_time = 0.0;
        self.playing = false;
    }

    pub fn has_track(&self) -> bool {
        self.track.is_some()
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.track.as_ref().map(|t| t.sample_rate)
    }

    /// Track duration in seconds, 0.0 when nothing is connected.
    pub fn duration(&self) -> f64 {
        match &self.track {
            Some(t) if t.sample_rate > 0 => t.samples.len() as f64 / t.sample_rate as f64,
            _ => 0.0,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        if self.track.is_some() {
            self.playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Seek to an absolute time, clamped to the track bounds.
    pub fn seek(&mut self, time: f64) {
        self.current_time = time.clamp(0.0, self.duration());
    }

    /// Advance the clock by `dt` seconds while playing.
    ///
    /// Stops at the track end. Returns true while playback continues.
    pub fn advance(&mut self, dt: f64) -> bool {
        if !self.playing {
            return false;
        }
        let end = self.duration();
        self.current_time += dt;
        if self.current_time >= end {
            self.current_time = end;
            self.playing = false;
        }
        self.playing
    }

    /// Sample window of length `len` starting at the playhead.
    ///
    /// Returns None when no track is connected or fewer than `len` samples
    /// remain ahead of the playhead.
    pub fn window_at_playhead(&self, len: usize) -> Option<&[f32]> {
        let track = self.track.as_ref()?;
        let start = (self.current_time * track.sample_rate as f64) as usize;
        let end = start.checked_add(len)?;
        track.samples.get(start..end)
    }
}

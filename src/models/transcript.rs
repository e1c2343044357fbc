//! Spoken-transcript records.

use serde::{Deserialize, Serialize};

/// One transcript line: a spoken sentence with its time interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Start in seconds from the beginning of the recording.
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

impl TranscriptLine {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end()
    }
}

/// Find the transcript line active at time `t` by interval containment.
/// Returns `None` between lines or outside the transcript entirely.
pub fn active_line_at(lines: &[TranscriptLine], t: f64) -> Option<usize> {
    lines.iter().position(|line| line.contains(t))
}

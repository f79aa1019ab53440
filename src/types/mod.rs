//! Core data types for the interval timer.
//!
//! This module defines the data structures shared by the plan model and
//! the timer engine:
//! - Segments (one named, timed phase of a workout)
//! - Timer status and the read-only snapshot the engine exposes

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// SegmentType
// ============================================================================

/// Kind of a segment (warmup, work, rest, ...).
///
/// The vocabulary is open: any non-empty tag is accepted, the associated
/// constants only name the values the built-in plans use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentType(String);

impl SegmentType {
    pub const WARMUP: &'static str = "warmup";
    pub const HIIT_WORK: &'static str = "hiit-work";
    pub const WORK: &'static str = "work";
    pub const ACTIVE_REST: &'static str = "active-rest";
    pub const COMPLETE_REST: &'static str = "complete-rest";
    pub const REST: &'static str = "rest";
    pub const COOLDOWN: &'static str = "cooldown";

    /// Creates a segment type from any tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the tag is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SegmentType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

// ============================================================================
// Intensity
// ============================================================================

/// Descriptive effort level of a segment. Has no effect on timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intensity {
    Light,
    #[default]
    Moderate,
    Hard,
    VeryHard,
    Max,
}

impl Intensity {
    /// All intensities, lightest first.
    pub const ALL: [Intensity; 5] = [
        Intensity::Light,
        Intensity::Moderate,
        Intensity::Hard,
        Intensity::VeryHard,
        Intensity::Max,
    ];

    /// Returns the string representation of the intensity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Moderate => "moderate",
            Intensity::Hard => "hard",
            Intensity::VeryHard => "very-hard",
            Intensity::Max => "max",
        }
    }

    /// Parses an intensity tag, returning `None` for unknown values.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == tag)
    }
}

// ============================================================================
// SoundCue
// ============================================================================

/// Identifier of an audio cue handled by the external audio layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundCue(String);

impl SoundCue {
    pub const NONE: &'static str = "none";
    pub const ALERT: &'static str = "alert";
    pub const COMPLETE: &'static str = "complete";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The cue that plays nothing.
    pub fn none() -> Self {
        Self::new(Self::NONE)
    }

    pub fn alert() -> Self {
        Self::new(Self::ALERT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this cue should be skipped by the audio layer.
    pub fn is_none(&self) -> bool {
        self.0.is_empty() || self.0 == Self::NONE
    }
}

impl Default for SoundCue {
    fn default() -> Self {
        Self::alert()
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Segment
// ============================================================================

/// One named, timed phase of a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Segment kind
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    /// Duration in seconds (always > 0 for a valid segment)
    pub duration: u32,
    /// Informational intensity
    #[serde(default)]
    pub intensity: Intensity,
    /// Display label
    pub name: String,
    /// Cue played near and at the end of this segment
    #[serde(default)]
    pub sound_cue: SoundCue,
}

impl Segment {
    /// Creates a segment with moderate intensity and the default cue.
    pub fn new(name: impl Into<String>, segment_type: impl Into<String>, duration: u32) -> Self {
        Self {
            segment_type: SegmentType::new(segment_type),
            duration,
            intensity: Intensity::default(),
            name: name.into(),
            sound_cue: SoundCue::default(),
        }
    }

    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_sound_cue(mut self, cue: SoundCue) -> Self {
        self.sound_cue = cue;
        self
    }

    /// Checks the segment invariants.
    ///
    /// Returns a description of the first broken invariant.
    pub fn check(&self) -> Result<(), &'static str> {
        if self.duration == 0 {
            return Err("duration must be positive");
        }
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.segment_type.is_blank() {
            return Err("type is required");
        }
        Ok(())
    }
}

// ============================================================================
// TimerStatus
// ============================================================================

/// Lifecycle status of the timer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// Loaded (or empty) and waiting for `start`
    #[default]
    Idle,
    /// Actively counting down
    Running,
    /// Frozen, waiting for `start` to resume
    Paused,
    /// Every segment has finished
    Complete,
}

impl TimerStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Complete => "complete",
        }
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Read-only view of the timer run state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub segment_index: usize,
    pub total_segments: usize,
    pub remaining_seconds: u32,
    pub segment_name: Option<String>,
    pub segment_type: Option<SegmentType>,
}

impl TimerSnapshot {
    /// Snapshot of an engine with nothing loaded.
    pub fn empty() -> Self {
        Self {
            status: TimerStatus::Idle,
            segment_index: 0,
            total_segments: 0,
            remaining_seconds: 0,
            segment_name: None,
            segment_type: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

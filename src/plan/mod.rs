//! Workout plan model.
//!
//! This module provides:
//! - `Plan`: a stored, named workout definition keyed on its mode
//! - `draft`: loose user input awaiting validation
//! - `validation`: draft → validated plan, collecting every violation
//! - `presets`: the built-in read-only plans
//! - `store`: the persisted plan list and the active-plan pointer
//!
//! Flattening a plan produces the exact segment sequence the timer engine
//! executes:
//!
//! ```
//! use interval_timer::plan::{Plan, PlanMode, SimpleCycle};
//!
//! let plan = Plan::new(
//!     "Quick",
//!     PlanMode::Simple(SimpleCycle {
//!         duration: 30,
//!         rest_time: 10,
//!         repetitions: 3,
//!         alert_time: 3,
//!     }),
//! );
//! let durations: Vec<u32> = plan.flatten().iter().map(|s| s.duration).collect();
//! assert_eq!(durations, vec![30, 10, 30, 10, 30]);
//! ```

pub mod draft;
pub mod presets;
pub mod store;
pub mod validation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Intensity, Segment, SegmentType, SoundCue};

pub use draft::{PlanDraft, SegmentDraft};
pub use store::{PlanStore, PlanStoreError};
pub use validation::{validate, validate_with, PlanDefaults, ValidatedPlan, ValidationError};

/// Maximum plan name length, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

// ============================================================================
// PlanMode
// ============================================================================

/// Flat work/rest cycle of the original timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCycle {
    /// Work duration in seconds
    pub duration: u32,
    /// Rest duration in seconds
    pub rest_time: u32,
    pub repetitions: u32,
    pub alert_time: u32,
}

/// Explicit ordered list of segments, replayed as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentedPlan {
    pub segments: Vec<Segment>,
    pub repetitions: u32,
    pub alert_time: u32,
}

/// Plan body, tagged by the `mode` field in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PlanMode {
    Simple(SimpleCycle),
    Preset(SegmentedPlan),
    Custom(SegmentedPlan),
}

impl PlanMode {
    /// Every accepted mode tag.
    pub const NAMES: [&'static str; 3] = ["simple", "preset", "custom"];

    /// Returns the mode tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanMode::Simple(_) => "simple",
            PlanMode::Preset(_) => "preset",
            PlanMode::Custom(_) => "custom",
        }
    }

    pub fn repetitions(&self) -> u32 {
        match self {
            PlanMode::Simple(cycle) => cycle.repetitions,
            PlanMode::Preset(body) | PlanMode::Custom(body) => body.repetitions,
        }
    }

    pub fn alert_time(&self) -> u32 {
        match self {
            PlanMode::Simple(cycle) => cycle.alert_time,
            PlanMode::Preset(body) | PlanMode::Custom(body) => body.alert_time,
        }
    }

    /// Declared segments. Empty for simple plans.
    pub fn segments(&self) -> &[Segment] {
        match self {
            PlanMode::Simple(_) => &[],
            PlanMode::Preset(body) | PlanMode::Custom(body) => &body.segments,
        }
    }

    /// Produces the executed segment sequence.
    ///
    /// Simple plans alternate work and rest and drop the rest after the
    /// last repetition (`2R - 1` segments). Segmented plans replay every
    /// declared segment `R` times with nothing trimmed.
    pub fn flatten(&self) -> Vec<Segment> {
        match self {
            PlanMode::Simple(cycle) => {
                let reps = cycle.repetitions as usize;
                let work = simple_work_segment(cycle.duration);
                let rest = simple_rest_segment(cycle.rest_time);

                let mut segments = Vec::with_capacity((2 * reps).saturating_sub(1));
                for rep in 0..reps {
                    segments.push(work.clone());
                    if rep + 1 < reps {
                        segments.push(rest.clone());
                    }
                }
                segments
            }
            PlanMode::Preset(body) | PlanMode::Custom(body) => {
                let reps = body.repetitions as usize;
                let mut segments = Vec::with_capacity(body.segments.len() * reps);
                for _ in 0..reps {
                    segments.extend(body.segments.iter().cloned());
                }
                segments
            }
        }
    }

    /// Length of [`PlanMode::flatten`] in seconds, computed without
    /// building the sequence.
    pub fn total_duration(&self) -> u64 {
        match self {
            PlanMode::Simple(cycle) => {
                let reps = u64::from(cycle.repetitions);
                let work = u64::from(cycle.duration).saturating_mul(reps);
                let rest = u64::from(cycle.rest_time).saturating_mul(reps.saturating_sub(1));
                work.saturating_add(rest)
            }
            PlanMode::Preset(body) | PlanMode::Custom(body) => {
                let per_round: u64 = body.segments.iter().map(|s| u64::from(s.duration)).sum();
                per_round.saturating_mul(u64::from(body.repetitions))
            }
        }
    }
}

fn simple_work_segment(duration: u32) -> Segment {
    Segment::new("Work", SegmentType::HIIT_WORK, duration)
        .with_intensity(Intensity::Hard)
        .with_sound_cue(SoundCue::alert())
}

fn simple_rest_segment(duration: u32) -> Segment {
    Segment::new("Rest", SegmentType::COMPLETE_REST, duration)
        .with_intensity(Intensity::Light)
        .with_sound_cue(SoundCue::alert())
}

// ============================================================================
// Plan
// ============================================================================

/// A stored workout definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Stable unique identifier (UUID v4 for user plans)
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub mode: PlanMode,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_count: u32,
    /// True for built-in read-only plans
    #[serde(default)]
    pub is_preset: bool,
}

impl Plan {
    /// Creates a plan with a fresh id and zeroed usage metadata.
    pub fn new(name: impl Into<String>, mode: PlanMode) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            mode,
            created_at: Utc::now(),
            last_used: None,
            usage_count: 0,
            is_preset: false,
        }
    }

    pub fn repetitions(&self) -> u32 {
        self.mode.repetitions()
    }

    pub fn alert_time(&self) -> u32 {
        self.mode.alert_time()
    }

    /// See [`PlanMode::flatten`].
    pub fn flatten(&self) -> Vec<Segment> {
        self.mode.flatten()
    }

    /// Total workout length in seconds, across all repetitions.
    pub fn total_duration(&self) -> u64 {
        self.mode.total_duration()
    }
}

// ============================================================================
// Tests
// ============================================================================

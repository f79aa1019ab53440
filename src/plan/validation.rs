//! Plan validation.
//!
//! Validation never stops at the first problem: every violated constraint
//! is collected so a caller can show the complete list at once.

use thiserror::Error;

use super::draft::{PlanDraft, SegmentDraft};
use super::{PlanMode, SegmentedPlan, SimpleCycle, MAX_NAME_LENGTH};
use crate::timer::DEFAULT_ALERT_TIME;
use crate::types::{Intensity, Segment, SegmentType, SoundCue};

/// Default number of repetitions when a draft leaves it out.
pub const DEFAULT_REPETITIONS: u32 = 1;

/// Upper bound on repetitions.
pub const MAX_REPETITIONS: u32 = 100;

/// Upper bound on declared segments in a segmented plan.
pub const MAX_SEGMENTS: usize = 100;

// ============================================================================
// ValidationError
// ============================================================================

/// Every constraint a draft violated, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("plan validation failed: {}", .messages.join("; "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    /// Returns true if any message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

// ============================================================================
// Defaults / ValidatedPlan
// ============================================================================

/// Values substituted for optional draft fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanDefaults {
    pub repetitions: u32,
    pub alert_time: u32,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            alert_time: DEFAULT_ALERT_TIME,
        }
    }
}

/// A draft that passed validation, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPlan {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub mode: PlanMode,
}

// ============================================================================
// validate
// ============================================================================

/// Validates `draft` with the default repetitions and alert time.
pub fn validate(draft: &PlanDraft) -> Result<ValidatedPlan, ValidationError> {
    validate_with(draft, &PlanDefaults::default())
}

/// Validates `draft`, filling absent numeric fields from `defaults`.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every violated constraint.
pub fn validate_with(
    draft: &PlanDraft,
    defaults: &PlanDefaults,
) -> Result<ValidatedPlan, ValidationError> {
    let mut errors = Vec::new();

    let name = draft.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.push("Plan name is required".to_string());
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(format!(
            "Plan name must be {MAX_NAME_LENGTH} characters or less"
        ));
    }

    let mode = draft.mode.as_deref().map(str::trim).unwrap_or_default();
    if mode.is_empty() {
        errors.push("Plan mode is required".to_string());
    } else if !PlanMode::NAMES.contains(&mode) {
        errors.push(format!(
            "Plan mode must be one of: {}",
            PlanMode::NAMES.join(", ")
        ));
    }

    let repetitions = optional_positive(
        draft.repetitions,
        defaults.repetitions,
        "Repetitions must be a positive integer",
        &mut errors,
    );
    if repetitions > MAX_REPETITIONS {
        errors.push(format!("Repetitions must be {MAX_REPETITIONS} or less"));
    }
    let alert_time = optional_positive(
        draft.alert_time,
        defaults.alert_time,
        "Alert time must be a positive integer",
        &mut errors,
    );

    let body = if mode == "simple" {
        let duration = required_positive(
            draft.duration,
            "Work duration must be a positive integer",
            &mut errors,
        );
        let rest_time = required_positive(
            draft.rest_time,
            "Rest time must be a positive integer",
            &mut errors,
        );
        duration.zip(rest_time).map(|(duration, rest_time)| {
            PlanMode::Simple(SimpleCycle {
                duration,
                rest_time,
                repetitions,
                alert_time,
            })
        })
    } else {
        // Anything that is not a simple plan needs segments, including a
        // missing or unrecognised mode.
        let segments = validate_segments(draft.segments.as_deref(), &mut errors);
        let body = SegmentedPlan {
            segments,
            repetitions,
            alert_time,
        };
        match mode {
            "preset" => Some(PlanMode::Preset(body)),
            "custom" => Some(PlanMode::Custom(body)),
            _ => None,
        }
    };

    match body {
        Some(mode) if errors.is_empty() => Ok(ValidatedPlan {
            id: draft.id.clone().filter(|id| !id.trim().is_empty()),
            name: name.to_string(),
            description: draft
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            mode,
        }),
        _ => Err(ValidationError { messages: errors }),
    }
}

fn validate_segments(drafts: Option<&[SegmentDraft]>, errors: &mut Vec<String>) -> Vec<Segment> {
    let drafts = drafts.unwrap_or_default();
    if drafts.is_empty() {
        errors.push("At least one segment is required".to_string());
        return Vec::new();
    }
    if drafts.len() > MAX_SEGMENTS {
        errors.push(format!("A plan can have at most {MAX_SEGMENTS} segments"));
    }

    drafts
        .iter()
        .enumerate()
        .filter_map(|(index, draft)| validate_segment(index + 1, draft, errors))
        .collect()
}

fn validate_segment(number: usize, draft: &SegmentDraft, errors: &mut Vec<String>) -> Option<Segment> {
    let before = errors.len();

    let segment_type = draft.segment_type.as_deref().map(str::trim).unwrap_or_default();
    if segment_type.is_empty() {
        errors.push(format!("Segment {number}: type is required"));
    }

    let duration = required_positive(
        draft.duration,
        &format!("Segment {number}: duration must be a positive integer"),
        errors,
    );

    let name = draft.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.push(format!("Segment {number}: name is required"));
    }

    let intensity = match draft.intensity.as_deref().map(str::trim) {
        None | Some("") => Intensity::default(),
        Some(tag) => Intensity::parse(tag).unwrap_or_else(|| {
            let names: Vec<&str> = Intensity::ALL.iter().map(Intensity::as_str).collect();
            errors.push(format!(
                "Segment {number}: intensity must be one of: {}",
                names.join(", ")
            ));
            Intensity::default()
        }),
    };

    let sound_cue = match draft.sound_cue.as_deref().map(str::trim) {
        None | Some("") => SoundCue::default(),
        Some(cue) => SoundCue::new(cue),
    };

    if errors.len() > before {
        return None;
    }

    Some(Segment {
        segment_type: SegmentType::new(segment_type),
        duration: duration?,
        intensity,
        name: name.to_string(),
        sound_cue,
    })
}

fn optional_positive(value: Option<i64>, default: u32, message: &str, errors: &mut Vec<String>) -> u32 {
    match value {
        None => default,
        Some(v) => positive_u32(v).unwrap_or_else(|| {
            errors.push(message.to_string());
            default
        }),
    }
}

fn required_positive(value: Option<i64>, message: &str, errors: &mut Vec<String>) -> Option<u32> {
    let parsed = value.and_then(positive_u32);
    if parsed.is_none() {
        errors.push(message.to_string());
    }
    parsed
}

fn positive_u32(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| *v > 0)
}

// ============================================================================
// Tests
// ============================================================================

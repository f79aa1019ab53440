//! Unvalidated plan input.
//!
//! Drafts mirror the stored JSON shape but keep every field optional and
//! loosely typed, so that validation can report every problem at once
//! instead of failing on the first deserialization error.

use serde::{Deserialize, Serialize};

use super::{Plan, PlanMode};
use crate::types::Segment;

/// Segment as submitted by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDraft {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub segment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_cue: Option<String>,
}

impl SegmentDraft {
    /// Creates a draft with name, type and duration set.
    pub fn new(name: impl Into<String>, segment_type: impl Into<String>, duration: i64) -> Self {
        Self {
            segment_type: Some(segment_type.into()),
            duration: Some(duration),
            intensity: None,
            name: Some(name.into()),
            sound_cue: None,
        }
    }
}

impl From<&Segment> for SegmentDraft {
    fn from(segment: &Segment) -> Self {
        Self {
            segment_type: Some(segment.segment_type.as_str().to_string()),
            duration: Some(i64::from(segment.duration)),
            intensity: Some(segment.intensity.as_str().to_string()),
            name: Some(segment.name.clone()),
            sound_cue: Some(segment.sound_cue.as_str().to_string()),
        }
    }
}

/// Plan as submitted by a user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    /// Existing plan id when editing; `None` creates a new plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Work duration in seconds (simple mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Rest duration in seconds (simple mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentDraft>>,
}

impl PlanDraft {
    /// Draft of a simple work/rest plan.
    pub fn simple(name: impl Into<String>, duration: i64, rest_time: i64, repetitions: i64) -> Self {
        Self {
            name: Some(name.into()),
            mode: Some("simple".to_string()),
            duration: Some(duration),
            rest_time: Some(rest_time),
            repetitions: Some(repetitions),
            ..Self::default()
        }
    }

    /// Draft of a custom segmented plan.
    pub fn custom(name: impl Into<String>, segments: Vec<SegmentDraft>) -> Self {
        Self {
            name: Some(name.into()),
            mode: Some("custom".to_string()),
            segments: Some(segments),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_repetitions(mut self, repetitions: i64) -> Self {
        self.repetitions = Some(repetitions);
        self
    }

    pub fn with_alert_time(mut self, alert_time: i64) -> Self {
        self.alert_time = Some(alert_time);
        self
    }
}

impl From<&Plan> for PlanDraft {
    /// Draft that re-saves `plan` unchanged when passed to the store.
    fn from(plan: &Plan) -> Self {
        let mut draft = Self {
            id: Some(plan.id.clone()),
            name: Some(plan.name.clone()),
            description: plan.description.clone(),
            mode: Some(plan.mode.as_str().to_string()),
            repetitions: Some(i64::from(plan.repetitions())),
            alert_time: Some(i64::from(plan.alert_time())),
            ..Self::default()
        };

        match &plan.mode {
            PlanMode::Simple(cycle) => {
                draft.duration = Some(i64::from(cycle.duration));
                draft.rest_time = Some(i64::from(cycle.rest_time));
            }
            PlanMode::Preset(body) | PlanMode::Custom(body) => {
                draft.segments = Some(body.segments.iter().map(SegmentDraft::from).collect());
            }
        }

        draft
    }
}

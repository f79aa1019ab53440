//! Built-in read-only plans.

use chrono::{DateTime, Utc};

use super::{Plan, PlanMode, SegmentedPlan};
use crate::types::{Intensity, Segment, SegmentType, SoundCue};

/// Prefix shared by every built-in plan id.
pub const PRESET_ID_PREFIX: &str = "preset-";

/// Returns true if `id` names a built-in plan.
pub fn is_preset_id(id: &str) -> bool {
    id.starts_with(PRESET_ID_PREFIX)
}

/// Returns the built-in plan catalog.
pub fn builtin_presets() -> Vec<Plan> {
    vec![
        preset(
            "tabata",
            "Tabata",
            "Eight rounds of 20 seconds all-out and 10 seconds rest",
            vec![
                work("All out", 20, Intensity::Max),
                rest("Rest", 10),
            ],
            8,
        ),
        preset(
            "classic-hiit",
            "Classic HIIT",
            "Warm up, five 30/30 intervals, cool down",
            {
                let mut segments = vec![warmup(300)];
                for round in 1..=5 {
                    segments.push(work(&format!("Interval {round}"), 30, Intensity::VeryHard));
                    segments.push(
                        Segment::new("Recover", SegmentType::ACTIVE_REST, 30)
                            .with_intensity(Intensity::Light),
                    );
                }
                segments.push(cooldown(300));
                segments
            },
            1,
        ),
        preset(
            "emom-10",
            "EMOM 10",
            "Every minute on the minute for ten minutes",
            vec![work("Work", 40, Intensity::Hard), rest("Rest", 20)],
            10,
        ),
        preset(
            "beginner-intervals",
            "Beginner Intervals",
            "Gentle introduction to interval training",
            vec![
                warmup(180),
                work("Work", 30, Intensity::Moderate),
                rest("Rest", 60),
                work("Work", 30, Intensity::Moderate),
                rest("Rest", 60),
                work("Work", 30, Intensity::Moderate),
                cooldown(180),
            ],
            1,
        ),
    ]
}

/// Looks up a built-in plan by id.
pub fn find_preset(id: &str) -> Option<Plan> {
    if !is_preset_id(id) {
        return None;
    }
    builtin_presets().into_iter().find(|p| p.id == id)
}

fn preset(slug: &str, name: &str, description: &str, segments: Vec<Segment>, repetitions: u32) -> Plan {
    Plan {
        id: format!("{PRESET_ID_PREFIX}{slug}"),
        name: name.to_string(),
        description: Some(description.to_string()),
        mode: PlanMode::Preset(SegmentedPlan {
            segments,
            repetitions,
            alert_time: 3,
        }),
        created_at: DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap_or_default(),
        last_used: None,
        usage_count: 0,
        is_preset: true,
    }
}

fn work(name: &str, duration: u32, intensity: Intensity) -> Segment {
    Segment::new(name, SegmentType::HIIT_WORK, duration).with_intensity(intensity)
}

fn rest(name: &str, duration: u32) -> Segment {
    Segment::new(name, SegmentType::COMPLETE_REST, duration).with_intensity(Intensity::Light)
}

fn warmup(duration: u32) -> Segment {
    Segment::new("Warm up", SegmentType::WARMUP, duration).with_intensity(Intensity::Light)
}

fn cooldown(duration: u32) -> Segment {
    Segment::new("Cool down", SegmentType::COOLDOWN, duration)
        .with_intensity(Intensity::Light)
        .with_sound_cue(SoundCue::new(SoundCue::COMPLETE))
}

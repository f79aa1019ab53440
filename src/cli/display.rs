//! Display utilities for the interval timer CLI.
//!
//! This module provides formatted output for:
//! - Plan listings and details
//! - Validation errors
//! - The live countdown line and timer events

use std::io::Write;

use crate::plan::Plan;
use crate::timer::TimerEvent;
use crate::types::{Segment, TimerSnapshot, TimerStatus};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Plans
    // ------------------------------------------------------------------------

    /// Shows stored plans, marking the active one.
    pub fn show_plan_list(plans: &[Plan], active_id: Option<&str>) {
        if plans.is_empty() {
            println!("No saved plans. Add one with `plans add-simple` or `plans add`.");
            return;
        }
        for plan in plans {
            println!("{}", Self::format_plan_row(plan, active_id == Some(plan.id.as_str())));
        }
    }

    /// Shows the built-in presets.
    pub fn show_presets(presets: &[Plan], active_id: Option<&str>) {
        println!("Built-in presets");
        println!("─────────────────────────────");
        for plan in presets {
            println!("{}", Self::format_plan_row(plan, active_id == Some(plan.id.as_str())));
        }
    }

    /// Shows one plan with its flattened segment sequence.
    pub fn show_plan(plan: &Plan, is_active: bool) {
        println!("{}{}", plan.name, if is_active { " (active)" } else { "" });
        println!("─────────────────────────────");
        println!("ID: {}", plan.id);
        if let Some(description) = &plan.description {
            println!("Description: {}", description);
        }
        println!("Mode: {}", plan.mode.as_str());
        println!("Repetitions: {}", plan.repetitions());
        println!("Alert: {}s before each segment ends", plan.alert_time());
        println!("Total: {}", Self::format_clock_u64(plan.total_duration()));
        if !plan.is_preset {
            println!("Used: {} times", plan.usage_count);
            if let Some(last_used) = plan.last_used {
                println!("Last used: {}", last_used.format("%Y-%m-%d %H:%M"));
            }
        }

        let segments = plan.flatten();
        println!();
        for (index, segment) in segments.iter().enumerate() {
            println!("  {}", Self::format_segment_row(index, segments.len(), segment));
        }
    }

    /// Shows the active plan, or a hint when there is none.
    pub fn show_active(plan: Option<&Plan>) {
        match plan {
            Some(plan) => println!("{}", Self::format_plan_row(plan, true)),
            None => println!("No active plan. Choose one with `activate <id>`."),
        }
    }

    pub fn show_saved(id: &str) {
        println!("* Saved plan {}", id);
    }

    pub fn show_deleted(id: &str) {
        println!("* Deleted plan {}", id);
    }

    pub fn show_activated(plan: &Plan) {
        println!("* Active plan: {}", plan.name);
    }

    pub fn show_deactivated() {
        println!("* Active plan cleared");
    }

    /// Shows every validation message as a bullet list.
    pub fn show_validation_errors(messages: &[String]) {
        eprintln!("Plan is invalid:");
        for message in messages {
            eprintln!("  - {}", message);
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    // ------------------------------------------------------------------------
    // Workout
    // ------------------------------------------------------------------------

    /// Shows the key bindings before a workout starts.
    pub fn show_run_header(plan: &Plan) {
        println!(
            "> {} ({} segments, {})",
            plan.name,
            plan.flatten().len(),
            Self::format_clock_u64(plan.total_duration())
        );
        println!("  Type p + Enter to pause, s to resume, r to reset, q to quit");
    }

    /// Renders a timer event. Ticks redraw the countdown line in place.
    pub fn show_event(event: &TimerEvent) {
        match event {
            TimerEvent::Tick(snapshot) => {
                print!("\r{}   ", Self::format_status_line(snapshot));
                let _ = std::io::stdout().flush();
            }
            TimerEvent::SegmentChanged { segment, index } => {
                println!();
                println!(
                    "> {} [{}] {}",
                    segment.name,
                    index + 1,
                    Self::format_clock(segment.duration)
                );
            }
            TimerEvent::Paused { remaining_seconds } => {
                println!();
                println!("|| Paused at {}", Self::format_clock(*remaining_seconds));
            }
            TimerEvent::Resumed { remaining_seconds } => {
                println!("> Resumed at {}", Self::format_clock(*remaining_seconds));
            }
            TimerEvent::Reset => {
                println!();
                println!("[] Reset. Type s to start again");
            }
            TimerEvent::NearComplete { .. } => {}
            TimerEvent::Completed => {
                println!();
                println!("* Workout complete");
            }
        }
    }

    /// Shows a hint for an unrecognized control line.
    pub fn show_unknown_control(input: &str) {
        println!();
        println!("Unknown command '{}'. Use p, s, r or q", input);
    }

    // ------------------------------------------------------------------------
    // Formatting
    // ------------------------------------------------------------------------

    /// Formats seconds as `M:SS`.
    pub fn format_clock(total_seconds: u32) -> String {
        let (minutes, seconds) = Self::format_time(total_seconds);
        format!("{}:{:02}", minutes, seconds)
    }

    fn format_clock_u64(total_seconds: u64) -> String {
        format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Formats the countdown line, e.g. `Work (3/15)  0:27`.
    pub fn format_status_line(snapshot: &TimerSnapshot) -> String {
        let name = snapshot.segment_name.as_deref().unwrap_or("-");
        let line = format!(
            "{} ({}/{})  {}",
            name,
            snapshot.segment_index + 1,
            snapshot.total_segments,
            Self::format_clock(snapshot.remaining_seconds)
        );
        match snapshot.status {
            TimerStatus::Paused => format!("{}  [paused]", line),
            _ => line,
        }
    }

    fn format_plan_row(plan: &Plan, is_active: bool) -> String {
        format!(
            "{} {:<36}  {:<24}  {:<6}  {}",
            if is_active { "*" } else { " " },
            plan.id,
            plan.name,
            plan.mode.as_str(),
            Self::format_clock_u64(plan.total_duration())
        )
    }

    fn format_segment_row(index: usize, total: usize, segment: &Segment) -> String {
        format!(
            "{:>2}/{}  {:<20}  {:<13}  {:<9}  {}",
            index + 1,
            total,
            segment.name,
            segment.segment_type.as_str(),
            segment.intensity.as_str(),
            Self::format_clock(segment.duration)
        )
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================

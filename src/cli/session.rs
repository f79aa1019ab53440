//! Foreground workout session.
//!
//! Drives one plan through a [`TimerRunner`](crate::timer::TimerRunner):
//! renders events, forwards cues to the bell, and reads one-letter control
//! lines (`p`, `s`, `r`, `q`) from an input stream.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cli::Display;
use crate::cue::{play_cues, CuePlayer};
use crate::plan::Plan;
use crate::timer::{spawn_runner, TimerEngine, TimerEvent};

// ============================================================================
// Control
// ============================================================================

/// A control line typed during a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Start,
    Reset,
    Quit,
}

impl Control {
    /// Parses a control line. Case and surrounding space are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "s" | "start" | "resume" => Some(Self::Start),
            "r" | "reset" => Some(Self::Reset),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Quit,
    Interrupted,
}

// ============================================================================
// Session
// ============================================================================

/// Runs `plan` to completion, quit or Ctrl-C.
///
/// Control lines are read from `input`. When `input` ends, the workout
/// keeps running without controls.
pub async fn run_session<R>(
    plan: &Plan,
    tick_interval: Duration,
    player: Arc<dyn CuePlayer>,
    input: R,
) -> Result<SessionOutcome>
where
    R: AsyncBufRead + Unpin,
{
    let (handle, task) = spawn_runner(TimerEngine::new(), tick_interval);

    let mut events = handle.subscribe().await?;
    let cue_events = handle.subscribe().await?;
    let cue_task = tokio::spawn(async move { play_cues(cue_events, player.as_ref()).await });

    handle
        .load(plan.flatten(), Some(plan.alert_time()))
        .await
        .with_context(|| format!("Failed to load plan '{}'", plan.name))?;

    Display::show_run_header(plan);
    handle.start().await?;

    let mut lines = input.lines();
    let mut input_open = true;

    let outcome = loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    Display::show_event(&event);
                    if matches!(event, TimerEvent::Completed) {
                        break SessionOutcome::Completed;
                    }
                }
                None => anyhow::bail!("Timer stopped unexpectedly"),
            },
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => match Control::parse(&line) {
                    Some(Control::Pause) => {
                        handle.pause().await?;
                    }
                    Some(Control::Start) => {
                        handle.start().await?;
                    }
                    Some(Control::Reset) => handle.reset().await?,
                    Some(Control::Quit) => break SessionOutcome::Quit,
                    None if line.trim().is_empty() => {}
                    None => Display::show_unknown_control(line.trim()),
                },
                Ok(None) => {
                    tracing::debug!("Control input closed");
                    input_open = false;
                }
                Err(e) => {
                    tracing::warn!("Failed to read control input: {}", e);
                    input_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => break SessionOutcome::Interrupted,
        }
    };

    if outcome != SessionOutcome::Completed {
        println!();
    }

    handle.shutdown();
    task.await.context("Timer task failed")?;
    // The runner dropped the engine, closing the cue channel.
    cue_task.await.context("Cue task failed")?;

    tracing::info!("Session ended: {:?}", outcome);
    Ok(outcome)
}

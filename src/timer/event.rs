//! Events emitted by the timer engine.

use crate::types::{Segment, SoundCue, TimerSnapshot};

/// Timer events for the UI, audio and analytics collaborators.
///
/// Within one run, events arrive in the order the engine produced them:
/// a `SegmentChanged` for segment N+1 always precedes any `Tick` showing
/// segment N+1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Periodic countdown update
    Tick(TimerSnapshot),
    /// A segment became active
    SegmentChanged {
        /// The newly active segment
        segment: Segment,
        /// Index into the flattened sequence
        index: usize,
    },
    /// The active segment crossed its alert threshold
    NearComplete {
        /// Cue of the active segment
        sound_cue: SoundCue,
    },
    /// The last segment finished
    Completed,
    /// The countdown was frozen
    Paused {
        remaining_seconds: u32,
    },
    /// The countdown continued after a pause
    Resumed {
        remaining_seconds: u32,
    },
    /// The run returned to idle at segment 0
    Reset,
}

impl TimerEvent {
    /// Short name of the event kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TimerEvent::Tick(_) => "tick",
            TimerEvent::SegmentChanged { .. } => "segment_changed",
            TimerEvent::NearComplete { .. } => "near_complete",
            TimerEvent::Completed => "completed",
            TimerEvent::Paused { .. } => "paused",
            TimerEvent::Resumed { .. } => "resumed",
            TimerEvent::Reset => "reset",
        }
    }
}

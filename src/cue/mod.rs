//! Audible cues for timer events.
//!
//! The timer engine only names cues (`alert`, `complete`, `none`) through the
//! segment's `soundCue` field. This module maps events to cues and plays them:
//!
//! - `NearComplete` plays the active segment's cue unless it is `none`
//! - `Completed` plays the `complete` cue
//!
//! Playback failures are logged and never stop the timer.

mod error;

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;

pub use error::CueError;

use crate::timer::TimerEvent;
use crate::types::SoundCue;

/// Trait for cue playback implementations.
pub trait CuePlayer: Send + Sync {
    /// Plays a cue. Must not block for long; the event loop calls it inline.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, cue: &SoundCue) -> Result<(), CueError>;

    /// Returns true if playback is disabled.
    fn is_disabled(&self) -> bool;

    fn enable(&self);

    fn disable(&self);
}

/// Returns the cue an event should trigger, if any.
pub fn cue_for_event(event: &TimerEvent) -> Option<SoundCue> {
    match event {
        TimerEvent::NearComplete { sound_cue } if !sound_cue.is_none() => Some(sound_cue.clone()),
        TimerEvent::Completed => Some(SoundCue::new(SoundCue::COMPLETE)),
        _ => None,
    }
}

/// Consumes timer events and plays the matching cues until the channel
/// closes.
pub async fn play_cues<P: CuePlayer + ?Sized>(
    mut events: mpsc::UnboundedReceiver<TimerEvent>,
    player: &P,
) {
    while let Some(event) = events.recv().await {
        let Some(cue) = cue_for_event(&event) else {
            continue;
        };
        if player.is_disabled() {
            continue;
        }
        if let Err(e) = player.play(&cue) {
            tracing::warn!("Failed to play cue '{}': {}", cue, e);
        }
    }
}

// ============================================================================
// TerminalBell
// ============================================================================

/// Rings the terminal bell (BEL, 0x07) on standard output.
///
/// The `complete` cue rings twice.
#[derive(Debug)]
pub struct TerminalBell {
    disabled: AtomicBool,
}

impl TerminalBell {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            disabled: AtomicBool::new(!enabled),
        }
    }

    fn ring(out: &mut impl Write, cue: &SoundCue) -> Result<(), CueError> {
        let bells: &[u8] = if cue.as_str() == SoundCue::COMPLETE {
            b"\x07\x07"
        } else {
            b"\x07"
        };
        out.write_all(bells)?;
        out.flush()?;
        Ok(())
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CuePlayer for TerminalBell {
    fn play(&self, cue: &SoundCue) -> Result<(), CueError> {
        if self.is_disabled() || cue.is_none() {
            return Ok(());
        }
        tracing::debug!("Ringing bell for cue '{}'", cue);
        Self::ring(&mut std::io::stdout().lock(), cue)
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }
}

// ============================================================================
// MockCuePlayer
// ============================================================================

/// Mock cue player for testing.
#[derive(Debug, Default)]
pub struct MockCuePlayer {
    play_calls: Mutex<Vec<SoundCue>>,
    disabled: AtomicBool,
    should_fail: AtomicBool,
}

impl MockCuePlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundCue> {
        self.calls().clone()
    }

    pub fn clear_calls(&self) {
        self.calls().clear();
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Vec<SoundCue>> {
        self.play_calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CuePlayer for MockCuePlayer {
    fn play(&self, cue: &SoundCue) -> Result<(), CueError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(CueError::Playback("Mock failure".to_string()));
        }
        if self.is_disabled() {
            return Ok(());
        }
        self.calls().push(cue.clone());
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }
}

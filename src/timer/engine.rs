//! Timer engine for segmented workouts.
//!
//! This module provides the core countdown state machine:
//! - State transitions (Idle → Running ⇄ Paused → Complete)
//! - Wall-clock anchored countdown that survives late callbacks
//! - Segment and repetition transitions over a flattened sequence
//! - Near-complete cue, fired once per segment
//!
//! The engine does no scheduling of its own. A driver (see
//! [`super::runner`]) calls [`TimerEngine::tick`] periodically; however late
//! that call arrives, the remaining time is recomputed from the clock.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::clock::{Clock, SystemClock};
use super::error::LoadError;
use super::event::TimerEvent;
use crate::types::{Segment, TimerSnapshot, TimerStatus};

/// Default near-complete threshold in seconds.
pub const DEFAULT_ALERT_TIME: u32 = 3;

/// Converts a millisecond remainder to the displayed whole seconds.
fn display_seconds(remaining_ms: u64) -> u32 {
    u32::try_from(remaining_ms.div_ceil(1000)).unwrap_or(u32::MAX)
}

fn segment_ms(segment: &Segment) -> u64 {
    u64::from(segment.duration) * 1000
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown state machine over a flattened segment sequence.
pub struct TimerEngine<C: Clock = SystemClock> {
    clock: C,
    segments: Vec<Segment>,
    alert_time: u32,
    status: TimerStatus,
    index: usize,
    /// Remaining time of the active segment at `anchor` (or frozen value
    /// while not running)
    remaining_ms: u64,
    /// Instant the current running window started; `None` unless running
    anchor: Option<Instant>,
    near_complete_fired: bool,
    subscribers: Vec<mpsc::UnboundedSender<TimerEvent>>,
}

impl TimerEngine<SystemClock> {
    /// Creates an engine driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TimerEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerEngine<C> {
    /// Creates an empty engine reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            segments: Vec::new(),
            alert_time: DEFAULT_ALERT_TIME,
            status: TimerStatus::Idle,
            index: 0,
            remaining_ms: 0,
            anchor: None,
            near_complete_fired: false,
            subscribers: Vec::new(),
        }
    }

    /// Sets the near-complete threshold. Zero disables the cue.
    pub fn set_alert_time(&mut self, seconds: u32) {
        self.alert_time = seconds;
    }

    pub fn alert_time(&self) -> u32 {
        self.alert_time
    }

    /// Registers a new event subscriber.
    ///
    /// Dropping the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TimerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Replaces the sequence and resets to idle at segment 0.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the current run untouched, if `segments`
    /// is empty or any segment breaks the segment invariants.
    pub fn load_segments(&mut self, segments: Vec<Segment>) -> Result<(), LoadError> {
        if segments.is_empty() {
            return Err(LoadError::EmptySequence);
        }
        if let Some((index, reason)) = segments
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.check().err().map(|reason| (i, reason)))
        {
            return Err(LoadError::InvalidSegment { index, reason });
        }

        tracing::info!("Loaded {} segments", segments.len());
        self.segments = segments;
        self.rewind();
        Ok(())
    }

    /// Starts from idle or resumes from pause.
    ///
    /// Returns `true` if the engine transitioned to running. Starting while
    /// running, after completion, or with nothing loaded does nothing.
    pub fn start(&mut self) -> bool {
        match self.status {
            TimerStatus::Idle => {
                let Some(first) = self.segments.first().cloned() else {
                    tracing::warn!("Start ignored: no segments loaded");
                    return false;
                };
                self.status = TimerStatus::Running;
                self.anchor = Some(self.clock.now());
                tracing::info!("Timer started ({} segments)", self.segments.len());
                self.emit(TimerEvent::SegmentChanged {
                    segment: first,
                    index: 0,
                });
                true
            }
            TimerStatus::Paused => {
                self.status = TimerStatus::Running;
                self.anchor = Some(self.clock.now());
                tracing::info!("Timer resumed at {}ms", self.remaining_ms);
                self.emit(TimerEvent::Resumed {
                    remaining_seconds: display_seconds(self.remaining_ms),
                });
                true
            }
            TimerStatus::Running | TimerStatus::Complete => false,
        }
    }

    /// Freezes the countdown. Does nothing unless running.
    ///
    /// Boundaries crossed since the last tick are processed first, so a
    /// late pause never lands on a segment that already ended.
    pub fn pause(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }

        self.catch_up();
        if self.status != TimerStatus::Running {
            // The run completed while catching up.
            return false;
        }

        self.remaining_ms = self.current_remaining_ms();
        self.anchor = None;
        self.status = TimerStatus::Paused;
        tracing::info!("Timer paused at {}ms", self.remaining_ms);
        self.emit(TimerEvent::Paused {
            remaining_seconds: display_seconds(self.remaining_ms),
        });
        true
    }

    /// Returns to idle at segment 0 of the loaded sequence. Always safe.
    pub fn reset(&mut self) {
        self.rewind();
        tracing::info!("Timer reset");
        self.emit(TimerEvent::Reset);
    }

    /// Recomputes the countdown from the clock and emits the resulting
    /// events, ending with one `Tick`.
    ///
    /// Does nothing unless running.
    pub fn tick(&mut self) -> TimerSnapshot {
        if self.status != TimerStatus::Running {
            return self.snapshot();
        }

        self.catch_up();

        let snapshot = self.snapshot();
        tracing::debug!(
            "Tick: segment {}/{} remaining {}s",
            snapshot.segment_index + 1,
            snapshot.total_segments,
            snapshot.remaining_seconds
        );
        self.emit(TimerEvent::Tick(snapshot.clone()));
        snapshot
    }

    /// Pure read of the run state.
    pub fn snapshot(&self) -> TimerSnapshot {
        let segment = self.segments.get(self.index);
        TimerSnapshot {
            status: self.status,
            segment_index: self.index,
            total_segments: self.segments.len(),
            remaining_seconds: display_seconds(self.current_remaining_ms()),
            segment_name: segment.map(|s| s.name.clone()),
            segment_type: segment.map(|s| s.segment_type.clone()),
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// The loaded sequence.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn rewind(&mut self) {
        self.status = TimerStatus::Idle;
        self.index = 0;
        self.remaining_ms = self.segments.first().map(segment_ms).unwrap_or(0);
        self.anchor = None;
        self.near_complete_fired = false;
    }

    fn current_remaining_ms(&self) -> u64 {
        match self.anchor {
            Some(anchor) => {
                let elapsed = self.clock.now().saturating_duration_since(anchor);
                let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                self.remaining_ms.saturating_sub(elapsed_ms)
            }
            None => self.remaining_ms,
        }
    }

    /// Walks forward over every boundary the clock has passed.
    ///
    /// Each finished segment moves the anchor to the exact instant it ended,
    /// so a single late call covers several segments without losing time.
    fn catch_up(&mut self) {
        while let Some(anchor) = self.anchor {
            let remaining = self.current_remaining_ms();
            self.check_near_complete(remaining);
            if remaining > 0 {
                return;
            }

            let boundary = anchor + Duration::from_millis(self.remaining_ms);
            let next = self.index + 1;
            match self.segments.get(next).cloned() {
                Some(segment) => {
                    self.index = next;
                    self.remaining_ms = segment_ms(&segment);
                    self.anchor = Some(boundary);
                    self.near_complete_fired = false;
                    tracing::info!("Segment {} started: {}", next + 1, segment.name);
                    self.emit(TimerEvent::SegmentChanged {
                        segment,
                        index: next,
                    });
                }
                None => {
                    self.remaining_ms = 0;
                    self.anchor = None;
                    self.status = TimerStatus::Complete;
                    tracing::info!("Workout complete");
                    self.emit(TimerEvent::Completed);
                }
            }
        }
    }

    fn check_near_complete(&mut self, remaining_ms: u64) {
        if self.near_complete_fired || self.alert_time == 0 {
            return;
        }
        if display_seconds(remaining_ms) >= self.alert_time {
            return;
        }

        self.near_complete_fired = true;
        if let Some(segment) = self.segments.get(self.index) {
            let sound_cue = segment.sound_cue.clone();
            self.emit(TimerEvent::NearComplete { sound_cue });
        }
    }

    fn emit(&mut self, event: TimerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::clock::ManualClock;
    use crate::types::SoundCue;

    fn create_engine(
        segments: Vec<Segment>,
    ) -> (
        TimerEngine<ManualClock>,
        ManualClock,
        mpsc::UnboundedReceiver<TimerEvent>,
    ) {
        let clock = ManualClock::new();
        let mut engine = TimerEngine::with_clock(clock.clone());
        let rx = engine.subscribe();
        engine.load_segments(segments).unwrap();
        (engine, clock, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn segment_changes(events: &[TimerEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                TimerEvent::SegmentChanged { segment, .. } => Some(segment.name.clone()),
                _ => None,
            })
            .collect()
    }

    fn near_complete_count(events: &[TimerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, TimerEvent::NearComplete { .. }))
            .count()
    }

    fn ten_seconds() -> Vec<Segment> {
        vec![Segment::new("Work", "work", 10)]
    }

    // ------------------------------------------------------------------------
    // Load Tests
    // ------------------------------------------------------------------------

    mod load_tests {
        use super::*;

        #[test]
        fn test_new_engine_is_empty_idle() {
            let engine = TimerEngine::new();
            assert_eq!(engine.snapshot(), TimerSnapshot::empty());
            assert_eq!(engine.alert_time(), DEFAULT_ALERT_TIME);
        }

        #[test]
        fn test_load_resets_to_first_segment() {
            let (engine, _clock, _rx) = create_engine(vec![
                Segment::new("A", "work", 20),
                Segment::new("B", "rest", 10),
            ]);

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.status, TimerStatus::Idle);
            assert_eq!(snapshot.segment_index, 0);
            assert_eq!(snapshot.total_segments, 2);
            assert_eq!(snapshot.remaining_seconds, 20);
            assert_eq!(snapshot.segment_name.as_deref(), Some("A"));
            assert_eq!(snapshot.segment_type.unwrap().as_str(), "work");
        }

        #[test]
        fn test_load_empty_is_rejected_without_mutation() {
            let (mut engine, clock, _rx) = create_engine(ten_seconds());
            engine.start();
            clock.advance_secs(3);

            let result = engine.load_segments(Vec::new());

            assert_eq!(result, Err(LoadError::EmptySequence));
            assert_eq!(engine.status(), TimerStatus::Running);
            assert_eq!(engine.snapshot().remaining_seconds, 7);
        }

        #[test]
        fn test_load_zero_duration_is_rejected() {
            let (mut engine, _clock, _rx) = create_engine(ten_seconds());

            let result = engine.load_segments(vec![
                Segment::new("Ok", "work", 5),
                Segment::new("Broken", "work", 0),
            ]);

            assert_eq!(
                result,
                Err(LoadError::InvalidSegment {
                    index: 1,
                    reason: "duration must be positive"
                })
            );
            assert_eq!(engine.segments().len(), 1);
        }

        #[test]
        fn test_load_while_running_rearms_idle() {
            let (mut engine, clock, _rx) = create_engine(ten_seconds());
            engine.start();
            clock.advance_secs(4);

            engine
                .load_segments(vec![Segment::new("New", "warmup", 30)])
                .unwrap();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.status, TimerStatus::Idle);
            assert_eq!(snapshot.remaining_seconds, 30);
            assert_eq!(snapshot.segment_name.as_deref(), Some("New"));
        }
    }

    // ------------------------------------------------------------------------
    // Start / Pause / Reset Tests
    // ------------------------------------------------------------------------

    mod control_tests {
        use super::*;

        #[test]
        fn test_start_emits_first_segment_change() {
            let (mut engine, _clock, mut rx) = create_engine(ten_seconds());

            assert!(engine.start());

            assert_eq!(engine.status(), TimerStatus::Running);
            let events = drain(&mut rx);
            assert_eq!(
                events,
                vec![TimerEvent::SegmentChanged {
                    segment: Segment::new("Work", "work", 10),
                    index: 0
                }]
            );
        }

        #[test]
        fn test_start_without_segments_is_noop() {
            let mut engine = TimerEngine::with_clock(ManualClock::new());
            assert!(!engine.start());
            assert_eq!(engine.status(), TimerStatus::Idle);
        }

        #[test]
        fn test_start_while_running_is_noop() {
            let (mut engine, clock, mut rx) = create_engine(ten_seconds());
            engine.start();
            clock.advance_secs(2);
            drain(&mut rx);

            assert!(!engine.start());
            assert!(drain(&mut rx).is_empty());
            assert_eq!(engine.snapshot().remaining_seconds, 8);
        }

        #[test]
        fn test_pause_not_running_is_noop() {
            let (mut engine, _clock, mut rx) = create_engine(ten_seconds());
            assert!(!engine.pause());
            assert_eq!(engine.status(), TimerStatus::Idle);
            assert!(drain(&mut rx).is_empty());
        }

        #[test]
        fn test_pause_freezes_remaining_time() {
            let (mut engine, clock, mut rx) = create_engine(ten_seconds());
            engine.start();
            clock.advance_secs(3);

            assert!(engine.pause());
            assert_eq!(engine.snapshot().remaining_seconds, 7);

            clock.advance_secs(60);
            assert_eq!(engine.snapshot().remaining_seconds, 7);
            assert_eq!(engine.tick().remaining_seconds, 7);
            assert_eq!(engine.status(), TimerStatus::Paused);

            let events = drain(&mut rx);
            assert_eq!(
                events.last(),
                Some(&TimerEvent::Paused {
                    remaining_seconds: 7
                })
            );
        }

        #[test]
        fn test_resume_reanchors_from_frozen_value() {
            let (mut engine, clock, mut rx) = create_engine(ten_seconds());
            engine.start();
            clock.advance_secs(3);
            engine.pause();
            clock.advance_secs(100);
            drain(&mut rx);

            assert!(engine.start());
            assert_eq!(
                drain(&mut rx),
                vec![TimerEvent::Resumed {
                    remaining_seconds: 7
                }]
            );

            clock.advance_secs(2);
            assert_eq!(engine.tick().remaining_seconds, 5);
        }

        #[test]
        fn test_sub_second_pauses_do_not_lose_time() {
            let (mut engine, clock, _rx) = create_engine(ten_seconds());

            // Ten start/pause cycles of 400ms each: 4s of running time.
            for _ in 0..10 {
                engine.start();
                clock.advance_millis(400);
                engine.pause();
                clock.advance_secs(5);
            }

            assert_eq!(engine.snapshot().remaining_seconds, 6);
        }

        #[test]
        fn test_reset_is_idempotent_in_every_state() {
            let (mut engine, clock, _rx) = create_engine(vec![
                Segment::new("A", "work", 4),
                Segment::new("B", "rest", 2),
            ]);
            let expected = |engine: &TimerEngine<ManualClock>| {
                let s = engine.snapshot();
                assert_eq!(s.status, TimerStatus::Idle);
                assert_eq!(s.segment_index, 0);
                assert_eq!(s.remaining_seconds, 4);
            };

            engine.reset();
            engine.reset();
            expected(&engine);

            engine.start();
            clock.advance_secs(5);
            engine.tick();
            engine.reset();
            engine.reset();
            expected(&engine);

            engine.start();
            clock.advance_secs(1);
            engine.pause();
            engine.reset();
            expected(&engine);

            engine.start();
            clock.advance_secs(30);
            engine.tick();
            assert_eq!(engine.status(), TimerStatus::Complete);
            engine.reset();
            engine.reset();
            expected(&engine);
        }

        #[test]
        fn test_reset_stops_ticking() {
            let (mut engine, clock, mut rx) = create_engine(ten_seconds());
            engine.start();
            engine.reset();
            drain(&mut rx);

            clock.advance_secs(4);
            engine.tick();

            assert!(drain(&mut rx).is_empty());
            assert_eq!(engine.snapshot().remaining_seconds, 10);
        }
    }

    // ------------------------------------------------------------------------
    // Countdown Accuracy Tests
    // ------------------------------------------------------------------------

    mod countdown_tests {
        use super::*;

        #[test]
        fn test_delayed_first_tick_catches_up() {
            let (mut engine, clock, _rx) = create_engine(ten_seconds());
            engine.start();

            clock.advance_secs(4);
            let snapshot = engine.tick();

            assert_eq!(snapshot.remaining_seconds, 6);
        }

        #[test]
        fn test_remaining_is_ceiling_of_millis() {
            let (mut engine, clock, _rx) = create_engine(ten_seconds());
            engine.start();

            clock.advance_millis(1);
            assert_eq!(engine.tick().remaining_seconds, 10);
            clock.advance_millis(999);
            assert_eq!(engine.tick().remaining_seconds, 9);
            clock.advance_millis(500);
            assert_eq!(engine.tick().remaining_seconds, 9);
        }

        #[test]
        fn test_irregular_ticks_match_wall_clock() {
            let (mut engine, clock, _rx) = create_engine(vec![Segment::new("Long", "work", 60)]);
            engine.start();

            let mut elapsed = 0;
            for step in [1, 7, 2, 13, 1, 5] {
                clock.advance_secs(step);
                elapsed += step;
                assert_eq!(engine.tick().remaining_seconds, 60 - elapsed as u32);
            }
        }

        #[test]
        fn test_tick_event_follows_segment_change() {
            let (mut engine, clock, mut rx) = create_engine(vec![
                Segment::new("A", "work", 2),
                Segment::new("B", "rest", 2),
            ]);
            engine.set_alert_time(0);
            engine.start();
            drain(&mut rx);

            clock.advance_secs(3);
            engine.tick();

            let events = drain(&mut rx);
            assert_eq!(events.len(), 2);
            assert!(matches!(
                &events[0],
                TimerEvent::SegmentChanged { index: 1, .. }
            ));
            match &events[1] {
                TimerEvent::Tick(snapshot) => {
                    assert_eq!(snapshot.segment_index, 1);
                    assert_eq!(snapshot.remaining_seconds, 1);
                }
                other => panic!("Expected tick, got {:?}", other),
            }
        }

        #[test]
        fn test_segment_and_repetition_transitions() {
            let a = Segment::new("A", "work", 2);
            let b = Segment::new("B", "rest", 2);
            let flattened = vec![a.clone(), b.clone(), a, b];
            let (mut engine, clock, mut rx) = create_engine(flattened);
            engine.start();

            for _ in 0..9 {
                clock.advance_secs(1);
                engine.tick();
            }

            let events = drain(&mut rx);
            assert_eq!(segment_changes(&events), vec!["A", "B", "A", "B"]);
            let completed: Vec<_> = events
                .iter()
                .filter(|e| matches!(e, TimerEvent::Completed))
                .collect();
            assert_eq!(completed.len(), 1);

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.status, TimerStatus::Complete);
            assert_eq!(snapshot.segment_index, 3);
            assert_eq!(snapshot.remaining_seconds, 0);
        }

        #[test]
        fn test_single_late_tick_covers_whole_run() {
            let a = Segment::new("A", "work", 2);
            let b = Segment::new("B", "rest", 2);
            let (mut engine, clock, mut rx) = create_engine(vec![a.clone(), b.clone(), a, b]);
            engine.start();

            clock.advance_secs(8);
            engine.tick();

            let events = drain(&mut rx);
            assert_eq!(segment_changes(&events), vec!["A", "B", "A", "B"]);
            assert_eq!(engine.status(), TimerStatus::Complete);

            let completed_at = events
                .iter()
                .position(|e| matches!(e, TimerEvent::Completed))
                .unwrap();
            let last_change = events
                .iter()
                .rposition(|e| matches!(e, TimerEvent::SegmentChanged { .. }))
                .unwrap();
            assert!(last_change < completed_at);
            assert!(matches!(events.last(), Some(TimerEvent::Tick(_))));
        }

        #[test]
        fn test_late_tick_lands_mid_segment_without_drift() {
            let (mut engine, clock, _rx) = create_engine(vec![
                Segment::new("A", "work", 3),
                Segment::new("B", "rest", 3),
                Segment::new("C", "work", 3),
            ]);
            engine.start();

            clock.advance_millis(7_500);
            let snapshot = engine.tick();

            assert_eq!(snapshot.segment_index, 2);
            assert_eq!(snapshot.remaining_seconds, 2);
        }

        #[test]
        fn test_no_ticks_after_completion() {
            let (mut engine, clock, mut rx) = create_engine(vec![Segment::new("A", "work", 1)]);
            engine.start();
            clock.advance_secs(2);
            engine.tick();
            drain(&mut rx);

            clock.advance_secs(5);
            engine.tick();
            assert!(!engine.start());

            assert!(drain(&mut rx).is_empty());
            assert_eq!(engine.status(), TimerStatus::Complete);
        }

        #[test]
        fn test_works_without_subscribers() {
            let clock = ManualClock::new();
            let mut engine = TimerEngine::with_clock(clock.clone());
            engine.load_segments(ten_seconds()).unwrap();
            engine.start();
            clock.advance_secs(11);

            assert_eq!(engine.tick().status, TimerStatus::Complete);
        }

        #[test]
        fn test_dropped_subscriber_is_pruned() {
            let (mut engine, clock, rx) = create_engine(ten_seconds());
            let mut other = engine.subscribe();
            drop(rx);

            engine.start();
            clock.advance_secs(1);
            engine.tick();

            assert_eq!(engine.subscribers.len(), 1);
            assert_eq!(drain(&mut other).len(), 2);
        }
    }

    // ------------------------------------------------------------------------
    // Near-complete Cue Tests
    // ------------------------------------------------------------------------

    mod near_complete_tests {
        use super::*;

        #[test]
        fn test_fires_once_when_crossing_threshold() {
            let (mut engine, clock, mut rx) = create_engine(vec![Segment::new("A", "work", 5)]);
            engine.set_alert_time(3);
            engine.start();

            let mut fired_at = Vec::new();
            for _ in 0..4 {
                clock.advance_secs(1);
                let remaining = engine.tick().remaining_seconds;
                if near_complete_count(&drain(&mut rx)) > 0 {
                    fired_at.push(remaining);
                }
            }

            assert_eq!(fired_at, vec![2]);
        }

        #[test]
        fn test_fires_once_when_ticks_are_skipped() {
            let (mut engine, clock, mut rx) = create_engine(vec![Segment::new("A", "work", 5)]);
            engine.set_alert_time(3);
            engine.start();

            clock.advance_secs(4);
            assert_eq!(engine.tick().remaining_seconds, 1);
            clock.advance_millis(300);
            engine.tick();

            let events = drain(&mut rx);
            assert_eq!(near_complete_count(&events), 1);
            assert!(events.contains(&TimerEvent::NearComplete {
                sound_cue: SoundCue::alert()
            }));
        }

        #[test]
        fn test_short_segment_fires_on_first_tick() {
            let (mut engine, clock, mut rx) = create_engine(vec![
                Segment::new("Blip", "work", 2).with_sound_cue(SoundCue::new("beep")),
                Segment::new("Long", "rest", 30),
            ]);
            engine.set_alert_time(3);
            engine.start();

            clock.advance_millis(100);
            engine.tick();
            clock.advance_millis(100);
            engine.tick();

            let events = drain(&mut rx);
            assert_eq!(
                events
                    .iter()
                    .filter(|e| **e
                        == TimerEvent::NearComplete {
                            sound_cue: SoundCue::new("beep")
                        })
                    .count(),
                1
            );
        }

        #[test]
        fn test_rearms_for_each_segment() {
            let a = Segment::new("A", "work", 5);
            let (mut engine, clock, mut rx) = create_engine(vec![a.clone(), a.clone(), a]);
            engine.set_alert_time(3);
            engine.start();

            for _ in 0..16 {
                clock.advance_secs(1);
                engine.tick();
            }

            assert_eq!(near_complete_count(&drain(&mut rx)), 3);
            assert_eq!(engine.status(), TimerStatus::Complete);
        }

        #[test]
        fn test_precedes_segment_change_on_late_tick() {
            let (mut engine, clock, mut rx) = create_engine(vec![
                Segment::new("A", "work", 5),
                Segment::new("B", "rest", 20),
            ]);
            engine.set_alert_time(3);
            engine.start();
            drain(&mut rx);

            clock.advance_secs(6);
            engine.tick();

            let kinds: Vec<&str> = drain(&mut rx).iter().map(TimerEvent::kind).collect();
            assert_eq!(kinds, vec!["near_complete", "segment_changed", "tick"]);
        }

        #[test]
        fn test_does_not_refire_after_pause_resume() {
            let (mut engine, clock, mut rx) = create_engine(vec![Segment::new("A", "work", 10)]);
            engine.set_alert_time(3);
            engine.start();

            clock.advance_secs(8);
            engine.tick();
            engine.pause();
            engine.start();
            clock.advance_secs(1);
            engine.tick();

            assert_eq!(near_complete_count(&drain(&mut rx)), 1);
        }

        #[test]
        fn test_zero_alert_time_disables_cue() {
            let (mut engine, clock, mut rx) = create_engine(vec![Segment::new("A", "work", 5)]);
            engine.set_alert_time(0);
            engine.start();

            clock.advance_secs(6);
            engine.tick();

            assert_eq!(near_complete_count(&drain(&mut rx)), 0);
        }
    }
}

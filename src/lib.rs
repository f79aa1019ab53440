//! Interval Timer Library
//!
//! This library provides the core functionality for the interval timer CLI.
//! It includes:
//! - Plan model: validation, flattening, built-in presets and the plan store
//! - Key-value storage backends (in-memory and JSON files)
//! - Wall-clock anchored timer engine and its async runner
//! - Audible cues for timer events
//! - Configuration loading
//! - CLI command parsing and display utilities

pub mod cli;
pub mod config;
pub mod cue;
pub mod plan;
pub mod storage;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{Intensity, Segment, SegmentType, SoundCue, TimerSnapshot, TimerStatus};

pub use plan::{Plan, PlanDraft, PlanMode, PlanStore, PlanStoreError, SegmentDraft, ValidationError};

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

pub use timer::{
    spawn_runner, Clock, LoadError, ManualClock, RunnerHandle, SystemClock, TimerEngine,
    TimerEvent,
};

pub use cue::{CueError, CuePlayer, MockCuePlayer, TerminalBell};

pub use config::{AppConfig, ConfigError};

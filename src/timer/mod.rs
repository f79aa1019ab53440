//! Timer module for segmented workouts.
//!
//! This module contains the countdown functionality:
//! - `clock`: Monotonic time sources
//! - `engine`: Wall-clock anchored state machine
//! - `event`: Events emitted to subscribers
//! - `runner`: Tokio task driving the engine on an interval

pub mod clock;
pub mod engine;
pub mod error;
pub mod event;
pub mod runner;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{TimerEngine, DEFAULT_ALERT_TIME};
pub use error::{LoadError, RunnerError};
pub use event::TimerEvent;
pub use runner::{spawn_runner, RunnerHandle, TimerRunner, DEFAULT_TICK_INTERVAL};

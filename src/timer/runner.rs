//! Async driver for the timer engine.
//!
//! The runner owns a [`TimerEngine`] inside a tokio task and drives it with
//! a `tokio::time::interval`. Callers talk to it through a cloneable
//! [`RunnerHandle`]; every request carries a oneshot for the reply.
//!
//! The interval only exists while the engine is running. Pausing, resetting
//! or completing drops it, so no callback is left scheduled. Missed ticks
//! are skipped since the engine recomputes from the clock anyway.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Interval, MissedTickBehavior};

use super::clock::Clock;
use super::engine::TimerEngine;
use super::error::{LoadError, RunnerError};
use super::event::TimerEvent;
use crate::types::{Segment, TimerSnapshot};

/// Default period between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

enum Command {
    Load {
        segments: Vec<Segment>,
        alert_time: Option<u32>,
        reply: oneshot::Sender<Result<(), LoadError>>,
    },
    Start(oneshot::Sender<bool>),
    Pause(oneshot::Sender<bool>),
    Reset(oneshot::Sender<()>),
    Snapshot(oneshot::Sender<TimerSnapshot>),
    Subscribe(oneshot::Sender<mpsc::UnboundedReceiver<TimerEvent>>),
    Shutdown,
}

// ============================================================================
// RunnerHandle
// ============================================================================

/// Cloneable handle to a running timer task.
#[derive(Clone)]
pub struct RunnerHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl RunnerHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RunnerError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(build(reply)).map_err(|_| RunnerError::Closed)?;
        rx.await.map_err(|_| RunnerError::Closed)
    }

    /// Loads a flattened sequence, optionally changing the alert threshold.
    pub async fn load(
        &self,
        segments: Vec<Segment>,
        alert_time: Option<u32>,
    ) -> Result<(), RunnerError> {
        self.request(|reply| Command::Load {
            segments,
            alert_time,
            reply,
        })
        .await??;
        Ok(())
    }

    /// Starts or resumes. Returns whether the engine began running.
    pub async fn start(&self) -> Result<bool, RunnerError> {
        self.request(Command::Start).await
    }

    /// Pauses. Returns whether the engine was running.
    pub async fn pause(&self) -> Result<bool, RunnerError> {
        self.request(Command::Pause).await
    }

    pub async fn reset(&self) -> Result<(), RunnerError> {
        self.request(Command::Reset).await
    }

    pub async fn snapshot(&self) -> Result<TimerSnapshot, RunnerError> {
        self.request(Command::Snapshot).await
    }

    /// Registers a new event subscriber on the engine.
    pub async fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<TimerEvent>, RunnerError> {
        self.request(Command::Subscribe).await
    }

    /// Asks the task to stop. The engine is dropped with it.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

// ============================================================================
// TimerRunner
// ============================================================================

/// Tokio task body owning the engine.
pub struct TimerRunner<C: Clock> {
    engine: TimerEngine<C>,
    tick_interval: Duration,
    commands: mpsc::UnboundedReceiver<Command>,
}

/// Spawns a runner task for `engine`.
pub fn spawn_runner<C>(engine: TimerEngine<C>, tick_interval: Duration) -> (RunnerHandle, JoinHandle<()>)
where
    C: Clock + 'static,
{
    let (tx, commands) = mpsc::unbounded_channel();
    let runner = TimerRunner {
        engine,
        tick_interval,
        commands,
    };
    let task = tokio::spawn(runner.run());
    (RunnerHandle { tx }, task)
}

fn new_ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

impl<C: Clock> TimerRunner<C> {
    /// Runs until shut down or every handle is dropped.
    pub async fn run(mut self) {
        let mut ticker: Option<Interval> = None;
        tracing::debug!("Timer runner started ({:?} ticks)", self.tick_interval);

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    if !self.handle(command) {
                        break;
                    }
                }
                _ = next_tick(&mut ticker) => {
                    self.engine.tick();
                }
            }

            match (self.engine.is_running(), ticker.is_some()) {
                (true, false) => ticker = Some(new_ticker(self.tick_interval)),
                (false, true) => ticker = None,
                _ => {}
            }
        }

        tracing::debug!("Timer runner stopped");
    }

    /// Applies one command. Returns `false` on shutdown.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Load {
                segments,
                alert_time,
                reply,
            } => {
                let result = self.engine.load_segments(segments);
                if result.is_ok() {
                    if let Some(alert_time) = alert_time {
                        self.engine.set_alert_time(alert_time);
                    }
                }
                let _ = reply.send(result);
            }
            Command::Start(reply) => {
                let _ = reply.send(self.engine.start());
            }
            Command::Pause(reply) => {
                let _ = reply.send(self.engine.pause());
            }
            Command::Reset(reply) => {
                self.engine.reset();
                let _ = reply.send(());
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.engine.snapshot());
            }
            Command::Subscribe(reply) => {
                let _ = reply.send(self.engine.subscribe());
            }
            Command::Shutdown => return false,
        }
        true
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerStatus;
    use tokio::time::{sleep, timeout};

    const FAST: Duration = Duration::from_millis(20);

    fn spawn_default() -> (RunnerHandle, JoinHandle<()>) {
        spawn_runner(TimerEngine::new(), FAST)
    }

    async fn collect_until_completed(
        rx: &mut mpsc::UnboundedReceiver<TimerEvent>,
    ) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = matches!(event, TimerEvent::Completed);
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn test_load_and_snapshot() {
        let (handle, task) = spawn_default();

        handle
            .load(vec![Segment::new("Work", "work", 30)], Some(5))
            .await
            .unwrap();
        let snapshot = handle.snapshot().await.unwrap();

        assert_eq!(snapshot.status, TimerStatus::Idle);
        assert_eq!(snapshot.remaining_seconds, 30);

        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_load_empty_is_rejected() {
        let (handle, task) = spawn_default();

        let result = handle.load(Vec::new(), None).await;

        assert!(matches!(
            result,
            Err(RunnerError::Load(LoadError::EmptySequence))
        ));
        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_runs_sequence_to_completion() {
        let (handle, task) = spawn_default();
        let mut rx = handle.subscribe().await.unwrap();
        let a = Segment::new("A", "work", 1);
        let b = Segment::new("B", "rest", 1);

        handle.load(vec![a, b], Some(0)).await.unwrap();
        assert!(handle.start().await.unwrap());

        let events = timeout(Duration::from_secs(5), collect_until_completed(&mut rx))
            .await
            .expect("run should complete");

        let changes: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                TimerEvent::SegmentChanged { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![0, 1]);
        assert!(events.iter().any(|e| matches!(e, TimerEvent::Tick(_))));

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.status, TimerStatus::Complete);

        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_no_ticks_while_paused() {
        let (handle, task) = spawn_default();
        handle
            .load(vec![Segment::new("Work", "work", 30)], None)
            .await
            .unwrap();
        handle.start().await.unwrap();
        assert!(handle.pause().await.unwrap());

        let mut rx = handle.subscribe().await.unwrap();
        sleep(Duration::from_millis(200)).await;

        assert!(rx.try_recv().is_err(), "Paused runner must not tick");
        assert_eq!(handle.snapshot().await.unwrap().status, TimerStatus::Paused);

        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_stops_ticking() {
        let (handle, task) = spawn_default();
        handle
            .load(vec![Segment::new("Work", "work", 30)], None)
            .await
            .unwrap();
        handle.start().await.unwrap();
        sleep(Duration::from_millis(60)).await;

        handle.reset().await.unwrap();
        let mut rx = handle.subscribe().await.unwrap();
        sleep(Duration::from_millis(200)).await;

        assert!(rx.try_recv().is_err());
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.status, TimerStatus::Idle);
        assert_eq!(snapshot.remaining_seconds, 30);

        handle.shutdown();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_stops_when_handles_dropped() {
        let (handle, task) = spawn_default();
        drop(handle);

        timeout(Duration::from_secs(1), task)
            .await
            .expect("runner should stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_closed_runner_reports_error() {
        let (handle, task) = spawn_default();
        handle.shutdown();
        task.await.unwrap();

        assert!(matches!(handle.start().await, Err(RunnerError::Closed)));
    }
}

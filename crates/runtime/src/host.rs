//! Session host.
//!
//! Runs a [`GameDriver`] inside a tokio task. Input events arrive on an
//! unbounded channel, the latest snapshot is published on a `watch` channel,
//! and notifications are forwarded on their own channel. A frame interval is
//! polled only while the driver wants frames, so an idle or finished game
//! costs nothing.

use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::SessionConfig;
use crate::core::GameSnapshot;
use crate::driver::{ControlEvent, GameDriver};
use crate::types::Notification;

fn elapsed_ms(origin: Instant) -> u64 {
    origin.elapsed().as_millis() as u64
}

/// The session loop. Returns once every event sender is gone.
pub async fn run_session(
    config: SessionConfig,
    mut events: mpsc::UnboundedReceiver<ControlEvent>,
    snapshots: watch::Sender<GameSnapshot>,
    notifications: mpsc::UnboundedSender<Notification>,
) {
    let mut driver = GameDriver::new(&config);
    let origin = Instant::now();
    let mut ticker = time::interval(Duration::from_millis(config.frame_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut framing = false;

    info!("session task started");
    loop {
        // Restart the cadence when frames resume after an idle stretch.
        if driver.wants_frames() && !framing {
            ticker.reset_immediately();
        }
        framing = driver.wants_frames();

        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                driver.dispatch(event, elapsed_ms(origin));
            }
            _ = ticker.tick(), if framing => {
                driver.frame(elapsed_ms(origin));
            }
        }

        snapshots.send_modify(|snapshot| driver.snapshot_into(snapshot));
        for notification in driver.take_notifications() {
            info!("{}", notification);
            let _ = notifications.send(notification);
        }
    }

    driver.shutdown();
    snapshots.send_modify(|snapshot| driver.snapshot_into(snapshot));
    info!("session task stopped");
}

/// Async handle to a session task running on the current runtime.
pub struct SessionHandle {
    events: mpsc::UnboundedSender<ControlEvent>,
    snapshots: watch::Receiver<GameSnapshot>,
    notifications: mpsc::UnboundedReceiver<Notification>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Spawn the session loop. Must be called within a tokio runtime.
    pub fn spawn(config: SessionConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel::<ControlEvent>();
        let (snapshot_tx, snapshot_rx) = watch::channel(GameSnapshot::default());
        let (notes_tx, notes_rx) = mpsc::unbounded_channel::<Notification>();

        let task = tokio::spawn(run_session(config, events_rx, snapshot_tx, notes_tx));

        Self {
            events: events_tx,
            snapshots: snapshot_rx,
            notifications: notes_rx,
            task,
        }
    }

    pub fn send(&self, event: ControlEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| anyhow::anyhow!("session task has stopped"))
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    pub fn try_notification(&mut self) -> Option<Notification> {
        self.notifications.try_recv().ok()
    }

    pub async fn next_notification(&mut self) -> Option<Notification> {
        self.notifications.recv().await
    }

    /// Close the event channel and wait for the loop to finish.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.events);
        self.task.await.context("session task panicked")?;
        debug!("session handle shut down");
        Ok(())
    }
}

/// Session running on its own tokio runtime, for synchronous callers such as
/// the terminal loop.
pub struct SessionHost {
    runtime: Runtime,
    handle: SessionHandle,
}

impl SessionHost {
    pub fn start(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Runtime::new().context("failed to create tokio runtime")?;
        let handle = {
            let _guard = runtime.enter();
            SessionHandle::spawn(config)
        };
        Ok(Self { runtime, handle })
    }

    pub fn send(&self, event: ControlEvent) -> Result<()> {
        self.handle.send(event)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.handle.snapshot()
    }

    pub fn try_notification(&mut self) -> Option<Notification> {
        self.handle.try_notification()
    }

    pub fn shutdown(self) -> Result<()> {
        let Self { runtime, handle } = self;
        runtime.block_on(handle.shutdown())
    }
}

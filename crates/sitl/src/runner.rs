//! Single-task actor runner.
//!
//! The simulation (autopilot, boat, link) is moved into one tokio task that
//! consumes a serialized stream of [`Event`]s. Nothing else touches the
//! autopilot while the task runs; status snapshots are published on a
//! `watch` channel after every tick and command.

use log::{debug, warn};
use sailnav_core::traits::RecoveryStore;
use sailnav_core::{Command, StatusSnapshot};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::SimulatorError;
use crate::sim::Simulation;

/// Event consumed by the autopilot task.
#[derive(Debug, Clone)]
pub enum Event {
    /// Advance the simulation by one step.
    Tick,
    /// Deliver a ground command over the simulated link.
    Command(Command),
    /// Stop the task and hand the simulation back.
    Shutdown,
}

/// Handle to a running autopilot task.
pub struct AutopilotHandle<R: RecoveryStore> {
    events: mpsc::Sender<Event>,
    status: watch::Receiver<StatusSnapshot>,
    task: JoinHandle<Simulation<R>>,
}

impl<R: RecoveryStore> AutopilotHandle<R> {
    /// Queue one simulation step.
    pub async fn tick(&self) -> Result<(), SimulatorError> {
        self.send(Event::Tick).await
    }

    /// Queue a ground command.
    pub async fn command(&self, command: Command) -> Result<(), SimulatorError> {
        self.send(Event::Command(command)).await
    }

    /// Queue a raw event.
    pub async fn send(&self, event: Event) -> Result<(), SimulatorError> {
        self.events
            .send(event)
            .await
            .map_err(|_| SimulatorError::ChannelClosed)
    }

    /// Latest published snapshot.
    pub fn status(&self) -> StatusSnapshot {
        *self.status.borrow()
    }

    /// Subscribe to status updates.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status.clone()
    }

    /// Stop the task after the queued events and return the simulation.
    pub async fn shutdown(self) -> Result<Simulation<R>, SimulatorError> {
        // The task also stops when every sender is gone
        let _ = self.events.send(Event::Shutdown).await;
        drop(self.events);
        Ok(self.task.await?)
    }
}

/// Move `sim` into a new task fed by a channel of `capacity` events.
pub fn spawn_autopilot<R>(sim: Simulation<R>, capacity: usize) -> AutopilotHandle<R>
where
    R: RecoveryStore + Send + 'static,
{
    let (events_tx, mut events_rx) = mpsc::channel(capacity.max(1));
    let (status_tx, status_rx) = watch::channel(sim.status());

    let task = tokio::spawn(async move {
        let mut sim = sim;
        while let Some(event) = events_rx.recv().await {
            match event {
                Event::Tick => sim.step(),
                Event::Command(command) => {
                    debug!("Command at {} ms: {:?}", sim.now_ms(), command);
                    if let Err(e) = sim.send(command) {
                        warn!("Command not applied: {e}");
                    }
                }
                Event::Shutdown => break,
            }
            // Receivers may all be gone; the task keeps running regardless
            let _ = status_tx.send(sim.status());
        }
        sim
    });

    AutopilotHandle {
        events: events_tx,
        status: status_rx,
        task,
    }
}

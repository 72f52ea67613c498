use std::sync::Arc;

use google_home::DeviceState;
use tokio::sync::mpsc;
use tracing::{debug, instrument, trace, warn};

use crate::event::{Event, EventChannel, OnMotion, OnStateChange};

type StateQueue = mpsc::UnboundedSender<(String, DeviceState)>;

/// Hands every event to the interested listeners.
///
/// Each state listener gets its own task that handles changes one at a time, in the order they
/// were made. Motion listeners run as a separate task per event. Neither holds up the event loop
/// or the write that caused the event.
#[derive(Clone, Default)]
pub struct Dispatcher {
    state_listeners: Vec<Arc<dyn OnStateChange>>,
    motion_listeners: Vec<Arc<dyn OnMotion>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state_listener(&mut self, listener: Arc<dyn OnStateChange>) {
        self.state_listeners.push(listener);
    }

    pub fn add_motion_listener(&mut self, listener: Arc<dyn OnMotion>) {
        self.motion_listeners.push(listener);
    }

    /// Start the event loop, it runs until every sender of the returned channel is dropped.
    pub fn start(self) -> EventChannel {
        let (event_channel, mut event_rx) = EventChannel::new();

        let running = Running {
            state_queues: self.state_listeners.into_iter().map(state_worker).collect(),
            motion_listeners: self.motion_listeners,
        };

        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                running.handle_event(event);
            }

            debug!("Event channel closed");
        });

        event_channel
    }
}

fn state_worker(listener: Arc<dyn OnStateChange>) -> StateQueue {
    let (tx, mut rx) = mpsc::unbounded_channel::<(String, DeviceState)>();

    tokio::spawn(async move {
        while let Some((device_id, state)) = rx.recv().await {
            listener.on_state_change(&device_id, state).await;
            trace!(device_id, "Done");
        }
    });

    tx
}

struct Running {
    state_queues: Vec<StateQueue>,
    motion_listeners: Vec<Arc<dyn OnMotion>>,
}

impl Running {
    #[instrument(skip(self))]
    fn handle_event(&self, event: Event) {
        match event {
            Event::StateChanged { device_id, state } => {
                for queue in &self.state_queues {
                    if queue.send((device_id.clone(), state)).is_err() {
                        warn!(device_id, "State listener is gone");
                    }
                }
            }
            Event::MotionLogged { id, log } => {
                for listener in &self.motion_listeners {
                    let listener = listener.clone();
                    let id = id.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        listener.on_motion(&id, &log).await;
                        trace!(id, "Done");
                    });
                }
            }
        }
    }
}

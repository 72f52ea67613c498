use async_trait::async_trait;
use google_home::DeviceState;
use tokio::sync::mpsc;

use crate::motion::MotionLog;

#[derive(Debug, Clone)]
pub enum Event {
    StateChanged { device_id: String, state: DeviceState },
    MotionLogged { id: String, log: MotionLog },
}

pub type Sender = mpsc::Sender<Event>;
pub type Receiver = mpsc::Receiver<Event>;

#[derive(Clone, Debug)]
pub struct EventChannel(Sender);

impl EventChannel {
    pub fn new() -> (Self, Receiver) {
        let (tx, rx) = mpsc::channel(100);

        (Self(tx), rx)
    }

    pub fn get_tx(&self) -> Sender {
        self.0.clone()
    }
}

#[async_trait]
pub trait OnStateChange: Sync + Send {
    async fn on_state_change(&self, device_id: &str, state: DeviceState);
}

#[async_trait]
pub trait OnMotion: Sync + Send {
    async fn on_motion(&self, id: &str, log: &MotionLog);
}

use std::sync::Arc;

use google_home::DeviceState;
use serde_json::Value;
use tracing::{debug, error, trace, warn};

use crate::device_state::{DEVICE_ID_PARAM, DEVICE_PATTERN, DEVICES, device_path};
use crate::event::{Event, EventChannel, Sender};
use crate::motion::{MOTION_LOG_PATTERN, MotionLog};
use crate::store::{Change, Params, Received, StateStore, Subscription};

/// Forward store changes to the event channel.
///
/// Subscriptions are made before this returns, so every write that happens afterwards is seen.
/// If the device state subscription falls behind, every stored device state is read again so the
/// latest state of each device is still forwarded.
pub fn start(store: Arc<dyn StateStore>, event_channel: &EventChannel) {
    let states = store.on_change(DEVICE_PATTERN);
    let motion_logs = store.on_change(MOTION_LOG_PATTERN);

    tokio::spawn(watch_states(store, states, event_channel.get_tx()));
    tokio::spawn(watch_motion_logs(motion_logs, event_channel.get_tx()));
}

async fn watch_states(store: Arc<dyn StateStore>, mut subscription: Subscription, tx: Sender) {
    debug!("Watching device states");
    while let Some(received) = subscription.recv().await {
        let events: Vec<Event> = match received {
            Received::Change(change, params) => state_changed(change, params).into_iter().collect(),
            Received::Lagged(skipped) => {
                warn!(skipped, "Fell behind on device states, reading them again");
                current_states(store.as_ref()).await
            }
        };

        for event in events {
            if tx.send(event).await.is_err() {
                warn!("There are no receivers on the event channel");
                return;
            }
        }
    }
    debug!("Stopped watching device states");
}

async fn watch_motion_logs(mut subscription: Subscription, tx: Sender) {
    debug!("Watching motion logs");
    while let Some((change, params)) = subscription.next().await {
        let Some(event) = motion_logged(change, params) else {
            continue;
        };

        if tx.send(event).await.is_err() {
            warn!("There are no receivers on the event channel");
            return;
        }
    }
    debug!("Stopped watching motion logs");
}

async fn current_states(store: &dyn StateStore) -> Vec<Event> {
    let ids = match store.children(DEVICES).await {
        Ok(ids) => ids,
        Err(err) => {
            error!("Failed to list device states: {err}");
            return Vec::new();
        }
    };

    let mut events = Vec::new();
    for device_id in ids {
        match store.get(&device_path(&device_id)).await {
            Ok(Some(value)) => events.extend(parse_state(device_id, value)),
            Ok(None) => {}
            Err(err) => error!(device_id, "Failed to read device state: {err}"),
        }
    }

    events
}

fn state_changed(change: Change, params: Params) -> Option<Event> {
    let device_id = params.get(DEVICE_ID_PARAM)?.clone();

    parse_state(device_id, change.after?)
}

fn parse_state(device_id: String, value: Value) -> Option<Event> {
    match serde_json::from_value::<DeviceState>(value) {
        Ok(state) => Some(Event::StateChanged { device_id, state }),
        Err(err) => {
            warn!(device_id, "Ignoring malformed device state: {err}");
            None
        }
    }
}

fn motion_logged(change: Change, params: Params) -> Option<Event> {
    // Only newly created logs trigger a notification
    if change.before.is_some() {
        trace!(path = change.path, "Ignoring update of existing motion log");
        return None;
    }

    let id = params.get("id")?.clone();
    let value = change.after?;

    match serde_json::from_value::<MotionLog>(value) {
        Ok(log) => Some(Event::MotionLogged { id, log }),
        Err(err) => {
            warn!(id, "Ignoring malformed motion log: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::timeout;

    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn forwards_changes() {
        let store = MemoryStore::new();
        let (event_channel, mut rx) = EventChannel::new();
        start(Arc::new(store.clone()), &event_channel);

        store.set("devices/1", json!({ "on": true })).await.unwrap();
        store
            .set(
                "motion-logs/a",
                json!({ "imageRef": "/images/a.jpg", "timestamp": 1 }),
            )
            .await
            .unwrap();

        let mut state_changes = Vec::new();
        let mut motion_logs = Vec::new();
        for _ in 0..2 {
            match timeout(Duration::from_secs(1), rx.recv()).await.unwrap() {
                Some(Event::StateChanged { device_id, state }) => {
                    state_changes.push((device_id, state))
                }
                Some(Event::MotionLogged { id, log }) => motion_logs.push((id, log)),
                None => panic!("Event channel closed"),
            }
        }

        assert_eq!(state_changes, vec![("1".to_owned(), DeviceState::new(true))]);
        assert_eq!(
            motion_logs,
            vec![(
                "a".to_owned(),
                MotionLog {
                    image_ref: "/images/a.jpg".into(),
                    timestamp: 1
                }
            )]
        );
    }

    #[test]
    fn ignores_malformed_state() {
        let change = Change {
            path: "devices/1".into(),
            before: None,
            after: Some(json!({ "on": "yes" })),
        };
        let params = Params::from([(DEVICE_ID_PARAM.to_owned(), "1".to_owned())]);

        assert!(state_changed(change, params).is_none());
    }

    #[test]
    fn ignores_motion_log_updates() {
        let log = json!({ "imageRef": "/images/a.jpg", "timestamp": 1 });
        let params = Params::from([("id".to_owned(), "a".to_owned())]);

        let created = Change {
            path: "motion-logs/a".into(),
            before: None,
            after: Some(log.clone()),
        };
        assert!(motion_logged(created, params.clone()).is_some());

        let updated = Change {
            path: "motion-logs/a".into(),
            before: Some(log.clone()),
            after: Some(log),
        };
        assert!(motion_logged(updated, params).is_none());
    }

    #[tokio::test]
    async fn catches_up_after_lagging() {
        let store = MemoryStore::with_capacity(1);
        let (event_channel, mut rx) = EventChannel::new();
        start(Arc::new(store.clone()), &event_channel);

        // Written before the watcher gets to run, so only the last change is still buffered
        store.set("devices/1", json!({ "on": true })).await.unwrap();
        store.set("devices/2", json!({ "on": true })).await.unwrap();
        store.set("devices/1", json!({ "on": false })).await.unwrap();

        let mut states = Vec::new();
        while let Ok(Some(event)) = timeout(Duration::from_millis(200), rx.recv()).await {
            if let Event::StateChanged { device_id, state } = event {
                states.push((device_id, state.on));
            }
        }

        assert!(states.contains(&("2".to_owned(), true)));
        let last_of_1 = states.iter().rev().find(|(id, _)| id == "1");
        assert_eq!(last_of_1, Some(&("1".to_owned(), false)));
    }
}

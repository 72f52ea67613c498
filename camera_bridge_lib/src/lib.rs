pub mod camera;
pub mod config;
pub mod credential;
pub mod device_state;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod home_graph;
pub mod motion;
pub mod report_state;
pub mod request_sync;
pub mod store;
pub mod watcher;

use std::net::SocketAddr;
use std::process;
use std::sync::Arc;

use camera_bridge::config::Config;
use camera_bridge::web::{self, AppState};
use camera_bridge_lib::camera::MotionCamera;
use camera_bridge_lib::credential::Credential;
use camera_bridge_lib::device_state::DeviceStateStore;
use camera_bridge_lib::dispatcher::Dispatcher;
use camera_bridge_lib::home_graph::{HomeGraph, HomeGraphClient};
use camera_bridge_lib::motion::{LogPushSender, MotionNotifier};
use camera_bridge_lib::report_state::StateReporter;
use camera_bridge_lib::request_sync::SyncRequester;
use camera_bridge_lib::store::{MemoryStore, StateStore};
use camera_bridge_lib::watcher;
use google_home::GoogleHome;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = app().await {
        error!("Error: {err}");
        let mut cause = err.source();
        while let Some(c) = cause {
            error!("Cause: {c}");
            cause = c.source();
        }
        process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }

    info!("Shutting down");
}

async fn app() -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "camera_bridge");

    let config_file = std::env::var("CAMERA_BRIDGE_CONFIG")
        .unwrap_or_else(|_| format!("{}.toml", std::env!("CARGO_PKG_NAME")));
    let config = Config::build(&config_file)?;

    // Report state and request sync are disabled without a service account key
    let home_graph = match Credential::load_optional(&config.home_graph.credential) {
        Some(credential) => Some(Arc::new(HomeGraphClient::new(&config.home_graph, credential)?)
            as Arc<dyn HomeGraph>),
        None => None,
    };

    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());

    let states = Arc::new(DeviceStateStore::new(store.clone(), config.store.timeout()));
    let mut google_home = GoogleHome::new(&config.agent_user_id, states);
    google_home.add_device(Box::new(MotionCamera::new(home_graph.is_some())));

    let mut dispatcher = Dispatcher::new();
    dispatcher.add_state_listener(Arc::new(StateReporter::new(
        &config.agent_user_id,
        home_graph.clone(),
    )));
    dispatcher.add_motion_listener(Arc::new(MotionNotifier::new(Arc::new(LogPushSender))));
    let event_channel = dispatcher.start();

    watcher::start(store.clone(), &event_channel);

    let app = web::router(AppState {
        google_home: Arc::new(google_home),
        store,
        sync_requester: SyncRequester::new(&config.agent_user_id, home_graph),
    });

    // Start the web server
    let addr: SocketAddr = config.fulfillment.into();
    let listener = TcpListener::bind(addr).await?;
    info!("Server started on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

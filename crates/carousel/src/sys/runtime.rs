use crate::events::AppEvent;
use crate::protocol::SOCKET_PATH;
use async_channel::Sender;
use std::path::PathBuf;

/// Spawns the control server and the config watcher onto the current tokio
/// runtime. Both feed the same event queue as the autoplay timer.
pub fn start_background_services(tx: Sender<AppEvent>) {
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            crate::sys::server::run_server(PathBuf::from(SOCKET_PATH), tx).await;
        });
    }

    tokio::spawn(async move {
        crate::config::run_async_watcher(tx).await;
    });
}

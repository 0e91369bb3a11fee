use crate::events::AppEvent;
use crate::protocol::Command;
use async_channel::Sender;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Accepts control connections on `socket_path` and forwards each command
/// line into the event queue. Every reply ends with an empty line.
pub async fn run_server(socket_path: PathBuf, tx: Sender<AppEvent>) {
    // a previous daemon may have left its socket behind
    if socket_path.exists() {
        let _ = fs_err::remove_file(&socket_path);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = serve_connection(stream, tx).await {
                        log::warn!("Control connection closed: {}", e);
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn serve_connection(mut stream: UnixStream, tx: Sender<AppEvent>) -> std::io::Result<()> {
    let (reader, mut writer) = stream.split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match line.parse::<Command>() {
            Ok(Command::Status) => request_status(&tx).await,
            Ok(command) => {
                if tx.send(AppEvent::Command(command)).await.is_err() {
                    break;
                }
                Some("ok\n".to_string())
            }
            Err(e) => {
                log::warn!("Ignoring control line '{}': {}", line.trim(), e);
                Some(format!("error: {}\n", e))
            }
        };

        let Some(reply) = reply else { break };
        write_reply(&mut writer, &reply).await?;
    }
    Ok(())
}

async fn request_status(tx: &Sender<AppEvent>) -> Option<String> {
    let (reply_tx, reply_rx) = async_channel::bounded(1);
    tx.send(AppEvent::Status(reply_tx)).await.ok()?;
    reply_rx.recv().await.ok()
}

async fn write_reply<W: AsyncWrite + Unpin>(writer: &mut W, reply: &str) -> std::io::Result<()> {
    writer.write_all(reply.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

pub fn remove_socket(socket_path: &Path) {
    if socket_path.exists()
        && let Err(e) = fs_err::remove_file(socket_path)
    {
        log::warn!("Failed to remove socket: {}", e);
    }
}

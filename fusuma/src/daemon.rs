use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::clock::Clock;
use crate::dispatch::process_command;
use crate::ipc::{IpcRequest, IpcServer};
use crate::storage::{LocalCache, RemoteStore};
use crate::store::WorkspaceStore;

/// Serve the store over the IPC socket until ctrl-c.
pub async fn run<L, R, C>(mut store: WorkspaceStore<L, R, C>, socket_path: PathBuf) -> Result<()>
where
    L: LocalCache,
    R: RemoteStore,
    C: Clock,
{
    store.initialize().await;

    let (cmd_tx, cmd_rx) = mpsc::channel::<IpcRequest>(256);
    let server = IpcServer::new(socket_path, cmd_tx);
    let server_task = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!("IPC server error: {}", e);
        }
    });

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };
    serve(&mut store, cmd_rx, shutdown).await;

    // Dropping the server removes the socket file
    server_task.abort();
    let _ = server_task.await;
    Ok(())
}

/// Apply commands as they arrive and fire write deadlines in between.
/// Pending writes are flushed before returning.
pub async fn serve<L, R, C>(
    store: &mut WorkspaceStore<L, R, C>,
    mut cmd_rx: mpsc::Receiver<IpcRequest>,
    shutdown: impl Future<Output = ()>,
) where
    L: LocalCache,
    R: RemoteStore,
    C: Clock,
{
    tokio::pin!(shutdown);

    loop {
        let wait = store
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(store.sync().now_ms()));

        tokio::select! {
            request = cmd_rx.recv() => {
                let Some((cmd, resp_tx)) = request else {
                    break;
                };
                let response = process_command(store, &cmd);
                if resp_tx.send(response).is_err() {
                    tracing::debug!("Client went away before the response");
                }
            }
            _ = sleep_for(wait) => {
                store.flush_due().await;
            }
            _ = &mut shutdown => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    store.flush_all().await;
}

async fn sleep_for(wait: Option<u64>) {
    match wait {
        Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
        None => std::future::pending().await,
    }
}

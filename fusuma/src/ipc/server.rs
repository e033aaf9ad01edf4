use std::path::PathBuf;

use anyhow::Result;
use fusuma_schema::{Command, Response};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};

/// A decoded command and the slot its response goes back through.
pub type IpcRequest = (Command, oneshot::Sender<Response>);

/// Line-delimited JSON over a Unix socket. Commands are forwarded to the
/// task that owns the workspace store.
pub struct IpcServer {
    socket_path: PathBuf,
    cmd_tx: mpsc::Sender<IpcRequest>,
}

impl IpcServer {
    pub fn new(socket_path: PathBuf, cmd_tx: mpsc::Sender<IpcRequest>) -> Self {
        Self {
            socket_path,
            cmd_tx,
        }
    }

    pub async fn run(&self) -> Result<()> {
        // Stale socket from a previous run
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("IPC server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let cmd_tx = self.cmd_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, cmd_tx).await {
                            tracing::error!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                }
            }
        }
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

async fn handle_connection(stream: UnixStream, cmd_tx: mpsc::Sender<IpcRequest>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break; // EOF
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Command>(line) {
            Ok(cmd) => {
                tracing::debug!("Received command: {:?}", cmd);
                forward(&cmd_tx, cmd).await
            }
            Err(e) => Response::Error {
                message: format!("Invalid command: {}", e),
            },
        };

        let response_json = serde_json::to_string(&response)?;
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}

async fn forward(cmd_tx: &mpsc::Sender<IpcRequest>, cmd: Command) -> Response {
    let (resp_tx, resp_rx) = oneshot::channel();
    if cmd_tx.send((cmd, resp_tx)).await.is_err() {
        return Response::Error {
            message: "Internal error: command channel closed".to_string(),
        };
    }
    resp_rx.await.unwrap_or(Response::Error {
        message: "Internal error: no response".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn roundtrip(input: &str) -> (Option<Command>, Response) {
        let (client, server) = UnixStream::pair().unwrap();
        let (cmd_tx, mut cmd_rx) = mpsc::channel::<IpcRequest>(4);
        tokio::spawn(handle_connection(server, cmd_tx));

        let responder = tokio::spawn(async move {
            let (cmd, resp_tx) = cmd_rx.recv().await?;
            let _ = resp_tx.send(Response::Ok);
            Some(cmd)
        });

        let (reader, mut writer) = client.into_split();
        writer.write_all(input.as_bytes()).await.unwrap();
        writer.write_all(b"\n").await.unwrap();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        drop(writer);

        let response: Response = serde_json::from_str(&line).unwrap();
        let seen = if matches!(response, Response::Ok) {
            responder.await.unwrap()
        } else {
            responder.abort();
            None
        };
        (seen, response)
    }

    #[tokio::test]
    async fn test_forwards_commands() {
        let (seen, response) = roundtrip(r#"{"type":"tile_cards"}"#).await;
        assert!(matches!(response, Response::Ok));
        assert!(matches!(seen, Some(Command::TileCards)));
    }

    #[tokio::test]
    async fn test_rejects_malformed_lines() {
        let (seen, response) = roundtrip(r#"{"type":"explode"}"#).await;
        assert!(seen.is_none());
        match response {
            Response::Error { message } => assert!(message.starts_with("Invalid command")),
            other => panic!("Unexpected response: {:?}", other),
        }
    }
}

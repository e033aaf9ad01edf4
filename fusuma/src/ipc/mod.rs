mod client;
mod server;

use std::path::PathBuf;

pub use client::IpcClient;
pub use server::{IpcRequest, IpcServer};

const SOCKET_NAME: &str = "fusuma.sock";

/// `$XDG_RUNTIME_DIR/fusuma.sock`, or the temp dir when there is none.
pub fn default_socket_path() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(SOCKET_NAME)
}

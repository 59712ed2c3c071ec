//! TCP server for the board
//!
//! Line-based text protocol: each client connection sends one request per
//! line and reads the response before sending the next. A `flip` that has
//! to wait for a contested card blocks only its own connection; every other
//! client keeps playing against the same shared board.

pub mod command;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::core::Board;
use crate::server::command::{parse_request, Request};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8789,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = std::env::var("SCRAMBLE_HOST").unwrap_or(defaults.host);
        let port = std::env::var("SCRAMBLE_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        Self { host, port }
    }
}

/// Bind the listener and serve the board until the task is aborted.
///
/// When `ready` is supplied, the bound address is reported through it once
/// accepting starts; tests bind port 0 and read the real port from here.
pub async fn run_server(
    config: ServerConfig,
    board: Arc<Board>,
    ready: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "listening");
    if let Some(ready) = ready {
        let _ = ready.send(addr);
    }

    loop {
        let (socket, peer) = listener.accept().await?;
        info!(%peer, "client connected");
        let board = Arc::clone(&board);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, board).await {
                warn!(%peer, error = %e, "client error");
            }
            info!(%peer, "client disconnected");
        });
    }
}

/// Serve one connection: read a request line, execute it against the board,
/// write the rendering or an `error:` line, repeat until EOF or `quit`.
async fn handle_client(socket: TcpStream, board: Arc<Board>) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(request = line, "handling");

        let response = match parse_request(line) {
            Ok(Request::Look { player }) => board.look(&player).map_err(|e| e.to_string()),
            Ok(Request::Flip { player, row, col }) => {
                board.flip(&player, row, col).await.map_err(|e| e.to_string())
            }
            Ok(Request::Quit) => break,
            Err(e) => Err(e.to_string()),
        };

        let text = match response {
            Ok(rendering) => rendering,
            Err(message) => format!("error: {}\n", message),
        };
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

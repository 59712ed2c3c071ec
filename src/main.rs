//! Memory Scramble server binary.
//!
//! Loads a board file and serves it to any number of TCP clients:
//! `memory-scramble <board-file> [--host HOST] [--port PORT]`.

use std::sync::Arc;

use anyhow::{anyhow, Result};

use memory_scramble::parse::load_board;
use memory_scramble::server::{run_server, ServerConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    board_path: String,
    config: ServerConfig,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut board_path: Option<String> = None;
    let mut config = ServerConfig::from_env();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --host"))?;
                config.host = v.clone();
            }
            "--port" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --port"))?;
                config.port = v
                    .parse::<u16>()
                    .map_err(|_| anyhow!("invalid --port value: {}", v))?;
            }
            other if other.starts_with("--") => {
                return Err(anyhow!("unknown argument: {}", other));
            }
            other => {
                if board_path.replace(other.to_string()).is_some() {
                    return Err(anyhow!("more than one board file given"));
                }
            }
        }
        i += 1;
    }

    let board_path =
        board_path.ok_or_else(|| anyhow!("usage: memory-scramble <board-file> [--host HOST] [--port PORT]"))?;
    Ok(Options { board_path, config })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("memory_scramble=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let board = Arc::new(load_board(&options.board_path)?);
    tracing::info!(
        board = %options.board_path,
        rows = board.num_rows(),
        cols = board.num_cols(),
        "board loaded"
    );

    run_server(options.config, board, None).await
}

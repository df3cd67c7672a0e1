use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use feedline_net::{Limits, Request, parse_request_with_limits};
use feedline_server::{Response, Server, ServerConfig, StatusCode};

#[derive(Debug, Parser)]
#[command(name = "feedline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Accept connections and answer every request with a greeting.
    Serve {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Parse a request stored in a file and print what was recognised.
    Inspect {
        path: PathBuf,
        #[arg(long = "chunk-size", default_value_t = 8)]
        chunk_size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Serve { config, host, port } => serve(config, host, port).await,
        Command::Inspect { path, chunk_size } => inspect(&path, chunk_size),
    }
}

async fn serve(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), String> {
    let mut config = match config_path {
        Some(path) => ServerConfig::load(&path).map_err(|err| err.to_string())?,
        None => ServerConfig::default(),
    };
    if let Some(host) = host {
        config.listen.host = host;
    }
    if let Some(port) = port {
        config.listen.port = port;
    }

    let server = Server::bind(config, greet)
        .await
        .map_err(|err| err.to_string())?;
    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            shutdown.cancel();
        }
    });

    server.run().await.map_err(|err| err.to_string())
}

fn greet(request: &Request) -> Response {
    tracing::info!(method = %request.line.method, target = %request.line.target, "request");
    Response::text(StatusCode::Ok, "Hello World!\n")
}

fn inspect(path: &Path, chunk_size: usize) -> Result<(), String> {
    let file = File::open(path).map_err(|err| format!("{}: {err}", path.display()))?;
    let source = ChunkedRead {
        inner: file,
        chunk_size: chunk_size.max(1),
    };
    let request =
        parse_request_with_limits(source, Limits::default()).map_err(|err| err.to_string())?;

    println!(
        "{} {} HTTP/{}",
        request.line.method, request.line.target, request.line.version
    );
    let mut headers: Vec<_> = request.headers.iter().collect();
    headers.sort_unstable();
    for (name, value) in headers {
        println!("{name}: {value}");
    }
    println!("body: {} bytes", request.body.len());
    Ok(())
}

/// Caps every read at `chunk_size` bytes to mimic a slow socket.
struct ChunkedRead<R> {
    inner: R,
    chunk_size: usize,
}

impl<R: Read> Read for ChunkedRead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = buf.len().min(self.chunk_size);
        self.inner.read(&mut buf[..limit])
    }
}

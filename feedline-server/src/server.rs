use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use feedline_net::{ParseError, Request, parse_request_async};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::response::{Response, StatusCode};

pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Request) -> Response;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> Response + Send + Sync + 'static,
{
    fn handle(&self, request: &Request) -> Response {
        self(request)
    }
}

pub struct Server {
    listener: TcpListener,
    state: Arc<ServerState>,
}

struct ServerState {
    config: ServerConfig,
    handler: Box<dyn Handler>,
    shutdown: CancellationToken,
    permits: Arc<Semaphore>,
}

impl Server {
    pub async fn bind<H: Handler>(config: ServerConfig, handler: H) -> Result<Self, ServerError> {
        config.validate()?;
        let listener = TcpListener::bind(config.address()).await?;
        let permits = Arc::new(Semaphore::new(config.max_connections));
        Ok(Self {
            listener,
            state: Arc::new(ServerState {
                config,
                handler: Box::new(handler),
                shutdown: CancellationToken::new(),
                permits,
            }),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Cancelling the returned token stops the accept loop and aborts pending reads.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.state.shutdown.clone()
    }

    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = self.state.shutdown.clone();
        info!(addr = %self.local_addr()?, "listening");

        loop {
            let permit = tokio::select! {
                _ = shutdown.cancelled() => break,
                permit = Arc::clone(&self.state.permits).acquire_owned() => permit
                    .map_err(|err| ServerError::Runtime(err.to_string()))?,
            };

            let accepted = tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = self.listener.accept() => accepted,
            };

            match accepted {
                Ok((stream, peer)) => {
                    debug!(%peer, "connection accepted");
                    let state = Arc::clone(&self.state);
                    tokio::spawn(handle_connection(state, stream, peer, permit));
                }
                Err(err) => warn!(error = %err, "accept failed"),
            }
        }

        info!("server stopped");
        Ok(())
    }
}

async fn handle_connection(
    state: Arc<ServerState>,
    mut stream: TcpStream,
    peer: SocketAddr,
    _permit: OwnedSemaphorePermit,
) {
    let cancel = state.shutdown.child_token();
    let timer = cancel_after(cancel.clone(), state.config.read_timeout());
    let parsed = parse_request_async(&mut stream, state.config.limits(), &cancel).await;
    timer.abort();

    let response = match parsed {
        Ok(request) => {
            debug!(
                %peer,
                method = %request.line.method,
                target = %request.line.target,
                headers = request.headers.len(),
                "request parsed"
            );
            state.handler.handle(&request)
        }
        Err(err) => match rejection(&err) {
            Some(response) => {
                warn!(%peer, error = %err, "rejecting malformed request");
                response
            }
            None => {
                debug!(%peer, error = %err, "connection closed before request completed");
                return;
            }
        },
    };

    if let Err(err) = write_response(&mut stream, &response).await {
        warn!(%peer, error = %err, "failed to write response");
    }
    debug!(%peer, status = response.status.code(), "connection closed");
}

/// Response for a failed parse, or `None` when the peer is gone and nothing can be sent.
fn rejection(err: &ParseError) -> Option<Response> {
    if err.is_malformed() {
        return Some(Response::text(StatusCode::BadRequest, "Bad Request\n"));
    }
    match err {
        ParseError::InvalidState => Some(Response::text(
            StatusCode::InternalServerError,
            "Internal Server Error\n",
        )),
        _ => None,
    }
}

async fn write_response(stream: &mut TcpStream, response: &Response) -> std::io::Result<()> {
    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await
}

fn cancel_after(token: CancellationToken, timeout: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        token.cancel();
    })
}

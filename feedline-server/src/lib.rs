mod config;
mod error;
mod response;
mod server;

pub use config::{LimitsConfig, ListenConfig, ServerConfig};
pub use error::ServerError;
pub use response::{Response, StatusCode, default_headers, write_headers, write_status_line};
pub use server::{Handler, Server};

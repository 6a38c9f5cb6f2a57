pub mod auth;
pub mod config;
pub mod op;
pub mod transport;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Transport(#[from] transport::TransportError),

    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    #[error(transparent)]
    Op(#[from] op::OpError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub mod codec;
pub mod config;
pub mod device;
pub mod error;
pub mod models;
pub mod ops;
pub mod reconcile;
pub mod rpc_client;
pub mod transport;

#[cfg(test)]
mod tests;

pub const CLIENT_RPC_HOSTNAME: &str = "127.0.0.1";
pub const CLIENT_RPC_PORT: u16 = 31416;
pub const CLIENT_RPC_ADDRESS: &str =
    const_format::concatcp!(CLIENT_RPC_HOSTNAME, ":", CLIENT_RPC_PORT);

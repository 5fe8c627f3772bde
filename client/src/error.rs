use thiserror::Error;

use replica_shared::{PacketError, RpcError};

/// Errors surfaced by the client facade
#[derive(Debug, Error)]
pub enum ClientError {
    /// There is no server connection to send to or receive from
    #[error("Client is not connected to a server. Call `connected()` once the transport is up")]
    NotConnected,

    /// A datagram from the server could not be processed
    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),

    /// An outgoing RPC could not be sent
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

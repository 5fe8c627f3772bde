use replica_serde::{SerdeErr, WireType};
use thiserror::Error;

use crate::{rpc::RpcDirection, transport::TransportError, NetworkId};

/// Errors that can occur when sending an RPC from the local process
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// No method of that name in the table this role sends
    #[error("RPC `{name}` is not registered as a {direction} method. Must register it during protocol initialization")]
    UnknownMethod {
        name: String,
        direction: RpcDirection,
    },

    /// The call targets an object this session does not know
    #[error("RPC `{method}` targets Network ID {network_id}, which has no local object")]
    UnknownTarget {
        network_id: NetworkId,
        method: String,
    },

    /// Wrong number of arguments
    #[error("RPC `{method}` takes {expected} arguments but {actual} were given")]
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// An argument does not match the registered parameter type
    #[error("RPC `{method}` argument {index} must be {expected} but was {actual}")]
    ArgumentType {
        method: String,
        index: usize,
        expected: WireType,
        actual: WireType,
    },

    /// Encoding the call failed
    #[error("Failed to encode RPC: {0}")]
    Encode(#[from] SerdeErr),

    /// The transport refused the datagram
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

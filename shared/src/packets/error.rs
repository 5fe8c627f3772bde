use replica_serde::SerdeErr;
use thiserror::Error;

use crate::{
    rpc::{HandlerError, RpcDirection},
    world::error::AnchorError,
    MethodId, NetworkId, PacketTag,
};

/// Errors raised while processing a datagram from a remote peer.
///
/// None of these crash the receiver. The server facade reports them against
/// the sending peer; the client facade logs them.
#[derive(Debug, Error)]
pub enum PacketError {
    /// No processor is registered for the packet tag
    #[error("Unknown packet tag {tag}. The sender may have been built with a different protocol")]
    UnknownPacketTag { tag: PacketTag },

    /// The method id is not in the table this role executes
    #[error("Unknown RPC method id {method_id} in the {direction} table")]
    UnknownRpc {
        method_id: MethodId,
        direction: RpcDirection,
    },

    /// The payload could not be decoded
    #[error("Malformed packet: {source}")]
    MalformedPacket {
        #[from]
        source: SerdeErr,
    },

    /// The RPC target is not in the object lookup
    #[error("Network ID {network_id} not found in object lookup while invoking RPC `{method}`")]
    UnknownTarget { network_id: NetworkId, method: String },

    /// An Instantiate named a key this protocol never registered
    #[error("Spawnable `{key}` not registered with Protocol. Must call `add_spawnable()` during protocol initialization")]
    UnknownSpawnable { key: String },

    /// The buffered sub-component list does not match the local entity
    #[error("Sub-component snapshot has {actual} entries but the entity enumerates {expected} network components")]
    SnapshotMismatch { expected: usize, actual: usize },

    /// The spawnable constructor rejected the arguments
    #[error("Failed to construct spawnable `{key}`: {source}")]
    Construction {
        key: String,
        #[source]
        source: HandlerError,
    },

    /// An RPC handler returned an error
    #[error("RPC handler `{method}` failed: {source}")]
    HandlerFailed {
        method: String,
        #[source]
        source: HandlerError,
    },

    /// An RPC handler panicked; the panic was contained
    #[error("RPC handler panicked: {message}")]
    HandlerPanicked { message: String },

    /// Binding a replicated entity failed
    #[error("Anchor error: {0}")]
    Anchor(#[from] AnchorError),
}

impl PacketError {
    /// Warnings are bookkeeping only and never count toward a kick.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            PacketError::UnknownPacketTag { .. } | PacketError::UnknownTarget { .. }
        )
    }
}

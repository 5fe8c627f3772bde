use thiserror::Error;

use crate::rpc::RpcDirection;

/// Errors that can occur during protocol operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// A method name was registered twice in one direction
    #[error("RPC `{name}` is already registered as a {direction} method")]
    DuplicateMethod {
        name: String,
        direction: RpcDirection,
    },

    /// A spawnable key was registered twice
    #[error("Spawnable `{key}` is already registered")]
    DuplicateSpawnable { key: String },

    /// A packet processor name was registered twice
    #[error("Packet processor `{name}` is already registered")]
    DuplicatePacketProcessor { name: String },

    /// A relayed server-bound method has no client-bound method of the same name
    #[error("RPC `{name}` relays to clients but no client-bound RPC `{name}` is registered")]
    RelayTargetMissing { name: String },

    /// The client-bound twin of a relayed method takes different parameters
    #[error("RPC `{name}` relays to clients but its client-bound twin takes different parameters")]
    RelayTargetMismatch { name: String },

    /// The 16-bit method id space of one direction is full
    #[error("Too many {direction} RPCs registered. Method ids are 16 bits")]
    TooManyMethods { direction: RpcDirection },

    /// The 16-bit packet tag space is full
    #[error("Too many packet processors registered. Packet tags are 16 bits")]
    TooManyPacketProcessors,
}

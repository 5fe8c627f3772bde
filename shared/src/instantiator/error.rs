use thiserror::Error;

use crate::{rpc::{HandlerError, RpcError}, world::error::AnchorError};

/// Errors returned to the local caller of spawn and destroy
#[derive(Debug, Error)]
pub enum InstantiateError {
    /// Spawn and destroy are server-only operations
    #[error("`{operation}` can only be called on the server")]
    NotServer { operation: &'static str },

    /// The key was never passed to `add_spawnable()`
    #[error("Spawnable `{key}` not registered with Protocol. Must call `add_spawnable()` during protocol initialization")]
    UnknownSpawnable { key: String },

    /// The spawnable constructor rejected the arguments
    #[error("Failed to construct spawnable `{key}`: {source}")]
    Construction {
        key: String,
        #[source]
        source: HandlerError,
    },

    /// Every network id has been handed out
    #[error("Network ID space exhausted. No further objects can be spawned in this session")]
    IdSpaceExhausted,

    /// Binding the new entity failed
    #[error("Anchor error: {0}")]
    Anchor(#[from] AnchorError),

    /// Sending the destroy notification failed
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

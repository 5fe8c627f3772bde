use replica_serde::SerdeErr;
use thiserror::Error;

use crate::NetworkId;

/// Errors that can occur while binding a replication anchor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    /// `setup` was called on an anchor or slot that already has an id
    #[error("Network slot is already bound to Network ID {network_id}. An anchor can only be set up once")]
    AlreadyBound { network_id: NetworkId },

    /// The restore-state callback rejected the state blob
    #[error("Failed to restore state for Network ID {network_id}: {source}")]
    StateRestore {
        network_id: NetworkId,
        #[source]
        source: SerdeErr,
    },
}

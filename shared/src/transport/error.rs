use thiserror::Error;

use crate::PeerId;

/// Errors a transport implementation reports back for an outgoing datagram
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The addressed peer has no open connection
    #[error("Peer {peer} is not connected. Packets can only be sent to connected peers")]
    PeerNotConnected { peer: PeerId },

    /// The underlying socket rejected the datagram
    #[error("Failed to send {size} bytes to peer {peer}: {reason}")]
    SendFailed {
        peer: PeerId,
        size: usize,
        reason: String,
    },

    /// The transport has been shut down
    #[error("Transport is closed")]
    Closed,
}

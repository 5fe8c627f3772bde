mod error;

pub use error::TransportError;

use crate::{DeliveryClass, PeerId};

/// Datagram transport the session sends through.
///
/// Inbound traffic flows the other way: the transport calls the role
/// facade's `receive`, `peer_connected` and `peer_disconnected` from its own
/// thread, so implementations must be shareable across threads.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        peer: &PeerId,
        payload: &[u8],
        delivery: DeliveryClass,
        channel: u8,
    ) -> Result<(), TransportError>;

    /// Sends to every connected peer, skipping `except` if given.
    fn broadcast(
        &self,
        payload: &[u8],
        delivery: DeliveryClass,
        channel: u8,
        except: Option<&PeerId>,
    ) -> Result<(), TransportError>;

    fn disconnect(&self, peer: &PeerId, reason: &str);
}

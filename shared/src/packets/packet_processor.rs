use replica_serde::StreamReader;

use crate::{packets::error::PacketError, DeliveryClass, NetworkId, PacketTag, PeerId, Session};

/// Decoded envelope of an inbound datagram
#[derive(Clone, Copy, Debug)]
pub struct IncomingPacket<'a> {
    pub tag: PacketTag,
    pub network_id: NetworkId,
    pub sender: &'a PeerId,
    pub delivery: DeliveryClass,
}

/// Handles every datagram carrying one packet tag.
///
/// The reader is positioned just after the envelope.
pub trait PacketProcessor: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn process(
        &self,
        session: &Session,
        packet: &IncomingPacket<'_>,
        reader: &mut StreamReader,
    ) -> Result<(), PacketError>;
}

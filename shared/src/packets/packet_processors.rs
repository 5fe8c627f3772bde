use std::collections::HashMap;

use log::{trace, warn};

use replica_serde::StreamReader;

use crate::{
    packets::{
        error::PacketError,
        packet_processor::{IncomingPacket, PacketProcessor},
    },
    protocol::ProtocolError,
    PacketTag, Session,
};

/// Tag to processor registry. Tags follow registration order, so every
/// participant built from the same protocol function agrees on them.
#[derive(Default)]
pub struct PacketProcessors {
    processors: Vec<Box<dyn PacketProcessor>>,
    tags: HashMap<String, PacketTag>,
}

impl PacketProcessors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, processor: Box<dyn PacketProcessor>) -> Result<PacketTag, ProtocolError> {
        let name = processor.name().to_string();
        if self.tags.contains_key(&name) {
            return Err(ProtocolError::DuplicatePacketProcessor { name });
        }
        let Ok(index) = u16::try_from(self.processors.len()) else {
            return Err(ProtocolError::TooManyPacketProcessors);
        };
        let tag = PacketTag::new(index);
        self.tags.insert(name, tag);
        self.processors.push(processor);
        Ok(tag)
    }

    pub fn tag_of(&self, name: &str) -> Option<PacketTag> {
        self.tags.get(name).copied()
    }

    pub fn get(&self, tag: PacketTag) -> Option<&dyn PacketProcessor> {
        self.processors
            .get(usize::from(tag.get()))
            .map(|processor| processor.as_ref())
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn dispatch(
        &self,
        session: &Session,
        packet: &IncomingPacket<'_>,
        reader: &mut StreamReader,
    ) -> Result<(), PacketError> {
        let Some(processor) = self.get(packet.tag) else {
            warn!(
                "Dropping packet from {} with unknown tag {}",
                packet.sender, packet.tag
            );
            return Err(PacketError::UnknownPacketTag { tag: packet.tag });
        };
        trace!(
            "Dispatching {} packet from {} to Network ID {}",
            processor.name(),
            packet.sender,
            packet.network_id
        );
        processor.process(session, packet, reader)
    }
}

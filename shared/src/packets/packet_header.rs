use replica_serde::{ConstByteLength, Serde, SerdeErr, StreamReader, StreamWriter};

use crate::{NetworkId, PacketTag};

/// Envelope preceding every datagram: packet tag then target network id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketHeader {
    pub tag: PacketTag,
    pub network_id: NetworkId,
}

impl PacketHeader {
    pub fn new(tag: PacketTag, network_id: NetworkId) -> Self {
        Self { tag, network_id }
    }
}

impl Serde for PacketHeader {
    const MIN_BYTE_LENGTH: usize = 6;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        self.tag.ser(writer)?;
        self.network_id.ser(writer)
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let tag = PacketTag::de(reader)?;
        let network_id = NetworkId::de(reader)?;
        Ok(Self { tag, network_id })
    }

    fn byte_length(&self) -> usize {
        Self::MIN_BYTE_LENGTH
    }
}

impl ConstByteLength for PacketHeader {
    fn const_byte_length() -> usize {
        6
    }
}

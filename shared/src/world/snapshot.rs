use replica_serde::{Serde, SerdeErr, StreamReader, StreamWriter};

use crate::NetworkId;

/// One sub-component's entry in the buffered-data blob:
/// length-prefixed state (empty means none) followed by its id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentSnapshot {
    pub state: Vec<u8>,
    pub network_id: NetworkId,
}

impl Serde for ComponentSnapshot {
    const MIN_BYTE_LENGTH: usize = 8;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_blob(&self.state)?;
        self.network_id.ser(writer)
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let state = reader.read_blob()?;
        let network_id = NetworkId::de(reader)?;
        Ok(Self { state, network_id })
    }

    fn byte_length(&self) -> usize {
        4 + self.state.len() + 4
    }
}

/// Encodes the sub-component list: `u32` count then each entry.
pub fn encode_snapshot(entries: &[ComponentSnapshot]) -> Result<Vec<u8>, SerdeErr> {
    let mut writer = StreamWriter::new();
    writer.write_length(entries.len())?;
    for entry in entries {
        entry.ser(&mut writer)?;
    }
    Ok(writer.to_bytes())
}

/// Decodes a sub-component list. An empty blob is an empty list.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Vec<ComponentSnapshot>, SerdeErr> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = StreamReader::new(bytes);
    Vec::<ComponentSnapshot>::de(&mut reader)
}

use replica_serde::StreamReader;

use crate::{
    packets::{
        error::PacketError,
        packet_processor::{IncomingPacket, PacketProcessor},
    },
    rpc::invoker,
    Session,
};

/// Built-in processor behind packet tag 0
pub struct RpcProcessor;

impl PacketProcessor for RpcProcessor {
    fn name(&self) -> &str {
        "rpc"
    }

    fn process(
        &self,
        session: &Session,
        packet: &IncomingPacket<'_>,
        reader: &mut StreamReader,
    ) -> Result<(), PacketError> {
        invoker::invoke_incoming(session, packet, reader)
    }
}

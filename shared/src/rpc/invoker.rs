use log::{debug, warn};

use replica_serde::{Serde, StreamReader, StreamWriter, WireValue};

use crate::{
    packets::{error::PacketError, packet_header::PacketHeader, packet_processor::IncomingPacket},
    rpc::{Relay, RpcContext, RpcDirection, RpcError, RpcInfo},
    DeliveryClass, MethodId, NetworkId, PacketTag, Scope, Session,
};

/// Sends `method` from the table this role sends, after checking the
/// arguments against its registered parameter types.
pub(crate) fn send_rpc(
    session: &Session,
    target: NetworkId,
    method: &str,
    delivery: DeliveryClass,
    channel: u8,
    scope: &Scope,
    args: &[WireValue],
) -> Result<(), RpcError> {
    let direction = RpcDirection::sent_by(session.host());
    let Some(entry) = session.protocol().rpcs(direction).by_name(method) else {
        return Err(RpcError::UnknownMethod {
            name: method.to_string(),
            direction,
        });
    };
    if !target.is_session() && session.object(target).is_none() {
        return Err(RpcError::UnknownTarget {
            network_id: target,
            method: method.to_string(),
        });
    }
    send_call(session, target, entry.info(), delivery, channel, scope, args)
}

pub(crate) fn send_call(
    session: &Session,
    target: NetworkId,
    info: &RpcInfo,
    delivery: DeliveryClass,
    channel: u8,
    scope: &Scope,
    args: &[WireValue],
) -> Result<(), RpcError> {
    validate_args(info, args)?;

    let mut writer = session.pool().acquire_writer();
    encode_call(&mut writer, target, info, args)?;
    session.send_bytes(scope, writer.as_bytes(), delivery, channel)?;
    writer.release();
    Ok(())
}

pub(crate) fn validate_args(info: &RpcInfo, args: &[WireValue]) -> Result<(), RpcError> {
    if args.len() != info.params.len() {
        return Err(RpcError::ArgumentCount {
            method: info.name.clone(),
            expected: info.params.len(),
            actual: args.len(),
        });
    }
    for (index, (expected, value)) in info.params.iter().zip(args).enumerate() {
        let actual = value.wire_type();
        if actual != *expected {
            return Err(RpcError::ArgumentType {
                method: info.name.clone(),
                index,
                expected: *expected,
                actual,
            });
        }
    }
    Ok(())
}

/// Envelope, method id, then each argument in registration order.
pub(crate) fn encode_call(
    writer: &mut StreamWriter,
    target: NetworkId,
    info: &RpcInfo,
    args: &[WireValue],
) -> Result<(), RpcError> {
    PacketHeader::new(PacketTag::RPC, target).ser(writer)?;
    info.id.ser(writer)?;
    for (wire_type, value) in info.params.iter().zip(args) {
        replica_serde::write(*wire_type, value, writer)?;
    }
    Ok(())
}

/// Decodes and executes one call from the table this role executes.
pub(crate) fn invoke_incoming(
    session: &Session,
    packet: &IncomingPacket<'_>,
    reader: &mut StreamReader,
) -> Result<(), PacketError> {
    let method_id = MethodId::de(reader)?;
    let direction = RpcDirection::executed_by(session.host());
    let Some(entry) = session.protocol().rpcs(direction).get(method_id) else {
        return Err(PacketError::UnknownRpc {
            method_id,
            direction,
        });
    };
    let info = entry.info();

    let mut args = Vec::with_capacity(info.params.len());
    for wire_type in &info.params {
        args.push(replica_serde::read(*wire_type, reader)?);
    }
    if !reader.is_empty() {
        debug!(
            "RPC `{}` from {} carried {} trailing bytes",
            info.name,
            packet.sender,
            reader.remaining()
        );
    }

    let target = if packet.network_id.is_session() {
        None
    } else {
        let Some(object) = session.object(packet.network_id) else {
            return Err(PacketError::UnknownTarget {
                network_id: packet.network_id,
                method: info.name.clone(),
            });
        };
        Some(object)
    };

    let context = RpcContext {
        session,
        sender: packet.sender,
        network_id: packet.network_id,
        target,
        delivery: packet.delivery,
        info,
    };
    entry
        .invoke(&context, &args)
        .map_err(|source| match source.downcast::<PacketError>() {
            Ok(error) => *error,
            Err(source) => PacketError::HandlerFailed {
                method: info.name.clone(),
                source,
            },
        })?;

    if direction == RpcDirection::ServerBound {
        relay(session, packet, info, &args);
    }
    Ok(())
}

// Re-sends an executed server-bound call as its client-bound twin.
fn relay(session: &Session, packet: &IncomingPacket<'_>, info: &RpcInfo, args: &[WireValue]) {
    let scope = match info.options.relay {
        Relay::None => return,
        Relay::AllClients => Scope::Broadcast,
        Relay::AllClientsExceptSender => Scope::BroadcastExcept(packet.sender.clone()),
    };
    let Some(twin) = session
        .protocol()
        .rpcs(RpcDirection::ClientBound)
        .by_name(&info.name)
    else {
        warn!("RPC `{}` is marked for relay but has no client-bound twin", info.name);
        return;
    };
    if let Err(error) = send_call(
        session,
        packet.network_id,
        twin.info(),
        packet.delivery,
        session.config().relay_channel,
        &scope,
        args,
    ) {
        warn!("Failed to relay RPC `{}`: {}", info.name, error);
    }
}

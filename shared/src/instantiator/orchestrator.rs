use std::{sync::Arc, time::Duration};

use log::{debug, info, warn};

use replica_serde::{read_tagged_all, write_tagged, WireValue};

use crate::{
    instantiator::{
        builtin::{InstantiateMessage, DESTROY_RPC, INSTANTIATE_RPC},
        error::InstantiateError,
        spawned_net_object::SpawnedNetObject,
    },
    packets::error::PacketError,
    rpc::{invoker, RpcError},
    session::SessionState,
    world::{
        error::AnchorError,
        net_object::NetEntity,
        snapshot::{decode_snapshot, encode_snapshot, ComponentSnapshot},
    },
    DeliveryClass, NetworkId, Owner, PeerId, Scope, Session,
};

pub(crate) fn spawn(
    session: &Session,
    key: &str,
    owner: Owner,
    args: Vec<WireValue>,
) -> Result<NetworkId, InstantiateError> {
    if !session.host().is_server() {
        return Err(InstantiateError::NotServer { operation: "spawn" });
    }
    let Some(descriptor) = session.protocol().spawnables().get(key) else {
        return Err(InstantiateError::UnknownSpawnable {
            key: key.to_string(),
        });
    };
    let entity = descriptor
        .construct(&args)
        .map_err(|source| InstantiateError::Construction {
            key: key.to_string(),
            source,
        })?;

    let components = entity.net_components();
    let Some((network_id, component_ids)) = session.state().allocate_ids(components.len()) else {
        return Err(InstantiateError::IdSpaceExhausted);
    };

    let is_owner = owner.is_server();
    entity.anchor().setup(network_id, is_owner, &[])?;
    for (component, component_id) in components.iter().zip(&component_ids) {
        component.net_slot().setup(*component_id, is_owner)?;
    }
    entity.anchor().set_component_ids(component_ids);

    let record = SpawnedNetObject {
        network_id,
        entity: entity.clone(),
        key: key.to_string(),
        owner: Some(owner),
        is_owner,
        spawn_args: args,
        capabilities: descriptor.capabilities(),
    };
    let peers = {
        let mut state = session.state();
        state.register_entity(&entity);
        state.spawned.insert(network_id, record.clone());
        state.connections.clone()
    };
    info!(
        "Spawned `{}` as Network ID {} (owner: {})",
        key,
        network_id,
        record.owner.as_ref().map(ToString::to_string).unwrap_or_default()
    );

    entity.on_instantiated_server();

    for peer in &peers {
        if let Err(error) = send_instantiate(session, &record, peer) {
            warn!(
                "Failed to send Instantiate for Network ID {} to {}: {}",
                network_id, peer, error
            );
        }
    }
    Ok(network_id)
}

pub(crate) fn destroy(session: &Session, network_id: NetworkId) -> Result<(), InstantiateError> {
    if !session.host().is_server() {
        return Err(InstantiateError::NotServer {
            operation: "destroy",
        });
    }
    if !teardown(session, network_id) {
        warn!("Ignoring destroy of unknown Network ID {}", network_id);
        return Ok(());
    }
    info!("Destroyed Network ID {}", network_id);

    invoker::send_rpc(
        session,
        NetworkId::SESSION,
        DESTROY_RPC,
        DeliveryClass::ReliableOrdered,
        session.config().instantiate_channel,
        &Scope::Broadcast,
        &[WireValue::U32(network_id.get())],
    )?;
    Ok(())
}

/// Re-sends every live spawn to `peer`. Returns how many were sent.
pub(crate) fn replay_spawns(session: &Session, peer: &PeerId) -> usize {
    let records: Vec<SpawnedNetObject> = session.state().spawned.values().cloned().collect();
    let mut sent = 0;
    for record in &records {
        match send_instantiate(session, record, peer) {
            Ok(()) => sent += 1,
            Err(error) => warn!(
                "Failed to replay Network ID {} to {}: {}",
                record.network_id, peer, error
            ),
        }
    }
    debug!("Replayed {} of {} spawned objects to {}", sent, records.len(), peer);
    sent
}

fn send_instantiate(
    session: &Session,
    record: &SpawnedNetObject,
    peer: &PeerId,
) -> Result<(), RpcError> {
    let is_owner = record
        .owner
        .as_ref()
        .is_some_and(|owner| owner.is_peer(peer));

    let state = if record.capabilities.persistable {
        record.entity.anchor().serialize_state()
    } else {
        Vec::new()
    };
    let buffered = encode_snapshot(&component_snapshots(record.entity.as_ref()))?;

    let current_args = if record.capabilities.instantiatable {
        record.entity.instantiate_parameters()
    } else {
        None
    };
    let args = current_args.as_deref().unwrap_or(&record.spawn_args);
    let args_blob = {
        let mut writer = session.pool().acquire_writer();
        for arg in args {
            write_tagged(arg, &mut writer)?;
        }
        writer.copy_bytes()
    };

    invoker::send_rpc(
        session,
        NetworkId::SESSION,
        INSTANTIATE_RPC,
        DeliveryClass::ReliableOrdered,
        session.config().instantiate_channel,
        &Scope::Unicast(peer.clone()),
        &[
            WireValue::String(record.key.clone()),
            WireValue::Bool(is_owner),
            WireValue::U32(record.network_id.get()),
            WireValue::U8Array(state),
            WireValue::U8Array(buffered),
            WireValue::U8Array(args_blob),
        ],
    )
}

fn component_snapshots(entity: &dyn NetEntity) -> Vec<ComponentSnapshot> {
    entity
        .net_components()
        .iter()
        .zip(entity.anchor().component_ids())
        .map(|(component, network_id)| ComponentSnapshot {
            state: component.serialize_state().unwrap_or_default(),
            network_id,
        })
        .collect()
}

pub(crate) fn receive_instantiate(
    session: &Session,
    message: InstantiateMessage,
) -> Result<(), PacketError> {
    let network_id = message.network_id;
    if session.is_spawned(network_id) {
        debug!("Ignoring duplicate Instantiate for Network ID {}", network_id);
        return Ok(());
    }
    if session.state().is_tombstoned(network_id) {
        debug!("Ignoring Instantiate for destroyed Network ID {}", network_id);
        return Ok(());
    }
    let Some(descriptor) = session.protocol().spawnables().get(&message.key) else {
        return Err(PacketError::UnknownSpawnable { key: message.key });
    };

    let args = {
        let mut reader = session.pool().acquire_reader(&message.args);
        read_tagged_all(&mut reader)?
    };
    let snapshot = decode_snapshot(&message.buffered)?;

    let entity = descriptor
        .construct(&args)
        .map_err(|source| PacketError::Construction {
            key: message.key.clone(),
            source,
        })?;
    let components = entity.net_components();
    if components.len() != snapshot.len() {
        return Err(PacketError::SnapshotMismatch {
            expected: components.len(),
            actual: snapshot.len(),
        });
    }

    entity
        .anchor()
        .setup(network_id, message.is_owner, &message.state)?;
    for (component, entry) in components.iter().zip(&snapshot) {
        component
            .net_slot()
            .setup(entry.network_id, message.is_owner)?;
        if !entry.state.is_empty() {
            component
                .restore_state(&entry.state)
                .map_err(|source| AnchorError::StateRestore {
                    network_id: entry.network_id,
                    source,
                })?;
        }
    }
    entity
        .anchor()
        .set_component_ids(snapshot.iter().map(|entry| entry.network_id).collect());

    let destroy_pending = {
        let mut state = session.state();
        if state.spawned.contains_key(&network_id) {
            debug!("Instantiate for Network ID {} lost a race, dropping mirror", network_id);
            return Ok(());
        }
        if state.is_tombstoned(network_id) {
            debug!("Network ID {} was destroyed during Instantiate, dropping mirror", network_id);
            return Ok(());
        }
        state.register_entity(&entity);
        state.spawned.insert(
            network_id,
            SpawnedNetObject {
                network_id,
                entity: entity.clone(),
                key: message.key.clone(),
                owner: None,
                is_owner: message.is_owner,
                spawn_args: args,
                capabilities: descriptor.capabilities(),
            },
        );
        state.pending_destroys.remove(network_id)
    };
    debug!(
        "Instantiated `{}` as Network ID {} (owner: {})",
        message.key, network_id, message.is_owner
    );

    entity.on_instantiated_client();

    if destroy_pending {
        debug!("Applying buffered destroy for Network ID {}", network_id);
        teardown(session, network_id);
    }
    Ok(())
}

pub(crate) fn receive_destroy(session: &Session, network_id: NetworkId) {
    let removed = {
        let mut state = session.state();
        state.destroyed.insert(network_id);
        let removed = state.remove_spawned(network_id);
        if removed.is_none() && state.pending_destroys.insert(network_id) {
            debug!("Buffered destroy for unknown Network ID {}", network_id);
        }
        removed
    };
    if let Some(record) = removed {
        finish_teardown(&record.entity);
    }
}

/// Removes the record and every id it owns, then runs the entity's teardown
/// hook. Returns false if the id was not live.
pub(crate) fn teardown(session: &Session, network_id: NetworkId) -> bool {
    let removed = session.state().remove_spawned(network_id);
    match removed {
        Some(record) => {
            finish_teardown(&record.entity);
            true
        }
        None => false,
    }
}

fn finish_teardown(entity: &Arc<dyn NetEntity>) {
    if entity.anchor().mark_destroyed() {
        entity.on_destroyed();
    }
}

/// Ages buffered destroys and applies the ones whose entity has appeared.
pub(crate) fn update(session: &Session, delta: Duration) {
    let drained = {
        let mut guard = session.state();
        let SessionState {
            pending_destroys,
            spawned,
            ..
        } = &mut *guard;
        pending_destroys.drain(delta, session.config().pending_destroy_timeout, |network_id| {
            spawned.contains_key(&network_id)
        })
    };
    for network_id in drained.ready {
        teardown(session, network_id);
    }
    for network_id in drained.expired {
        debug!("Dropping buffered destroy for Network ID {} after timeout", network_id);
    }
}

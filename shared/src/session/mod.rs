mod session_config;
mod session_state;

pub use session_config::SessionConfig;
pub(crate) use session_state::SessionState;

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::{info, warn};

use replica_serde::{Serde, WireValue};

use crate::{
    instantiator::{
        error::InstantiateError, orchestrator, spawned_net_object::SpawnedNetObject,
    },
    packets::{error::PacketError, packet_header::PacketHeader, packet_processor::IncomingPacket},
    pool::BufferPool,
    protocol::Protocol,
    rpc::{invoker, RpcError},
    transport::{Transport, TransportError},
    world::net_object::{NetEntity, NetObject},
    DeliveryClass, HostType, NetworkId, Owner, PacketTag, PeerId, Scope,
};

/// One participant's view of the replicated session.
///
/// Owns the locked protocol, the id lookup, the spawned table and the
/// connection list. All operations take `&self`, so a session can be shared
/// between the tick thread and the transport's callback thread. The state
/// lock is never held across a transport send or a user callback.
pub struct Session {
    host: HostType,
    protocol: Protocol,
    config: SessionConfig,
    transport: Arc<dyn Transport>,
    pool: BufferPool,
    state: Mutex<SessionState>,
}

impl Session {
    /// Creates a session, locking `protocol` if it is not locked yet.
    pub fn new(
        host: HostType,
        mut protocol: Protocol,
        config: SessionConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        if !protocol.is_locked() {
            protocol.lock();
        }
        Self {
            host,
            protocol,
            config,
            transport,
            pool: BufferPool::new(),
            state: Mutex::new(SessionState::new()),
        }
    }

    pub fn host(&self) -> HostType {
        self.host
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Incoming

    /// Decodes and dispatches one datagram from `sender`.
    ///
    /// Panics raised by handlers are contained here and surface as
    /// `PacketError::HandlerPanicked`.
    pub fn receive(
        &self,
        sender: &PeerId,
        bytes: &[u8],
        delivery: DeliveryClass,
    ) -> Result<(), PacketError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.dispatch(sender, bytes, delivery)
        }));
        match outcome {
            Ok(result) => result,
            Err(payload) => Err(PacketError::HandlerPanicked {
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    fn dispatch(
        &self,
        sender: &PeerId,
        bytes: &[u8],
        delivery: DeliveryClass,
    ) -> Result<(), PacketError> {
        let mut reader = self.pool.acquire_reader(bytes);
        let header = PacketHeader::de(&mut reader)?;
        let packet = IncomingPacket {
            tag: header.tag,
            network_id: header.network_id,
            sender,
            delivery,
        };
        self.protocol
            .packet_processors()
            .dispatch(self, &packet, &mut reader)
    }

    // Outgoing

    /// Sends an RPC from the table this role sends: client-bound on the
    /// server, server-bound on a client.
    pub fn send_rpc(
        &self,
        target: NetworkId,
        method: &str,
        delivery: DeliveryClass,
        channel: u8,
        scope: Scope,
        args: &[WireValue],
    ) -> Result<(), RpcError> {
        invoker::send_rpc(self, target, method, delivery, channel, &scope, args)
    }

    /// Sends a raw payload to a custom packet processor.
    pub fn send_packet(
        &self,
        tag: PacketTag,
        target: NetworkId,
        payload: &[u8],
        delivery: DeliveryClass,
        channel: u8,
        scope: Scope,
    ) -> Result<(), RpcError> {
        let mut writer = self.pool.acquire_writer();
        PacketHeader::new(tag, target).ser(&mut writer)?;
        writer.write_bytes(payload);
        self.send_bytes(&scope, writer.as_bytes(), delivery, channel)?;
        writer.release();
        Ok(())
    }

    pub(crate) fn send_bytes(
        &self,
        scope: &Scope,
        bytes: &[u8],
        delivery: DeliveryClass,
        channel: u8,
    ) -> Result<(), TransportError> {
        match scope {
            Scope::Unicast(peer) => self.transport.send(peer, bytes, delivery, channel),
            Scope::Broadcast => self.transport.broadcast(bytes, delivery, channel, None),
            Scope::BroadcastExcept(peer) => {
                self.transport
                    .broadcast(bytes, delivery, channel, Some(peer))
            }
        }
    }

    // Spawn / Destroy

    /// Spawns a registered entity and replicates it to every connected peer.
    /// Server only.
    pub fn spawn(
        &self,
        key: &str,
        owner: Owner,
        args: Vec<WireValue>,
    ) -> Result<NetworkId, InstantiateError> {
        orchestrator::spawn(self, key, owner, args)
    }

    /// Tears the entity down locally and tells every peer. Server only.
    /// Unknown ids are ignored.
    pub fn destroy(&self, network_id: NetworkId) -> Result<(), InstantiateError> {
        orchestrator::destroy(self, network_id)
    }

    /// Sends every live spawn to `peer`.
    pub fn replay_spawns(&self, peer: &PeerId) -> usize {
        orchestrator::replay_spawns(self, peer)
    }

    /// Per-tick housekeeping: ages destroys buffered ahead of their
    /// Instantiate.
    pub fn update(&self, delta: Duration) {
        orchestrator::update(self, delta);
    }

    // Connections

    /// Returns false if `peer` was already connected.
    pub fn add_connection(&self, peer: &PeerId) -> bool {
        let added = self.state().add_connection(peer);
        if added {
            info!("Peer {} connected", peer);
        }
        added
    }

    pub fn remove_connection(&self, peer: &PeerId) -> bool {
        let removed = self.state().remove_connection(peer);
        if !removed {
            warn!("Peer {} was not connected", peer);
        }
        removed
    }

    pub fn connections(&self) -> Vec<PeerId> {
        self.state().connections.clone()
    }

    pub fn is_connected(&self, peer: &PeerId) -> bool {
        self.state().connections.contains(peer)
    }

    // Queries

    pub fn spawned_ids(&self) -> Vec<NetworkId> {
        self.state().spawned.keys().copied().collect()
    }

    pub fn spawned_count(&self) -> usize {
        self.state().spawned.len()
    }

    pub fn is_spawned(&self, network_id: NetworkId) -> bool {
        self.state().spawned.contains_key(&network_id)
    }

    pub fn spawned(&self, network_id: NetworkId) -> Option<SpawnedNetObject> {
        self.state().spawned.get(&network_id).cloned()
    }

    pub fn entity(&self, network_id: NetworkId) -> Option<Arc<dyn NetEntity>> {
        self.state()
            .spawned
            .get(&network_id)
            .map(|record| record.entity.clone())
    }

    pub fn object(&self, network_id: NetworkId) -> Option<NetObject> {
        self.state().objects.get(&network_id).cloned()
    }

    pub fn pending_destroy_count(&self) -> usize {
        self.state().pending_destroys.len()
    }

    /// True once `network_id` has been destroyed here or a Destroy for it
    /// has been received.
    pub fn was_destroyed(&self, network_id: NetworkId) -> bool {
        self.state().destroyed.contains(&network_id)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

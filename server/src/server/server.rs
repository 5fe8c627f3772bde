use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::{debug, info};

use replica_shared::{
    DeliveryClass, HostType, InstantiateError, NetworkId, Owner, PacketError, PeerId, Protocol,
    RpcError, Scope, Session, Transport, WireValue,
};

use crate::{
    protector::{NetProtector, PeerRecord},
    ServerConfig,
};

/// The authoritative side of a replica session.
///
/// Wraps a server `Session` and the `NetProtector`. The transport calls
/// `peer_connected`, `peer_disconnected` and `receive` from its own thread;
/// the application calls `tick` once per simulation step.
pub struct Server {
    session: Session,
    protector: Mutex<NetProtector>,
}

impl Server {
    /// Create a new Server
    pub fn new(protocol: Protocol, config: ServerConfig, transport: Arc<dyn Transport>) -> Self {
        let ServerConfig { session, protector } = config;
        Self {
            session: Session::new(HostType::Server, protocol, session, transport),
            protector: Mutex::new(NetProtector::new(protector)),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // Connections

    /// Registers a new peer and replays every live spawn to it. A repeated
    /// connect for an already connected peer is ignored.
    pub fn peer_connected(&self, peer: &PeerId) {
        if !self.session.add_connection(peer) {
            debug!("Peer {} is already connected, skipping replay", peer);
            return;
        }
        self.protector().on_peer_connected(peer);
        let replayed = self.session.replay_spawns(peer);
        info!("Replayed {} spawned objects to {}", replayed, peer);
    }

    pub fn peer_disconnected(&self, peer: &PeerId, reason: &str) {
        self.session.remove_connection(peer);
        self.protector().on_peer_disconnected(peer);
        info!("Peer {} disconnected: {}", peer, reason);
    }

    // Incoming

    /// Processes one datagram. Failures are reported against the sender,
    /// which may get it kicked, and then handed back to the caller.
    pub fn receive(
        &self,
        peer: &PeerId,
        bytes: &[u8],
        delivery: DeliveryClass,
    ) -> Result<(), PacketError> {
        let result = self.session.receive(peer, bytes, delivery);
        if let Err(error) = &result {
            self.report(peer, error);
        }
        result
    }

    fn report(&self, peer: &PeerId, error: &PacketError) {
        if error.is_warning() {
            self.protector().report_warning(peer, error);
            return;
        }
        let kick = self.protector().report_error(peer, error);
        if let Some(kick) = kick {
            self.session.transport().disconnect(&kick.peer, kick.reason);
        }
    }

    // Tick

    pub fn tick(&self, delta: Duration) {
        self.protector().update(delta);
        self.session.update(delta);
    }

    // Replication

    pub fn spawn(
        &self,
        key: &str,
        owner: Owner,
        args: Vec<WireValue>,
    ) -> Result<NetworkId, InstantiateError> {
        self.session.spawn(key, owner, args)
    }

    pub fn destroy(&self, network_id: NetworkId) -> Result<(), InstantiateError> {
        self.session.destroy(network_id)
    }

    /// Sends a client-bound RPC.
    pub fn send_rpc(
        &self,
        target: NetworkId,
        method: &str,
        delivery: DeliveryClass,
        channel: u8,
        scope: Scope,
        args: &[WireValue],
    ) -> Result<(), RpcError> {
        self.session
            .send_rpc(target, method, delivery, channel, scope, args)
    }

    // Abuse mitigation

    pub fn peer_record(&self, peer: &PeerId) -> Option<PeerRecord> {
        self.protector().record(peer).cloned()
    }

    /// Number of peers the protector is tracking.
    pub fn protected_peer_count(&self) -> usize {
        self.protector().peer_count()
    }

    fn protector(&self) -> MutexGuard<'_, NetProtector> {
        self.protector.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

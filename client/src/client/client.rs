use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::{info, warn};

use replica_shared::{
    DeliveryClass, HostType, NetworkId, PeerId, Protocol, Scope, Session, Transport, WireValue,
};

use crate::{ClientConfig, ClientError};

/// The mirroring side of a replica session.
///
/// Entities arrive through the built-in Instantiate and Destroy calls; the
/// client never allocates ids or spawns on its own.
pub struct Client {
    session: Session,
    server: Mutex<Option<PeerId>>,
}

impl Client {
    /// Create a new Client
    pub fn new(protocol: Protocol, config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            session: Session::new(HostType::Client, protocol, config.session, transport),
            server: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn connected(&self, server: &PeerId) {
        if let Some(previous) = self.server().replace(server.clone()) {
            self.session.remove_connection(&previous);
        }
        self.session.add_connection(server);
    }

    pub fn disconnected(&self, reason: &str) {
        let Some(server) = self.server().take() else {
            return;
        };
        self.session.remove_connection(&server);
        info!("Disconnected from {}: {}", server, reason);
    }

    pub fn is_connected(&self) -> bool {
        self.server().is_some()
    }

    pub fn server_id(&self) -> Option<PeerId> {
        self.server().clone()
    }

    /// Processes one datagram from the server. Protocol errors are logged
    /// and returned.
    pub fn receive(&self, bytes: &[u8], delivery: DeliveryClass) -> Result<(), ClientError> {
        let Some(server) = self.server_id() else {
            return Err(ClientError::NotConnected);
        };
        self.session
            .receive(&server, bytes, delivery)
            .map_err(|error| {
                warn!("Dropping packet from {}: {}", server, error);
                ClientError::from(error)
            })
    }

    pub fn tick(&self, delta: Duration) {
        self.session.update(delta);
    }

    /// Sends a server-bound RPC to the server.
    pub fn send_rpc(
        &self,
        target: NetworkId,
        method: &str,
        delivery: DeliveryClass,
        channel: u8,
        args: &[WireValue],
    ) -> Result<(), ClientError> {
        let Some(server) = self.server_id() else {
            return Err(ClientError::NotConnected);
        };
        self.session
            .send_rpc(target, method, delivery, channel, Scope::Unicast(server), args)?;
        Ok(())
    }

    fn server(&self) -> MutexGuard<'_, Option<PeerId>> {
        self.server.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

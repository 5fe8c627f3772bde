use std::sync::Arc;

use replica_server::{Server, ServerConfig};
use replica_shared::{NetworkId, Owner, PeerId, Session, Vec2, WireValue};

use crate::{
    local_transport::LocalHub,
    test_protocol::{protocol, Ball, RpcLog, BALL},
};

use super::with_entity;

pub const SERVER_ID: &str = "server";

/// Test harness for Server
pub struct TestServer {
    server: Server,
    log: Arc<RpcLog>,
    id: PeerId,
}

impl TestServer {
    pub fn new(hub: &LocalHub) -> Self {
        Self::with_config(hub, ServerConfig::default())
    }

    pub fn with_config(hub: &LocalHub, config: ServerConfig) -> Self {
        let id = PeerId::new(SERVER_ID);
        let log = RpcLog::new();
        let server = Server::new(protocol(log.clone()), config, hub.endpoint(&id));
        Self { server, log, id }
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn session(&self) -> &Session {
        self.server.session()
    }

    pub fn log(&self) -> &Arc<RpcLog> {
        &self.log
    }

    pub fn id(&self) -> &PeerId {
        &self.id
    }

    pub fn spawn_ball(&self, position: Vec2, owner: Owner) -> NetworkId {
        let args = vec![WireValue::F32(position.x), WireValue::F32(position.y)];
        match self.server.spawn(BALL, owner, args) {
            Ok(network_id) => network_id,
            Err(error) => panic!("failed to spawn ball: {}", error),
        }
    }

    pub fn with_ball<R>(&self, network_id: NetworkId, f: impl FnOnce(&Ball) -> R) -> Option<R> {
        with_entity(self.session(), network_id, f)
    }
}

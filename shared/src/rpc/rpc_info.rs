use std::fmt;

use replica_serde::WireType;

use crate::{HostType, MethodId};

/// Which side executes a method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RpcDirection {
    /// Sent by clients, executed by the server
    ServerBound,
    /// Sent by the server, executed by clients
    ClientBound,
}

impl RpcDirection {
    pub fn executed_by(host: HostType) -> Self {
        match host {
            HostType::Server => RpcDirection::ServerBound,
            HostType::Client => RpcDirection::ClientBound,
        }
    }

    pub fn sent_by(host: HostType) -> Self {
        Self::executed_by(host.invert())
    }
}

impl fmt::Display for RpcDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcDirection::ServerBound => f.write_str("server-bound"),
            RpcDirection::ClientBound => f.write_str("client-bound"),
        }
    }
}

/// How the server re-sends a server-bound call to clients after running it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Relay {
    #[default]
    None,
    AllClients,
    AllClientsExceptSender,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RpcOptions {
    pub relay: Relay,
}

impl RpcOptions {
    pub fn relay(relay: Relay) -> Self {
        Self { relay }
    }
}

/// Immutable metadata of one registered method
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcInfo {
    pub id: MethodId,
    pub name: String,
    pub direction: RpcDirection,
    pub params: Vec<WireType>,
    pub options: RpcOptions,
}

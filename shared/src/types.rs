use std::fmt;

use replica_serde::{ConstByteLength, Serde, SerdeErr, StreamReader, StreamWriter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

impl HostType {
    pub fn invert(self) -> Self {
        match self {
            HostType::Server => HostType::Client,
            HostType::Client => HostType::Server,
        }
    }

    pub fn is_server(self) -> bool {
        self == HostType::Server
    }
}

/// Session-unique identifier of a replicated object.
/// Allocated by the server only, starting at 1. Id 0 addresses the session
/// itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(u32);

impl NetworkId {
    pub const SESSION: NetworkId = NetworkId(0);
    pub const FIRST: NetworkId = NetworkId(1);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub fn is_session(self) -> bool {
        self == Self::SESSION
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serde for NetworkId {
    const MIN_BYTE_LENGTH: usize = 4;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        self.0.ser(writer)
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        Ok(Self(u32::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        4
    }
}

impl ConstByteLength for NetworkId {
    fn const_byte_length() -> usize {
        4
    }
}

/// Unique id the transport assigns to a connected peer
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The participant allowed to drive a spawned entity
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    Server,
    Peer(PeerId),
}

impl Owner {
    pub const SERVER_ID: &'static str = "SERVER";

    /// Whether `peer` is the owner. Never true for server-owned entities.
    pub fn is_peer(&self, peer: &PeerId) -> bool {
        matches!(self, Owner::Peer(owner) if owner == peer)
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Owner::Server)
    }
}

impl From<PeerId> for Owner {
    fn from(peer: PeerId) -> Self {
        if peer.as_str() == Self::SERVER_ID {
            Owner::Server
        } else {
            Owner::Peer(peer)
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Server => f.write_str(Self::SERVER_ID),
            Owner::Peer(peer) => write!(f, "{}", peer),
        }
    }
}

/// Transport-level guarantee requested per send
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryClass {
    Unreliable,
    Sequenced,
    ReliableUnordered,
    ReliableOrdered,
}

impl DeliveryClass {
    pub fn is_reliable(self) -> bool {
        matches!(
            self,
            DeliveryClass::ReliableUnordered | DeliveryClass::ReliableOrdered
        )
    }
}

/// Addressing mode of an outgoing packet
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    Unicast(PeerId),
    Broadcast,
    BroadcastExcept(PeerId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(u16);

impl MethodId {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serde for MethodId {
    const MIN_BYTE_LENGTH: usize = 2;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        self.0.ser(writer)
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        Ok(Self(u16::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        2
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PacketTag(u16);

impl PacketTag {
    pub const RPC: PacketTag = PacketTag(0);

    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for PacketTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serde for PacketTag {
    const MIN_BYTE_LENGTH: usize = 2;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        self.0.ser(writer)
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        Ok(Self(u16::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        2
    }
}

//! # Replica Shared
//! Common functionality shared between replica-server & replica-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use replica_serde::{
    read_tagged, read_tagged_all, write_tagged, ConstByteLength, Serde, SerdeErr, StreamReader,
    StreamWriter, Vec2, WireType, WireValue,
};

mod instantiator;
mod packets;
mod pool;
mod protocol;
mod rpc;
mod session;
mod transport;
mod types;
mod world;

pub use instantiator::{
    builtin::{
        InstantiateMessage, DESTROY_PARAMS, DESTROY_RPC, INSTANTIATE_PARAMS, INSTANTIATE_RPC,
    },
    error::InstantiateError,
    pending_destroys::{PendingDestroys, PendingDrain},
    spawnable::{Capabilities, Constructor, SpawnableDescriptor, Spawnables},
    spawned_net_object::SpawnedNetObject,
};
pub use packets::{
    error::PacketError,
    packet_header::PacketHeader,
    packet_processor::{IncomingPacket, PacketProcessor},
    packet_processors::PacketProcessors,
};
pub use pool::{BufferPool, PoolStats, PooledReader, PooledWriter};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin};
pub use rpc::{
    arg, HandlerError, Relay, RpcContext, RpcDirection, RpcEntry, RpcError, RpcHandler, RpcInfo,
    RpcOptions, RpcProcessor, RpcTable,
};
pub use session::{Session, SessionConfig};
pub use transport::{Transport, TransportError};
pub use types::{
    DeliveryClass, HostType, MethodId, NetworkId, Owner, PacketTag, PeerId, Scope,
};
pub use world::{
    error::AnchorError,
    net_object::{NetComponent, NetEntity, NetObject},
    net_slot::NetSlot,
    replication_anchor::{ReplicationAnchor, SetupCallback, StateRestorer, StateSerializer},
    snapshot::{decode_snapshot, encode_snapshot, ComponentSnapshot},
};

//! # Replica Server
//! The authoritative side of a replica session: spawns and destroys
//! replicated entities, replays them to late joiners and kicks peers that
//! keep sending malformed or hostile packets.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use replica_shared::{
        Capabilities, DeliveryClass, NetworkId, Owner, PeerId, Protocol, Relay, RpcContext,
        RpcOptions, Scope, Serde, SerdeErr, Transport, Vec2, WireType, WireValue,
    };
}

mod protector;
mod server;

pub use protector::{Kick, NetProtector, PeerRecord, ProtectorConfig, KICK_REASON};
pub use server::{Server, ServerConfig};

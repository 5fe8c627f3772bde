//! # Replica Client
//! Mirrors the entities a replica server spawns and sends server-bound
//! RPCs over the connection to it.

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

mod client;
mod error;

pub use client::{Client, ClientConfig};
pub use error::ClientError;

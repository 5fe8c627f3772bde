//! # Replica Serde
//! Byte-level wire codec shared by the replica RPC and replication layers.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod error;
mod serde;
mod stream_reader;
mod stream_writer;
mod vector;
mod wire_value;

pub use error::SerdeErr;
pub use serde::{ConstByteLength, Serde};
pub use stream_reader::StreamReader;
pub use stream_writer::StreamWriter;
pub use vector::Vec2;
pub use wire_value::{
    read, read_tagged, read_tagged_all, write, write_tagged, WireType, WireValue,
};

pub mod error;
pub mod net_object;
pub mod net_slot;
pub mod replication_anchor;
pub mod snapshot;

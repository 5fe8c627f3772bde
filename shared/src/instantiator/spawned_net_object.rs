use std::sync::Arc;

use replica_serde::WireValue;

use crate::{
    instantiator::spawnable::Capabilities, world::net_object::NetEntity, NetworkId, Owner,
};

/// Live record of a spawned entity, one per network id on every participant
/// that knows it.
#[derive(Clone)]
pub struct SpawnedNetObject {
    pub network_id: NetworkId,
    pub entity: Arc<dyn NetEntity>,
    pub key: String,
    /// Known on the server only
    pub owner: Option<Owner>,
    pub is_owner: bool,
    pub spawn_args: Vec<WireValue>,
    pub capabilities: Capabilities,
}

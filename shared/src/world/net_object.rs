use std::{any::Any, sync::Arc};

use replica_serde::{SerdeErr, WireValue};

use crate::{
    world::{net_slot::NetSlot, replication_anchor::ReplicationAnchor},
    NetworkId,
};

/// An entity that can be spawned and mirrored across the session.
pub trait NetEntity: Send + Sync + 'static {
    fn anchor(&self) -> &ReplicationAnchor;

    /// Network-aware sub-components, in a stable order. Server and client
    /// must enumerate them identically; ids and state bind positionally.
    fn net_components(&self) -> Vec<Arc<dyn NetComponent>> {
        Vec::new()
    }

    /// Current constructor arguments, sent instead of the original spawn
    /// arguments when replaying to late joiners.
    fn instantiate_parameters(&self) -> Option<Vec<WireValue>> {
        None
    }

    fn on_instantiated_server(&self) {}

    fn on_instantiated_client(&self) {}

    /// Local teardown. Runs at most once per entity.
    fn on_destroyed(&self) {}

    fn as_any(&self) -> &dyn Any;
}

/// A sub-component with its own network id, addressable by RPCs.
pub trait NetComponent: Send + Sync + 'static {
    fn net_slot(&self) -> &NetSlot;

    fn serialize_state(&self) -> Option<Vec<u8>> {
        None
    }

    fn restore_state(&self, _state: &[u8]) -> Result<(), SerdeErr> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
}

/// Entry of the session's id lookup
#[derive(Clone)]
pub enum NetObject {
    Entity(Arc<dyn NetEntity>),
    Component(Arc<dyn NetComponent>),
}

impl NetObject {
    pub fn network_id(&self) -> Option<NetworkId> {
        match self {
            NetObject::Entity(entity) => entity.anchor().network_id(),
            NetObject::Component(component) => component.net_slot().network_id(),
        }
    }

    pub fn is_owner(&self) -> bool {
        match self {
            NetObject::Entity(entity) => entity.anchor().is_owner(),
            NetObject::Component(component) => component.net_slot().is_owner(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            NetObject::Entity(entity) => entity.as_any().downcast_ref::<T>(),
            NetObject::Component(component) => component.as_any().downcast_ref::<T>(),
        }
    }

    pub fn as_entity(&self) -> Option<&Arc<dyn NetEntity>> {
        match self {
            NetObject::Entity(entity) => Some(entity),
            NetObject::Component(_) => None,
        }
    }
}

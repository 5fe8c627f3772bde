use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use log::trace;

use replica_serde::SerdeErr;

use crate::{
    world::{error::AnchorError, net_slot::NetSlot},
    NetworkId,
};

pub type StateSerializer = Box<dyn Fn() -> Vec<u8> + Send + Sync>;
pub type StateRestorer = Box<dyn Fn(&[u8]) -> Result<(), SerdeErr> + Send + Sync>;
pub type SetupCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Network identity of a replicated entity.
///
/// Holds the entity's own slot plus the ids handed to its network-aware
/// sub-components, in enumeration order.
#[derive(Default)]
pub struct ReplicationAnchor {
    slot: NetSlot,
    component_ids: Mutex<Vec<NetworkId>>,
    serialize_state: Option<StateSerializer>,
    restore_state: Option<StateRestorer>,
    on_setup: Option<SetupCallback>,
    destroyed: AtomicBool,
}

impl ReplicationAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches custom state callbacks used for persisted state replication.
    pub fn with_state<S, R>(mut self, serialize: S, restore: R) -> Self
    where
        S: Fn() -> Vec<u8> + Send + Sync + 'static,
        R: Fn(&[u8]) -> Result<(), SerdeErr> + Send + Sync + 'static,
    {
        self.serialize_state = Some(Box::new(serialize));
        self.restore_state = Some(Box::new(restore));
        self
    }

    /// Runs once the anchor is bound, with the local owner flag.
    pub fn with_on_setup<F>(mut self, on_setup: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_setup = Some(Box::new(on_setup));
        self
    }

    /// Binds the anchor. A non-empty `state` is handed to the restore
    /// callback, if any, before `on_setup` fires.
    pub fn setup(&self, network_id: NetworkId, is_owner: bool, state: &[u8]) -> Result<(), AnchorError> {
        self.slot.setup(network_id, is_owner)?;
        trace!("Anchor bound to Network ID {} (owner: {})", network_id, is_owner);

        if !state.is_empty() {
            if let Some(restore) = &self.restore_state {
                restore(state).map_err(|source| AnchorError::StateRestore { network_id, source })?;
            }
        }

        if let Some(on_setup) = &self.on_setup {
            on_setup(is_owner);
        }
        Ok(())
    }

    pub fn slot(&self) -> &NetSlot {
        &self.slot
    }

    pub fn network_id(&self) -> Option<NetworkId> {
        self.slot.network_id()
    }

    pub fn is_owner(&self) -> bool {
        self.slot.is_owner()
    }

    pub fn is_bound(&self) -> bool {
        self.slot.is_bound()
    }

    /// Serialized custom state, empty when the anchor has none.
    pub fn serialize_state(&self) -> Vec<u8> {
        self.serialize_state
            .as_ref()
            .map(|serialize| serialize())
            .unwrap_or_default()
    }

    pub fn has_state(&self) -> bool {
        self.serialize_state.is_some()
    }

    pub fn component_ids(&self) -> Vec<NetworkId> {
        self.component_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The anchor's own id followed by its sub-component ids.
    pub fn owned_ids(&self) -> Vec<NetworkId> {
        let mut ids = Vec::new();
        if let Some(network_id) = self.network_id() {
            ids.push(network_id);
        }
        ids.extend(self.component_ids());
        ids
    }

    pub(crate) fn set_component_ids(&self, ids: Vec<NetworkId>) {
        *self
            .component_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = ids;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Latches the destroyed flag. Returns true only for the first caller.
    pub(crate) fn mark_destroyed(&self) -> bool {
        !self.destroyed.swap(true, Ordering::AcqRel)
    }
}

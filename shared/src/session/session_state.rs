use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use crate::{
    instantiator::{pending_destroys::PendingDestroys, spawned_net_object::SpawnedNetObject},
    world::net_object::{NetEntity, NetObject},
    NetworkId, PeerId,
};

/// Everything guarded by the session lock
pub(crate) struct SessionState {
    next_id: u32,
    pub(crate) objects: HashMap<NetworkId, NetObject>,
    pub(crate) spawned: BTreeMap<NetworkId, SpawnedNetObject>,
    pub(crate) connections: Vec<PeerId>,
    pub(crate) pending_destroys: PendingDestroys,
    // Ids are never reused, so a destroyed id stays dead for the session.
    pub(crate) destroyed: HashSet<NetworkId>,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            next_id: NetworkId::FIRST.get(),
            objects: HashMap::new(),
            spawned: BTreeMap::new(),
            connections: Vec::new(),
            pending_destroys: PendingDestroys::new(),
            destroyed: HashSet::new(),
        }
    }

    /// Allocates one id for an anchor and one per sub-component.
    /// Ids are never reused.
    pub(crate) fn allocate_ids(&mut self, components: usize) -> Option<(NetworkId, Vec<NetworkId>)> {
        let count = u32::try_from(components).ok()?.checked_add(1)?;
        let first = self.next_id;
        self.next_id = first.checked_add(count)?;

        let anchor_id = NetworkId::new(first);
        let component_ids = (first + 1..self.next_id).map(NetworkId::new).collect();
        Some((anchor_id, component_ids))
    }

    /// Adds the entity and its bound sub-components to the id lookup.
    pub(crate) fn register_entity(&mut self, entity: &Arc<dyn NetEntity>) {
        if let Some(network_id) = entity.anchor().network_id() {
            self.objects
                .insert(network_id, NetObject::Entity(entity.clone()));
        }
        for component in entity.net_components() {
            if let Some(network_id) = component.net_slot().network_id() {
                self.objects
                    .insert(network_id, NetObject::Component(component));
            }
        }
    }

    /// Drops the record and every id it owns from the lookup.
    pub(crate) fn remove_spawned(&mut self, network_id: NetworkId) -> Option<SpawnedNetObject> {
        let record = self.spawned.remove(&network_id)?;
        self.destroyed.insert(network_id);
        self.objects.remove(&network_id);
        for component_id in record.entity.anchor().component_ids() {
            self.objects.remove(&component_id);
        }
        Some(record)
    }

    /// True once a Destroy for `network_id` has been seen and no buffered
    /// destroy is still waiting to be applied to it.
    pub(crate) fn is_tombstoned(&self, network_id: NetworkId) -> bool {
        self.destroyed.contains(&network_id) && !self.pending_destroys.contains(network_id)
    }

    pub(crate) fn add_connection(&mut self, peer: &PeerId) -> bool {
        if self.connections.contains(peer) {
            return false;
        }
        self.connections.push(peer.clone());
        true
    }

    pub(crate) fn remove_connection(&mut self, peer: &PeerId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|connection| connection != peer);
        self.connections.len() != before
    }
}

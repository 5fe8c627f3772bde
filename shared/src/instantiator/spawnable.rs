use std::{collections::HashMap, sync::Arc};

use replica_serde::WireValue;

use crate::{protocol::ProtocolError, rpc::HandlerError, world::net_object::NetEntity};

pub type Constructor =
    Box<dyn Fn(&[WireValue]) -> Result<Arc<dyn NetEntity>, HandlerError> + Send + Sync>;

/// Optional behaviours of a spawnable, resolved once at registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Late joiners receive `NetEntity::instantiate_parameters` instead of
    /// the original spawn arguments
    pub instantiatable: bool,
    /// The anchor's state callbacks are replicated in the state blob
    pub persistable: bool,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn instantiatable() -> Self {
        Self {
            instantiatable: true,
            persistable: false,
        }
    }

    pub fn persistable() -> Self {
        Self {
            instantiatable: false,
            persistable: true,
        }
    }

    pub fn all() -> Self {
        Self {
            instantiatable: true,
            persistable: true,
        }
    }
}

pub struct SpawnableDescriptor {
    key: String,
    capabilities: Capabilities,
    constructor: Constructor,
}

impl SpawnableDescriptor {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn construct(&self, args: &[WireValue]) -> Result<Arc<dyn NetEntity>, HandlerError> {
        (self.constructor)(args)
    }
}

/// Registry of spawnable keys
#[derive(Default)]
pub struct Spawnables {
    descriptors: HashMap<String, SpawnableDescriptor>,
}

impl Spawnables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        key: &str,
        capabilities: Capabilities,
        constructor: Constructor,
    ) -> Result<(), ProtocolError> {
        if self.descriptors.contains_key(key) {
            return Err(ProtocolError::DuplicateSpawnable {
                key: key.to_string(),
            });
        }
        self.descriptors.insert(
            key.to_string(),
            SpawnableDescriptor {
                key: key.to_string(),
                capabilities,
                constructor,
            },
        );
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&SpawnableDescriptor> {
        self.descriptors.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.descriptors.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

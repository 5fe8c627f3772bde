use std::collections::HashMap;

use replica_serde::{WireType, WireValue};

use crate::{
    protocol::ProtocolError,
    rpc::{RpcContext, RpcDirection, RpcInfo, RpcOptions},
    MethodId,
};

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
pub type RpcHandler =
    Box<dyn Fn(&RpcContext<'_>, &[WireValue]) -> Result<(), HandlerError> + Send + Sync>;

pub struct RpcEntry {
    info: RpcInfo,
    handler: RpcHandler,
}

impl RpcEntry {
    pub fn info(&self) -> &RpcInfo {
        &self.info
    }

    pub fn invoke(&self, context: &RpcContext<'_>, args: &[WireValue]) -> Result<(), HandlerError> {
        (self.handler)(context, args)
    }
}

/// Methods of one direction, indexed by id (registration order) and name
pub struct RpcTable {
    direction: RpcDirection,
    entries: Vec<RpcEntry>,
    ids: HashMap<String, MethodId>,
}

impl RpcTable {
    pub fn new(direction: RpcDirection) -> Self {
        Self {
            direction,
            entries: Vec::new(),
            ids: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: &str,
        params: &[WireType],
        options: RpcOptions,
        handler: RpcHandler,
    ) -> Result<MethodId, ProtocolError> {
        if self.ids.contains_key(name) {
            return Err(ProtocolError::DuplicateMethod {
                name: name.to_string(),
                direction: self.direction,
            });
        }
        let Ok(index) = u16::try_from(self.entries.len()) else {
            return Err(ProtocolError::TooManyMethods {
                direction: self.direction,
            });
        };
        let id = MethodId::new(index);
        self.ids.insert(name.to_string(), id);
        self.entries.push(RpcEntry {
            info: RpcInfo {
                id,
                name: name.to_string(),
                direction: self.direction,
                params: params.to_vec(),
                options,
            },
            handler,
        });
        Ok(id)
    }

    pub fn direction(&self) -> RpcDirection {
        self.direction
    }

    pub fn get(&self, id: MethodId) -> Option<&RpcEntry> {
        self.entries.get(usize::from(id.get()))
    }

    pub fn by_name(&self, name: &str) -> Option<&RpcEntry> {
        self.ids.get(name).and_then(|id| self.get(*id))
    }

    pub fn id_of(&self, name: &str) -> Option<MethodId> {
        self.ids.get(name).copied()
    }

    pub fn infos(&self) -> impl Iterator<Item = &RpcInfo> {
        self.entries.iter().map(RpcEntry::info)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

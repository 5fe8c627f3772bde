use std::sync::{
    atomic::{AtomicBool, Ordering},
    OnceLock,
};

use crate::{world::error::AnchorError, NetworkId};

/// Identity cell of one network-aware object: its id and owner flag.
///
/// Starts unbound and transitions to bound exactly once.
#[derive(Debug, Default)]
pub struct NetSlot {
    network_id: OnceLock<NetworkId>,
    is_owner: AtomicBool,
}

impl NetSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(&self, network_id: NetworkId, is_owner: bool) -> Result<(), AnchorError> {
        if self.network_id.set(network_id).is_err() {
            return Err(AnchorError::AlreadyBound {
                network_id: self.network_id.get().copied().unwrap_or(network_id),
            });
        }
        self.is_owner.store(is_owner, Ordering::Release);
        Ok(())
    }

    pub fn network_id(&self) -> Option<NetworkId> {
        self.network_id.get().copied()
    }

    pub fn is_bound(&self) -> bool {
        self.network_id.get().is_some()
    }

    pub fn is_owner(&self) -> bool {
        self.is_owner.load(Ordering::Acquire)
    }
}

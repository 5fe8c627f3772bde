use std::time::Duration;

use crate::NetworkId;

struct PendingDestroy {
    network_id: NetworkId,
    age: Duration,
}

/// Destroys that arrived before their Instantiate
#[derive(Default)]
pub struct PendingDestroys {
    entries: Vec<PendingDestroy>,
}

/// Result of one ageing pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PendingDrain {
    /// Ids whose entity is now live and should be torn down
    pub ready: Vec<NetworkId>,
    /// Ids that waited longer than the timeout and were dropped
    pub expired: Vec<NetworkId>,
}

impl PendingDestroys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers `network_id`. Returns false if it was already buffered.
    pub fn insert(&mut self, network_id: NetworkId) -> bool {
        if self.contains(network_id) {
            return false;
        }
        self.entries.push(PendingDestroy {
            network_id,
            age: Duration::ZERO,
        });
        true
    }

    pub fn remove(&mut self, network_id: NetworkId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.network_id != network_id);
        self.entries.len() != before
    }

    pub fn contains(&self, network_id: NetworkId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.network_id == network_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collects ready and expired ids first, then removes them in a second
    /// pass, so no entry is skipped or visited twice.
    pub fn drain(
        &mut self,
        delta: Duration,
        timeout: Duration,
        is_live: impl Fn(NetworkId) -> bool,
    ) -> PendingDrain {
        let mut drained = PendingDrain::default();
        for entry in &mut self.entries {
            if is_live(entry.network_id) {
                drained.ready.push(entry.network_id);
                continue;
            }
            entry.age += delta;
            if entry.age >= timeout {
                drained.expired.push(entry.network_id);
            }
        }

        if !drained.ready.is_empty() || !drained.expired.is_empty() {
            self.entries.retain(|entry| {
                !drained.ready.contains(&entry.network_id)
                    && !drained.expired.contains(&entry.network_id)
            });
        }
        drained
    }
}

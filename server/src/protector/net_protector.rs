use std::{collections::HashMap, fmt::Display, time::Duration};

use log::{info, warn};

use replica_shared::PeerId;

use crate::protector::{peer_record::PeerRecord, protector_config::ProtectorConfig};

pub const KICK_REASON: &str = "Exception threshold reached.";

// Summing 1/threshold `threshold` times can land a hair under 1.0.
const KICK_EPSILON: f64 = 1e-9;

/// Instruction to disconnect a peer, issued at most once per peer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kick {
    pub peer: PeerId,
    pub reason: &'static str,
}

/// Tracks protocol errors per peer and decides when a peer must be kicked.
pub struct NetProtector {
    config: ProtectorConfig,
    peers: HashMap<PeerId, PeerRecord>,
}

impl NetProtector {
    pub fn new(config: ProtectorConfig) -> Self {
        Self {
            config,
            peers: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ProtectorConfig {
        &self.config
    }

    pub fn on_peer_connected(&mut self, peer: &PeerId) {
        self.peers.entry(peer.clone()).or_default();
    }

    pub fn on_peer_disconnected(&mut self, peer: &PeerId) -> Option<PeerRecord> {
        self.peers.remove(peer)
    }

    /// Counts an error against `peer`. Returns a kick when the accumulator
    /// fills, kicking is enabled and the peer has not been kicked yet.
    pub fn report_error(&mut self, peer: &PeerId, cause: &dyn Display) -> Option<Kick> {
        let log_exceptions = self.config.log_exceptions;
        let Some(record) = self.peers.get_mut(peer) else {
            if log_exceptions {
                warn!("Error from unknown peer {}: {}", peer, cause);
            }
            return None;
        };

        record.total_errors += 1;
        let threshold = self.config.kick_exception_threshold.max(1);
        record.kick_threshold += 1.0 / f64::from(threshold);
        if log_exceptions {
            warn!(
                "Error from peer {} ({} total): {}",
                peer, record.total_errors, cause
            );
        }

        if !self.config.kick_peers || record.kicked || record.kick_threshold < 1.0 - KICK_EPSILON {
            return None;
        }
        record.kicked = true;
        info!("Kicking peer {}: {}", peer, KICK_REASON);
        Some(Kick {
            peer: peer.clone(),
            reason: KICK_REASON,
        })
    }

    /// Bookkeeping only, never leads to a kick.
    pub fn report_warning(&mut self, peer: &PeerId, cause: &dyn Display) {
        let log_exceptions = self.config.log_exceptions;
        let Some(record) = self.peers.get_mut(peer) else {
            if log_exceptions {
                warn!("Warning from unknown peer {}: {}", peer, cause);
            }
            return;
        };
        record.total_warnings += 1;
        if log_exceptions {
            warn!(
                "Warning from peer {} ({} total): {}",
                peer, record.total_warnings, cause
            );
        }
    }

    /// Decays every accumulator toward zero.
    pub fn update(&mut self, delta: Duration) {
        let decay = delta.as_secs_f64() * self.config.decay_per_second;
        for record in self.peers.values_mut() {
            record.kick_threshold = (record.kick_threshold - decay).max(0.0);
        }
    }

    pub fn record(&self, peer: &PeerId) -> Option<&PeerRecord> {
        self.peers.get(peer)
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}

impl Default for NetProtector {
    fn default() -> Self {
        Self::new(ProtectorConfig::default())
    }
}

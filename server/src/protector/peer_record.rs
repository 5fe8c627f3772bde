/// Abuse bookkeeping for one connected peer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeerRecord {
    pub total_errors: u64,
    pub total_warnings: u64,
    /// Decaying accumulator; the peer is kicked when it reaches 1.0
    pub kick_threshold: f64,
    pub kicked: bool,
}

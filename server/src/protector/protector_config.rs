use std::default::Default;

/// Contains Config properties which will be used by the NetProtector
#[derive(Clone, Debug)]
pub struct ProtectorConfig {
    /// Whether a peer is disconnected once its error accumulator reaches 1.0
    pub kick_peers: bool,
    /// Whether reported errors and warnings are logged
    pub log_exceptions: bool,
    /// Number of errors, with no decay in between, that fills the accumulator
    pub kick_exception_threshold: u32,
    /// Amount subtracted from each accumulator per second of tick time
    pub decay_per_second: f64,
}

impl Default for ProtectorConfig {
    fn default() -> Self {
        Self {
            kick_peers: false,
            log_exceptions: true,
            kick_exception_threshold: 360,
            decay_per_second: 1.0 / 60.0,
        }
    }
}

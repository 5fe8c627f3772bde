use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by a Session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Channel used for the built-in Instantiate and Destroy calls
    pub instantiate_channel: u8,
    /// Channel used when the server relays a server-bound call to clients
    pub relay_channel: u8,
    /// How long a Destroy that arrived before its Instantiate is kept before
    /// being dropped
    pub pending_destroy_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            instantiate_channel: 1,
            relay_channel: 0,
            pending_destroy_timeout: Duration::from_secs(30),
        }
    }
}

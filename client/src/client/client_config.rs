use replica_shared::SessionConfig;

/// Contains Config properties which will be used by the Client
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Used to configure the replication session
    pub session: SessionConfig,
}

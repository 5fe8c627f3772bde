use replica_shared::SessionConfig;

use crate::protector::ProtectorConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Used to configure the replication session
    pub session: SessionConfig,
    /// Configuration used to detect and kick abusive peers
    pub protector: ProtectorConfig,
}

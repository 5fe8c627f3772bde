mod net_protector;
pub use net_protector::{Kick, NetProtector, KICK_REASON};

mod peer_record;
pub use peer_record::PeerRecord;

mod protector_config;
pub use protector_config::ProtectorConfig;

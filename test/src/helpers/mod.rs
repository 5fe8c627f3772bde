pub mod test_server;

pub use packet_exchange::{
    connect, deliver_to_client, deliver_to_server, disconnect, exchange_packets, tick_and_exchange,
};
pub use raw_packets::{instantiate_packet, rpc_packet, tagged_args};
pub use test_client::TestClient;
pub use test_server::{TestServer, SERVER_ID};

use std::any::Any;

use replica_shared::{NetworkId, Session};

/// Runs `f` against the spawned entity `network_id` if it is a `T`.
pub fn with_entity<T: Any, R>(
    session: &Session,
    network_id: NetworkId,
    f: impl FnOnce(&T) -> R,
) -> Option<R> {
    let entity = session.entity(network_id)?;
    let typed = entity.as_any().downcast_ref::<T>()?;
    Some(f(typed))
}

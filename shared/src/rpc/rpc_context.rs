use std::any::Any;

use crate::{rpc::RpcInfo, world::net_object::NetObject, DeliveryClass, NetworkId, PeerId, Session};

/// Everything a handler can see about the call being executed
pub struct RpcContext<'a> {
    pub session: &'a Session,
    pub sender: &'a PeerId,
    pub network_id: NetworkId,
    /// `None` when the call addresses the session itself
    pub target: Option<NetObject>,
    pub delivery: DeliveryClass,
    pub info: &'a RpcInfo,
}

impl RpcContext<'_> {
    pub fn target_as<T: Any>(&self) -> Option<&T> {
        self.target.as_ref()?.downcast_ref::<T>()
    }
}

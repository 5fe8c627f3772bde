use replica_serde::{WireType, WireValue};

use crate::{
    instantiator::orchestrator,
    protocol::{Protocol, ProtocolError},
    rpc::{arg, HandlerError, RpcContext, RpcOptions},
    NetworkId,
};

pub const INSTANTIATE_RPC: &str = "Instantiate";
pub const DESTROY_RPC: &str = "Destroy";

pub const INSTANTIATE_PARAMS: [WireType; 6] = [
    WireType::String,
    WireType::Bool,
    WireType::U32,
    WireType::U8Array,
    WireType::U8Array,
    WireType::U8Array,
];
pub const DESTROY_PARAMS: [WireType; 1] = [WireType::U32];

/// Decoded arguments of the built-in Instantiate call
#[derive(Clone, Debug, PartialEq)]
pub struct InstantiateMessage {
    pub key: String,
    pub is_owner: bool,
    pub network_id: NetworkId,
    pub state: Vec<u8>,
    pub buffered: Vec<u8>,
    /// Tagged constructor arguments
    pub args: Vec<u8>,
}

impl InstantiateMessage {
    pub fn from_args(args: &[WireValue]) -> Result<Self, HandlerError> {
        Ok(Self {
            key: arg(args, 0, WireValue::as_string)?.clone(),
            is_owner: *arg(args, 1, WireValue::as_bool)?,
            network_id: NetworkId::new(*arg(args, 2, WireValue::as_u32)?),
            state: arg(args, 3, WireValue::as_u8_array)?.clone(),
            buffered: arg(args, 4, WireValue::as_u8_array)?.clone(),
            args: arg(args, 5, WireValue::as_u8_array)?.clone(),
        })
    }
}

/// Registers Instantiate and Destroy ahead of any user method.
pub(crate) fn register(protocol: &mut Protocol) -> Result<(), ProtocolError> {
    protocol.try_add_client_rpc(
        INSTANTIATE_RPC,
        &INSTANTIATE_PARAMS,
        RpcOptions::default(),
        on_instantiate,
    )?;
    protocol.try_add_client_rpc(DESTROY_RPC, &DESTROY_PARAMS, RpcOptions::default(), on_destroy)?;
    Ok(())
}

fn on_instantiate(context: &RpcContext<'_>, args: &[WireValue]) -> Result<(), HandlerError> {
    let message = InstantiateMessage::from_args(args)?;
    orchestrator::receive_instantiate(context.session, message)?;
    Ok(())
}

fn on_destroy(context: &RpcContext<'_>, args: &[WireValue]) -> Result<(), HandlerError> {
    let network_id = NetworkId::new(*arg(args, 0, WireValue::as_u32)?);
    orchestrator::receive_destroy(context.session, network_id);
    Ok(())
}

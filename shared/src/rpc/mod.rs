mod error;
pub(crate) mod invoker;
mod rpc_context;
mod rpc_info;
mod rpc_processor;
mod rpc_table;

pub use error::RpcError;
pub use rpc_context::RpcContext;
pub use rpc_info::{Relay, RpcDirection, RpcInfo, RpcOptions};
pub use rpc_processor::RpcProcessor;
pub use rpc_table::{HandlerError, RpcEntry, RpcHandler, RpcTable};

use replica_serde::WireValue;

/// Fetches argument `index` through a typed accessor such as
/// `WireValue::as_vec2`.
pub fn arg<'a, T>(
    args: &'a [WireValue],
    index: usize,
    accessor: fn(&WireValue) -> Option<&T>,
) -> Result<&'a T, HandlerError> {
    args.get(index)
        .and_then(accessor)
        .ok_or_else(|| format!("missing or mistyped argument {}", index).into())
}

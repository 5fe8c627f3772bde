pub mod builtin;
pub mod error;
pub(crate) mod orchestrator;
pub mod pending_destroys;
pub mod spawnable;
pub mod spawned_net_object;

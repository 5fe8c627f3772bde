use std::sync::Arc;

use replica_serde::{WireType, WireValue};

use crate::{
    instantiator::{
        builtin,
        spawnable::{Capabilities, Spawnables},
    },
    packets::{packet_processor::PacketProcessor, packet_processors::PacketProcessors},
    rpc::{HandlerError, Relay, RpcContext, RpcDirection, RpcOptions, RpcProcessor, RpcTable},
    world::net_object::NetEntity,
};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol);
}

/// Registration tables shared by every participant of a session.
///
/// Server and client must build their protocol with the same calls in the
/// same order: method ids and packet tags are assigned by position.
pub struct Protocol {
    server_rpcs: RpcTable,
    client_rpcs: RpcTable,
    spawnables: Spawnables,
    packet_processors: PacketProcessors,
    locked: bool,
}

impl Default for Protocol {
    fn default() -> Self {
        let mut protocol = Self {
            server_rpcs: RpcTable::new(RpcDirection::ServerBound),
            client_rpcs: RpcTable::new(RpcDirection::ClientBound),
            spawnables: Spawnables::new(),
            packet_processors: PacketProcessors::new(),
            locked: false,
        };
        protocol.add_packet_processor(RpcProcessor);
        if let Err(error) = builtin::register(&mut protocol) {
            panic!("Failed to register built-in RPCs: {}", error);
        }
        protocol
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        self.check_lock();
        plugin.build(self);
        self
    }

    /// Registers a method clients send and the server executes.
    pub fn add_server_rpc<F>(
        &mut self,
        name: &str,
        params: &[WireType],
        options: RpcOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&RpcContext<'_>, &[WireValue]) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.add_rpc(RpcDirection::ServerBound, name, params, options, handler)
    }

    /// Registers a method the server sends and clients execute.
    pub fn add_client_rpc<F>(
        &mut self,
        name: &str,
        params: &[WireType],
        options: RpcOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&RpcContext<'_>, &[WireValue]) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.add_rpc(RpcDirection::ClientBound, name, params, options, handler)
    }

    pub fn add_rpc<F>(
        &mut self,
        direction: RpcDirection,
        name: &str,
        params: &[WireType],
        options: RpcOptions,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&RpcContext<'_>, &[WireValue]) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        if let Err(error) = self.try_add_rpc(direction, name, params, options, handler) {
            panic!("{}", error);
        }
        self
    }

    pub fn add_spawnable<F>(&mut self, key: &str, capabilities: Capabilities, constructor: F) -> &mut Self
    where
        F: Fn(&[WireValue]) -> Result<Arc<dyn NetEntity>, HandlerError> + Send + Sync + 'static,
    {
        if let Err(error) = self.try_add_spawnable(key, capabilities, constructor) {
            panic!("{}", error);
        }
        self
    }

    pub fn add_packet_processor<P: PacketProcessor>(&mut self, processor: P) -> &mut Self {
        if let Err(error) = self.try_add_packet_processor(processor) {
            panic!("{}", error);
        }
        self
    }

    // Non-panicking builder methods

    pub fn try_add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        plugin.build(self);
        Ok(self)
    }

    pub fn try_add_server_rpc<F>(
        &mut self,
        name: &str,
        params: &[WireType],
        options: RpcOptions,
        handler: F,
    ) -> Result<&mut Self, ProtocolError>
    where
        F: Fn(&RpcContext<'_>, &[WireValue]) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.try_add_rpc(RpcDirection::ServerBound, name, params, options, handler)
    }

    pub fn try_add_client_rpc<F>(
        &mut self,
        name: &str,
        params: &[WireType],
        options: RpcOptions,
        handler: F,
    ) -> Result<&mut Self, ProtocolError>
    where
        F: Fn(&RpcContext<'_>, &[WireValue]) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.try_add_rpc(RpcDirection::ClientBound, name, params, options, handler)
    }

    pub fn try_add_rpc<F>(
        &mut self,
        direction: RpcDirection,
        name: &str,
        params: &[WireType],
        options: RpcOptions,
        handler: F,
    ) -> Result<&mut Self, ProtocolError>
    where
        F: Fn(&RpcContext<'_>, &[WireValue]) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.try_check_lock()?;
        let table = match direction {
            RpcDirection::ServerBound => &mut self.server_rpcs,
            RpcDirection::ClientBound => &mut self.client_rpcs,
        };
        table.register(name, params, options, Box::new(handler))?;
        Ok(self)
    }

    pub fn try_add_spawnable<F>(
        &mut self,
        key: &str,
        capabilities: Capabilities,
        constructor: F,
    ) -> Result<&mut Self, ProtocolError>
    where
        F: Fn(&[WireValue]) -> Result<Arc<dyn NetEntity>, HandlerError> + Send + Sync + 'static,
    {
        self.try_check_lock()?;
        self.spawnables
            .register(key, capabilities, Box::new(constructor))?;
        Ok(self)
    }

    pub fn try_add_packet_processor<P: PacketProcessor>(
        &mut self,
        processor: P,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.packet_processors.add(Box::new(processor))?;
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.verify_relays()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        if let Err(error) = self.try_lock() {
            panic!("{}", error);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks if protocol is locked without panicking
    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    // Every relayed server-bound method needs a client-bound twin with the
    // same parameter list.
    fn verify_relays(&self) -> Result<(), ProtocolError> {
        for info in self.server_rpcs.infos() {
            if info.options.relay == Relay::None {
                continue;
            }
            let Some(twin) = self.client_rpcs.by_name(&info.name) else {
                return Err(ProtocolError::RelayTargetMissing {
                    name: info.name.clone(),
                });
            };
            if twin.info().params != info.params {
                return Err(ProtocolError::RelayTargetMismatch {
                    name: info.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn rpcs(&self, direction: RpcDirection) -> &RpcTable {
        match direction {
            RpcDirection::ServerBound => &self.server_rpcs,
            RpcDirection::ClientBound => &self.client_rpcs,
        }
    }

    pub fn spawnables(&self) -> &Spawnables {
        &self.spawnables
    }

    pub fn packet_processors(&self) -> &PacketProcessors {
        &self.packet_processors
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}

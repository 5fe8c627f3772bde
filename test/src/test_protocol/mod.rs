
pub use ball::{Ball, BallCollider};
pub use marker::Marker;

use std::sync::{Arc, Mutex, PoisonError};

use replica_shared::{
    arg, Capabilities, HandlerError, NetEntity, NetworkId, PeerId, Protocol, Relay, RpcContext,
    RpcOptions, Vec2, WireType, WireValue,
};

pub const BALL: &str = "ball";
pub const MARKER: &str = "marker";

pub const KICK: &str = "Kick";
pub const CHAT: &str = "Chat";
pub const PAINT: &str = "Paint";
pub const ANNOUNCE: &str = "Announce";
pub const FAIL: &str = "Fail";
pub const PANIC: &str = "Panic";

/// One executed call, as seen by a handler
#[derive(Clone, Debug, PartialEq)]
pub struct CallRecord {
    pub method: String,
    pub sender: PeerId,
    pub network_id: NetworkId,
    pub args: Vec<WireValue>,
}

/// Collects every call executed by one participant
#[derive(Default)]
pub struct RpcLog {
    calls: Mutex<Vec<CallRecord>>,
}

impl RpcLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, context: &RpcContext<'_>, args: &[WireValue]) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CallRecord {
                method: context.info.name.clone(),
                sender: context.sender.clone(),
                network_id: context.network_id,
                args: args.to_vec(),
            });
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<CallRecord> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls_to(method).len()
    }
}

/// Builds the protocol every test participant shares. Calls executed
/// locally are recorded into `log`.
pub fn protocol(log: Arc<RpcLog>) -> Protocol {
    let mut protocol = Protocol::builder();

    protocol
        .add_spawnable(BALL, Capabilities::all(), |args| {
            let x = *arg(args, 0, WireValue::as_f32)?;
            let y = *arg(args, 1, WireValue::as_f32)?;
            let ball: Arc<dyn NetEntity> = Arc::new(Ball::new(Vec2::new(x, y)));
            Ok(ball)
        })
        .add_spawnable(MARKER, Capabilities::none(), |args| {
            let label = arg(args, 0, WireValue::as_string)?;
            let marker: Arc<dyn NetEntity> = Arc::new(Marker::new(label));
            Ok(marker)
        });

    {
        let log = log.clone();
        protocol.add_server_rpc(
            KICK,
            &[WireType::Vec2],
            RpcOptions::relay(Relay::AllClients),
            move |context, args| {
                log.record(context, args);
                let impulse = arg(args, 0, WireValue::as_vec2)?;
                let ball = context
                    .target_as::<Ball>()
                    .ok_or_else(|| HandlerError::from("Kick must target a ball"))?;
                ball.push(*impulse);
                Ok(())
            },
        );
    }
    {
        let log = log.clone();
        protocol.add_client_rpc(KICK, &[WireType::Vec2], RpcOptions::default(), move |context, args| {
            log.record(context, args);
            if let Some(ball) = context.target_as::<Ball>() {
                ball.push(*arg(args, 0, WireValue::as_vec2)?);
            }
            Ok(())
        });
    }
    {
        let log = log.clone();
        protocol.add_server_rpc(
            CHAT,
            &[WireType::String],
            RpcOptions::relay(Relay::AllClientsExceptSender),
            move |context, args| {
                log.record(context, args);
                Ok(())
            },
        );
    }
    {
        let log = log.clone();
        protocol.add_client_rpc(CHAT, &[WireType::String], RpcOptions::default(), move |context, args| {
            log.record(context, args);
            Ok(())
        });
    }
    {
        let log = log.clone();
        protocol.add_server_rpc(PAINT, &[WireType::U8], RpcOptions::default(), move |context, args| {
            log.record(context, args);
            let collider = context
                .target_as::<BallCollider>()
                .ok_or_else(|| HandlerError::from("Paint must target a collider"))?;
            collider.paint(*arg(args, 0, WireValue::as_u8)?);
            Ok(())
        });
    }
    {
        let log = log.clone();
        protocol.add_client_rpc(
            ANNOUNCE,
            &[WireType::String, WireType::U32],
            RpcOptions::default(),
            move |context, args| {
                log.record(context, args);
                Ok(())
            },
        );
    }
    {
        let log = log.clone();
        protocol.add_server_rpc(FAIL, &[], RpcOptions::default(), move |context, args| {
            log.record(context, args);
            Err("failure requested".into())
        });
    }
    protocol.add_server_rpc(PANIC, &[], RpcOptions::default(), move |context, args| {
        log.record(context, args);
        panic!("panic requested")
    });

    protocol.build()
}

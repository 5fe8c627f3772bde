use std::time::Duration;

use replica_server::{ProtectorConfig, ServerConfig, KICK_REASON};
use replica_shared::{
    DeliveryClass, MethodId, NetworkId, Owner, PacketError, PacketHeader, PacketTag, RpcDirection,
    Serde, StreamWriter, Vec2, WireValue,
};
use replica_test::{
    connect, exchange_packets, rpc_packet,
    test_protocol::{CHAT, FAIL, KICK, PANIC},
    Datagram, LocalHub, TestClient, TestServer,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn kicking_server(hub: &LocalHub, threshold: u32) -> TestServer {
    TestServer::with_config(
        hub,
        ServerConfig {
            protector: ProtectorConfig {
                kick_peers: true,
                kick_exception_threshold: threshold,
                ..ProtectorConfig::default()
            },
            ..ServerConfig::default()
        },
    )
}

fn from_client(server: &TestServer, client: &TestClient, payload: Vec<u8>) -> Datagram {
    Datagram {
        from: client.id().clone(),
        to: server.id().clone(),
        payload,
        delivery: DeliveryClass::Unreliable,
        channel: 0,
    }
}

fn unknown_tag_packet(tag: u16) -> Vec<u8> {
    let mut writer = StreamWriter::new();
    PacketHeader::new(PacketTag::new(tag), NetworkId::SESSION)
        .ser(&mut writer)
        .unwrap();
    writer.to_bytes()
}

#[test]
fn malformed_packets_kick_exactly_once() {
    init_logger();
    let hub = LocalHub::new();
    let server = kicking_server(&hub, 10);
    let mallory = TestClient::new(&hub, "mallory");
    connect(&hub, &server, &mallory);

    for _ in 0..9 {
        let result = server
            .server()
            .receive(mallory.id(), &[0xff], DeliveryClass::Unreliable);
        match result {
            Err(PacketError::MalformedPacket { .. }) => {}
            _ => panic!("truncated header should be malformed"),
        }
    }
    assert!(hub.disconnects().is_empty());

    for _ in 0..5 {
        let _ = server
            .server()
            .receive(mallory.id(), &[0xff], DeliveryClass::Unreliable);
    }

    let disconnects = hub.disconnects();
    assert_eq!(disconnects.len(), 1);
    assert_eq!(&disconnects[0].peer, mallory.id());
    assert_eq!(disconnects[0].reason, KICK_REASON);

    let record = server.server().peer_record(mallory.id()).unwrap();
    assert_eq!(record.total_errors, 14);
    assert!(record.kicked);
}

#[test]
fn warnings_never_kick() {
    init_logger();
    let hub = LocalHub::new();
    let server = kicking_server(&hub, 1);
    let mallory = TestClient::new(&hub, "mallory");
    connect(&hub, &server, &mallory);
    let ball_id = server.spawn_ball(Vec2::ZERO, Owner::Server);
    exchange_packets(&hub, &server, &[&mallory]);

    for _ in 0..50 {
        hub.inject(from_client(&server, &mallory, unknown_tag_packet(9)));
    }
    // Kick at a target nobody knows
    let kick_id = server
        .session()
        .protocol()
        .rpcs(RpcDirection::ServerBound)
        .by_name(KICK)
        .unwrap()
        .info()
        .id;
    let stray_kick = rpc_packet(
        NetworkId::new(ball_id.get() + 100),
        kick_id,
        &[WireValue::Vec2(Vec2::ONE)],
    )
    .unwrap();
    for _ in 0..50 {
        hub.inject(from_client(&server, &mallory, stray_kick.clone()));
    }
    exchange_packets(&hub, &server, &[&mallory]);

    assert!(hub.disconnects().is_empty());
    let record = server.server().peer_record(mallory.id()).unwrap();
    assert_eq!(record.total_warnings, 100);
    assert_eq!(record.total_errors, 0);
    assert_eq!(record.kick_threshold, 0.0);
}

#[test]
fn unknown_method_and_failing_handler_count_as_errors() {
    init_logger();
    let hub = LocalHub::new();
    let server = kicking_server(&hub, 100);
    let mallory = TestClient::new(&hub, "mallory");
    connect(&hub, &server, &mallory);

    let unknown = rpc_packet(NetworkId::SESSION, MethodId::new(999), &[]).unwrap();
    match server
        .server()
        .receive(mallory.id(), &unknown, DeliveryClass::Unreliable)
    {
        Err(PacketError::UnknownRpc { method_id, .. }) => {
            assert_eq!(method_id, MethodId::new(999))
        }
        _ => panic!("expected UnknownRpc"),
    }

    mallory
        .client()
        .send_rpc(NetworkId::SESSION, FAIL, DeliveryClass::Unreliable, 0, &[])
        .unwrap();
    let sent = hub.take_inbox(server.id());
    match server
        .server()
        .receive(mallory.id(), &sent[0].payload, sent[0].delivery)
    {
        Err(PacketError::HandlerFailed { method, source }) => {
            assert_eq!(method, FAIL);
            assert!(source.to_string().contains("failure requested"));
        }
        _ => panic!("expected HandlerFailed"),
    }

    let record = server.server().peer_record(mallory.id()).unwrap();
    assert_eq!(record.total_errors, 2);
    assert!((record.kick_threshold - 0.02).abs() < 1e-9);
}

#[test]
fn handler_panic_is_contained() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    let bob = TestClient::new(&hub, "bob");
    connect(&hub, &server, &alice);
    connect(&hub, &server, &bob);

    alice
        .client()
        .send_rpc(NetworkId::SESSION, PANIC, DeliveryClass::ReliableOrdered, 0, &[])
        .unwrap();
    let sent = hub.take_inbox(server.id());
    match server
        .server()
        .receive(alice.id(), &sent[0].payload, sent[0].delivery)
    {
        Err(PacketError::HandlerPanicked { message }) => {
            assert!(message.contains("panic requested"))
        }
        _ => panic!("expected HandlerPanicked"),
    }

    // the server keeps serving
    alice
        .client()
        .send_rpc(
            NetworkId::SESSION,
            CHAT,
            DeliveryClass::ReliableOrdered,
            0,
            &[WireValue::from("still here")],
        )
        .unwrap();
    exchange_packets(&hub, &server, &[&alice, &bob]);
    assert_eq!(server.log().count(CHAT), 1);
    assert_eq!(bob.log().count(CHAT), 1);
}

#[test]
fn decay_keeps_slow_offenders_connected() {
    init_logger();
    let hub = LocalHub::new();
    let server = kicking_server(&hub, 10);
    let mallory = TestClient::new(&hub, "mallory");
    connect(&hub, &server, &mallory);

    for _ in 0..30 {
        let _ = server
            .server()
            .receive(mallory.id(), &[0xff], DeliveryClass::Unreliable);
        server.server().tick(Duration::from_secs(6));
    }

    assert!(hub.disconnects().is_empty());
}

#[test]
fn default_config_never_kicks() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::with_config(
        &hub,
        ServerConfig {
            protector: ProtectorConfig {
                kick_exception_threshold: 1,
                ..ProtectorConfig::default()
            },
            ..ServerConfig::default()
        },
    );
    let mallory = TestClient::new(&hub, "mallory");
    connect(&hub, &server, &mallory);

    for _ in 0..5 {
        let _ = server
            .server()
            .receive(mallory.id(), &[0xff], DeliveryClass::Unreliable);
    }

    assert!(hub.disconnects().is_empty());
    assert_eq!(server.server().peer_record(mallory.id()).unwrap().total_errors, 5);
}

#[test]
fn disconnect_drops_protector_record() {
    init_logger();
    let hub = LocalHub::new();
    let server = kicking_server(&hub, 10);
    let mallory = TestClient::new(&hub, "mallory");
    connect(&hub, &server, &mallory);
    assert_eq!(server.server().protected_peer_count(), 1);

    let _ = server
        .server()
        .receive(mallory.id(), &[0xff], DeliveryClass::Unreliable);
    replica_test::disconnect(&hub, &server, &mallory);

    assert_eq!(server.server().protected_peer_count(), 0);
    assert!(server.server().peer_record(mallory.id()).is_none());
}

#[test]
fn client_survives_malformed_server_packets() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    connect(&hub, &server, &alice);

    assert!(alice
        .client()
        .receive(&[1, 2, 3], DeliveryClass::Unreliable)
        .is_err());
    assert!(alice
        .client()
        .receive(&unknown_tag_packet(40), DeliveryClass::Unreliable)
        .is_err());

    let ball_id = server.spawn_ball(Vec2::ZERO, Owner::Server);
    exchange_packets(&hub, &server, &[&alice]);
    assert!(alice.session().is_spawned(ball_id));
}

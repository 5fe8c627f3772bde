use std::time::Duration;

use replica_shared::{
    DeliveryClass, InstantiateError, MethodId, NetEntity, NetworkId, Owner, Vec2, WireValue,
};
use replica_test::{
    assert_spawned_ids, connect, deliver_to_client, exchange_packets, rpc_packet,
    tick_and_exchange, Ball, Datagram, LocalHub, TestClient, TestServer,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn destroy_datagram(server: &TestServer, client: &TestClient, network_id: u32) -> Datagram {
    Datagram {
        from: server.id().clone(),
        to: client.id().clone(),
        payload: rpc_packet(NetworkId::SESSION, MethodId::new(1), &[WireValue::U32(network_id)])
            .unwrap(),
        delivery: DeliveryClass::ReliableOrdered,
        channel: 1,
    }
}

#[test]
fn destroy_tears_down_mirror_and_components() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    connect(&hub, &server, &alice);

    let ball_id = server.spawn_ball(Vec2::ZERO, Owner::Server);
    exchange_packets(&hub, &server, &[&alice]);
    let mirrored = alice.session().entity(ball_id).unwrap();
    let original = server.session().entity(ball_id).unwrap();

    server.server().destroy(ball_id).unwrap();
    let datagrams = hub.take_inbox(alice.id());
    assert_eq!(datagrams.len(), 1);
    assert_eq!(datagrams[0].delivery, DeliveryClass::ReliableOrdered);
    for datagram in datagrams {
        hub.inject(datagram);
    }
    exchange_packets(&hub, &server, &[&alice]);

    assert_spawned_ids!(alice, Vec::<NetworkId>::new());
    assert!(alice.session().object(ball_id).is_none());
    assert!(alice.session().object(NetworkId::new(2)).is_none());
    assert!(server.session().object(NetworkId::new(2)).is_none());

    let mirrored = mirrored.as_any().downcast_ref::<Ball>().unwrap();
    let original = original.as_any().downcast_ref::<Ball>().unwrap();
    assert_eq!(mirrored.destroyed_count(), 1);
    assert_eq!(original.destroyed_count(), 1);
    assert!(mirrored.anchor().is_destroyed());
}

#[test]
fn destroy_arriving_before_instantiate_is_applied() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    connect(&hub, &server, &alice);

    let ball_id = server.spawn_ball(Vec2::ZERO, Owner::Server);
    server.server().destroy(ball_id).unwrap();
    assert_eq!(hub.pending(alice.id()), 2);

    hub.reverse_inbox(alice.id());
    let datagrams = hub.take_inbox(alice.id());
    hub.inject(datagrams[0].clone());
    deliver_to_client(&hub, &alice);
    assert_eq!(alice.session().pending_destroy_count(), 1);
    assert!(!alice.session().is_spawned(ball_id));

    hub.inject(datagrams[1].clone());
    deliver_to_client(&hub, &alice);

    assert!(!alice.session().is_spawned(ball_id));
    assert!(alice.session().object(ball_id).is_none());
    assert_eq!(alice.session().pending_destroy_count(), 0);
}

#[test]
fn stale_instantiate_after_consumed_destroy_is_ignored() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    connect(&hub, &server, &alice);

    let ball_id = server.spawn_ball(Vec2::ZERO, Owner::Server);
    server.server().destroy(ball_id).unwrap();
    let datagrams = hub.take_inbox(alice.id());
    assert_eq!(datagrams.len(), 2);

    hub.inject(datagrams[0].clone());
    hub.inject(datagrams[1].clone());
    hub.inject(datagrams[0].clone());
    deliver_to_client(&hub, &alice);

    assert!(!server.session().is_spawned(ball_id));
    assert!(!alice.session().is_spawned(ball_id));
    assert!(alice.session().object(ball_id).is_none());
    assert!(alice.session().object(NetworkId::new(2)).is_none());
    assert!(alice.session().was_destroyed(ball_id));
}

#[test]
fn instantiate_after_expired_destroy_stays_destroyed() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    connect(&hub, &server, &alice);

    let ball_id = server.spawn_ball(Vec2::ZERO, Owner::Server);
    server.server().destroy(ball_id).unwrap();
    let datagrams = hub.take_inbox(alice.id());

    hub.inject(datagrams[1].clone());
    deliver_to_client(&hub, &alice);
    alice.client().tick(Duration::from_secs(31));
    assert_eq!(alice.session().pending_destroy_count(), 0);

    hub.inject(datagrams[0].clone());
    deliver_to_client(&hub, &alice);

    assert!(!alice.session().is_spawned(ball_id));
    assert!(alice.session().object(ball_id).is_none());
    assert_spawned_ids!(alice, Vec::<NetworkId>::new());
}

#[test]
fn buffered_destroy_expires_after_timeout() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    connect(&hub, &server, &alice);

    hub.inject(destroy_datagram(&server, &alice, 42));
    deliver_to_client(&hub, &alice);
    assert_eq!(alice.session().pending_destroy_count(), 1);

    tick_and_exchange(&hub, &server, &[&alice], Duration::from_secs(10));
    assert_eq!(alice.session().pending_destroy_count(), 1);

    tick_and_exchange(&hub, &server, &[&alice], Duration::from_secs(25));
    assert_eq!(alice.session().pending_destroy_count(), 0);
}

#[test]
fn repeated_destroy_is_buffered_once() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    connect(&hub, &server, &alice);

    hub.inject(destroy_datagram(&server, &alice, 42));
    hub.inject(destroy_datagram(&server, &alice, 42));
    deliver_to_client(&hub, &alice);

    assert_eq!(alice.session().pending_destroy_count(), 1);
}

#[test]
fn destroy_of_unknown_id_is_a_no_op() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    connect(&hub, &server, &alice);

    assert!(server.server().destroy(NetworkId::new(77)).is_ok());
    assert_eq!(hub.pending(alice.id()), 0);
}

#[test]
fn client_cannot_spawn_or_destroy() {
    init_logger();
    let hub = LocalHub::new();
    let alice = TestClient::new(&hub, "alice");

    match alice.session().destroy(NetworkId::FIRST) {
        Err(InstantiateError::NotServer { operation }) => assert_eq!(operation, "destroy"),
        _ => panic!("client destroy should fail"),
    }
    match alice.session().spawn("ball", Owner::Server, vec![]) {
        Err(InstantiateError::NotServer { operation }) => assert_eq!(operation, "spawn"),
        _ => panic!("client spawn should fail"),
    }
}

#[test]
fn destroyed_ids_are_never_reused() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);

    let first = server.spawn_ball(Vec2::ZERO, Owner::Server);
    server.server().destroy(first).unwrap();
    let second = server.spawn_ball(Vec2::ZERO, Owner::Server);

    assert_eq!(first, NetworkId::new(1));
    assert_eq!(second, NetworkId::new(3));
}

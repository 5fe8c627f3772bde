use replica_shared::{NetworkId, Owner, Vec2, WireValue};
use replica_test::{
    assert_spawned_ids, connect, disconnect, exchange_packets,
    test_protocol::{Marker, MARKER},
    LocalHub, TestClient, TestServer,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn late_joiner_receives_every_live_spawn() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let alice = TestClient::new(&hub, "alice");
    connect(&hub, &server, &alice);

    let first = server.spawn_ball(Vec2::new(1.0, 1.0), Owner::Server);
    let second = server.spawn_ball(Vec2::new(2.0, 2.0), Owner::Server);
    let third = server.spawn_ball(Vec2::new(3.0, 3.0), Owner::Server);
    exchange_packets(&hub, &server, &[&alice]);
    server.server().destroy(second).unwrap();
    exchange_packets(&hub, &server, &[&alice]);

    let carol = TestClient::new(&hub, "carol");
    connect(&hub, &server, &carol);
    assert_eq!(hub.pending(carol.id()), 2);
    exchange_packets(&hub, &server, &[&alice, &carol]);

    assert_spawned_ids!(carol, vec![first, third]);
    assert_spawned_ids!(alice, vec![first, third]);
}

#[test]
fn replay_carries_current_parameters_and_state() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);

    let ball_id = server.spawn_ball(Vec2::new(0.0, 0.0), Owner::Server);
    server.with_ball(ball_id, |ball| {
        ball.set_position(Vec2::new(7.0, 8.0));
        ball.collider().set_radius(4.0);
    });

    let carol = TestClient::new(&hub, "carol");
    connect(&hub, &server, &carol);
    exchange_packets(&hub, &server, &[&carol]);

    let (position, radius) = carol
        .with_ball(ball_id, |ball| (ball.position(), ball.collider().radius()))
        .unwrap();
    assert_eq!(position, Vec2::new(7.0, 8.0));
    assert_eq!(radius, 4.0);
}

#[test]
fn non_instantiatable_replay_uses_spawn_arguments() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);

    let marker_id = server
        .server()
        .spawn(MARKER, Owner::Server, vec![WireValue::from("original")])
        .unwrap();

    let carol = TestClient::new(&hub, "carol");
    connect(&hub, &server, &carol);
    exchange_packets(&hub, &server, &[&carol]);

    let entity = carol.session().entity(marker_id).unwrap();
    let marker = entity.as_any().downcast_ref::<Marker>().unwrap();
    assert_eq!(marker.label(), "original");
}

#[test]
fn repeated_connect_does_not_replay_twice() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    server.spawn_ball(Vec2::ZERO, Owner::Server);

    let carol = TestClient::new(&hub, "carol");
    connect(&hub, &server, &carol);
    server.server().peer_connected(carol.id());

    assert_eq!(hub.pending(carol.id()), 1);
    assert_eq!(server.session().connections().len(), 1);
}

#[test]
fn reconnect_after_disconnect_replays_again() {
    init_logger();
    let hub = LocalHub::new();
    let server = TestServer::new(&hub);
    let ball_id = server.spawn_ball(Vec2::ZERO, Owner::Server);

    let carol = TestClient::new(&hub, "carol");
    connect(&hub, &server, &carol);
    exchange_packets(&hub, &server, &[&carol]);
    disconnect(&hub, &server, &carol);
    assert!(!server.session().is_connected(carol.id()));

    connect(&hub, &server, &carol);
    assert_eq!(hub.pending(carol.id()), 1);
    exchange_packets(&hub, &server, &[&carol]);

    // already mirrored, the replay is a duplicate
    assert_spawned_ids!(carol, vec![ball_id]);
    assert!(carol.session().object(NetworkId::new(2)).is_some());
}

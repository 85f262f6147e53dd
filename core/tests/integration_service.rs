// Integration tests for the zone router task
//
// Tests driving a zone router from several async callers through its
// handle, including notifications, radius changes and shutdown.

use std::net::Ipv4Addr;
use std::sync::Arc;
use zrp_core::testing::{FakeProactive, FakeReactive, InputAction};
use zrp_core::{
    spawn_zone_router, ForwardAction, InterfaceAddress, Ipv4Header, Packet, Route, RoutingError,
    StaticNetworkContext, TimeUnit, TopologyEntry, TopologyHint, ZoneDecision, ZoneRouterHandle,
    ZoneRoutingHelper,
};

fn node(last: u8) -> Ipv4Addr {
    Ipv4Addr::new(10, 1, 1, last)
}

fn spawn(ctx: Arc<StaticNetworkContext>) -> ZoneRouterHandle {
    let mut proactive = FakeProactive::new();
    proactive.add_topology_entry(TopologyEntry {
        destination: node(2),
        distance: 1,
    });
    proactive.add_topology_entry(TopologyEntry {
        destination: node(5),
        distance: 4,
    });

    let mut reactive = FakeReactive::new();
    reactive.set_input_action(InputAction::Fail(RoutingError::NoRouteToHost(node(5))));

    let hint = TopologyHint::new(vec![node(2), node(5)]);
    let router = ZoneRoutingHelper::new().install(proactive, reactive, ctx, hint);
    spawn_zone_router(router)
}

fn one_interface() -> Arc<StaticNetworkContext> {
    let ctx = StaticNetworkContext::new();
    ctx.add_interface(vec![InterfaceAddress::new(
        node(1),
        Ipv4Addr::new(255, 255, 255, 0),
    )]);
    Arc::new(ctx)
}

#[tokio::test]
async fn test_handle_routes_by_zone() {
    let handle = spawn(one_interface());

    assert_eq!(
        handle.classify_destination(node(2)).await.unwrap(),
        ZoneDecision::Intra { distance: 1 }
    );
    assert_eq!(
        handle.classify_destination(node(5)).await.unwrap(),
        ZoneDecision::Inter { distance: 4 }
    );

    let route = handle
        .route_output(Packet::new(), Ipv4Header::to(node(5)), Some(0))
        .await
        .unwrap();
    assert_eq!(route, Route::new(node(5), Ipv4Addr::UNSPECIFIED, 0));

    println!("✓ Handle classifies and routes through the task");
}

#[tokio::test]
async fn test_handle_reports_input_errors() {
    let handle = spawn(one_interface());

    let outcome = handle
        .route_input(Packet::new(), Ipv4Header::to(node(5)), Some(0))
        .await
        .unwrap();

    assert!(!outcome.handled);
    assert_eq!(
        outcome.actions,
        vec![ForwardAction::Error(RoutingError::NoRouteToHost(node(5)))]
    );

    println!("✓ Reactive input error surfaces as a forward action");
}

#[tokio::test]
async fn test_handle_notifications_rebuild_cache() {
    let ctx = one_interface();
    let handle = spawn(ctx.clone());
    assert_eq!(handle.route_cache().await.unwrap().len(), 1);

    ctx.set_up(0, false);
    handle.notify_interface_down(0).await.unwrap();

    assert!(handle.route_cache().await.unwrap().is_empty());
    assert_eq!(
        handle.print_routing_table(TimeUnit::S).await.unwrap(),
        "ZRP Routing Table (time unit: s)\n"
    );

    println!("✓ Notifications are applied in order before later queries");
}

#[tokio::test]
async fn test_handle_radius_change() {
    let handle = spawn(one_interface());

    handle.set_zone_radius(4).await.unwrap();
    assert!(handle.classify_destination(node(5)).await.unwrap().is_intra_zone());

    handle.set_zone_radius(u32::MAX).await.unwrap();
    assert_eq!(
        handle
            .classify_destination(Ipv4Addr::new(8, 8, 8, 8))
            .await
            .unwrap(),
        ZoneDecision::Inter {
            distance: u64::from(u32::MAX) + 1
        }
    );

    println!("✓ Radius changes apply in order inside the task");
}

#[tokio::test]
async fn test_handle_originates_requests_from_clones() {
    let handle = spawn(one_interface());
    let other = handle.clone();

    let first = handle.originate_on_demand_request(node(9)).await.unwrap();
    let second = other.originate_on_demand_request(node(9)).await.unwrap();

    assert_eq!(first.request_id, 0);
    assert_eq!(second.request_id, 1);
    assert_eq!(first.origin, node(1));

    handle.send_zone_advertisement().await.unwrap();

    println!("✓ Cloned handles share one router");
}

#[tokio::test]
async fn test_handle_surfaces_routing_errors() {
    let handle = spawn(Arc::new(StaticNetworkContext::with_loopback()));

    let err = handle
        .originate_on_demand_request(node(9))
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<RoutingError>(),
        Some(&RoutingError::NoPrimaryAddress)
    );

    println!("✓ Routing errors can be downcast from the handle");
}

#[tokio::test]
async fn test_handle_surfaces_delegate_errors() {
    let ctx = one_interface();
    let mut reactive = FakeReactive::new();
    reactive.fail_output(RoutingError::Delegate {
        protocol: "aodv".to_string(),
        reason: "no reply".to_string(),
    });
    let router = ZoneRoutingHelper::new().install(
        FakeProactive::new(),
        reactive,
        ctx,
        TopologyHint::default(),
    );
    let handle = spawn_zone_router(router);

    let err = handle
        .route_output(Packet::new(), Ipv4Header::to(node(9)), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RoutingError>(),
        Some(RoutingError::Delegate { protocol, .. }) if protocol == "aodv"
    ));

    println!("✓ Delegate errors can be downcast from the handle");
}

#[tokio::test]
async fn test_handle_shutdown() {
    let handle = spawn(one_interface());
    handle.shutdown().await.unwrap();

    assert!(handle
        .route_output(Packet::new(), Ipv4Header::to(node(2)), None)
        .await
        .is_err());
    assert!(handle.notify_interface_up(0).await.is_err());

    println!("✓ Handle errors once the task has stopped");
}

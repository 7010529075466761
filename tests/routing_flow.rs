//! End-to-end naming through the assembled engine.

use traffic_routing::config::{NamerVariant, RouterConfig};
use traffic_routing::{RouteRepository, RoutingContext};

mod common;

#[tokio::test]
async fn test_context_selects_route() {
    let source = common::memory_source(&[("temporal.routing.orders.alice", common::ALICE_ORDERS)]);
    let engine = common::engine(&RouterConfig::default(), source);

    let routed = RoutingContext::new()
        .with("tenant", "beta")
        .scope(async { engine.namer.name("orders") })
        .await;
    assert_eq!(routed, "alice/orders");

    let unrouted = RoutingContext::new()
        .with("tenant", "prod")
        .scope(async { engine.namer.name("orders") })
        .await;
    assert_eq!(unrouted, "orders");

    assert_eq!(engine.namer.name("orders"), "orders");
    assert_eq!(engine.namer.name("payments"), "payments");
}

#[test]
fn test_rule_changes_apply_after_refresh() {
    let source = common::memory_source(&[("temporal.routing.orders.alice", common::ALICE_ORDERS)]);
    let engine = common::engine(&RouterConfig::default(), source.clone());
    let beta = RoutingContext::new().with("tenant", "beta");

    assert_eq!(engine.namer.name_with("orders", &beta), "alice/orders");

    source.set(
        "temporal.routing.orders.alice",
        "strategy: rename\nconfig: {task_queue: orders-canary}\nconstraints: {include: {mdc/tenant: beta}}",
    );
    // Still cached until the next refresh.
    assert_eq!(engine.namer.name_with("orders", &beta), "alice/orders");

    engine.repository.refresh();
    assert_eq!(engine.namer.name_with("orders", &beta), "orders-canary");

    source.remove("temporal.routing.orders.alice");
    engine.repository.refresh();
    assert_eq!(engine.namer.name_with("orders", &beta), "orders");
    assert!(engine.repository.list_all().is_empty());
}

#[test]
fn test_ambiguous_match_falls_back() {
    let source = common::memory_source(&[
        ("temporal.routing.orders.alice", common::ALICE_ORDERS),
        ("temporal.routing.orders.bob", "strategy: workstation\nconfig: {user: bob}"),
    ]);
    let engine = common::engine(&RouterConfig::default(), source);

    let beta = RoutingContext::new().with("tenant", "beta");
    assert_eq!(engine.namer.name_with("orders", &beta), "orders");

    let prod = RoutingContext::new().with("tenant", "prod");
    assert_eq!(engine.namer.name_with("orders", &prod), "bob/orders");
}

#[test]
fn test_workstation_fallback_and_routing() {
    let mut config = RouterConfig::default();
    config.namer.variant = NamerVariant::Workstation;
    config.namer.operator = Some("carol".into());
    config.namer.domain = "corp.example".into();

    let source = common::memory_source(&[
        ("deployment.environment", "local"),
        ("temporal.routing.orders.alice", common::ALICE_ORDERS),
    ]);
    let engine = common::engine(&config, source);

    let beta = RoutingContext::new().with("tenant", "beta");
    assert_eq!(engine.namer.name_with("orders", &beta), "alice/orders");
    assert_eq!(
        engine.namer.name_with("orders", &RoutingContext::new()),
        "carol@corp.example/orders"
    );
}

#[test]
fn test_malformed_properties_do_not_block_valid_rules() {
    let source = common::memory_source(&[
        ("temporal.routing.orders.alice", common::ALICE_ORDERS),
        ("temporal.routing.orders", "strategy: workstation"),
        ("temporal.routing.payments.bob", "strategy: [unterminated"),
        ("temporal.routing.enabled", "true"),
    ]);
    let engine = common::engine(&RouterConfig::default(), source);

    engine.repository.refresh();
    let report = engine.repository.last_report();
    assert_eq!(report.rules, 1);
    assert_eq!(report.skipped_properties, 2);
}

#[test]
fn test_same_document_under_two_identities_routes_once() {
    let source = common::memory_source(&[
        ("temporal.routing.orders.alice", common::ALICE_ORDERS),
        ("temporal.routing.orders.alice2", common::ALICE_ORDERS),
    ]);
    let engine = common::engine(&RouterConfig::default(), source);

    let beta = RoutingContext::new().with("tenant", "beta");
    assert_eq!(engine.namer.name_with("orders", &beta), "alice/orders");
    assert_eq!(engine.repository.list_all().len(), 1);
}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

use super::AdminState;
use crate::context::RoutingContext;
use crate::routing::{RefreshReport, RouteRepository, RoutingRule};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub namer: &'static str,
    pub key_prefix: String,
    pub cached: bool,
    pub last_refresh: RefreshReport,
}

#[derive(Serialize)]
pub struct Resolution {
    pub task_queue: String,
    pub resolved: String,
    pub namer: &'static str,
    pub context: BTreeMap<String, String>,
    /// The rule whose strategy produced `resolved`.
    pub rule: Option<RoutingRule>,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        namer: state.namer.variant(),
        key_prefix: state.repository.key_prefix().to_string(),
        cached: state.repository.has_cached(),
        last_refresh: state.repository.last_report().as_ref().clone(),
    })
}

pub async fn get_routes(State(state): State<AdminState>) -> Json<Vec<RoutingRule>> {
    let mut rules: Vec<RoutingRule> = state
        .repository
        .list_all()
        .iter()
        .map(|rule| rule.as_ref().clone())
        .collect();
    rules.sort_by(|a, b| {
        (&a.task_queue_name, &a.identity).cmp(&(&b.task_queue_name, &b.identity))
    });
    Json(rules)
}

pub async fn resolve_task_queue(
    State(state): State<AdminState>,
    Path(task_queue): Path<String>,
    Query(attributes): Query<BTreeMap<String, String>>,
) -> Json<Resolution> {
    let ctx: RoutingContext = attributes.clone().into_iter().collect();
    let resolution = state.namer.resolve_with(&task_queue, &ctx);

    Json(Resolution {
        task_queue,
        resolved: resolution.name,
        namer: state.namer.variant(),
        context: attributes,
        rule: resolution.rule.map(|rule| rule.as_ref().clone()),
    })
}

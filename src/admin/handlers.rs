use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::lifecycle::reload::reload_from_file;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub visitors: usize,
}

#[derive(Serialize)]
pub struct VisitorStatus {
    pub handler: String,
    pub priority: i64,
    pub registration: usize,
    pub patterns: Vec<String>,
    pub available: bool,
}

#[derive(Serialize)]
pub struct ReloadOutcome {
    pub reloaded: bool,
    pub visitors: Option<usize>,
    pub error: Option<String>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        visitors: state.dispatcher.table().len(),
    })
}

/// The current dispatch table, in table order.
pub async fn get_visitors(State(state): State<AppState>) -> Json<Vec<VisitorStatus>> {
    let table = state.dispatcher.table();
    let catalog = state.dispatcher.catalog();

    Json(
        table
            .entries()
            .iter()
            .map(|entry| VisitorStatus {
                handler: entry.handler().to_string(),
                priority: entry.priority(),
                registration: entry.registration_index(),
                patterns: entry.patterns().map(String::from).collect(),
                available: catalog.contains(entry.handler()),
            })
            .collect(),
    )
}

pub async fn post_reload(State(state): State<AppState>) -> (StatusCode, Json<ReloadOutcome>) {
    let Some(path) = state.config_path.as_deref() else {
        return (
            StatusCode::CONFLICT,
            Json(ReloadOutcome {
                reloaded: false,
                visitors: None,
                error: Some("no configuration file to reload from".to_string()),
            }),
        );
    };

    match reload_from_file(&state.dispatcher, path) {
        Ok(visitors) => {
            tracing::info!(visitors, "Visitor configuration reloaded via admin API");
            (
                StatusCode::OK,
                Json(ReloadOutcome {
                    reloaded: true,
                    visitors: Some(visitors),
                    error: None,
                }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Admin reload failed, keeping current table");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ReloadOutcome {
                    reloaded: false,
                    visitors: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

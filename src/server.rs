use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{error, info};

use crate::data::{RosterConfig, RosterOutput};
use crate::error::RosterError;
use crate::roster;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

fn status_for(error: &RosterError) -> StatusCode {
    match error {
        RosterError::InvalidConfig(_) | RosterError::ModelConstruction(_) => StatusCode::BAD_REQUEST,
        RosterError::Infeasible => StatusCode::UNPROCESSABLE_ENTITY,
        RosterError::TimeoutOrAbort => StatusCode::GATEWAY_TIMEOUT,
        RosterError::Solver(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn solve_handler(
    Json(config): Json<RosterConfig>,
) -> Result<Json<RosterOutput>, (StatusCode, String)> {
    // the solve blocks until HiGHS returns
    let result = tokio::task::spawn_blocking(move || roster::solve_roster(&config))
        .await
        .map_err(|e| {
            error!("Solver task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    match result {
        Ok(output) => Ok(Json(output)),
        Err(e) => Err((status_for(&e), e.to_string())),
    }
}

pub fn router() -> Router {
    Router::new().route("/v1/roster/solve", post(solve_handler))
}

pub async fn run_server() -> std::io::Result<()> {
    let addr = std::env::var("ROSTER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router()).await
}

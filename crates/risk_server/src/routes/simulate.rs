//! Monte Carlo simulation endpoint
//!
//! `POST /api/simulate` validates the request, enforces the path cell quota
//! and runs the engine on tokio's blocking pool.

use std::time::Instant;

use axum::{extract::State, response::Json, routing::post, Router};
use risk_engine::{
    ExecutionMode, PathSimulator, SimulationConfig, SimulationParameters, SimulationResult,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

/// Simulation request body
///
/// Engine parameters are flattened to the top level; `seed` is optional and
/// pins the random draws when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Engine parameters
    #[serde(flatten)]
    pub params: SimulationParameters,
    /// Seed for reproducible draws
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Build the simulation routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/simulate", post(simulate_handler))
}

/// POST /api/simulate - Run a Monte Carlo simulation
async fn simulate_handler(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<SimulationResult>, ApiError> {
    let SimulationRequest { params, seed } = request;

    params.validate()?;

    let requested = params.path_cells();
    let limit = state.config.max_path_cells;
    if requested > limit {
        tracing::warn!(requested, limit, "Simulation rejected by path cell quota");
        return Err(ApiError::quota_exceeded(requested, limit));
    }

    let execution_mode = if state.config.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Serial
    };
    let config = SimulationConfig::builder()
        .maybe_seed(seed)
        .execution_mode(execution_mode)
        .build()
        .map_err(|e| ApiError::computation_failed(e.to_string()))?;

    let started = Instant::now();
    let (result, seed) = tokio::task::spawn_blocking(move || {
        let mut simulator = PathSimulator::new(config);
        let seed = simulator.seed();
        simulator.simulate(&params).map(|result| (result, seed))
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Simulation task did not complete");
        ApiError::computation_failed(format!("Simulation task failed: {}", e))
    })??;

    tracing::info!(
        num_simulations = params.num_simulations,
        days = params.days,
        seed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Simulation completed"
    );

    Ok(Json(result))
}

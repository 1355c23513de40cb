//! Direct tool endpoints: one POST/GET per tool, JSON in and out.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use tracing::Instrument;

use webtoys_types::info::ServerInfo;
use webtoys_types::result::BuildResult;

use crate::http::error::AppError;
use crate::state::AppState;

/// Arguments of `build_webtoys_app`.
#[derive(Debug, Deserialize)]
pub struct BuildAppParams {
    pub description: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /tools/build_webtoys_app
pub async fn build_webtoys_app(
    State(state): State<AppState>,
    payload: Result<Json<BuildAppParams>, JsonRejection>,
) -> Result<Json<BuildResult>, AppError> {
    let Json(params) = payload?;
    Ok(Json(run_build_tool(&state, params).await))
}

/// GET /tools/get_info
pub async fn get_info() -> Json<ServerInfo> {
    Json(ServerInfo::current())
}

/// Shared by the direct endpoint and the MCP `tools/call` path.
pub(crate) async fn run_build_tool(state: &AppState, params: BuildAppParams) -> BuildResult {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7();
    let span = tracing::info_span!("tool_call", tool = "build_webtoys_app", %request_id);

    async {
        let result = state
            .run_build(&params.description, params.user_id.as_deref())
            .await;
        tracing::info!(
            success = result.success,
            has_url = result.app_url.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "build_webtoys_app completed"
        );
        result
    }
    .instrument(span)
    .await
}

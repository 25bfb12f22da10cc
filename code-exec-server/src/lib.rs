use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use code_exec::{CodeExecutionService, ExecutionConfig, ExecutionRequest, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid language: {0}")]
    InvalidLanguage(String),
    #[error("Execution error: {0}")]
    Service(code_exec::Error),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<code_exec::Error> for ServerError {
    fn from(err: code_exec::Error) -> Self {
        match err {
            code_exec::Error::UnsupportedLanguage(language) => {
                ServerError::InvalidLanguage(language)
            }
            other => ServerError::Service(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::InvalidLanguage(_) => StatusCode::BAD_REQUEST,
            ServerError::Service(_) | ServerError::Io(_) => {
                error!("Request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExecuteRequest {
    pub language: String,
    pub code: String,
    pub stdin: Option<String>,
    pub time_limit_ms: Option<u64>,
    pub memory_limit_mb: Option<u64>,
    pub entry_class: Option<String>,
}

impl From<ExecuteRequest> for ExecutionRequest {
    fn from(payload: ExecuteRequest) -> Self {
        let mut request = ExecutionRequest::new(payload.code, payload.language)
            .with_stdin(payload.stdin.unwrap_or_default());
        if let Some(millis) = payload.time_limit_ms {
            request = request.with_time_limit(Duration::from_millis(millis));
        }
        if let Some(memory) = payload.memory_limit_mb {
            request = request.with_memory_limit_mb(memory);
        }
        if let Some(class) = payload.entry_class {
            request = request.with_entry_class(class);
        }
        request
    }
}

#[derive(Clone)]
pub struct AppState {
    service: Arc<CodeExecutionService>,
}

pub async fn create_app(config: ExecutionConfig) -> Result<Router, ServerError> {
    let service = CodeExecutionService::new(config)
        .await
        .map_err(ServerError::Service)?;

    let state = AppState {
        service: Arc::new(service),
    };

    let cors = CorsLayer::permissive();

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/languages", get(languages))
        .route("/execute", post(execute))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(app)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening for execution requests on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn languages(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(
        state
            .service
            .available_languages()
            .iter()
            .map(|language| language.as_str())
            .collect(),
    )
}

async fn execute(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteRequest>,
) -> Result<Json<ExecutionResult>, ServerError> {
    let result = state.service.execute(payload.into()).await?;
    Ok(Json(result))
}

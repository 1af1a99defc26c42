//! HTTP API for template upload and report generation.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/upload-template` | Upload a DOCX/PDF template (multipart field `template`) |
//! | `POST` | `/api/generate-report` | Generate a report document from a stored template |
//! | `GET`  | `/health` | Health check (returns version and template count) |
//!
//! # Error Contract
//!
//! All error responses carry a machine-stable code and a human-readable
//! message:
//!
//! ```json
//! { "error": { "code": "template_not_found", "message": "no template with id ..." } }
//! ```
//!
//! Error codes: `invalid_request` (400), `unsupported_format` (400),
//! `template_not_found` (404), `parse_failure` (500), `generation_failed`
//! (500), `serialization_failure` (500). Every failure is terminal for its
//! request; nothing is retried and no partial document is ever returned.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the upload wizard can
//! run from any host during demos.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::extract::extract_text;
use crate::generate::{create_generator, TextGenerator};
use crate::models::SourceFormat;
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};
use crate::render::render_document;
use crate::store::{InMemoryTemplateStore, TemplateStore};

/// Shared application state passed to all route handlers via Axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (wrapped in `Arc` for cheap cloning across handlers).
    pub config: Arc<Config>,
    /// Template store; owns every uploaded record for the process lifetime.
    pub store: Arc<dyn TemplateStore>,
    /// External text-generation capability.
    pub generator: Arc<dyn TextGenerator>,
}

/// Starts the HTTP server with the store and generator built from config.
///
/// Binds to the address configured in `[server].bind` and runs until the
/// process is terminated. All uploaded templates are lost on restart.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let generator: Arc<dyn TextGenerator> = create_generator(&config.generation)?.into();
    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(InMemoryTemplateStore::new()),
        generator,
    };
    let bind_addr = state.config.server.bind.clone();

    let app = build_router(state);

    println!("Report Forge listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the router for the given state. Split out from [`run_server`] so
/// tests can inject a mock generator and bind to an ephemeral port.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.upload.max_file_bytes;

    Router::new()
        .route("/api/upload-template", post(handle_upload_template))
        .route("/api/generate-report", post(handle_generate_report))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"invalid_request"`, `"template_not_found"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// 400 — missing file or missing/empty request fields.
fn invalid_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "invalid_request".to_string(),
        message: message.into(),
    }
}

/// 400 — file extension is neither `.docx` nor `.pdf`.
fn unsupported_format(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "unsupported_format".to_string(),
        message: message.into(),
    }
}

/// 404 — template id was never issued.
fn template_not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "template_not_found".to_string(),
        message: message.into(),
    }
}

/// 500 — the uploaded file could not be parsed.
fn parse_failure(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "parse_failure".to_string(),
        message: message.into(),
    }
}

/// 500 — the external generation capability failed or timed out.
fn generation_failed(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "generation_failed".to_string(),
        message: message.into(),
    }
}

/// 500 — the generated text could not be serialized into a document.
fn serialization_failure(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "serialization_failure".to_string(),
        message: message.into(),
    }
}

/// 500 — anything else (store failures).
fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
    /// Number of templates currently held in the store.
    templates: usize,
}

/// Handler for `GET /health`.
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        templates: state.store.len().await,
    })
}

// ============ POST /api/upload-template ============

/// JSON response body for a successful upload.
#[derive(Serialize)]
struct UploadResponse {
    #[serde(rename = "templateId")]
    template_id: String,
}

/// Handler for `POST /api/upload-template`.
///
/// Expects one file in multipart field `template`. Determines the format
/// from the filename extension, extracts the plain text, and stores an
/// immutable record. Returns the fresh template id.
async fn handle_upload_template(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid_request(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("template") {
            continue;
        }
        let file_name = field
            .file_name()
            .ok_or_else(|| invalid_request("template field must be a file"))?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| invalid_request(format!("failed to read upload: {}", e)))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| invalid_request("no file uploaded"))?;

    let format = SourceFormat::from_filename(&file_name).ok_or_else(|| {
        unsupported_format(format!(
            "unsupported file type: {} (expected .docx or .pdf)",
            file_name
        ))
    })?;

    let content = extract_text(&bytes, format).map_err(|e| {
        error!(file = %file_name, "template parse failed: {}", e);
        parse_failure(e.to_string())
    })?;

    let template_id = state
        .store
        .put(content, format, file_name.clone())
        .await
        .map_err(|e| internal(e.to_string()))?;

    info!(id = %template_id, format = %format, file = %file_name, "template stored");

    Ok(Json(UploadResponse { template_id }))
}

// ============ POST /api/generate-report ============

/// JSON request body for `POST /api/generate-report`.
#[derive(Deserialize)]
struct GenerateRequest {
    #[serde(rename = "templateId", default)]
    template_id: String,
    #[serde(default)]
    data: String,
}

/// Handler for `POST /api/generate-report`.
///
/// Resolves the template, builds the prompt, invokes the generator once,
/// and returns the serialized document as an attachment in the template's
/// source format. The generator is never invoked for invalid requests.
async fn handle_generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, AppError> {
    if request.template_id.trim().is_empty() || request.data.trim().is_empty() {
        return Err(invalid_request("templateId and data are required"));
    }

    let template = state
        .store
        .get(&request.template_id)
        .await
        .map_err(|e| internal(e.to_string()))?
        .ok_or_else(|| {
            template_not_found(format!("no template with id {}", request.template_id))
        })?;

    let user_prompt = build_user_prompt(&template.content, &request.data);

    let generated = state
        .generator
        .generate(SYSTEM_PROMPT, &user_prompt)
        .await
        .map_err(|e| {
            error!(id = %template.id, "generation failed: {}", e);
            generation_failed(e.to_string())
        })?;

    let bytes = render_document(&generated, template.format).map_err(|e| {
        error!(id = %template.id, "serialization failed: {}", e);
        serialization_failure(e.to_string())
    })?;

    info!(
        id = %template.id,
        format = %template.format,
        bytes = bytes.len(),
        "report generated"
    );

    let disposition = format!(
        "attachment; filename=\"generated_report.{}\"",
        template.format.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, template.format.mime().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

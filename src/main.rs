use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
};
use rxpad_core::{
    ComponentDraft, CoreConfig, StoredTemplate, TemplateDraft, TemplateError, TemplateRepository,
};
use rxpad_uuid::UserUuid;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
///
/// Holds the file-backed template repository the endpoints operate on.
#[derive(Clone)]
struct AppState {
    repository: TemplateRepository,
}

/// Liveness response.
#[derive(serde::Serialize, utoipa::ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

/// Error body every non-success response carries, so clients can surface
/// the server's own message text.
#[derive(serde::Serialize, utoipa::ToSchema)]
struct ErrorBody {
    message: String,
}

/// One prescription component on the wire.
#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
struct ComponentDto {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    text: Option<serde_json::Value>,
}

/// Template payload for create/update requests. Deliberately loose: the
/// service validates shape itself and reports every violation at once.
#[derive(serde::Deserialize, utoipa::ToSchema)]
struct TemplateReq {
    components: Option<Vec<ComponentDto>>,
    color: Option<String>,
}

/// A stored template as returned to clients.
#[derive(serde::Serialize, utoipa::ToSchema)]
struct StoredTemplateRes {
    id: String,
    components: Vec<ComponentDto>,
    color: String,
    created_at: String,
    updated_at: String,
}

impl From<TemplateReq> for TemplateDraft {
    fn from(req: TemplateReq) -> Self {
        TemplateDraft {
            components: req.components.map(|components| {
                components
                    .into_iter()
                    .map(|c| ComponentDraft {
                        id: c.id,
                        kind: c.kind,
                        text: c.text,
                    })
                    .collect()
            }),
            color: req.color,
        }
    }
}

impl From<StoredTemplate> for StoredTemplateRes {
    fn from(stored: StoredTemplate) -> Self {
        Self {
            id: stored.id,
            components: stored
                .components
                .iter()
                .map(|c| ComponentDto {
                    id: Some(c.id.to_string()),
                    kind: Some(c.kind.as_str().to_owned()),
                    text: c.text.clone().map(serde_json::Value::String),
                })
                .collect(),
            color: stored.color.as_str().to_owned(),
            created_at: stored.created_at.to_rfc3339(),
            updated_at: stored.updated_at.to_rfc3339(),
        }
    }
}

/// An API failure with the status it maps to.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<TemplateError> for ApiError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::Validation(issues) => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                issues
                    .iter()
                    .map(|issue| issue.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            TemplateError::TemplateNotFound(id) => ApiError::new(
                StatusCode::NOT_FOUND,
                format!("template '{}' not found", id),
            ),
            other => {
                tracing::error!("template store error: {}", other);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        }
    }
}

/// Resolves the calling user from the `x-user-id` header.
///
/// The authentication context that produces this header is an external
/// collaborator; here it only needs to be present and canonical.
fn user_from_headers(headers: &HeaderMap) -> Result<UserUuid, ApiError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ApiError::new(StatusCode::BAD_REQUEST, "x-user-id header is required")
        })?;

    UserUuid::parse(raw).map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_templates, create_template, update_template, delete_template),
    components(schemas(
        HealthRes,
        ErrorBody,
        ComponentDto,
        TemplateReq,
        StoredTemplateRes
    ))
)]
struct ApiDoc;

/// Main entry point for the RxPad template store service
///
/// # Environment Variables
/// - `RXPAD_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `RXPAD_DATA_DIR`: Directory for template storage (default: "/template_data")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("rxpad=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("RXPAD_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = std::env::var("RXPAD_DATA_DIR").unwrap_or_else(|_| "/template_data".into());

    tracing::info!("++ Starting RxPad template store on {}", rest_addr);
    tracing::info!("++ Template data directory: {}", data_dir);

    let config = CoreConfig::new(data_dir.into())?;
    let repository = TemplateRepository::new(config);

    let app = Router::new()
        .route("/health", get(health))
        .route("/templates", get(list_templates))
        .route("/templates", post(create_template))
        .route("/templates", put(update_template))
        .route("/templates/:id", delete(delete_template))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { repository });

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "RxPad is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/templates",
    responses(
        (status = 200, description = "The user's stored templates (zero or one)", body = [StoredTemplateRes]),
        (status = 400, description = "Missing or malformed x-user-id header", body = ErrorBody)
    )
)]
/// List the calling user's stored templates
///
/// An empty list is a valid, non-error response; it means the user has
/// not saved a template yet.
async fn list_templates(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<StoredTemplateRes>>, ApiError> {
    let user = user_from_headers(&headers)?;
    let templates = state
        .repository
        .list(&user)
        .into_iter()
        .map(StoredTemplateRes::from)
        .collect();
    Ok(Json(templates))
}

#[utoipa::path(
    post,
    path = "/templates",
    request_body = TemplateReq,
    responses(
        (status = 201, description = "Template stored", body = StoredTemplateRes),
        (status = 400, description = "Missing or malformed x-user-id header", body = ErrorBody),
        (status = 422, description = "Payload failed validation; message lists every violation", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// Create the calling user's template
///
/// The store holds at most one template per user, so creation is an upsert
/// keyed by the user id: a concurrent create from a second client
/// overwrites rather than duplicating.
async fn create_template(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TemplateReq>,
) -> Result<(StatusCode, Json<StoredTemplateRes>), ApiError> {
    let user = user_from_headers(&headers)?;
    let template = TemplateDraft::from(req).into_template()?;
    let (stored, _created) = state.repository.upsert(&user, template)?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

#[utoipa::path(
    put,
    path = "/templates",
    request_body = TemplateReq,
    responses(
        (status = 200, description = "Template stored", body = StoredTemplateRes),
        (status = 400, description = "Missing or malformed x-user-id header", body = ErrorBody),
        (status = 422, description = "Payload failed validation; message lists every violation", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// Update the calling user's template
///
/// Targets "the" user's template implicitly, no id required. Like create,
/// this resolves to an upsert keyed by the user id.
async fn update_template(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TemplateReq>,
) -> Result<Json<StoredTemplateRes>, ApiError> {
    let user = user_from_headers(&headers)?;
    let template = TemplateDraft::from(req).into_template()?;
    let (stored, _created) = state.repository.upsert(&user, template)?;
    Ok(Json(stored.into()))
}

#[utoipa::path(
    delete,
    path = "/templates/{id}",
    params(
        ("id" = String, Path, description = "Stored template identifier")
    ),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 400, description = "Missing or malformed x-user-id header", body = ErrorBody),
        (status = 404, description = "No template with that id for this user", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// Delete a stored template by id
async fn delete_template(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user = user_from_headers(&headers)?;
    state.repository.delete(&user, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

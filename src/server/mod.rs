pub mod render;

use crate::{
    client::{HttpImageClient, ImageApi},
    config::StudioConfig,
    error::{Result, StudioError},
    models::{HealthStatus, ImageArtifact, ImageSize},
    session::SessionStore,
    studio::Studio,
};
use actix_web::{
    cookie::{Cookie, SameSite},
    http::{header, StatusCode},
    middleware, web, App, HttpRequest, HttpResponse, HttpResponseBuilder, HttpServer,
    ResponseError,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "pixelprompt_session";

pub struct AppState {
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(api: Arc<dyn ImageApi>, max_sessions: usize) -> Self {
        Self {
            sessions: SessionStore::new(api, max_sessions),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub size: ImageSize,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub edit_prompt: String,
}

impl ResponseError for StudioError {
    fn status_code(&self) -> StatusCode {
        match self {
            StudioError::Precondition(_) | StudioError::Busy(_) => StatusCode::CONFLICT,
            StudioError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StudioError::Api { .. } | StudioError::Network(_) | StudioError::Json(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "detail": self.to_string()
        }))
    }
}

async fn session_for(req: &HttpRequest, state: &AppState) -> (Uuid, Arc<Studio>) {
    let known = req
        .cookie(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    state.sessions.get_or_create(known).await
}

fn with_session(mut builder: HttpResponseBuilder, id: Uuid) -> HttpResponseBuilder {
    let cookie = Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    builder.cookie(cookie);
    builder
}

fn back_to_page(id: Uuid) -> HttpResponse {
    with_session(HttpResponse::SeeOther(), id)
        .insert_header((header::LOCATION, "/"))
        .finish()
}

async fn index(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let (id, studio) = session_for(&req, &state).await;
    let snapshot = studio.snapshot().await;
    with_session(HttpResponse::Ok(), id)
        .content_type("text/html; charset=utf-8")
        .body(render::page(&snapshot))
}

async fn generate(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<GenerateForm>,
) -> HttpResponse {
    let (id, studio) = session_for(&req, &state).await;
    let GenerateForm { prompt, size } = form.into_inner();
    if let Err(e) = studio.generate(prompt, size).await {
        log::debug!("Session {} generation ended with error: {}", id, e);
    }
    back_to_page(id)
}

async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<EditForm>,
) -> HttpResponse {
    let (id, studio) = session_for(&req, &state).await;
    if let Err(e) = studio.edit(form.into_inner().edit_prompt).await {
        log::debug!("Session {} edit ended with error: {}", id, e);
    }
    back_to_page(id)
}

async fn reset(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let (id, studio) = session_for(&req, &state).await;
    studio.reset().await;
    back_to_page(id)
}

async fn image(
    req: HttpRequest,
    state: web::Data<AppState>,
    kind: web::Path<String>,
) -> Result<HttpResponse> {
    let (id, studio) = session_for(&req, &state).await;
    let snapshot = studio.snapshot().await;
    let artifact: Option<ImageArtifact> = match kind.as_str() {
        "generated" => snapshot.generate.artifact,
        "edited" => snapshot.edit.artifact,
        _ => return Ok(HttpResponse::NotFound().finish()),
    };

    let Some(artifact) = artifact else {
        return Ok(with_session(HttpResponse::NotFound(), id).finish());
    };
    let bytes = artifact.decode()?;
    Ok(with_session(HttpResponse::Ok(), id)
        .content_type(ImageArtifact::MIME_TYPE)
        .body(bytes))
}

async fn session_state(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let (id, studio) = session_for(&req, &state).await;
    let snapshot = studio.snapshot().await;
    with_session(HttpResponse::Ok(), id).json(snapshot)
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus::ok())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/generate", web::post().to(generate))
        .route("/edit", web::post().to(edit))
        .route("/reset", web::post().to(reset))
        .route("/images/{kind}", web::get().to(image))
        .route("/state", web::get().to(session_state))
        .route("/health", web::get().to(health));
}

/// Serves the studio until the process is stopped.
pub async fn run(config: StudioConfig) -> Result<()> {
    config.validate()?;
    let api: Arc<dyn ImageApi> = Arc::new(HttpImageClient::from_config(&config));
    let state = web::Data::new(AppState::new(api, config.max_sessions));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::new("%r %s %Dms"))
            .configure(routes)
    })
    .bind(config.bind_address())
    .map_err(|e| {
        log::error!("❌ Failed to bind {}:{}: {}", config.host, config.port, e);
        StudioError::Io(e)
    })?;

    server.run().await?;
    Ok(())
}

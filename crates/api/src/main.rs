use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use curator_core::domain::digest::NewsDigest;
use curator_core::domain::profile::{Profile, Responses};
use curator_core::error::ProfileError;
use curator_core::llm::anthropic::AnthropicClient;
use curator_core::llm::LlmClient;
use curator_core::news::feed::FeedOptions;
use curator_core::news::provider::{
    normalize_symbol, NewsApiClient, NewsProvider, DEFAULT_SYMBOL_NEWS_LIMIT,
};
use curator_core::news::types::NewsArticle;
use curator_core::questionnaire::catalog::Question;
use curator_core::questionnaire::{ExportedResponses, Questionnaire};
use curator_core::storage::profiles::ProfileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = curator_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let store = ProfileStore::open(&settings.profile_store_path).with_context(|| {
        format!(
            "failed to load profile store at {}",
            settings.profile_store_path.display()
        )
    })?;
    tracing::info!(
        path = %settings.profile_store_path.display(),
        profiles = store.len(),
        "profile store ready"
    );

    let llm: Option<Arc<dyn LlmClient>> = match AnthropicClient::from_settings(&settings) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "LLM client unavailable; news digests disabled");
            None
        }
    };
    let news: Option<Arc<dyn NewsProvider>> = match NewsApiClient::from_settings(&settings) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "news provider unavailable; news digests disabled");
            None
        }
    };

    let state = AppState {
        questionnaire: Arc::new(Questionnaire::new(Arc::new(store))),
        llm,
        news,
        feed: FeedOptions::from_env(),
    };

    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/questionnaire", get(get_questionnaire))
        .route("/questionnaire/validate", post(validate_responses))
        .route("/questionnaire/preview", post(preview_responses))
        .route("/questionnaire/progress", post(questionnaire_progress))
        .route("/questionnaire/export", post(export_responses))
        .route("/questionnaire/:question_id", get(get_question))
        .route("/profile", post(create_profile))
        .route("/profile/:user_id", get(get_profile).patch(update_profile))
        .route("/news/:user_id", post(generate_news))
        .route("/news/stock/:symbol", get(stock_news))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Clone)]
struct AppState {
    questionnaire: Arc<Questionnaire>,
    llm: Option<Arc<dyn LlmClient>>,
    news: Option<Arc<dyn NewsProvider>>,
    feed: FeedOptions,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Validation(_) | ProfileError::UnknownField(_) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            ProfileError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ProfileError::Io { .. } | ProfileError::Json { .. } => {
                Self::internal(anyhow::Error::new(err))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "AI Finance News Curator API" }))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_questionnaire(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "questions": state.questionnaire.get_all_questions() }))
}

async fn get_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<&'static Question>, ApiError> {
    state
        .questionnaire
        .get_question_by_id(&question_id)
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Question not found"))
}

async fn validate_responses(
    State(state): State<AppState>,
    Json(responses): Json<Responses>,
) -> Json<Value> {
    let errors = state.questionnaire.validate_responses(&responses);
    Json(json!({ "valid": errors.is_empty(), "errors": errors }))
}

async fn preview_responses(
    State(state): State<AppState>,
    Json(responses): Json<Responses>,
) -> Json<Value> {
    Json(json!({ "preview": state.questionnaire.get_recommendation_preview(&responses) }))
}

#[derive(Debug, Deserialize)]
struct ProgressRequest {
    #[serde(default)]
    completed: Vec<String>,
}

async fn questionnaire_progress(
    State(state): State<AppState>,
    Json(req): Json<ProgressRequest>,
) -> Json<Value> {
    let q = &state.questionnaire;
    Json(json!({
        "percentage": q.get_progress_percentage(req.completed.as_slice()),
        "next_question_id": q.get_next_question_id(req.completed.as_slice()),
    }))
}

async fn export_responses(
    State(state): State<AppState>,
    Json(responses): Json<Responses>,
) -> Json<ExportedResponses> {
    Json(state.questionnaire.export_responses(&responses))
}

#[derive(Debug, Deserialize)]
struct ProfileCreationRequest {
    user_id: String,
    responses: Responses,
}

async fn create_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileCreationRequest>,
) -> Result<Json<Value>, ApiError> {
    let questionnaire = state.questionnaire.clone();
    let profile = tokio::task::spawn_blocking(move || {
        questionnaire.create_profile_from_responses(&req.user_id, &req.responses)
    })
    .await
    .map_err(|e| ApiError::internal(e.into()))??;

    Ok(Json(json!({ "success": true, "profile": profile })))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    state
        .questionnaire
        .store()
        .get_profile(&user_id)
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Profile not found"))
}

async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(updates): Json<Responses>,
) -> Result<Json<Profile>, ApiError> {
    let store = state.questionnaire.store().clone();
    let profile = tokio::task::spawn_blocking(move || store.update_profile(&user_id, &updates))
        .await
        .map_err(|e| ApiError::internal(e.into()))??;
    Ok(Json(profile))
}

async fn generate_news(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NewsDigest>, ApiError> {
    let profile = state
        .questionnaire
        .store()
        .get_profile(&user_id)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Profile not found."))?;

    let (Some(llm), Some(news)) = (&state.llm, &state.news) else {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "News digests are not configured",
        ));
    };

    let today = chrono::Utc::now().date_naive();
    let digest =
        curator_core::digest::generate_digest(profile, &**news, &**llm, &state.feed, today)
            .await
            .map_err(ApiError::internal)?;

    Ok(Json(digest))
}

#[derive(Debug, Deserialize)]
struct StockNewsParams {
    limit: Option<u32>,
}

#[derive(Debug, serde::Serialize)]
struct StockNewsResponse {
    symbol: String,
    articles: Vec<NewsArticle>,
}

async fn stock_news(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<StockNewsParams>,
) -> Result<Json<StockNewsResponse>, ApiError> {
    let symbol = normalize_symbol(&symbol)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;
    let limit = params.limit.unwrap_or(DEFAULT_SYMBOL_NEWS_LIMIT);
    if !(1..=100).contains(&limit) {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "limit must be between 1 and 100",
        ));
    }

    let Some(news) = &state.news else {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "News search is not configured",
        ));
    };

    let today = chrono::Utc::now().date_naive();
    let articles =
        curator_core::news::feed::symbol_news(&**news, &symbol, limit, &state.feed, today)
            .await
            .map_err(ApiError::internal)?;

    Ok(Json(StockNewsResponse { symbol, articles }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &curator_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

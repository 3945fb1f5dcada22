use actix_web::http::{Method, StatusCode};
use actix_web::{web, HttpResponse};
use log::{debug, error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::interfaces::{ConvertError, Converter};
use crate::models::AppState;
use crate::storage::SubStore;
use crate::utils::http::TemplateSource;

const INDEX_HTML: &str = include_str!("../../static/index.html");

static SUB_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").unwrap());

/// Body of `POST /api/save`
#[derive(Deserialize, Debug)]
pub struct SaveRequest {
    pub content: String,
}

#[derive(Serialize, Debug)]
pub struct SaveResponse {
    pub id: String,
}

/// Query parameters for subscription retrieval
#[derive(Deserialize, Debug, Default, Clone)]
pub struct SubQuery {
    /// Target format, `singbox` when absent
    pub target: Option<String>,
}

fn json_error(status: StatusCode, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message.to_string() }))
}

/// Handler for the landing page
pub async fn index_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html;charset=UTF-8")
        .body(INDEX_HTML)
}

/// Handler storing a submitted link list
pub async fn save_handler<T, S>(
    body: web::Bytes,
    app_state: web::Data<AppState<T, S>>,
) -> HttpResponse
where
    T: TemplateSource + 'static,
    S: SubStore + 'static,
{
    let request: SaveRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected save request: {}", e);
            return json_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", e),
            );
        }
    };
    if request.content.trim().is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Content is empty");
    }

    match app_state
        .store
        .put(request.content, app_state.submission_ttl)
        .await
    {
        Ok(id) => {
            info!("Stored submission {}", id);
            HttpResponse::Ok()
                .insert_header(("Cache-Control", "no-store, no-cache, must-revalidate"))
                .json(SaveResponse { id })
        }
        Err(e) => {
            error!("Failed to store submission: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// Handler for subscription retrieval
pub async fn sub_handler<T, S>(
    path: web::Path<String>,
    query: web::Query<SubQuery>,
    app_state: web::Data<AppState<T, S>>,
) -> HttpResponse
where
    T: TemplateSource + 'static,
    S: SubStore + 'static,
{
    let id = path.into_inner();
    debug!("Received subscription request for {}: {:?}", id, query);
    if !SUB_ID_REGEX.is_match(&id) {
        return not_found_handler().await;
    }

    let target = match Converter::<T>::resolve_target(query.target.as_deref().unwrap_or("")) {
        Ok(target) => target,
        Err(ConvertError::UnknownTarget(selector)) => {
            debug!("Rejected unknown target {}", selector);
            return HttpResponse::BadRequest().body("Unknown target");
        }
    };

    let raw = match app_state.store.get(&id).await {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => return HttpResponse::NotFound().body("Expired or not found"),
        Err(e) => {
            error!("Failed to read submission {}: {}", id, e);
            return HttpResponse::InternalServerError().body(e.to_string());
        }
    };

    let artifact = app_state.converter.convert(&raw, target).await;
    HttpResponse::Ok()
        .content_type(artifact.content_type())
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .body(artifact.into_body())
}

/// CORS preflight for subscription retrieval
pub async fn sub_options_handler() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type"))
        .finish()
}

pub async fn not_found_handler() -> HttpResponse {
    HttpResponse::NotFound().body("Not Found")
}

/// Register the API endpoints with Actix Web
pub fn config<T, S>(cfg: &mut web::ServiceConfig)
where
    T: TemplateSource + 'static,
    S: SubStore + 'static,
{
    cfg.route("/", web::get().to(index_handler))
        .route("/api/save", web::post().to(save_handler::<T, S>))
        .service(
            web::resource("/sub/{id}")
                .route(web::get().to(sub_handler::<T, S>))
                .route(web::post().to(sub_handler::<T, S>))
                .route(web::method(Method::OPTIONS).to(sub_options_handler))
                .default_service(web::to(not_found_handler)),
        );
}

use crate::service::SearchService;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;
use simrank_core::Error;
use simrank_storage::EmbeddingType;
use std::sync::Arc;
use tracing::error;

#[derive(Deserialize)]
struct SimilarSearchParams {
    #[serde(default)]
    q: String,
    method: Option<String>,
    embedding_type: Option<String>,
    limit: Option<usize>,
    threshold: Option<f32>,
}

#[derive(Deserialize)]
struct SimilarKeywordsParams {
    #[serde(default)]
    q: String,
    method: Option<String>,
    limit: Option<usize>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(service: Arc<SearchService>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(service.clone()))
                .configure(RestApi::routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/health", web::get().to(health))
            .route("/similar_search", web::get().to(similar_search))
            .route("/similar_keywords", web::get().to(similar_keywords))
            .route("/search_methods", web::get().to(search_methods))
            .route("/embedding_stats", web::get().to(embedding_stats));
    }
}

fn error_response(err: Error) -> HttpResponse {
    if err.is_client_error() {
        HttpResponse::BadRequest().json(serde_json::json!({
            "error": err.to_string()
        }))
    } else {
        error!("Request failed: {}", err);
        HttpResponse::InternalServerError().json(serde_json::json!({
            "error": err.to_string()
        }))
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

async fn similar_search(
    service: web::Data<Arc<SearchService>>,
    params: web::Query<SimilarSearchParams>,
) -> ActixResult<HttpResponse> {
    let params = params.into_inner();

    let embedding_type = match params.embedding_type.as_deref() {
        Some(name) => match name.parse::<EmbeddingType>() {
            Ok(t) => t,
            Err(e) => return Ok(error_response(e)),
        },
        None => EmbeddingType::default(),
    };

    match service.similar_search(
        &params.q,
        params.method.as_deref(),
        embedding_type,
        params.limit,
        params.threshold,
    ) {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(error_response(e)),
    }
}

async fn similar_keywords(
    service: web::Data<Arc<SearchService>>,
    params: web::Query<SimilarKeywordsParams>,
) -> ActixResult<HttpResponse> {
    let params = params.into_inner();
    match service.similar_keywords(&params.q, params.method.as_deref(), params.limit) {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(error_response(e)),
    }
}

async fn search_methods(service: web::Data<Arc<SearchService>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.search_methods()))
}

async fn embedding_stats(service: web::Data<Arc<SearchService>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.embedding_stats()))
}

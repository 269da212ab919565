use crate::context::{EngineContext, RecommendRequest};
use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use metricrec_core::Error;
use metricrec_similarity::SimilarityOutcome;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

pub struct RestApi;

impl RestApi {
    pub async fn start(context: Arc<EngineContext>, host: String, port: u16) -> std::io::Result<()> {
        info!("HTTP API listening on {}:{}", host, port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(context.clone()))
                .configure(routes)
        })
        .bind((host.as_str(), port))?
        .run()
        .await
    }
}

/// Register every endpoint; expects `web::Data<Arc<EngineContext>>` in app data
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/recommend_metrics_multilabel", web::post().to(recommend_multilabel))
        .route("/recommend_metrics_content", web::post().to(recommend_multilabel))
        .route("/recommend_metrics_collaborative", web::post().to(recommend_collaborative))
        .route("/recommend", web::post().to(recommend_reduced))
        .route("/healthz", web::get().to(healthz));
}

/// Malformed or non-JSON bodies answer with the same `{"error"}` shape as
/// every other rejection
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        warn!("Rejected request body: {}", message);
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    })
}

async fn recommend_multilabel(
    context: web::Data<Arc<EngineContext>>,
    body: web::Json<Value>,
) -> ActixResult<HttpResponse> {
    let span = info_span!("request", id = %Uuid::new_v4(), route = "multilabel");
    let _guard = span.enter();

    match context.recommend_multilabel(&body) {
        Ok(response) => {
            info!("Classification path answered at threshold {}", response.threshold);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn recommend_collaborative(
    context: web::Data<Arc<EngineContext>>,
    body: web::Json<Value>,
) -> ActixResult<HttpResponse> {
    let span = info_span!("request", id = %Uuid::new_v4(), route = "collaborative");
    let _guard = span.enter();

    match context.recommend_collaborative(&body) {
        Ok(SimilarityOutcome::Recommendations(recommendations)) => {
            info!("Collaborative path returned {} metrics", recommendations.len());
            Ok(HttpResponse::Ok().json(recommendations))
        }
        Ok(SimilarityOutcome::NoMatch { message }) => {
            Ok(HttpResponse::Ok().json(json!({ "message": message })))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn recommend_reduced(
    context: web::Data<Arc<EngineContext>>,
    body: web::Json<RecommendRequest>,
) -> ActixResult<HttpResponse> {
    let span = info_span!("request", id = %Uuid::new_v4(), route = "reduced");
    let _guard = span.enter();

    if !context.reduced_enabled() {
        return Ok(HttpResponse::ServiceUnavailable().json(json!({
            "error": "reduced-space recommendations are not enabled"
        })));
    }

    match context.recommend_reduced(&body) {
        Ok(SimilarityOutcome::Recommendations(recommendations)) => {
            info!("Reduced-space path returned {} metrics", recommendations.len());
            Ok(HttpResponse::Ok().json(json!({ "recommended_metrics": recommendations })))
        }
        Ok(SimilarityOutcome::NoMatch { message }) => {
            info!("Reduced-space path found no similar profile");
            Ok(HttpResponse::Ok().json(json!({ "message": message })))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn healthz(context: web::Data<Arc<EngineContext>>) -> ActixResult<HttpResponse> {
    let span = info_span!("request", id = %Uuid::new_v4(), route = "healthz");
    let _guard = span.enter();

    Ok(HttpResponse::Ok().json(context.health()))
}

fn error_response(e: &Error) -> HttpResponse {
    if e.is_client_error() {
        warn!("Rejected request: {}", e);
        HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))
    } else {
        error!("Request failed: {}", e);
        HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
    }
}

use actix_web::{web, HttpResponse};
use serde_json::json;
use shared::{PcosInput, ServiceStatus};

use crate::model::{assess, RiskModel};

pub const SERVICE_NAME: &str = "Hitayu AI";

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(status)))
        .service(web::resource("/predict").route(web::post().to(predict)));
}

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(ServiceStatus {
        status: "running".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn predict(model: web::Data<dyn RiskModel>, input: web::Json<PcosInput>) -> HttpResponse {
    let input = input.into_inner();
    log::debug!("PCOS prediction requested: {:?}", input);
    match assess(model.get_ref(), &input) {
        Ok(output) => {
            log::info!("PCOS prediction: {} ({})", output.prediction, output.confidence);
            HttpResponse::Ok().json(output)
        }
        Err(e) => {
            log::error!("PCOS prediction failed: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use predict_service::model::{OnnxRiskModel, RiskModel};
use predict_service::routes::configure_routes;
use predict_service::ServiceConfig;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServiceConfig::from_env().map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;

    let model: Arc<dyn RiskModel> = match OnnxRiskModel::load(&config.model_path) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            log::error!("Failed to load PCOS model at startup: {}", e);
            return Err(Error::new(ErrorKind::Other, e.to_string()));
        }
    };
    log::info!("PCOS model loaded from {}", config.model_path.display());
    let model = web::Data::from(model);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(model.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}

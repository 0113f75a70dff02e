use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use backend::cache::TensorCache;
use backend::config::{AppConfig, PreprocessingConfig};
use backend::db;
use backend::inference::ModelLoader;
use backend::remote::MedicationService;
use backend::routes::configure_routes;
use backend::workflow::{DiagnosisWorkflow, SessionRegistry};
use std::env;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

fn startup_error(context: &str, e: impl std::fmt::Display) -> Error {
    log::error!("{}: {}", context, e);
    Error::new(ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    log::debug!("Configuration: {:?}", config);

    let preprocessing = PreprocessingConfig::load_or_default(config.preprocessing_config.as_deref())
        .map_err(|e| startup_error("Invalid preprocessing config", e))?;

    let loader = ModelLoader::new(config.model.clone())
        .map_err(|e| startup_error("Failed to create model loader", e))?;
    let model = loader
        .get_or_load()
        .await
        .map_err(|e| startup_error("Failed to preload model at startup", e))?;
    log::info!(
        "Model ready with {} classes ({:?})",
        model.labels().len(),
        model.source()
    );

    let persistence = db::connect(&config.store)
        .await
        .map_err(|e| startup_error("Failed to configure document store", e))?;
    if persistence.is_configured() {
        log::info!("Persisting diagnoses to collection {}", persistence.collection());
    }

    let remote = MedicationService::new(config.remote_info.clone())
        .map_err(|e| startup_error("Failed to create remote info client", e))?;
    if !remote.is_configured() {
        log::warn!("REMOTE_INFO_URL not set; reports will use local data only");
    }

    let workflow = web::Data::new(DiagnosisWorkflow::new(
        model,
        Arc::new(TensorCache::new(preprocessing)),
        remote,
        persistence,
    ));
    let registry = web::Data::new(SessionRegistry::with_ttl(config.session_ttl));

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(workflow.clone())
            .app_data(registry.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}

// main.rs
use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::web::JsonConfig;
use actix_web::{App, HttpResponse, HttpServer, web};
use dotenv::dotenv;
use std::sync::Arc;

use silsilah_backend::{
    config::AppConfig,
    controllers, db,
    render::{GraphvizRenderer, TreeRenderer},
};

fn cors(origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600);

    match origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting up...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Konfigurasi tidak valid: {}", e);
            std::process::exit(1);
        }
    };

    let store = match db::establish_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            log::error!("Gagal inisialisasi store: {:?}", e);
            std::process::exit(1);
        }
    };
    let mut graphviz = GraphvizRenderer::new(config.dot_bin.clone(), config.render_timeout);
    if let Some(dir) = &config.scratch_dir {
        graphviz = graphviz.with_scratch_root(dir);
    }
    let renderer: Arc<dyn TreeRenderer> = Arc::new(graphviz);

    let store = web::Data::from(store);
    let renderer = web::Data::from(renderer);
    let cors_origin = config.cors_origin.clone();

    log::info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        let json_config = JsonConfig::default()
            .limit(1024 * 1024)
            .content_type_required(false)
            .error_handler(|err, _req| {
                log::error!("JSON payload error: {}", err);
                let response = HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Payload error: {}", err)
                }));
                InternalError::from_response(err, response).into()
            });

        App::new()
            .app_data(store.clone())
            .app_data(renderer.clone())
            .app_data(json_config)
            .wrap(cors(cors_origin.as_deref()))
            .wrap(Logger::default())
            .service(controllers::family_controller::scope())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

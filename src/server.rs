use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;

use crate::comisiones::{ComisionStore, HttpComisionStore, MemoriaComisionStore};
use crate::config::Config;
use crate::server_handlers::{
    crear_handler, eliminar_todas_handler, excel_compare_csv_handler, excel_compare_handler, health_handler, help_handler,
    lote_handler, pdf_compare_csv_handler, pdf_compare_handler, realizada_handler, vista_handler,
};

/// Estado compartido por todos los workers.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ComisionStore>,
}

impl AppState {
    /// Elige el almacén según la configuración: HTTP si hay URL del backend de
    /// comisiones, memoria si no.
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn ComisionStore> = match &config.comisiones_url {
            Some(url) => {
                tracing::info!(url = %url, "usando backend de comisiones");
                Arc::new(HttpComisionStore::new(url.clone()))
            }
            None => {
                tracing::warn!("CENTENO_COMISIONES_URL no definida, las comisiones se guardan en memoria");
                Arc::new(MemoriaComisionStore::new())
            }
        };
        AppState { config, store }
    }

    pub fn with_store(config: Config, store: Arc<dyn ComisionStore>) -> Self {
        AppState { config, store }
    }
}

/// Rutas de la API. Separado de `run_server` para poder montarlo en tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/excel/compare", web::post().to(excel_compare_handler))
        .route("/api/excel/compare/csv", web::post().to(excel_compare_csv_handler))
        .route("/api/pdf/compare", web::post().to(pdf_compare_handler))
        .route("/api/pdf/compare/csv", web::post().to(pdf_compare_csv_handler))
        .route("/api/comisiones", web::post().to(crear_handler))
        .route("/api/comisiones/lote", web::post().to(lote_handler))
        .route("/api/comisiones/vista", web::get().to(vista_handler))
        .route("/api/comisiones/all", web::delete().to(eliminar_todas_handler))
        .route("/api/comisiones/{id}/realizada", web::patch().to(realizada_handler))
        .route("/api/health", web::get().to(health_handler))
        .route("/help", web::get().to(help_handler));
}

fn cors(config: &Config) -> Cors {
    let base = match &config.cors_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    base.allow_any_method().allow_any_header().supports_credentials().max_age(3600)
}

/// Arranca el servidor HTTP con la configuración dada.
pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind = config.bind.clone();
    let state = web::Data::new(AppState::new(config));
    tracing::info!(bind = %bind, umbral = state.config.umbral_similitud, "iniciando servidor");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&state.config))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(&bind)?
    .run()
    .await
}

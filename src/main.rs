// --- Centeno Admin: servicio de comparación de comisiones ---

use centeno_admin::logging::configure_logging;
use centeno_admin::{Config, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    configure_logging();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuración inválida");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    run_server(config).await
}

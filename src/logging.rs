use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Inicializa el subscriber global. `RUST_LOG` tiene prioridad sobre el filtro
/// por defecto. Los registros de `log` (p. ej. el `Logger` de actix) se
/// reenvían a `tracing`.
pub fn configure_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,lopdf=warn"));

    let stdout_log = fmt::layer().with_target(true).with_writer(std::io::stdout);

    // Ignorar el error si ya hay un subscriber (p. ej. en tests)
    let _ = tracing_subscriber::registry().with(filter).with(stdout_log).try_init();
}

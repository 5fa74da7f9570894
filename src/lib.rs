// Biblioteca raíz del crate `centeno_admin`.
// Compara las comisiones de dos archivos (Excel o PDF), propone pares por
// similitud de nombre y guarda los resultados en el backend de comisiones.
pub mod algorithm;
pub mod api_json;
pub mod comisiones;
pub mod config;
pub mod error;
pub mod excel;
pub mod export;
pub mod logging;
pub mod models;
pub mod pdf;
pub mod server;
pub mod server_handlers;

pub use config::Config;
pub use error::{CentenoError, Result};
/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;

//! Motor de comparación: normalización de nombres, similitud y emparejamiento
//! voraz entre los registros de dos archivos.

pub mod emparejar;
pub mod normalizar;
pub mod similitud;

pub use emparejar::{Estadisticas, emparejar, estadisticas};
pub use normalizar::{normalize_header, normalize_name};
pub use similitud::{porcentaje, similitud, similitud_normalizada};

/// Porcentaje mínimo de similitud para proponer un par.
pub const UMBRAL_POR_DEFECTO: f64 = 60.0;

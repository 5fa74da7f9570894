//! Módulo `excel`: extracción de comisiones desde planillas subidas.
//!
//! Submódulos:
//! - `io`: apertura de workbooks en memoria y conversión de celdas
//! - `comisiones`: detección de encabezados y conversión de filas en registros

/// Helpers de IO para calamine
pub mod io;

/// Lectura de comisiones: `extraer_registros_excel`
pub mod comisiones;

pub use comisiones::{Columna, MapaColumnas, extraer_registros_excel, registros_de_filas};
pub use io::cell_to_string;

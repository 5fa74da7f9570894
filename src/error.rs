use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Errores del servicio de comparación.
///
/// Sólo `FormatoInvalido` y los errores de carga abortan una comparación; las
/// filas o páginas ilegibles dentro de un archivo válido se omiten sin error.
#[derive(Error, Debug)]
pub enum CentenoError {
    #[error("el archivo '{archivo}' no tiene un formato válido: {motivo}")]
    FormatoInvalido { archivo: String, motivo: String },

    #[error("falta el archivo '{0}' en la solicitud")]
    ArchivoFaltante(String),

    #[error("el archivo '{archivo}' supera el límite de {limite_mb} MB")]
    ArchivoDemasiadoGrande { archivo: String, limite_mb: usize },

    #[error("parámetro inválido: {0}")]
    ParametroInvalido(String),

    #[error("error leyendo la carga multipart: {0}")]
    Multipart(String),

    #[error("error del servicio de comisiones: {0}")]
    Comisiones(String),

    #[error("configuración inválida: {0}")]
    Config(String),

    #[error("error al generar CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("error interno: {0}")]
    Interno(String),
}

impl CentenoError {
    pub fn formato_invalido(archivo: impl Into<String>, motivo: impl Into<String>) -> Self {
        CentenoError::FormatoInvalido { archivo: archivo.into(), motivo: motivo.into() }
    }

    /// Código estable para que el frontend distinga el tipo de fallo.
    pub fn codigo(&self) -> &'static str {
        match self {
            CentenoError::FormatoInvalido { .. } => "FORMATO_INVALIDO",
            CentenoError::ArchivoFaltante(_) => "ARCHIVO_FALTANTE",
            CentenoError::ArchivoDemasiadoGrande { .. } => "ARCHIVO_DEMASIADO_GRANDE",
            CentenoError::ParametroInvalido(_) => "PARAMETRO_INVALIDO",
            CentenoError::Multipart(_) => "MULTIPART",
            CentenoError::Comisiones(_) => "COMISIONES",
            CentenoError::Config(_) => "CONFIG",
            CentenoError::Csv(_) => "CSV",
            CentenoError::Interno(_) => "INTERNO",
        }
    }
}

impl ResponseError for CentenoError {
    fn status_code(&self) -> StatusCode {
        match self {
            CentenoError::FormatoInvalido { .. }
            | CentenoError::ArchivoFaltante(_)
            | CentenoError::ParametroInvalido(_)
            | CentenoError::Multipart(_) => StatusCode::BAD_REQUEST,
            CentenoError::ArchivoDemasiadoGrande { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CentenoError::Comisiones(_) => StatusCode::BAD_GATEWAY,
            CentenoError::Config(_) | CentenoError::Csv(_) | CentenoError::Interno(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.codigo(),
            "message": self.to_string(),
        }))
    }
}

pub type Result<T> = std::result::Result<T, CentenoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formato_invalido_es_bad_request() {
        let e = CentenoError::formato_invalido("a.xlsx", "zip corrupto");
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.codigo(), "FORMATO_INVALIDO");
        assert!(e.to_string().contains("a.xlsx"));
    }

    #[test]
    fn error_del_colaborador_es_bad_gateway() {
        let e = CentenoError::Comisiones("timeout".into());
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
    }
}

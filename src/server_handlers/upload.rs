use actix_multipart::Multipart;
use futures_util::stream::StreamExt;

use crate::config::Config;
use crate::error::{CentenoError, Result};
use crate::models::ModoComparacion;

/// Archivo recibido en memoria.
#[derive(Debug, Clone)]
pub struct ArchivoSubido {
    pub nombre: String,
    pub datos: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ParArchivos {
    pub archivo1: ArchivoSubido,
    pub archivo2: ArchivoSubido,
}

pub const CAMPO_ARCHIVO1: &str = "archivo1";
pub const CAMPO_ARCHIVO2: &str = "archivo2";

/// Verifica que la extensión del nombre corresponda al modo.
pub fn validar_extension(nombre: &str, modo: ModoComparacion) -> Result<()> {
    let ext = nombre.rsplit_once('.').map(|(_, e)| e.to_lowercase()).unwrap_or_default();
    if modo.extensiones().contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(CentenoError::formato_invalido(
            nombre,
            format!("se esperaba un archivo {} ({})", modo.etiqueta(), modo.extensiones().join(", ")),
        ))
    }
}

/// Lee los campos `archivo1` y `archivo2` de la carga. Otros campos se
/// descartan; un campo de archivo repetido es un error. Cada archivo se
/// limita a `config.max_upload_mb` megabytes.
pub async fn leer_par(mut payload: Multipart, modo: ModoComparacion, config: &Config) -> Result<ParArchivos> {
    let limite = config.max_upload_bytes();
    let mut archivo1: Option<ArchivoSubido> = None;
    let mut archivo2: Option<ArchivoSubido> = None;

    while let Some(field_res) = payload.next().await {
        let mut field = field_res.map_err(|e| CentenoError::Multipart(e.to_string()))?;
        let campo = field.name().to_string();
        if campo != CAMPO_ARCHIVO1 && campo != CAMPO_ARCHIVO2 {
            // vaciar el campo para poder seguir con el siguiente
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| CentenoError::Multipart(e.to_string()))?;
            }
            continue;
        }
        let ya_recibido = if campo == CAMPO_ARCHIVO1 { archivo1.is_some() } else { archivo2.is_some() };
        if ya_recibido {
            tracing::warn!(campo = %campo, "campo de archivo repetido en la carga");
            return Err(CentenoError::Multipart(format!("el campo '{}' aparece más de una vez", campo)));
        }

        let nombre = field
            .content_disposition()
            .get_filename()
            .map(|s| s.to_string())
            .unwrap_or_else(|| campo.clone());
        validar_extension(&nombre, modo)?;

        let mut datos: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes = chunk.map_err(|e| CentenoError::Multipart(e.to_string()))?;
            if datos.len() + bytes.len() > limite {
                return Err(CentenoError::ArchivoDemasiadoGrande { archivo: nombre, limite_mb: config.max_upload_mb });
            }
            datos.extend_from_slice(&bytes);
        }
        if datos.is_empty() {
            return Err(CentenoError::formato_invalido(&nombre, "el archivo está vacío"));
        }

        tracing::debug!(campo = %campo, archivo = %nombre, bytes = datos.len(), "archivo recibido");
        let subido = ArchivoSubido { nombre, datos };
        if campo == CAMPO_ARCHIVO1 {
            archivo1 = Some(subido);
        } else {
            archivo2 = Some(subido);
        }
    }

    match (archivo1, archivo2) {
        (Some(archivo1), Some(archivo2)) => Ok(ParArchivos { archivo1, archivo2 }),
        (None, _) => Err(CentenoError::ArchivoFaltante(CAMPO_ARCHIVO1.to_string())),
        (_, None) => Err(CentenoError::ArchivoFaltante(CAMPO_ARCHIVO2.to_string())),
    }
}

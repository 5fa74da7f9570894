use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{HttpResponse, web};
use std::sync::{Arc, OnceLock};
use tokio::sync::Semaphore;

use super::upload::{ArchivoSubido, leer_par};
use crate::algorithm::{emparejar, estadisticas};
use crate::api_json::{CompararResponse, MatchEntry, ResumenArchivo};
use crate::error::{CentenoError, Result};
use crate::excel::extraer_registros_excel;
use crate::export::{NOMBRE_ARCHIVO_CSV, exportar_csv};
use crate::models::{Coincidencia, ModoComparacion, Registro};
use crate::pdf::extraer_registros_pdf;
use crate::server::AppState;

/// Limita las comparaciones simultáneas al número de CPUs.
fn semaforo() -> Arc<Semaphore> {
    static GLOBAL_SEM: OnceLock<Arc<Semaphore>> = OnceLock::new();
    GLOBAL_SEM
        .get_or_init(|| Arc::new(Semaphore::new(std::cmp::max(1, num_cpus::get()))))
        .clone()
}

/// Resultado completo de una comparación.
pub struct Comparacion {
    pub archivo1: String,
    pub archivo2: String,
    pub registros1: Vec<Registro>,
    pub registros2: Vec<Registro>,
    pub coincidencias: Vec<Coincidencia>,
}

fn extraer(modo: ModoComparacion, archivo: ArchivoSubido) -> Result<Vec<Registro>> {
    match modo {
        ModoComparacion::Excel => extraer_registros_excel(&archivo.nombre, archivo.datos),
        ModoComparacion::Pdf => extraer_registros_pdf(&archivo.nombre, &archivo.datos),
    }
}

/// Extrae ambos archivos en paralelo (fuera del runtime async) y los
/// empareja. Si cualquiera de los dos falla la comparación entera falla.
pub async fn comparar(modo: ModoComparacion, payload: Multipart, state: &AppState) -> Result<Comparacion> {
    let par = leer_par(payload, modo, &state.config).await?;
    let nombre1 = par.archivo1.nombre.clone();
    let nombre2 = par.archivo2.nombre.clone();

    let permit = semaforo()
        .acquire_owned()
        .await
        .map_err(|e| CentenoError::Interno(format!("no se pudo obtener el semáforo: {}", e)))?;
    let inicio = std::time::Instant::now();

    let a = par.archivo1;
    let b = par.archivo2;
    let (r1, r2) = tokio::join!(
        tokio::task::spawn_blocking(move || extraer(modo, a)),
        tokio::task::spawn_blocking(move || extraer(modo, b)),
    );
    let join = |e: tokio::task::JoinError| CentenoError::Interno(format!("error en tarea de extracción: {}", e));
    let registros1 = r1.map_err(join)??;
    let registros2 = r2.map_err(join)??;

    let umbral = state.config.umbral_similitud;
    let coincidencias = emparejar(&registros1, &registros2, umbral);
    drop(permit);

    tracing::info!(
        modo = modo.etiqueta(),
        archivo1 = %nombre1,
        archivo2 = %nombre2,
        registros1 = registros1.len(),
        registros2 = registros2.len(),
        pares = coincidencias.iter().filter(|c| c.es_par()).count(),
        elapsed_ms = inicio.elapsed().as_millis() as u64,
        "comparación terminada"
    );

    Ok(Comparacion { archivo1: nombre1, archivo2: nombre2, registros1, registros2, coincidencias })
}

fn respuesta_json(c: Comparacion) -> HttpResponse {
    let resp = CompararResponse {
        success: true,
        matches: c.coincidencias.iter().map(MatchEntry::from).collect(),
        archivo1: ResumenArchivo::new(&c.archivo1, &c.registros1),
        archivo2: ResumenArchivo::new(&c.archivo2, &c.registros2),
        estadisticas: estadisticas(&c.coincidencias),
    };
    HttpResponse::Ok().json(resp)
}

fn respuesta_csv(c: Comparacion) -> Result<HttpResponse> {
    let cuerpo = exportar_csv(&c.coincidencias)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .append_header((header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", NOMBRE_ARCHIVO_CSV)))
        .body(cuerpo))
}

pub async fn excel_compare_handler(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    Ok(respuesta_json(comparar(ModoComparacion::Excel, payload, &state).await?))
}

pub async fn pdf_compare_handler(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    Ok(respuesta_json(comparar(ModoComparacion::Pdf, payload, &state).await?))
}

pub async fn excel_compare_csv_handler(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    respuesta_csv(comparar(ModoComparacion::Excel, payload, &state).await?)
}

pub async fn pdf_compare_csv_handler(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    respuesta_csv(comparar(ModoComparacion::Pdf, payload, &state).await?)
}

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::api_json::{LoteRequest, LoteResponse, VistaQuery};
use crate::comisiones::vista::{ConsultaVista, construir_vista};
use crate::comisiones::{NuevaComision, guardar_lote};
use crate::error::{CentenoError, Result};
use crate::models::Coincidencia;
use crate::server::AppState;

/// POST /api/comisiones
///
/// Crea una sola comisión, normalmente una fila corregida a mano.
pub async fn crear_handler(state: web::Data<AppState>, body: web::Json<NuevaComision>) -> Result<HttpResponse> {
    let nueva = body.into_inner();
    let faltantes = nueva.campos_faltantes();
    if !faltantes.is_empty() {
        return Err(CentenoError::ParametroInvalido(format!("faltan campos obligatorios: {}", faltantes.join(", "))));
    }
    let comision = state.store.crear(&nueva).await?;
    tracing::info!(comision = %comision.comision, id = ?comision.id, "comisión creada");
    Ok(HttpResponse::Created().json(comision))
}

/// POST /api/comisiones/lote
pub async fn lote_handler(state: web::Data<AppState>, body: web::Json<LoteRequest>) -> Result<HttpResponse> {
    let req = body.into_inner();
    let lado = req.lado;
    let coincidencias: Vec<Coincidencia> = req.matches.into_iter().map(Coincidencia::from).collect();
    let resumen = guardar_lote(state.store.as_ref(), &coincidencias, lado).await;
    Ok(HttpResponse::Ok().json(LoteResponse { success: true, resumen }))
}

/// GET /api/comisiones/vista
pub async fn vista_handler(state: web::Data<AppState>, query: web::Query<VistaQuery>) -> Result<HttpResponse> {
    let consulta = ConsultaVista::try_from(query.into_inner())?;
    let comisiones = state.store.listar().await?;
    Ok(HttpResponse::Ok().json(construir_vista(&comisiones, &consulta)))
}

#[derive(Debug, Deserialize)]
pub struct RealizadaBody {
    pub realizada: bool,
}

/// PATCH /api/comisiones/{id}/realizada
pub async fn realizada_handler(
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<RealizadaBody>,
) -> Result<HttpResponse> {
    let comision = state.store.marcar_realizada(&id, body.realizada).await?;
    Ok(HttpResponse::Ok().json(comision))
}

/// DELETE /api/comisiones/all
pub async fn eliminar_todas_handler(state: web::Data<AppState>) -> Result<HttpResponse> {
    let eliminacion = state.store.eliminar_todas().await?;
    tracing::info!(eliminadas = eliminacion.deleted_count, "comisiones eliminadas");
    Ok(HttpResponse::Ok().json(eliminacion))
}

//! Acceso al backend de comisiones.
//!
//! `HttpComisionStore` habla con el servicio real; `MemoriaComisionStore`
//! sirve para desarrollo local y tests cuando no hay URL configurada.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use super::{Comision, NuevaComision};
use crate::error::{CentenoError, Result};

/// Resultado de borrar todas las comisiones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eliminacion {
    pub deleted_count: u64,
    #[serde(default)]
    pub message: String,
}

#[async_trait]
pub trait ComisionStore: Send + Sync {
    async fn crear(&self, nueva: &NuevaComision) -> Result<Comision>;

    async fn listar(&self) -> Result<Vec<Comision>>;

    async fn marcar_realizada(&self, id: &str, realizada: bool) -> Result<Comision>;

    async fn eliminar_todas(&self) -> Result<Eliminacion>;
}

// ---------------------------------------------------------------------------
// HTTP

/// El colaborador a veces envuelve la entidad en `{ data: ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envuelto<T> {
    Data { data: T },
    Plano(T),
}

impl<T> Envuelto<T> {
    fn valor(self) -> T {
        match self {
            Envuelto::Data { data } => data,
            Envuelto::Plano(v) => v,
        }
    }
}

#[derive(Deserialize)]
struct ErrorColaborador {
    #[serde(default)]
    message: Option<String>,
}

pub struct HttpComisionStore {
    client: Client,
    base: String,
}

impl HttpComisionStore {
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(client: Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        HttpComisionStore { client, base }
    }

    fn url(&self, ruta: &str) -> String {
        format!("{}/api/comisiones{}", self.base, ruta)
    }

    /// Convierte una respuesta no exitosa en error usando el `message` del
    /// colaborador cuando lo trae.
    async fn verificar(resp: Response, contexto: &str) -> Result<Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let mensaje = resp
            .json::<ErrorColaborador>()
            .await
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| contexto.to_string());
        Err(CentenoError::Comisiones(format!("{} ({})", mensaje, status)))
    }
}

fn error_red(e: reqwest::Error) -> CentenoError {
    CentenoError::Comisiones(e.to_string())
}

#[async_trait]
impl ComisionStore for HttpComisionStore {
    async fn crear(&self, nueva: &NuevaComision) -> Result<Comision> {
        let resp = self.client.post(self.url("")).json(nueva).send().await.map_err(error_red)?;
        let resp = Self::verificar(resp, "Error al crear la comisión").await?;
        let c: Envuelto<Comision> = resp.json().await.map_err(error_red)?;
        Ok(c.valor())
    }

    async fn listar(&self) -> Result<Vec<Comision>> {
        let resp = self.client.get(self.url("")).send().await.map_err(error_red)?;
        let resp = Self::verificar(resp, "Error al obtener las comisiones").await?;

        #[derive(Deserialize)]
        struct Lista {
            #[serde(default)]
            data: Vec<Comision>,
        }
        let lista: Lista = resp.json().await.map_err(error_red)?;
        tracing::debug!(total = lista.data.len(), "comisiones obtenidas del colaborador");
        Ok(lista.data)
    }

    async fn marcar_realizada(&self, id: &str, realizada: bool) -> Result<Comision> {
        let resp = self
            .client
            .patch(self.url(&format!("/{}/realizada", id)))
            .json(&json!({ "realizada": realizada }))
            .send()
            .await
            .map_err(error_red)?;
        let resp = Self::verificar(resp, "Error al actualizar el estado de la comisión").await?;
        let c: Envuelto<Comision> = resp.json().await.map_err(error_red)?;
        Ok(c.valor())
    }

    async fn eliminar_todas(&self) -> Result<Eliminacion> {
        let resp = self.client.delete(self.url("/all")).send().await.map_err(error_red)?;
        let resp = Self::verificar(resp, "Error al eliminar todas las comisiones").await?;
        resp.json().await.map_err(error_red)
    }
}

// ---------------------------------------------------------------------------
// Memoria

#[derive(Default)]
pub struct MemoriaComisionStore {
    comisiones: Mutex<Vec<Comision>>,
}

impl MemoriaComisionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ComisionStore for MemoriaComisionStore {
    async fn crear(&self, nueva: &NuevaComision) -> Result<Comision> {
        // el colaborador real valida los campos obligatorios; aquí igual
        let faltantes = nueva.campos_faltantes();
        if !faltantes.is_empty() {
            return Err(CentenoError::Comisiones(format!("faltan campos: {}", faltantes.join(", "))));
        }
        let mut comisiones = self.comisiones.lock().await;
        let ahora = Utc::now();
        let c = Comision {
            id: Some(format!("mem-{}", comisiones.len() + 1)),
            periodo: nueva.periodo.clone(),
            actividad: nueva.actividad.clone(),
            modalidad: nueva.modalidad.clone(),
            docente: nueva.docente.clone(),
            horario: nueva.horario.clone(),
            aula: nueva.aula.clone(),
            comision: nueva.comision.clone(),
            realizada: false,
            fecha_creacion: Some(ahora),
            fecha_actualizacion: Some(ahora),
        };
        comisiones.push(c.clone());
        Ok(c)
    }

    async fn listar(&self) -> Result<Vec<Comision>> {
        Ok(self.comisiones.lock().await.clone())
    }

    async fn marcar_realizada(&self, id: &str, realizada: bool) -> Result<Comision> {
        let mut comisiones = self.comisiones.lock().await;
        let c = comisiones
            .iter_mut()
            .find(|c| c.id.as_deref() == Some(id))
            .ok_or_else(|| CentenoError::Comisiones(format!("no existe la comisión {}", id)))?;
        c.realizada = realizada;
        c.fecha_actualizacion = Some(Utc::now());
        Ok(c.clone())
    }

    async fn eliminar_todas(&self) -> Result<Eliminacion> {
        let mut comisiones = self.comisiones.lock().await;
        let n = comisiones.len() as u64;
        comisiones.clear();
        Ok(Eliminacion { deleted_count: n, message: format!("{} comisiones eliminadas", n) })
    }
}

//! Comisiones: entidad del backend colaborador, proyección de coincidencias a
//! solicitudes de creación y guardado en lote.
//!
//! Submódulos:
//! - `store`: acceso al colaborador (HTTP o memoria)
//! - `vista`: filtros, orden y agrupación por horario/día para el listado

pub mod store;
pub mod vista;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CamposComision, Coincidencia};
pub use store::{ComisionStore, HttpComisionStore, MemoriaComisionStore};

/// Comisión tal como la devuelve el backend de comisiones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comision {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub periodo: String,
    pub actividad: String,
    pub modalidad: String,
    pub docente: String,
    pub horario: String,
    pub aula: String,
    #[serde(default)]
    pub comision: String,
    #[serde(default)]
    pub realizada: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_actualizacion: Option<DateTime<Utc>>,
}

/// Cuerpo de creación. Ningún campo es nulo: los ausentes van como "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NuevaComision {
    pub periodo: String,
    pub actividad: String,
    pub modalidad: String,
    pub docente: String,
    pub horario: String,
    pub aula: String,
    pub comision: String,
}

impl NuevaComision {
    pub fn desde_campos(etiqueta: &str, campos: &CamposComision) -> Self {
        let v = |c: &Option<String>| c.as_deref().map(str::trim).unwrap_or_default().to_string();
        let comision = match campos.comision.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => etiqueta.trim().to_string(),
        };
        NuevaComision {
            periodo: v(&campos.periodo),
            actividad: v(&campos.actividad),
            modalidad: v(&campos.modalidad),
            docente: v(&campos.docente),
            horario: v(&campos.horario),
            aula: v(&campos.aula),
            comision,
        }
    }

    /// Nombres de los campos obligatorios que están vacíos.
    pub fn campos_faltantes(&self) -> Vec<&'static str> {
        [
            ("periodo", &self.periodo),
            ("actividad", &self.actividad),
            ("modalidad", &self.modalidad),
            ("docente", &self.docente),
            ("horario", &self.horario),
            ("aula", &self.aula),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }

    pub fn es_valida(&self) -> bool {
        self.campos_faltantes().is_empty()
    }
}

/// De qué archivo se toman los campos al guardar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lado {
    #[default]
    Archivo1,
    Archivo2,
    /// archivo1 y, campo a campo, archivo2 cuando archivo1 no lo trae
    Ambos,
}

fn combinar(a: &CamposComision, b: &CamposComision) -> CamposComision {
    let elegir = |x: &Option<String>, y: &Option<String>| {
        x.clone().filter(|s| !s.trim().is_empty()).or_else(|| y.clone())
    };
    CamposComision {
        periodo: elegir(&a.periodo, &b.periodo),
        actividad: elegir(&a.actividad, &b.actividad),
        comision: elegir(&a.comision, &b.comision),
        modalidad: elegir(&a.modalidad, &b.modalidad),
        docente: elegir(&a.docente, &b.docente),
        horario: elegir(&a.horario, &b.horario),
        aula: elegir(&a.aula, &b.aula),
    }
}

/// Proyecta una coincidencia a una solicitud de creación. Devuelve `None` si
/// el lado pedido es un "sin coincidencia".
pub fn proyectar(c: &Coincidencia, lado: Lado) -> Option<NuevaComision> {
    let campos = match lado {
        Lado::Archivo1 => c.archivo1.as_ref()?.campos.clone(),
        Lado::Archivo2 => c.archivo2.as_ref()?.campos.clone(),
        Lado::Ambos => match (&c.archivo1, &c.archivo2) {
            (Some(a), Some(b)) => combinar(&a.campos, &b.campos),
            (Some(a), None) => a.campos.clone(),
            (None, Some(b)) => b.campos.clone(),
            (None, None) => return None,
        },
    };
    Some(NuevaComision::desde_campos(&c.comision, &campos))
}

/// Detalle por entrada del guardado en lote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "estado", rename_all = "lowercase")]
pub enum DetalleGuardado {
    Guardada { comision: String },
    Omitida { comision: String, faltantes: Vec<String> },
    Fallida { comision: String, error: String },
}

/// Resultado agregado del guardado en lote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResumenGuardado {
    pub guardadas: usize,
    pub omitidas: usize,
    pub fallidas: usize,
    pub detalles: Vec<DetalleGuardado>,
}

/// Guarda cada coincidencia como comisión. Las que no tienen todos los campos
/// se omiten y las que el colaborador rechaza se cuentan como fallidas; el lote
/// nunca se corta por un registro.
pub async fn guardar_lote(store: &dyn ComisionStore, coincidencias: &[Coincidencia], lado: Lado) -> ResumenGuardado {
    let mut resumen = ResumenGuardado::default();

    for c in coincidencias {
        let Some(nueva) = proyectar(c, lado) else {
            resumen.omitidas += 1;
            resumen.detalles.push(DetalleGuardado::Omitida {
                comision: c.comision.clone(),
                faltantes: vec!["registro".to_string()],
            });
            continue;
        };

        let faltantes = nueva.campos_faltantes();
        if !faltantes.is_empty() {
            tracing::debug!(comision = %c.comision, ?faltantes, "comisión omitida por campos faltantes");
            resumen.omitidas += 1;
            resumen.detalles.push(DetalleGuardado::Omitida {
                comision: c.comision.clone(),
                faltantes: faltantes.into_iter().map(String::from).collect(),
            });
            continue;
        }

        match store.crear(&nueva).await {
            Ok(_) => {
                resumen.guardadas += 1;
                resumen.detalles.push(DetalleGuardado::Guardada { comision: c.comision.clone() });
            }
            Err(e) => {
                tracing::warn!(comision = %c.comision, error = %e, "el colaborador rechazó la comisión");
                resumen.fallidas += 1;
                resumen.detalles.push(DetalleGuardado::Fallida { comision: c.comision.clone(), error: e.to_string() });
            }
        }
    }

    tracing::info!(
        guardadas = resumen.guardadas,
        omitidas = resumen.omitidas,
        fallidas = resumen.fallidas,
        "guardado en lote terminado"
    );
    resumen
}

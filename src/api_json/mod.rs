//! Tipos JSON de la API HTTP.
//!
//! El núcleo trabaja con `Option<Registro>` para el lado sin coincidencia; en
//! el JSON ese lado viaja como un registro marcador (`archivo = "N/A"`,
//! `pagina = 0`, textos vacíos) que es lo que espera el frontend.

use serde::{Deserialize, Serialize};

use crate::algorithm::Estadisticas;
use crate::comisiones::vista::{CampoOrden, ConsultaVista, Dia, Direccion, FiltroRealizada, Filtros};
use crate::comisiones::{Lado, ResumenGuardado};
use crate::error::CentenoError;
use crate::models::{CamposComision, Coincidencia, Registro};

/// Valor de `archivo` en el lado sin coincidencia.
pub const MARCADOR_SIN_ARCHIVO: &str = "N/A";

/// Registro tal como viaja por la API: todos los atributos presentes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistroEntry {
    pub nombre: String,
    pub archivo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hoja: Option<String>,
    #[serde(default)]
    pub pagina: u32,
    #[serde(default)]
    pub texto: String,
    #[serde(default)]
    pub periodo_lectivo: String,
    #[serde(default)]
    pub actividad: String,
    #[serde(default)]
    pub comision: String,
    #[serde(default)]
    pub modalidad: String,
    #[serde(default)]
    pub docente: String,
    #[serde(default)]
    pub horario: String,
    #[serde(default)]
    pub aula: String,
}

impl RegistroEntry {
    pub fn marcador() -> Self {
        RegistroEntry { archivo: MARCADOR_SIN_ARCHIVO.to_string(), ..Default::default() }
    }

    pub fn es_marcador(&self) -> bool {
        self.archivo == MARCADOR_SIN_ARCHIVO && self.pagina == 0
    }
}

impl From<&Registro> for RegistroEntry {
    fn from(r: &Registro) -> Self {
        let c = &r.campos;
        let s = |v: &Option<String>| v.clone().unwrap_or_default();
        RegistroEntry {
            nombre: r.nombre.clone(),
            archivo: r.archivo.clone(),
            hoja: r.hoja.clone(),
            pagina: r.pagina,
            texto: r.texto.clone(),
            periodo_lectivo: s(&c.periodo),
            actividad: s(&c.actividad),
            comision: s(&c.comision),
            modalidad: s(&c.modalidad),
            docente: s(&c.docente),
            horario: s(&c.horario),
            aula: s(&c.aula),
        }
    }
}

fn no_vacio(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

impl From<RegistroEntry> for Option<Registro> {
    fn from(e: RegistroEntry) -> Self {
        if e.es_marcador() {
            return None;
        }
        Some(Registro {
            archivo: e.archivo,
            hoja: e.hoja,
            pagina: e.pagina,
            texto: e.texto,
            nombre: e.nombre,
            campos: CamposComision {
                periodo: no_vacio(e.periodo_lectivo),
                actividad: no_vacio(e.actividad),
                comision: no_vacio(e.comision),
                modalidad: no_vacio(e.modalidad),
                docente: no_vacio(e.docente),
                horario: no_vacio(e.horario),
                aula: no_vacio(e.aula),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub comision: String,
    #[serde(default = "RegistroEntry::marcador")]
    pub archivo1: RegistroEntry,
    #[serde(default = "RegistroEntry::marcador")]
    pub archivo2: RegistroEntry,
    #[serde(default)]
    pub similitud: f64,
}

impl From<&Coincidencia> for MatchEntry {
    fn from(c: &Coincidencia) -> Self {
        let lado = |r: &Option<Registro>| r.as_ref().map_or_else(RegistroEntry::marcador, RegistroEntry::from);
        MatchEntry {
            comision: c.comision.clone(),
            archivo1: lado(&c.archivo1),
            archivo2: lado(&c.archivo2),
            similitud: c.similitud,
        }
    }
}

impl From<MatchEntry> for Coincidencia {
    fn from(m: MatchEntry) -> Self {
        Coincidencia {
            comision: m.comision,
            archivo1: m.archivo1.into(),
            archivo2: m.archivo2.into(),
            similitud: m.similitud,
        }
    }
}

/// Resumen de lo extraído de un archivo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumenArchivo {
    pub nombre: String,
    pub total: usize,
    pub comisiones: Vec<String>,
}

impl ResumenArchivo {
    pub fn new(nombre: &str, registros: &[Registro]) -> Self {
        ResumenArchivo {
            nombre: nombre.to_string(),
            total: registros.len(),
            comisiones: registros.iter().map(|r| r.nombre.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompararResponse {
    pub success: bool,
    pub matches: Vec<MatchEntry>,
    pub archivo1: ResumenArchivo,
    pub archivo2: ResumenArchivo,
    pub estadisticas: Estadisticas,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoteRequest {
    pub matches: Vec<MatchEntry>,
    #[serde(default)]
    pub lado: Lado,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoteResponse {
    pub success: bool,
    #[serde(flatten)]
    pub resumen: ResumenGuardado,
}

/// Parámetros de `GET /api/comisiones/vista`, todos opcionales.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VistaQuery {
    pub periodo: Option<String>,
    pub actividad: Option<String>,
    pub modalidad: Option<String>,
    pub docente: Option<String>,
    pub horario: Option<String>,
    pub aula: Option<String>,
    pub comision: Option<String>,
    pub realizada: Option<String>,
    pub dia: Option<String>,
    pub orden: Option<String>,
    pub direccion: Option<String>,
}

impl TryFrom<VistaQuery> for ConsultaVista {
    type Error = CentenoError;

    fn try_from(q: VistaQuery) -> Result<Self, Self::Error> {
        let presente = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        Ok(ConsultaVista {
            filtros: Filtros {
                periodo: presente(&q.periodo),
                actividad: presente(&q.actividad),
                modalidad: presente(&q.modalidad),
                docente: presente(&q.docente),
                horario: presente(&q.horario),
                aula: presente(&q.aula),
                comision: presente(&q.comision),
                realizada: presente(&q.realizada).map(|s| s.parse::<FiltroRealizada>()).transpose()?.unwrap_or_default(),
            },
            dia: presente(&q.dia).map(|s| s.parse::<Dia>()).transpose()?,
            orden: presente(&q.orden).map(|s| s.parse::<CampoOrden>()).transpose()?.unwrap_or_default(),
            direccion: presente(&q.direccion).map(|s| s.parse::<Direccion>()).transpose()?.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registro() -> Registro {
        Registro {
            archivo: "a.xlsx".into(),
            hoja: Some("Hoja1".into()),
            pagina: 2,
            texto: "x".into(),
            nombre: "MAT-01".into(),
            campos: CamposComision { docente: Some("Pérez".into()), ..Default::default() },
        }
    }

    #[test]
    fn lado_vacio_viaja_como_marcador() {
        let c = Coincidencia { comision: "MAT-01".into(), archivo1: Some(registro()), archivo2: None, similitud: 0.0 };
        let v = serde_json::to_value(MatchEntry::from(&c)).unwrap();
        assert_eq!(v["archivo2"]["archivo"], "N/A");
        assert_eq!(v["archivo2"]["pagina"], 0);
        assert_eq!(v["archivo2"]["docente"], "");
        assert_eq!(v["archivo1"]["periodoLectivo"], "");
        assert_eq!(v["archivo1"]["docente"], "Pérez");
    }

    #[test]
    fn marcador_vuelve_a_none() {
        let c = Coincidencia { comision: "MAT-01".into(), archivo1: Some(registro()), archivo2: None, similitud: 0.0 };
        let ida = MatchEntry::from(&c);
        let vuelta = Coincidencia::from(ida);
        assert_eq!(vuelta, c);
    }

    #[test]
    fn lote_por_defecto_usa_archivo1() {
        let req: LoteRequest = serde_json::from_str(r#"{"matches":[]}"#).unwrap();
        assert_eq!(req.lado, Lado::Archivo1);
        let req: LoteRequest = serde_json::from_str(r#"{"matches":[],"lado":"ambos"}"#).unwrap();
        assert_eq!(req.lado, Lado::Ambos);
    }

    #[test]
    fn consulta_de_vista() {
        let q = VistaQuery {
            docente: Some("  ".into()),
            realizada: Some("false".into()),
            dia: Some("MI".into()),
            orden: Some("docente".into()),
            direccion: Some("asc".into()),
            ..Default::default()
        };
        let c = ConsultaVista::try_from(q).unwrap();
        assert_eq!(c.filtros.docente, None);
        assert_eq!(c.filtros.realizada, FiltroRealizada::Pendientes);
        assert_eq!(c.dia, Some(Dia::Miercoles));
        assert_eq!(c.orden, CampoOrden::Docente);
        assert_eq!(c.direccion, Direccion::Asc);

        let malo = VistaQuery { dia: Some("feriado".into()), ..Default::default() };
        assert!(ConsultaVista::try_from(malo).is_err());
    }
}

// Estructuras de datos principales

use serde::{Deserialize, Serialize};

/// Atributos estructurados de una comisión. En Excel se llenan a partir de las
/// columnas reconocidas; en PDF normalmente quedan vacíos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CamposComision {
    #[serde(rename = "periodoLectivo", default, skip_serializing_if = "Option::is_none")]
    pub periodo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actividad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalidad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docente: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aula: Option<String>,
}

/// Registro extraído de un archivo: una fila de planilla o una aparición de
/// comisión en una página de PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registro {
    /// Nombre del archivo de origen
    pub archivo: String,
    /// Hoja de la planilla (sólo Excel)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hoja: Option<String>,
    /// Fila (Excel) o página (PDF), base 1
    pub pagina: u32,
    /// Texto crudo de la fila o fragmento de la página
    pub texto: String,
    /// Clave de comisión sobre la que se compara
    pub nombre: String,
    #[serde(flatten)]
    pub campos: CamposComision,
}

/// Resultado del emparejamiento. `None` en un lado significa "sin coincidencia".
#[derive(Debug, Clone, PartialEq)]
pub struct Coincidencia {
    pub comision: String,
    pub archivo1: Option<Registro>,
    pub archivo2: Option<Registro>,
    /// Porcentaje 0-100 con un decimal
    pub similitud: f64,
}

impl Coincidencia {
    pub fn es_par(&self) -> bool {
        self.archivo1.is_some() && self.archivo2.is_some()
    }
}

/// Modo de comparación: decide la estrategia de extracción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModoComparacion {
    Excel,
    Pdf,
}

impl ModoComparacion {
    pub fn extensiones(&self) -> &'static [&'static str] {
        match self {
            ModoComparacion::Excel => &["xlsx", "xls", "xlsm", "xlsb", "ods"],
            ModoComparacion::Pdf => &["pdf"],
        }
    }

    pub fn etiqueta(&self) -> &'static str {
        match self {
            ModoComparacion::Excel => "Excel",
            ModoComparacion::Pdf => "PDF",
        }
    }
}

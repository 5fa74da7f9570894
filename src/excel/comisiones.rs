//! Lectura de comisiones desde planillas.
//!
//! Cada hoja se recorre fila por fila. En las primeras filas se busca un
//! encabezado con columnas conocidas; si no aparece se asume el orden
//! `periodo, actividad, comisión, modalidad, docente, horario, aula`.

use calamine::Reader;

use super::io::{abrir_workbook, cell_to_string, listar_hojas};
use crate::algorithm::{normalize_header, normalize_name};
use crate::error::Result;
use crate::models::{CamposComision, Registro};

/// Cantidad de filas iniciales donde se busca el encabezado.
const FILAS_BUSQUEDA_ENCABEZADO: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columna {
    Periodo,
    Actividad,
    Comision,
    Modalidad,
    Docente,
    Horario,
    Aula,
}

const ORDEN_POSICIONAL: [Columna; 7] = [
    Columna::Periodo,
    Columna::Actividad,
    Columna::Comision,
    Columna::Modalidad,
    Columna::Docente,
    Columna::Horario,
    Columna::Aula,
];

/// Reconoce un encabezado (sin acentos, mayúsculas ni espacios).
pub fn columna_de_encabezado(celda: &str) -> Option<Columna> {
    match normalize_header(celda).as_str() {
        "periodolectivo" | "periodo" | "periodoacademico" | "ciclolectivo" => Some(Columna::Periodo),
        "actividad" | "materia" | "asignatura" | "actividadacademica" => Some(Columna::Actividad),
        "comision" | "comisiones" | "nombrecomision" | "codigocomision" | "nombre" => Some(Columna::Comision),
        "modalidad" => Some(Columna::Modalidad),
        "docente" | "docentes" | "profesor" | "profesora" | "profesores" => Some(Columna::Docente),
        "horario" | "horarios" | "diayhorario" => Some(Columna::Horario),
        "aula" | "sala" | "espacio" => Some(Columna::Aula),
        _ => None,
    }
}

/// Asignación de índices de columna a atributos de una hoja.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapaColumnas {
    pub periodo: Option<usize>,
    pub actividad: Option<usize>,
    pub comision: Option<usize>,
    pub modalidad: Option<usize>,
    pub docente: Option<usize>,
    pub horario: Option<usize>,
    pub aula: Option<usize>,
}

impl MapaColumnas {
    fn asignar(&mut self, col: Columna, idx: usize) {
        // la primera aparición de cada encabezado gana
        let slot = match col {
            Columna::Periodo => &mut self.periodo,
            Columna::Actividad => &mut self.actividad,
            Columna::Comision => &mut self.comision,
            Columna::Modalidad => &mut self.modalidad,
            Columna::Docente => &mut self.docente,
            Columna::Horario => &mut self.horario,
            Columna::Aula => &mut self.aula,
        };
        if slot.is_none() {
            *slot = Some(idx);
        }
    }

    fn reconocidas(&self) -> usize {
        [self.periodo, self.actividad, self.comision, self.modalidad, self.docente, self.horario, self.aula]
            .iter()
            .filter(|c| c.is_some())
            .count()
    }

    /// Columna usada como clave: `comisión`, o `actividad` si no hay comisión.
    pub fn columna_clave(&self) -> Option<usize> {
        self.comision.or(self.actividad)
    }

    pub fn posicional(ancho: usize) -> Self {
        let mut mapa = MapaColumnas::default();
        if ancho == 1 {
            mapa.comision = Some(0);
            return mapa;
        }
        for (idx, col) in ORDEN_POSICIONAL.iter().enumerate().take(ancho) {
            mapa.asignar(*col, idx);
        }
        mapa
    }

    /// Intenta interpretar una fila como encabezado. Se acepta si reconoce la
    /// columna de comisión o al menos dos columnas conocidas.
    pub fn desde_encabezado(fila: &[String]) -> Option<Self> {
        let mut mapa = MapaColumnas::default();
        for (idx, celda) in fila.iter().enumerate() {
            if let Some(col) = columna_de_encabezado(celda) {
                mapa.asignar(col, idx);
            }
        }
        if mapa.comision.is_some() || mapa.reconocidas() >= 2 { Some(mapa) } else { None }
    }

    fn campos(&self, fila: &[String]) -> CamposComision {
        let celda = |idx: Option<usize>| {
            idx.and_then(|i| fila.get(i))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        CamposComision {
            periodo: celda(self.periodo),
            actividad: celda(self.actividad),
            comision: celda(self.comision),
            modalidad: celda(self.modalidad),
            docente: celda(self.docente),
            horario: celda(self.horario),
            aula: celda(self.aula),
        }
    }
}

/// Convierte las filas de una hoja en registros. `fila_inicial` es el número
/// (base 1) de la primera fila del rango.
pub fn registros_de_filas(archivo: &str, hoja: Option<&str>, filas: &[Vec<String>], fila_inicial: u32) -> Vec<Registro> {
    let ancho = filas.iter().map(|f| f.iter().rposition(|c| !c.trim().is_empty()).map_or(0, |p| p + 1)).max().unwrap_or(0);
    if ancho == 0 {
        return Vec::new();
    }

    let encabezado = filas
        .iter()
        .take(FILAS_BUSQUEDA_ENCABEZADO)
        .enumerate()
        .find_map(|(idx, fila)| MapaColumnas::desde_encabezado(fila).map(|m| (idx, m)));

    let (primera_fila_datos, mapa) = match encabezado {
        Some((idx, mapa)) => (idx + 1, mapa),
        None => (0, MapaColumnas::posicional(ancho)),
    };

    let Some(col_clave) = mapa.columna_clave() else {
        tracing::debug!(archivo, ?hoja, "hoja sin columna de comisión, se omite");
        return Vec::new();
    };

    let mut registros = Vec::new();
    let mut omitidas = 0usize;
    for (idx, fila) in filas.iter().enumerate().skip(primera_fila_datos) {
        if fila.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let clave = fila.get(col_clave).map(|s| s.trim()).unwrap_or("");
        // "---", "*" y similares no sirven como clave: normalizados quedan vacíos
        if normalize_name(clave).is_empty() || columna_de_encabezado(clave).is_some() {
            omitidas += 1;
            continue;
        }

        let texto = fila
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");

        registros.push(Registro {
            archivo: archivo.to_string(),
            hoja: hoja.map(|h| h.to_string()),
            pagina: fila_inicial + idx as u32,
            texto,
            nombre: clave.to_string(),
            campos: mapa.campos(fila),
        });
    }

    if omitidas > 0 {
        tracing::debug!(archivo, ?hoja, omitidas, "filas sin comisión reconocible omitidas");
    }
    registros
}

/// Extrae los registros de todas las hojas de una planilla subida.
pub fn extraer_registros_excel(archivo: &str, datos: Vec<u8>) -> Result<Vec<Registro>> {
    let mut workbook = abrir_workbook(archivo, datos)?;
    let mut registros = Vec::new();

    for hoja in listar_hojas(&workbook) {
        let range = match workbook.worksheet_range(&hoja) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(archivo, hoja = %hoja, error = %e, "no se pudo leer la hoja, se omite");
                continue;
            }
        };
        let fila_inicial = range.start().map(|(r, _)| r + 1).unwrap_or(1);
        let filas: Vec<Vec<String>> = range
            .rows()
            .map(|r| r.iter().map(cell_to_string).collect())
            .collect();
        registros.extend(registros_de_filas(archivo, Some(&hoja), &filas, fila_inicial));
    }

    tracing::info!(archivo, registros = registros.len(), "planilla procesada");
    Ok(registros)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filas(v: &[&[&str]]) -> Vec<Vec<String>> {
        v.iter().map(|f| f.iter().map(|s| s.to_string()).collect()).collect()
    }

    #[test]
    fn detecta_encabezado_con_acentos() {
        let datos = filas(&[
            &["Listado de comisiones", "", ""],
            &["Período Lectivo", "Actividad", "Comisión", "Docente", "Aula"],
            &["2024-1", "Matemática", "MAT-01", "Pérez", "A1"],
            &["2024-1", "Física", "FIS-02", "Gómez", ""],
        ]);
        let regs = registros_de_filas("a.xlsx", Some("Hoja1"), &datos, 1);
        assert_eq!(regs.len(), 2);
        assert_eq!(regs[0].nombre, "MAT-01");
        assert_eq!(regs[0].pagina, 3);
        assert_eq!(regs[0].campos.periodo.as_deref(), Some("2024-1"));
        assert_eq!(regs[0].campos.docente.as_deref(), Some("Pérez"));
        assert_eq!(regs[1].campos.aula, None);
        assert_eq!(regs[1].texto, "2024-1 | Física | FIS-02 | Gómez");
    }

    #[test]
    fn sin_encabezado_usa_orden_posicional() {
        let datos = filas(&[&["2024-1", "Química", "QUI-1", "Presencial", "Ruiz", "LU 08:00-10:00", "B2"]]);
        let regs = registros_de_filas("a.xlsx", None, &datos, 1);
        assert_eq!(regs.len(), 1);
        assert_eq!(regs[0].nombre, "QUI-1");
        assert_eq!(regs[0].campos.modalidad.as_deref(), Some("Presencial"));
        assert_eq!(regs[0].campos.horario.as_deref(), Some("LU 08:00-10:00"));
    }

    #[test]
    fn una_columna_es_la_comision() {
        let datos = filas(&[&["Comisión A"], &[""], &["Comisión B"]]);
        let regs = registros_de_filas("a.xlsx", None, &datos, 1);
        let nombres: Vec<_> = regs.iter().map(|r| r.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Comisión A", "Comisión B"]);
        assert_eq!(regs[1].pagina, 3);
    }

    #[test]
    fn encabezados_repetidos_y_filas_vacias_se_omiten() {
        let datos = filas(&[
            &["Actividad", "Comisión"],
            &["Historia", ""],
            &["Actividad", "Comisión"],
            &["Historia", "HIS-1"],
        ]);
        let regs = registros_de_filas("a.xlsx", None, &datos, 1);
        assert_eq!(regs.len(), 1);
        assert_eq!(regs[0].nombre, "HIS-1");
    }

    #[test]
    fn sin_columna_comision_usa_actividad() {
        let datos = filas(&[&["Actividad", "Docente"], &["Biología", "Sosa"]]);
        let regs = registros_de_filas("a.xlsx", None, &datos, 1);
        assert_eq!(regs[0].nombre, "Biología");
        assert_eq!(regs[0].campos.comision, None);
    }

    #[test]
    fn claves_de_relleno_se_omiten() {
        let datos = filas(&[&["Comisión", "Docente"], &["---", "Pérez"], &["—", "Sosa"], &["*", ""], &["MAT-01", "Ruiz"]]);
        let regs = registros_de_filas("a.xlsx", None, &datos, 1);
        let nombres: Vec<_> = regs.iter().map(|r| r.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["MAT-01"]);
        assert_eq!(regs[0].pagina, 5);
    }

    #[test]
    fn hoja_vacia_no_produce_registros() {
        assert!(registros_de_filas("a.xlsx", None, &[], 1).is_empty());
        assert!(registros_de_filas("a.xlsx", None, &filas(&[&["", ""]]), 1).is_empty());
    }
}

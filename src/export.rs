//! Exportación de coincidencias a CSV.

use csv::WriterBuilder;

use crate::error::{CentenoError, Result};
use crate::models::{Coincidencia, Registro};

pub const ENCABEZADO_CSV: [&str; 6] = ["Comisión", "Archivo 1", "Archivo 2", "Página 1", "Página 2", "Similitud (%)"];

/// Nombre sugerido para la descarga.
pub const NOMBRE_ARCHIVO_CSV: &str = "comparacion_comisiones.csv";

/// Una fila por coincidencia. El lado sin coincidencia se escribe como "N/A"
/// y página 0; la similitud va con dos decimales.
pub fn exportar_csv(coincidencias: &[Coincidencia]) -> Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(ENCABEZADO_CSV)?;

    for c in coincidencias {
        let archivo = |r: &Option<Registro>| r.as_ref().map_or("N/A".to_string(), |r| r.archivo.clone());
        let pagina = |r: &Option<Registro>| r.as_ref().map_or(0, |r| r.pagina).to_string();
        wtr.write_record([
            c.comision.clone(),
            archivo(&c.archivo1),
            archivo(&c.archivo2),
            pagina(&c.archivo1),
            pagina(&c.archivo2),
            format!("{:.2}", c.similitud),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| CentenoError::Interno(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CentenoError::Interno(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CamposComision;

    fn registro(archivo: &str, pagina: u32, nombre: &str) -> Registro {
        Registro {
            archivo: archivo.into(),
            hoja: None,
            pagina,
            texto: String::new(),
            nombre: nombre.into(),
            campos: CamposComision::default(),
        }
    }

    #[test]
    fn csv_con_encabezado_y_placeholder() {
        let cs = vec![
            Coincidencia {
                comision: "Comisión A, turno mañana".into(),
                archivo1: Some(registro("a.pdf", 1, "Comisión A")),
                archivo2: Some(registro("b.pdf", 3, "Comision A")),
                similitud: 95.5,
            },
            Coincidencia {
                comision: "Comisión C".into(),
                archivo1: Some(registro("a.pdf", 2, "Comisión C")),
                archivo2: None,
                similitud: 0.0,
            },
        ];
        let csv = exportar_csv(&cs).unwrap();
        let lineas: Vec<_> = csv.lines().collect();
        assert_eq!(lineas[0], "Comisión,Archivo 1,Archivo 2,Página 1,Página 2,Similitud (%)");
        assert_eq!(lineas[1], "\"Comisión A, turno mañana\",a.pdf,b.pdf,1,3,95.50");
        assert_eq!(lineas[2], "Comisión C,a.pdf,N/A,2,0,0.00");
    }

    #[test]
    fn csv_vacio_solo_encabezado() {
        assert_eq!(exportar_csv(&[]).unwrap().lines().count(), 1);
    }
}

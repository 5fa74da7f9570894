use calamine::{Data, Reader, Sheets, open_workbook_auto_from_rs};
use std::io::Cursor;

use crate::error::{CentenoError, Result};

/// Convierte una celda de calamine a String (los enteros guardados como float
/// se muestran sin decimales).
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(s) => s.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

const FIRMA_ZIP: &[u8] = b"PK\x03\x04";
const FIRMA_OLE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Abre un workbook (xlsx/xlsm/xlsb/ods en ZIP o xls en OLE) desde memoria.
/// Falla con `FormatoInvalido` si la firma no corresponde o calamine no puede
/// leer el contenedor.
pub fn abrir_workbook(archivo: &str, datos: Vec<u8>) -> Result<Sheets<Cursor<Vec<u8>>>> {
    if !(datos.starts_with(FIRMA_ZIP) || datos.starts_with(FIRMA_OLE)) {
        return Err(CentenoError::formato_invalido(archivo, "la firma del archivo no corresponde a una planilla"));
    }
    open_workbook_auto_from_rs(Cursor::new(datos))
        .map_err(|e| CentenoError::formato_invalido(archivo, format!("no se pudo abrir la planilla: {}", e)))
}

/// Lista las hojas de un workbook en el orden que reporta calamine.
pub fn listar_hojas(workbook: &Sheets<Cursor<Vec<u8>>>) -> Vec<String> {
    workbook.sheet_names().to_owned()
}

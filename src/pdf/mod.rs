//! Extracción de comisiones desde PDFs.
//!
//! Los PDFs no traen estructura, así que el texto de cada página se recorre
//! línea por línea buscando la etiqueta "Comisión" seguida de un
//! identificador. Cada aparición es un registro con el número de página y las
//! líneas vecinas como texto. Si en esas líneas aparecen etiquetas como
//! `Docente:` o `Aula:` se aprovechan como atributos.

use lopdf::Document;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{CentenoError, Result};
use crate::models::{CamposComision, Registro};

/// Máximo de caracteres guardados como texto de contexto.
const MAX_CONTEXTO: usize = 300;

/// Etiqueta "Comisión". lopdf no separa los `Tj` de un mismo bloque de
/// texto, así que "AlgebraComision" también cuenta si la C va en mayúscula.
const ETIQUETA_COMISION: &str = r"(?:\b(?i:comisi[oó]n)|C(?i:omisi[oó]n))\b";

fn patron_etiqueta_comision() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ETIQUETA_COMISION).expect("patrón de etiqueta de comisión válido"))
}

/// Etiqueta seguida del identificador, anclada al comienzo del fragmento.
fn patron_comision() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^{}[ \t]*(?i:n[°º.]?|nro\.?|#)?[ \t:.\-–]*([0-9A-Za-zÀ-ÿ][0-9A-Za-zÀ-ÿ\-/_.]*)",
            ETIQUETA_COMISION
        ))
        .expect("patrón de comisión válido")
    })
}

fn patron_etiquetas() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(per[ií]odo(?:[ \t]+lectivo)?|actividad|modalidad|docente|profesor(?:a)?|horario|aula)[ \t]*:")
            .expect("patrón de etiquetas válido")
    })
}

/// Un identificador de comisión debe tener algún dígito o ser un código corto
/// en mayúsculas ("A", "TN"); así "Comisión de seguimiento" no cuenta.
fn es_identificador(id: &str) -> bool {
    let id = id.trim_end_matches(['.', '-', '/', '_']);
    if id.is_empty() {
        return false;
    }
    id.chars().any(|c| c.is_ascii_digit()) || (id.chars().count() <= 2 && id.chars().all(|c| c.is_uppercase()))
}

fn recortar(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((corte, _)) => s[..corte].to_string(),
        None => s.to_string(),
    }
}

/// Busca etiquetas `Etiqueta: valor` en un fragmento. El valor termina donde
/// empieza la siguiente etiqueta o en el fin de línea.
pub fn campos_de_etiquetas(texto: &str) -> CamposComision {
    let mut campos = CamposComision::default();
    for linea in texto.lines() {
        let marcas: Vec<_> = patron_etiquetas().captures_iter(linea).collect();
        for (i, cap) in marcas.iter().enumerate() {
            let (Some(todo), Some(etiqueta)) = (cap.get(0), cap.get(1)) else { continue };
            let fin = marcas.get(i + 1).and_then(|c| c.get(0)).map_or(linea.len(), |m| m.start());
            let valor = linea[todo.end()..fin].trim().trim_end_matches([',', ';', '|']).trim();
            if valor.is_empty() {
                continue;
            }
            let etiqueta = crate::algorithm::normalize_header(etiqueta.as_str());
            let slot = match etiqueta.as_str() {
                e if e.starts_with("periodo") => &mut campos.periodo,
                "actividad" => &mut campos.actividad,
                "modalidad" => &mut campos.modalidad,
                "docente" | "profesor" | "profesora" => &mut campos.docente,
                "horario" => &mut campos.horario,
                "aula" => &mut campos.aula,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(valor.to_string());
            }
        }
    }
    campos
}

/// Una aparición de "Comisión <id>" dentro de una línea.
struct Aparicion<'a> {
    inicio: usize,
    fin_id: usize,
    id: &'a str,
}

/// Primero se ubican todas las etiquetas y después se lee el identificador
/// dentro del tramo de cada una, para que no se coma la etiqueta siguiente
/// ("Comision 1Comision 2").
fn apariciones(linea: &str) -> Vec<Aparicion<'_>> {
    let inicios: Vec<usize> = patron_etiqueta_comision().find_iter(linea).map(|m| m.start()).collect();
    inicios
        .iter()
        .enumerate()
        .filter_map(|(k, &inicio)| {
            let fin = inicios.get(k + 1).copied().unwrap_or(linea.len());
            let tramo = &linea[inicio..fin];
            let id = patron_comision().captures(tramo)?.get(1)?;
            if !es_identificador(id.as_str()) {
                return None;
            }
            let limpio = id.as_str().trim_end_matches(['.', '-', '/', '_']);
            Some(Aparicion { inicio, fin_id: inicio + id.start() + limpio.len(), id: limpio })
        })
        .collect()
}

/// Descripción tras el identificador (`- Matemática I`), cortada antes de la
/// primera etiqueta.
fn descripcion(resto: &str) -> Option<&str> {
    let d = resto.trim_start().strip_prefix(['-', '–', ':'])?.trim();
    let d = match patron_etiquetas().find(d) {
        Some(m) => d[..m.start()].trim(),
        None => d,
    };
    (!d.is_empty()).then_some(d)
}

/// Convierte el texto de cada página en registros. Las páginas se reciben como
/// `(número de página, texto)` en el orden del documento.
///
/// Cada aparición termina donde empieza la siguiente de la misma línea. La
/// línea anterior se suma al contexto de la primera y la siguiente al de la
/// última.
pub fn registros_de_paginas(archivo: &str, paginas: &[(u32, String)]) -> Vec<Registro> {
    let mut registros = Vec::new();

    for (num, texto) in paginas {
        let lineas: Vec<&str> = texto.lines().map(|l| l.trim()).collect();
        for (i, linea) in lineas.iter().enumerate() {
            let marcas = apariciones(linea);
            for (k, ap) in marcas.iter().enumerate() {
                let fin = marcas.get(k + 1).map_or(linea.len(), |sig| sig.inicio);
                let nombre = match descripcion(&linea[ap.fin_id..fin]) {
                    Some(d) => format!("Comisión {} - {}", ap.id, recortar(d, 80)),
                    None => format!("Comisión {}", ap.id),
                };

                let desde = if k == 0 { 0 } else { ap.inicio };
                let mut contexto = Vec::with_capacity(3);
                if k == 0 && i > 0 {
                    contexto.push(lineas[i - 1]);
                }
                contexto.push(linea[desde..fin].trim());
                if k + 1 == marcas.len() {
                    if let Some(siguiente) = lineas.get(i + 1) {
                        contexto.push(*siguiente);
                    }
                }
                contexto.retain(|l| !l.is_empty());

                let mut campos = campos_de_etiquetas(&contexto.join("\n"));
                campos.comision = Some(ap.id.to_string());

                registros.push(Registro {
                    archivo: archivo.to_string(),
                    hoja: None,
                    pagina: *num,
                    texto: recortar(&contexto.join(" "), MAX_CONTEXTO),
                    nombre,
                    campos,
                });
            }
        }
    }
    registros
}

/// Extrae los registros de un PDF subido. Falla con `FormatoInvalido` si los
/// bytes no son un PDF legible; las páginas cuyo texto no se puede extraer se
/// omiten.
pub fn extraer_registros_pdf(archivo: &str, datos: &[u8]) -> Result<Vec<Registro>> {
    let cabecera = &datos[..datos.len().min(1024)];
    if !cabecera.windows(5).any(|w| w == b"%PDF-") {
        return Err(CentenoError::formato_invalido(archivo, "falta la cabecera %PDF-"));
    }

    let doc = Document::load_mem(datos)
        .map_err(|e| CentenoError::formato_invalido(archivo, format!("no se pudo leer el PDF: {}", e)))?;

    let mut paginas: Vec<(u32, String)> = Vec::new();
    for num in doc.get_pages().keys() {
        match doc.extract_text(&[*num]) {
            Ok(t) => paginas.push((*num, t)),
            Err(e) => tracing::warn!(archivo, pagina = *num, error = %e, "no se pudo extraer texto de la página"),
        }
    }

    let registros = registros_de_paginas(archivo, &paginas);
    tracing::info!(archivo, paginas = paginas.len(), registros = registros.len(), "PDF procesado");
    Ok(registros)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pag(num: u32, t: &str) -> (u32, String) {
        (num, t.to_string())
    }

    #[test]
    fn detecta_variantes_de_etiqueta() {
        let paginas = vec![
            pag(1, "Listado\nComisión 01-A\nCOMISION Nº 2\ncomision: 3B"),
            pag(2, "Comisión de seguimiento académico\nComisión TN"),
        ];
        let regs = registros_de_paginas("a.pdf", &paginas);
        let nombres: Vec<_> = regs.iter().map(|r| r.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Comisión 01-A", "Comisión 2", "Comisión 3B", "Comisión TN"]);
        assert_eq!(regs[3].pagina, 2);
        assert_eq!(regs[0].campos.comision.as_deref(), Some("01-A"));
    }

    #[test]
    fn descripcion_y_etiquetas_en_contexto() {
        let paginas = vec![pag(4, "Comisión 12 - Matemática I\nDocente: Ana Pérez Aula: 21\nHorario: LU 08:00-10:00")];
        let regs = registros_de_paginas("a.pdf", &paginas);
        assert_eq!(regs.len(), 1);
        let r = &regs[0];
        assert_eq!(r.nombre, "Comisión 12 - Matemática I");
        assert_eq!(r.campos.docente.as_deref(), Some("Ana Pérez"));
        assert_eq!(r.campos.aula.as_deref(), Some("21"));
        assert_eq!(r.campos.horario, None, "sólo se mira una línea a cada lado");
        assert!(r.texto.starts_with("Comisión 12"));
    }

    #[test]
    fn varias_comisiones_en_una_linea() {
        let paginas = vec![pag(1, "Comisión 1 - Álgebra   Comisión 2 - Física")];
        let regs = registros_de_paginas("a.pdf", &paginas);
        let nombres: Vec<_> = regs.iter().map(|r| r.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Comisión 1 - Álgebra", "Comisión 2 - Física"]);
        assert_eq!(regs[1].texto, "Comisión 2 - Física");
    }

    #[test]
    fn lineas_pegadas_sin_separador() {
        let paginas = vec![pag(3, "Comision 1 - AlgebraComision 2 - FisicaComision 3 - Quimica")];
        let regs = registros_de_paginas("a.pdf", &paginas);
        let nombres: Vec<_> = regs.iter().map(|r| r.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Comisión 1 - Algebra", "Comisión 2 - Fisica", "Comisión 3 - Quimica"]);
        assert!(regs.iter().all(|r| r.pagina == 3));
    }

    #[test]
    fn identificadores_pegados_a_la_siguiente_etiqueta() {
        let paginas = vec![pag(1, "Comision 1Comision 2BComision 3")];
        let regs = registros_de_paginas("a.pdf", &paginas);
        let nombres: Vec<_> = regs.iter().map(|r| r.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Comisión 1", "Comisión 2B", "Comisión 3"]);
    }

    #[test]
    fn etiquetas_de_cada_comision_en_la_misma_linea() {
        let paginas = vec![pag(1, "Comisión 1 Docente: Ana Comisión 2 Docente: Beto")];
        let regs = registros_de_paginas("a.pdf", &paginas);
        assert_eq!(regs.len(), 2);
        assert_eq!(regs[0].campos.docente.as_deref(), Some("Ana"));
        assert_eq!(regs[1].campos.docente.as_deref(), Some("Beto"));
        assert_eq!(regs[1].campos.comision.as_deref(), Some("2"));
    }

    #[test]
    fn comision_en_minuscula_dentro_de_palabra_no_cuenta() {
        assert!(registros_de_paginas("a.pdf", &[pag(1, "Subcomision 4")]).is_empty());
    }

    #[test]
    fn pagina_sin_comisiones() {
        assert!(registros_de_paginas("a.pdf", &[pag(1, "nada por aquí")]).is_empty());
    }

    #[test]
    fn bytes_sin_cabecera_son_formato_invalido() {
        let err = extraer_registros_pdf("a.pdf", b"PK\x03\x04 no es un pdf").unwrap_err();
        assert!(matches!(err, CentenoError::FormatoInvalido { .. }));
    }

    #[test]
    fn pdf_truncado_es_formato_invalido() {
        let err = extraer_registros_pdf("a.pdf", b"%PDF-1.5\n1 0 obj\n<<").unwrap_err();
        assert!(matches!(err, CentenoError::FormatoInvalido { .. }));
    }

    #[test]
    fn identificadores() {
        assert!(es_identificador("01"));
        assert!(es_identificador("A"));
        assert!(!es_identificador("de"));
        assert!(!es_identificador("Seguimiento"));
    }
}

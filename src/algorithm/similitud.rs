//! Similitud entre claves de comisión.
//!
//! La puntuación es el promedio de dos medidas sobre los nombres normalizados:
//! - razón de Levenshtein normalizada (`strsim::normalized_levenshtein`)
//! - índice de Jaccard entre los conjuntos de tokens
//!
//! Ambas son simétricas, valen 1.0 para cadenas iguales y 0.0 cuando las
//! cadenas no comparten ningún carácter, así que el promedio conserva esas
//! propiedades.

use super::normalizar::normalize_name;
use std::collections::BTreeSet;

/// Similitud en [0, 1] entre dos nombres arbitrarios (se normalizan aquí).
pub fn similitud(a: &str, b: &str) -> f64 {
    similitud_normalizada(&normalize_name(a), &normalize_name(b))
}

/// Similitud en [0, 1] entre dos nombres ya normalizados.
pub fn similitud_normalizada(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let lev = strsim::normalized_levenshtein(a, b);
    let jac = jaccard_tokens(a, b);
    ((lev + jac) / 2.0).clamp(0.0, 1.0)
}

/// Similitud expresada como porcentaje con un decimal.
pub fn porcentaje(score: f64) -> f64 {
    (score * 1000.0).round() / 10.0
}

fn jaccard_tokens(a: &str, b: &str) -> f64 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();
    let union = ta.union(&tb).count();
    if union == 0 {
        return 0.0;
    }
    ta.intersection(&tb).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identidad_es_maxima() {
        assert_eq!(similitud("Comisión A", "comision   a"), 1.0);
        assert_eq!(similitud("", ""), 1.0);
    }

    #[test]
    fn disjuntas_valen_cero() {
        assert_eq!(similitud("abc", "xyz"), 0.0);
        assert_eq!(similitud("abc", ""), 0.0);
    }

    #[test]
    fn simetrica() {
        let pares = [("Matemática I", "Física II"), ("Com 01", "Comisión 01"), ("a b c", "c")];
        for (a, b) in pares {
            assert_eq!(similitud(a, b), similitud(b, a), "{} / {}", a, b);
        }
    }

    #[test]
    fn nombres_distintos_quedan_bajo_el_umbral() {
        let s = porcentaje(similitud("Matemática I", "Física II"));
        assert!(s < crate::algorithm::UMBRAL_POR_DEFECTO, "similitud {}", s);
    }

    #[test]
    fn porcentaje_redondea_a_un_decimal() {
        assert_eq!(porcentaje(0.12345), 12.3);
        assert_eq!(porcentaje(1.0), 100.0);
        assert_eq!(porcentaje(0.0), 0.0);
    }
}

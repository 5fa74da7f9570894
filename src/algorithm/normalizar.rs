use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normaliza un nombre para compararlo: quita acentos (descomposición NFD sin
/// marcas combinantes), pasa a minúsculas, convierte puntuación en espacios y
/// colapsa los espacios.
///
/// ```
/// use centeno_admin::algorithm::normalize_name;
/// assert_eq!(normalize_name("  Comisión  N°1-A "), "comision n 1 a");
/// assert_eq!(normalize_name("MECÁNICA"), normalize_name("Mecánica"));
/// ```
pub fn normalize_name(s: &str) -> String {
    let plano: String = s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    plano.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normaliza un encabezado de columna: igual que `normalize_name` pero sin
/// espacios, para que "Período Lectivo" y "periodo_lectivo" coincidan.
pub fn normalize_header(s: &str) -> String {
    normalize_name(s).chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quita_acentos_y_enie() {
        assert_eq!(normalize_name("Matemática Ñandú"), "matematica nandu");
        assert_eq!(normalize_name("FÍSICA II"), "fisica ii");
    }

    #[test]
    fn colapsa_espacios_y_puntuacion() {
        assert_eq!(normalize_name("Com.\t01 -- A"), "com 01 a");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn encabezados() {
        assert_eq!(normalize_header("Período Lectivo"), "periodolectivo");
        assert_eq!(normalize_header("periodo_lectivo"), "periodolectivo");
        assert_eq!(normalize_header("COMISIÓN"), "comision");
    }
}

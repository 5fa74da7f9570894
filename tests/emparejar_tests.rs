use centeno_admin::algorithm::{emparejar, estadisticas, similitud, UMBRAL_POR_DEFECTO};
use centeno_admin::models::{CamposComision, Registro};
use proptest::prelude::*;

fn reg(archivo: &str, nombre: &str, pagina: u32) -> Registro {
    Registro {
        archivo: archivo.to_string(),
        hoja: None,
        pagina,
        texto: nombre.to_string(),
        nombre: nombre.to_string(),
        campos: CamposComision::default(),
    }
}

fn lado(archivo: &str, nombres: &[&str]) -> Vec<Registro> {
    nombres.iter().enumerate().map(|(i, n)| reg(archivo, n, i as u32 + 1)).collect()
}

#[test]
fn test_identidad_vale_cien() {
    let izq = lado("a.pdf", &["Comisión 12 - Matemática I"]);
    let der = lado("b.pdf", &["Comisión 12 - Matemática I"]);
    let r = emparejar(&izq, &der, UMBRAL_POR_DEFECTO);
    assert_eq!(r.len(), 1);
    assert_eq!(r[0].similitud, 100.0);
}

#[test]
fn test_escenario_acentos_y_mayusculas() {
    let izq = lado("a.xlsx", &["Comisión Matemática I"]);
    let der = lado("b.xlsx", &["COMISION MATEMATICA I"]);
    let r = emparejar(&izq, &der, UMBRAL_POR_DEFECTO);
    assert_eq!(r.len(), 1);
    assert!(r[0].es_par());
    assert!(r[0].similitud >= 90.0, "similitud {}", r[0].similitud);
}

#[test]
fn test_escenario_nombres_distintos_quedan_separados() {
    let izq = lado("a.xlsx", &["Matemática I"]);
    let der = lado("b.xlsx", &["Física II"]);
    assert!(similitud("Matemática I", "Física II") * 100.0 < UMBRAL_POR_DEFECTO);

    let r = emparejar(&izq, &der, UMBRAL_POR_DEFECTO);
    assert_eq!(r.len(), 2);
    assert_eq!(r[0].comision, "Matemática I");
    assert!(r[0].archivo2.is_none());
    assert_eq!(r[0].similitud, 0.0);
    assert_eq!(r[1].comision, "Física II");
    assert!(r[1].archivo1.is_none());
}

#[test]
fn test_escenario_tres_contra_dos() {
    let izq = lado("a.pdf", &["Comisión A", "Comisión B", "Comisión C"]);
    let der = lado("b.pdf", &["Comision A", "Comision B"]);
    let r = emparejar(&izq, &der, UMBRAL_POR_DEFECTO);

    assert_eq!(r.len(), 3);
    assert_eq!(r[0].archivo2.as_ref().map(|x| x.nombre.as_str()), Some("Comision A"));
    assert_eq!(r[1].archivo2.as_ref().map(|x| x.nombre.as_str()), Some("Comision B"));
    assert_eq!(r[2].comision, "Comisión C");
    assert!(r[2].archivo2.is_none());

    let e = estadisticas(&r);
    assert_eq!(e.coincidencias, 2);
    assert_eq!(e.sin_coincidencia_archivo1, 1);
    assert_eq!(e.sin_coincidencia_archivo2, 0);
}

#[test]
fn test_empate_elige_menor_indice() {
    let izq = lado("a.pdf", &["Comisión 7"]);
    let der = lado("b.pdf", &["comision 7", "COMISIÓN 7"]);
    let r = emparejar(&izq, &der, UMBRAL_POR_DEFECTO);
    assert_eq!(r[0].archivo2.as_ref().unwrap().pagina, 1);
    assert_eq!(r[1].archivo2.as_ref().unwrap().pagina, 2);
}

#[test]
fn test_entradas_vacias() {
    assert!(emparejar(&[], &[], UMBRAL_POR_DEFECTO).is_empty());

    let solo_izq = emparejar(&lado("a.pdf", &["X1", "X2"]), &[], UMBRAL_POR_DEFECTO);
    assert_eq!(solo_izq.len(), 2);
    assert!(solo_izq.iter().all(|c| c.archivo2.is_none() && c.similitud == 0.0));

    let solo_der = emparejar(&[], &lado("b.pdf", &["Y1"]), UMBRAL_POR_DEFECTO);
    assert_eq!(solo_der.len(), 1);
    assert!(solo_der[0].archivo1.is_none());
}

proptest! {
    #[test]
    fn prop_similitud_simetrica_y_acotada(a in "[a-zA-ZáéíóúÁÉ0-9 .-]{0,24}", b in "[a-zA-ZáéíóúÁÉ0-9 .-]{0,24}") {
        let ab = similitud(&a, &b);
        let ba = similitud(&b, &a);
        prop_assert_eq!(ab, ba);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert_eq!(similitud(&a, &a), 1.0);
    }

    #[test]
    fn prop_cada_registro_aparece_una_vez(
        izq in proptest::collection::vec("[abc ]{0,6}", 0..8),
        der in proptest::collection::vec("[abc ]{0,6}", 0..8),
    ) {
        let izq: Vec<Registro> = izq.iter().enumerate().map(|(i, n)| reg("a", n, i as u32 + 1)).collect();
        let der: Vec<Registro> = der.iter().enumerate().map(|(i, n)| reg("b", n, i as u32 + 1)).collect();
        let r = emparejar(&izq, &der, UMBRAL_POR_DEFECTO);

        let mut vistos1: Vec<u32> = r.iter().filter_map(|c| c.archivo1.as_ref().map(|x| x.pagina)).collect();
        let mut vistos2: Vec<u32> = r.iter().filter_map(|c| c.archivo2.as_ref().map(|x| x.pagina)).collect();
        vistos1.sort_unstable();
        vistos2.sort_unstable();
        prop_assert_eq!(vistos1, (1..=izq.len() as u32).collect::<Vec<_>>());
        prop_assert_eq!(vistos2, (1..=der.len() as u32).collect::<Vec<_>>());

        // los registros de la izquierda conservan su orden al principio
        for (i, c) in r.iter().take(izq.len()).enumerate() {
            prop_assert_eq!(c.archivo1.as_ref().map(|x| x.pagina), Some(i as u32 + 1));
        }
        for c in &r {
            prop_assert!(c.archivo1.is_some() || c.archivo2.is_some());
            if !c.es_par() {
                prop_assert_eq!(c.similitud, 0.0);
            }
        }

        // determinismo
        prop_assert_eq!(r, emparejar(&izq, &der, UMBRAL_POR_DEFECTO));
    }
}

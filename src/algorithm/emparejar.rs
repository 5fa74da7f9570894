use super::normalizar::normalize_name;
use super::similitud::{porcentaje, similitud_normalizada};
use crate::models::{Coincidencia, Registro};

/// Empareja los registros de dos archivos por similitud de nombre.
///
/// Algoritmo voraz en el orden de `izquierda`: cada registro toma el registro
/// libre de `derecha` con mayor similitud (en empate gana el de menor índice)
/// siempre que el porcentaje alcance `umbral` y sea mayor que cero.
///
/// Orden del resultado: una entrada por registro de `izquierda` en su orden
/// original (emparejado o con el lado derecho vacío y similitud 0), seguida de
/// los registros de `derecha` que quedaron libres, en su orden original.
/// Cada registro de entrada aparece exactamente una vez.
pub fn emparejar(izquierda: &[Registro], derecha: &[Registro], umbral: f64) -> Vec<Coincidencia> {
    let claves_der: Vec<String> = derecha.iter().map(|r| normalize_name(&r.nombre)).collect();
    let mut tomado = vec![false; derecha.len()];
    let mut resultado: Vec<Coincidencia> = Vec::with_capacity(izquierda.len() + derecha.len());

    for reg in izquierda {
        let clave = normalize_name(&reg.nombre);

        let mut mejor: Option<(usize, f64)> = None;
        for (j, clave_der) in claves_der.iter().enumerate() {
            if tomado[j] {
                continue;
            }
            let score = similitud_normalizada(&clave, clave_der);
            // estrictamente mayor: en empate se queda el índice más bajo
            if mejor.map_or(true, |(_, s)| score > s) {
                mejor = Some((j, score));
            }
        }

        let aceptado = mejor.filter(|(_, s)| *s > 0.0 && porcentaje(*s) >= umbral);
        match aceptado {
            Some((j, score)) => {
                tomado[j] = true;
                resultado.push(Coincidencia {
                    comision: reg.nombre.clone(),
                    archivo1: Some(reg.clone()),
                    archivo2: Some(derecha[j].clone()),
                    similitud: porcentaje(score),
                });
            }
            None => resultado.push(Coincidencia {
                comision: reg.nombre.clone(),
                archivo1: Some(reg.clone()),
                archivo2: None,
                similitud: 0.0,
            }),
        }
    }

    for (j, reg) in derecha.iter().enumerate() {
        if !tomado[j] {
            resultado.push(Coincidencia {
                comision: reg.nombre.clone(),
                archivo1: None,
                archivo2: Some(reg.clone()),
                similitud: 0.0,
            });
        }
    }

    tracing::debug!(
        izquierda = izquierda.len(),
        derecha = derecha.len(),
        pares = resultado.iter().filter(|c| c.es_par()).count(),
        "emparejamiento terminado"
    );
    resultado
}

/// Resumen de un emparejamiento para mostrar junto a la tabla.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estadisticas {
    pub coincidencias: usize,
    pub sin_coincidencia_archivo1: usize,
    pub sin_coincidencia_archivo2: usize,
}

pub fn estadisticas(resultado: &[Coincidencia]) -> Estadisticas {
    let mut est = Estadisticas::default();
    for c in resultado {
        match (&c.archivo1, &c.archivo2) {
            (Some(_), Some(_)) => est.coincidencias += 1,
            (Some(_), None) => est.sin_coincidencia_archivo1 += 1,
            (None, Some(_)) => est.sin_coincidencia_archivo2 += 1,
            (None, None) => {}
        }
    }
    est
}

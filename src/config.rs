//! Configuración del servicio leída desde variables de entorno.
//!
//! Si existe un `.env` en el directorio de trabajo se carga antes de leer las
//! variables. Variables reconocidas:
//! - `CENTENO_BIND`: dirección de escucha (por defecto `127.0.0.1:3000`)
//! - `CENTENO_COMISIONES_URL`: URL base del backend de comisiones. Sin ella se
//!   usa un almacén en memoria (sólo desarrollo).
//! - `CENTENO_UMBRAL_SIMILITUD`: porcentaje mínimo para aceptar un par (60)
//! - `CENTENO_MAX_UPLOAD_MB`: tamaño máximo por archivo subido (20)
//! - `CENTENO_CORS_ORIGIN`: origen permitido para el frontend (opcional)

use crate::algorithm::UMBRAL_POR_DEFECTO;
use crate::error::{CentenoError, Result};
use std::env;

pub const BIND_POR_DEFECTO: &str = "127.0.0.1:3000";
pub const MAX_UPLOAD_MB_POR_DEFECTO: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind: String,
    pub comisiones_url: Option<String>,
    pub umbral_similitud: f64,
    pub max_upload_mb: usize,
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: BIND_POR_DEFECTO.to_string(),
            comisiones_url: None,
            umbral_similitud: UMBRAL_POR_DEFECTO,
            max_upload_mb: MAX_UPLOAD_MB_POR_DEFECTO,
            cors_origin: None,
        }
    }
}

impl Config {
    /// Carga `.env` (si existe) y lee la configuración del entorno del proceso.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda, lo que
    /// permite probarla sin tocar el entorno real.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Config::default();

        if let Some(bind) = get("CENTENO_BIND") {
            cfg.bind = bind;
        }

        cfg.comisiones_url = get("CENTENO_COMISIONES_URL").map(|u| u.trim_end_matches('/').to_string());
        cfg.cors_origin = get("CENTENO_CORS_ORIGIN");

        if let Some(raw) = get("CENTENO_UMBRAL_SIMILITUD") {
            let umbral: f64 = raw
                .parse()
                .map_err(|_| CentenoError::Config(format!("CENTENO_UMBRAL_SIMILITUD no es numérico: '{}'", raw)))?;
            if !(umbral > 0.0 && umbral <= 100.0) {
                return Err(CentenoError::Config(format!(
                    "CENTENO_UMBRAL_SIMILITUD debe estar en (0, 100], recibido {}",
                    umbral
                )));
            }
            cfg.umbral_similitud = umbral;
        }

        if let Some(raw) = get("CENTENO_MAX_UPLOAD_MB") {
            let mb: usize = raw
                .parse()
                .map_err(|_| CentenoError::Config(format!("CENTENO_MAX_UPLOAD_MB no es un entero: '{}'", raw)))?;
            if mb == 0 {
                return Err(CentenoError::Config("CENTENO_MAX_UPLOAD_MB debe ser mayor que 0".into()));
            }
            cfg.max_upload_mb = mb;
        }

        Ok(cfg)
    }

    /// Límite por archivo en bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_de(pares: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pares.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| m.get(k).cloned()
    }

    #[test]
    fn valores_por_defecto() {
        let cfg = Config::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.bind, "127.0.0.1:3000");
        assert_eq!(cfg.max_upload_bytes(), 20 * 1024 * 1024);
    }

    #[test]
    fn limite_en_bytes_no_desborda() {
        let cfg = Config { max_upload_mb: usize::MAX, ..Config::default() };
        assert_eq!(cfg.max_upload_bytes(), usize::MAX);
    }

    #[test]
    fn lee_variables() {
        let cfg = Config::from_lookup(lookup_de(&[
            ("CENTENO_BIND", "0.0.0.0:8080"),
            ("CENTENO_COMISIONES_URL", "http://localhost:3001/"),
            ("CENTENO_UMBRAL_SIMILITUD", "75.5"),
            ("CENTENO_MAX_UPLOAD_MB", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:8080");
        assert_eq!(cfg.comisiones_url.as_deref(), Some("http://localhost:3001"));
        assert_eq!(cfg.umbral_similitud, 75.5);
        assert_eq!(cfg.max_upload_mb, 5);
    }

    #[test]
    fn rechaza_umbral_fuera_de_rango() {
        let err = Config::from_lookup(lookup_de(&[("CENTENO_UMBRAL_SIMILITUD", "0")])).unwrap_err();
        assert!(matches!(err, CentenoError::Config(_)));
        let err = Config::from_lookup(lookup_de(&[("CENTENO_UMBRAL_SIMILITUD", "abc")])).unwrap_err();
        assert!(matches!(err, CentenoError::Config(_)));
    }

    #[test]
    fn variables_vacias_se_ignoran() {
        let cfg = Config::from_lookup(lookup_de(&[("CENTENO_COMISIONES_URL", "  ")])).unwrap();
        assert!(cfg.comisiones_url.is_none());
    }
}

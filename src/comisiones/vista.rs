//! Vista de comisiones guardadas: filtros, orden, agrupación por horario y
//! por día de la semana.
//!
//! Todo es puro sobre `&[Comision]`; el handler sólo trae la lista del
//! colaborador y arma la respuesta.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::Comision;
use crate::algorithm::normalize_header;
use crate::error::CentenoError;

/// Clave de grupo para comisiones sin horario cargado.
pub const SIN_HORARIO: &str = "Sin horario";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FiltroRealizada {
    #[default]
    Todos,
    Realizadas,
    Pendientes,
}

impl FromStr for FiltroRealizada {
    type Err = CentenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "todos" => Ok(FiltroRealizada::Todos),
            "true" | "si" | "sí" => Ok(FiltroRealizada::Realizadas),
            "false" | "no" => Ok(FiltroRealizada::Pendientes),
            otro => Err(CentenoError::ParametroInvalido(format!("realizada='{}'", otro))),
        }
    }
}

/// Filtros de texto: cada uno es un "contiene" sin distinguir mayúsculas.
/// Los vacíos no filtran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtros {
    pub periodo: Option<String>,
    pub actividad: Option<String>,
    pub modalidad: Option<String>,
    pub docente: Option<String>,
    pub horario: Option<String>,
    pub aula: Option<String>,
    pub comision: Option<String>,
    pub realizada: FiltroRealizada,
}

fn contiene(valor: &str, filtro: &Option<String>) -> bool {
    match filtro.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(f) => valor.to_lowercase().contains(&f.to_lowercase()),
    }
}

impl Filtros {
    pub fn acepta(&self, c: &Comision) -> bool {
        let realizada = match self.realizada {
            FiltroRealizada::Todos => true,
            FiltroRealizada::Realizadas => c.realizada,
            FiltroRealizada::Pendientes => !c.realizada,
        };
        realizada
            && contiene(&c.periodo, &self.periodo)
            && contiene(&c.actividad, &self.actividad)
            && contiene(&c.modalidad, &self.modalidad)
            && contiene(&c.docente, &self.docente)
            && contiene(&c.horario, &self.horario)
            && contiene(&c.aula, &self.aula)
            && contiene(&c.comision, &self.comision)
    }
}

pub fn filtrar(comisiones: &[Comision], filtros: &Filtros) -> Vec<Comision> {
    comisiones.iter().filter(|c| filtros.acepta(c)).cloned().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CampoOrden {
    Periodo,
    Actividad,
    Modalidad,
    Docente,
    Horario,
    Aula,
    Comision,
    Realizada,
    #[default]
    FechaCreacion,
    FechaActualizacion,
}

impl FromStr for CampoOrden {
    type Err = CentenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_header(s).as_str() {
            "periodo" => Ok(CampoOrden::Periodo),
            "actividad" => Ok(CampoOrden::Actividad),
            "modalidad" => Ok(CampoOrden::Modalidad),
            "docente" => Ok(CampoOrden::Docente),
            "horario" => Ok(CampoOrden::Horario),
            "aula" => Ok(CampoOrden::Aula),
            "comision" => Ok(CampoOrden::Comision),
            "realizada" => Ok(CampoOrden::Realizada),
            "fechacreacion" => Ok(CampoOrden::FechaCreacion),
            "fechaactualizacion" => Ok(CampoOrden::FechaActualizacion),
            _ => Err(CentenoError::ParametroInvalido(format!("orden='{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direccion {
    Asc,
    #[default]
    Desc,
}

impl FromStr for Direccion {
    type Err = CentenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Direccion::Asc),
            "desc" => Ok(Direccion::Desc),
            otro => Err(CentenoError::ParametroInvalido(format!("direccion='{}'", otro))),
        }
    }
}

fn comparar_por(a: &Comision, b: &Comision, campo: CampoOrden) -> Ordering {
    let texto = |x: &str, y: &str| x.to_lowercase().cmp(&y.to_lowercase());
    match campo {
        CampoOrden::Periodo => texto(&a.periodo, &b.periodo),
        CampoOrden::Actividad => texto(&a.actividad, &b.actividad),
        CampoOrden::Modalidad => texto(&a.modalidad, &b.modalidad),
        CampoOrden::Docente => texto(&a.docente, &b.docente),
        CampoOrden::Horario => texto(&a.horario, &b.horario),
        CampoOrden::Aula => texto(&a.aula, &b.aula),
        CampoOrden::Comision => texto(&a.comision, &b.comision),
        CampoOrden::Realizada => a.realizada.cmp(&b.realizada),
        CampoOrden::FechaCreacion => a.fecha_creacion.cmp(&b.fecha_creacion),
        CampoOrden::FechaActualizacion => a.fecha_actualizacion.cmp(&b.fecha_actualizacion),
    }
}

/// Orden estable: los empates conservan el orden de entrada en ambas
/// direcciones.
pub fn ordenar(comisiones: &mut [Comision], campo: CampoOrden, direccion: Direccion) {
    comisiones.sort_by(|a, b| {
        let ord = comparar_por(a, b, campo);
        match direccion {
            Direccion::Asc => ord,
            Direccion::Desc => ord.reverse(),
        }
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Dia {
    Lunes,
    Martes,
    Miercoles,
    Jueves,
    Viernes,
    Sabado,
    Domingo,
}

impl Dia {
    pub const TODOS: [Dia; 7] =
        [Dia::Lunes, Dia::Martes, Dia::Miercoles, Dia::Jueves, Dia::Viernes, Dia::Sabado, Dia::Domingo];

    /// Reconoce el nombre largo ("Miércoles") o corto ("MI", "Mié") de un día.
    pub fn desde_token(token: &str) -> Option<Dia> {
        match normalize_header(token).as_str() {
            "lunes" | "lu" | "lun" => Some(Dia::Lunes),
            "martes" | "ma" | "mar" => Some(Dia::Martes),
            "miercoles" | "mi" | "mie" => Some(Dia::Miercoles),
            "jueves" | "ju" | "jue" => Some(Dia::Jueves),
            "viernes" | "vi" | "vie" => Some(Dia::Viernes),
            "sabado" | "sa" | "sab" => Some(Dia::Sabado),
            "domingo" | "do" | "dom" => Some(Dia::Domingo),
            _ => None,
        }
    }
}

impl fmt::Display for Dia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dia::Lunes => "Lunes",
            Dia::Martes => "Martes",
            Dia::Miercoles => "Miércoles",
            Dia::Jueves => "Jueves",
            Dia::Viernes => "Viernes",
            Dia::Sabado => "Sábado",
            Dia::Domingo => "Domingo",
        };
        f.write_str(s)
    }
}

impl FromStr for Dia {
    type Err = CentenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dia::desde_token(s).ok_or_else(|| CentenoError::ParametroInvalido(format!("dia='{}'", s)))
    }
}

/// Días mencionados en un horario, sin repetir y en orden de aparición.
/// Acepta "Lunes 08:00-10:00", "LU MA 08:30-09:50" o "Lun/Mié 14:00-16:00".
/// "Lunes a Viernes" (o "LU al VI") se expande a los cinco días.
pub fn dias_de_horario(horario: &str) -> Vec<Dia> {
    let mut dias = Vec::new();
    let mut anterior: Option<Dia> = None;
    let mut en_rango = false;
    for token in horario.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() || token.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        let Some(d) = Dia::desde_token(token) else {
            en_rango = anterior.is_some() && matches!(normalize_header(token).as_str(), "a" | "al");
            if !en_rango {
                anterior = None;
            }
            continue;
        };
        let inicio = match anterior {
            Some(a) if en_rango && a <= d => a,
            _ => d,
        };
        for n in &Dia::TODOS[inicio as usize..=d as usize] {
            if !dias.contains(n) {
                dias.push(*n);
            }
        }
        anterior = Some(d);
        en_rango = false;
    }
    dias
}

/// Rango "HH:MM-HH:MM" de un horario, en minutos desde medianoche.
pub fn rango_horario(horario: &str) -> Option<(u32, u32)> {
    let a_minutos = |h: &str| {
        let (hh, mm) = h.trim().split_once(':')?;
        let hh: u32 = hh.parse().ok()?;
        let mm: u32 = mm.parse().ok()?;
        (hh < 24 && mm < 60).then_some(hh * 60 + mm)
    };
    horario.split_whitespace().find_map(|parte| {
        let (inicio, fin) = parte.split_once('-')?;
        Some((a_minutos(inicio)?, a_minutos(fin)?))
    })
}

pub fn filtrar_por_dia(comisiones: &[Comision], dia: Dia) -> Vec<Comision> {
    comisiones.iter().filter(|c| dias_de_horario(&c.horario).contains(&dia)).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrupoHorario {
    pub horario: String,
    pub total: usize,
    pub comisiones: Vec<Comision>,
}

/// Agrupa por horario exacto (sin espacios sobrantes). Los grupos se ordenan
/// por hora de inicio; los que no tienen rango legible van al final en el
/// orden en que aparece su primera comisión.
pub fn agrupar_por_horario(comisiones: &[Comision]) -> Vec<GrupoHorario> {
    let mut grupos: Vec<GrupoHorario> = Vec::new();
    for c in comisiones {
        let clave = match c.horario.trim() {
            "" => SIN_HORARIO.to_string(),
            h => h.split_whitespace().collect::<Vec<_>>().join(" "),
        };
        match grupos.iter_mut().find(|g| g.horario == clave) {
            Some(g) => {
                g.total += 1;
                g.comisiones.push(c.clone());
            }
            None => grupos.push(GrupoHorario { horario: clave, total: 1, comisiones: vec![c.clone()] }),
        }
    }
    grupos.sort_by_key(|g| match rango_horario(&g.horario) {
        Some((inicio, fin)) => (0, inicio, fin),
        None => (1, 0, 0),
    });
    grupos
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstadisticaDia {
    pub dia: String,
    pub total: usize,
    pub realizadas: usize,
    pub pendientes: usize,
}

/// Conteo por día de la semana, Lunes a Domingo. Una comisión con varios días
/// cuenta en cada uno.
pub fn estadisticas_por_dia(comisiones: &[Comision]) -> Vec<EstadisticaDia> {
    let mut conteo = [(0usize, 0usize); 7];
    for c in comisiones {
        for d in dias_de_horario(&c.horario) {
            let slot = &mut conteo[d as usize];
            slot.0 += 1;
            if c.realizada {
                slot.1 += 1;
            }
        }
    }
    Dia::TODOS
        .iter()
        .zip(conteo)
        .map(|(d, (total, realizadas))| EstadisticaDia {
            dia: d.to_string(),
            total,
            realizadas,
            pendientes: total - realizadas,
        })
        .collect()
}

/// Parámetros completos de la vista.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultaVista {
    pub filtros: Filtros,
    pub dia: Option<Dia>,
    pub orden: CampoOrden,
    pub direccion: Direccion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vista {
    pub total: usize,
    pub comisiones: Vec<Comision>,
    pub por_horario: Vec<GrupoHorario>,
    pub por_dia: Vec<EstadisticaDia>,
}

/// Filtra, ordena y agrupa. Las estadísticas por día se calculan sobre las
/// comisiones filtradas antes de aplicar el filtro de día, para que el panel
/// siga mostrando toda la semana.
pub fn construir_vista(comisiones: &[Comision], consulta: &ConsultaVista) -> Vista {
    let mut filtradas = filtrar(comisiones, &consulta.filtros);
    let por_dia = estadisticas_por_dia(&filtradas);
    if let Some(dia) = consulta.dia {
        filtradas = filtrar_por_dia(&filtradas, dia);
    }
    ordenar(&mut filtradas, consulta.orden, consulta.direccion);
    let por_horario = agrupar_por_horario(&filtradas);

    Vista { total: filtradas.len(), comisiones: filtradas, por_horario, por_dia }
}

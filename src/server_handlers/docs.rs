use actix_web::{HttpResponse, Responder};
use serde_json::json;

pub async fn help_handler() -> impl Responder {
    let help = json!({
        "description": "API de comparación de comisiones entre dos archivos (Excel o PDF) y guardado en el backend de comisiones.",
        "endpoints": {
            "POST /api/excel/compare": "multipart con 'archivo1' y 'archivo2' (.xlsx, .xls, .xlsm, .xlsb, .ods)",
            "POST /api/pdf/compare": "multipart con 'archivo1' y 'archivo2' (.pdf)",
            "POST /api/excel/compare/csv": "igual que /api/excel/compare pero responde CSV",
            "POST /api/pdf/compare/csv": "igual que /api/pdf/compare pero responde CSV",
            "POST /api/comisiones": "{ periodo, actividad, modalidad, docente, horario, aula, comision } crea una comisión; 400 si falta un campo obligatorio",
            "POST /api/comisiones/lote": "{ matches, lado: archivo1|archivo2|ambos } guarda cada coincidencia como comisión",
            "GET /api/comisiones/vista": "filtros periodo, actividad, modalidad, docente, horario, aula, comision, realizada, dia, orden, direccion",
            "PATCH /api/comisiones/{id}/realizada": "{ realizada: bool }",
            "DELETE /api/comisiones/all": "elimina todas las comisiones",
            "GET /api/health": "estado del servicio"
        },
        "match_example": {
            "comision": "Comisión 12",
            "archivo1": { "nombre": "Comisión 12", "archivo": "oferta.pdf", "pagina": 3, "texto": "Comisión 12 - Matemática I" },
            "archivo2": { "nombre": "", "archivo": "N/A", "pagina": 0, "texto": "" },
            "similitud": 0.0
        }
    });

    HttpResponse::Ok().json(help)
}

pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

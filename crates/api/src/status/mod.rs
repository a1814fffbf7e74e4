use actix_web::{web, HttpResponse};
use estancia_infra::{EstanciaContext, SessionStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct APIResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct QrQuery {
    t: Option<String>,
}

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
    })
}

/// Serves the transport pairing payload while the session is unpaired, so
/// an operator can pair a headless deployment. Guarded by the QR token.
async fn pairing_qr(ctx: web::Data<EstanciaContext>, query: web::Query<QrQuery>) -> HttpResponse {
    if query.t.as_deref() != Some(ctx.config.qr_token.as_str()) {
        return HttpResponse::Unauthorized().body("unauthorized");
    }
    match ctx.messenger.session_status().await {
        SessionStatus::WaitingForPairing { qr: Some(qr) } => {
            HttpResponse::Ok().content_type("text/plain").body(qr)
        }
        _ => HttpResponse::NotFound().body("QR not ready"),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(status));
    cfg.route("/qr", web::get().to(pairing_qr));
}

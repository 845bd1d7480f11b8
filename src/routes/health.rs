use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;

use crate::config::Config;

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    storage: &'static str,
    timestamp: chrono::DateTime<Utc>,
}

/// Liveness probe. Public, and never touches the store itself; `storage` names the
/// backend selected at startup.
#[get("/health")]
pub async fn health(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().json(HealthReport {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        storage: if config.database_url.is_some() {
            "postgres"
        } else {
            "memory"
        },
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_reports_storage_backend() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Config::default()))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "task-calendar");
        assert_eq!(json["storage"], "memory");
        assert!(json["timestamp"].is_string());
    }
}

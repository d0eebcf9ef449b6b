use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

/// Liveness probe. Always 200; the database field shows whether queries can run.
pub async fn backend_health_check(pool: web::Data<PgPool>) -> HttpResponse {
    let database = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => "up",
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            "down"
        }
    };

    HttpResponse::Ok().json(json!({
        "status": "UP",
        "database": database,
    }))
}

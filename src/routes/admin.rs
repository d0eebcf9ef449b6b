use actix_web::web;

use crate::handlers::admin::{
    match_handler,
    prediction_handler,
    score_handler,
    user_handler,
};
use crate::middleware::admin::AdminMiddleware;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminMiddleware)
            // Fixture management
            .service(
                web::resource("/matches")
                    .route(web::post().to(match_handler::create_match))
            )
            .service(
                web::resource("/matches/{id}")
                    .route(web::patch().to(match_handler::update_match))
                    .route(web::delete().to(match_handler::delete_match))
            )

            // Prediction moderation
            .service(
                web::resource("/predictions")
                    .route(web::get().to(prediction_handler::get_all_predictions))
            )
            .service(
                web::resource("/predictions/match/{id}")
                    .route(web::get().to(prediction_handler::get_match_predictions))
            )

            // User management
            .service(
                web::resource("/users")
                    .route(web::get().to(user_handler::get_users))
            )
            .service(
                web::resource("/users/{id}")
                    .route(web::delete().to(user_handler::delete_user))
            )
            .service(
                web::resource("/users/{id}/role")
                    .route(web::patch().to(user_handler::update_user_role))
            )

            // Score maintenance
            .service(
                web::resource("/scores/reset")
                    .route(web::post().to(score_handler::reset_scores))
            )
            .service(
                web::resource("/scores/recalculate")
                    .route(web::post().to(score_handler::recalculate_scores))
            )
    );
}

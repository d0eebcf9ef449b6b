use actix_web::web;

use crate::handlers::match_handler::{
    get_comments, get_match, get_matches, get_matches_by_week, get_prediction_stats,
};
use crate::handlers::prediction_handler::get_user_predictions;

pub fn init_match_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/matches")
            .service(
                web::resource("")
                    .route(web::get().to(get_matches))
            )
            .service(
                web::resource("/week/{week}")
                    .route(web::get().to(get_matches_by_week))
            )
            .service(
                web::resource("/{match_id}")
                    .route(web::get().to(get_match))
            )
            .service(
                web::resource("/{match_id}/comments")
                    .route(web::get().to(get_comments))
            )
            .service(
                web::resource("/{match_id}/prediction-stats")
                    .route(web::get().to(get_prediction_stats))
            )
    );

    // Public profile view of someone's predictions
    cfg.service(
        web::resource("/users/{user_id}/predictions")
            .route(web::get().to(get_user_predictions))
    );
}

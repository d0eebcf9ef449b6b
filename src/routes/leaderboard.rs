use actix_web::web;

use crate::handlers::leaderboard_handler::{get_leaderboard, get_user_score, get_weekly_winner};

pub fn init_leaderboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leaderboard")
            .service(
                web::resource("")
                    .route(web::get().to(get_leaderboard))
            )
            .service(
                web::resource("/users/{user_id}")
                    .route(web::get().to(get_user_score))
            )
            .service(
                web::resource("/weekly/{week}")
                    .route(web::get().to(get_weekly_winner))
            )
    );
}

use actix_web::web;

pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod leaderboard;
pub mod matches;
pub mod me;
pub mod registration;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login)
        .service(auth::logout);

    matches::init_match_routes(cfg);
    leaderboard::init_leaderboard_routes(cfg);
    me::init_user_routes(cfg);
    admin::init_admin_routes(cfg);
}

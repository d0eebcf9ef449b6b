use actix_web::web;

use crate::handlers::auth_handler::current_user;
use crate::handlers::comment_handler::{add_comment, remove_comment};
use crate::handlers::leaderboard_handler::get_my_score;
use crate::handlers::prediction_handler::{
    get_my_prediction_for_match, get_my_predictions, submit_prediction,
};
use crate::handlers::profile::profile_photo::{profile_photo_form_config, upload_profile_photo};
use crate::middleware::auth::AuthMiddleware;

/// Routes acting on behalf of the signed-in user
pub fn init_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/me")
            .wrap(AuthMiddleware)
            .service(
                web::resource("")
                    .route(web::get().to(current_user))
            )
            .service(
                web::resource("/predictions")
                    .route(web::get().to(get_my_predictions))
            )
            .service(
                web::resource("/predictions/{match_id}")
                    .route(web::get().to(get_my_prediction_for_match))
            )
            .service(
                web::resource("/score")
                    .route(web::get().to(get_my_score))
            )
            .service(
                web::resource("/profile-photo")
                    .app_data(profile_photo_form_config())
                    .route(web::post().to(upload_profile_photo))
            )
    );

    cfg.service(
        web::resource("/predictions")
            .wrap(AuthMiddleware)
            .route(web::post().to(submit_prediction))
            .route(web::put().to(submit_prediction))
    );

    cfg.service(
        web::resource("/comments")
            .wrap(AuthMiddleware)
            .route(web::post().to(add_comment))
    );
    cfg.service(
        web::resource("/comments/{comment_id}")
            .wrap(AuthMiddleware)
            .route(web::delete().to(remove_comment))
    );
}

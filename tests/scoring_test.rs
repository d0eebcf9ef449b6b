use reqwest::{Client, Method};
use serde_json::{json, Value};

mod common;
use common::match_helpers::{create_match, finish_match, submit_prediction, user_score};
use common::utils::{
    create_admin_user_and_login, create_test_user_and_login, make_authenticated_request, spawn_app,
};

#[tokio::test]
async fn finishing_a_match_awards_points() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let exact = create_test_user_and_login(&test_app.address).await;
    let result_only = create_test_user_and_login(&test_app.address).await;
    let miss = create_test_user_and_login(&test_app.address).await;
    let match_id = create_match(&test_app.address, &admin.token).await;

    submit_prediction(&test_app.address, &exact.token, match_id, 2, 1, "home").await;
    submit_prediction(&test_app.address, &result_only.token, match_id, 3, 0, "home").await;
    submit_prediction(&test_app.address, &miss.token, match_id, 1, 1, "draw").await;

    let response = finish_match(&test_app.address, &admin.token, match_id, 2, 1).await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["scoring"]["predictions_scored"], 3);
    assert_eq!(body["data"]["scoring"]["exact_scores"], 1);
    assert_eq!(body["data"]["scoring"]["correct_results"], 2);
    assert_eq!(body["data"]["scoring"]["points_awarded"], 4);

    let score = user_score(&test_app.address, exact.user_id).await;
    assert_eq!(score["total_points"], 3);
    assert_eq!(score["correct_scores"], 1);
    assert_eq!(score["correct_results"], 1);
    assert_eq!(score["total_predictions"], 1);

    let score = user_score(&test_app.address, result_only.user_id).await;
    assert_eq!(score["total_points"], 1);
    assert_eq!(score["correct_scores"], 0);
    assert_eq!(score["correct_results"], 1);

    let score = user_score(&test_app.address, miss.user_id).await;
    assert_eq!(score["total_points"], 0);
    assert_eq!(score["correct_results"], 0);
    assert_eq!(score["total_predictions"], 1);
}

#[tokio::test]
async fn correcting_a_result_does_not_double_count() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let home_fan = create_test_user_and_login(&test_app.address).await;
    let draw_fan = create_test_user_and_login(&test_app.address).await;
    let match_id = create_match(&test_app.address, &admin.token).await;

    submit_prediction(&test_app.address, &home_fan.token, match_id, 2, 1, "home").await;
    submit_prediction(&test_app.address, &draw_fan.token, match_id, 1, 1, "draw").await;

    finish_match(&test_app.address, &admin.token, match_id, 2, 1).await;
    // Same result entered twice
    finish_match(&test_app.address, &admin.token, match_id, 2, 1).await;
    assert_eq!(user_score(&test_app.address, home_fan.user_id).await["total_points"], 3);

    // Result corrected to a draw
    let response = finish_match(&test_app.address, &admin.token, match_id, 1, 1).await;
    assert_eq!(200, response.status().as_u16());

    let score = user_score(&test_app.address, home_fan.user_id).await;
    assert_eq!(score["total_points"], 0);
    assert_eq!(score["total_predictions"], 1);

    let score = user_score(&test_app.address, draw_fan.user_id).await;
    assert_eq!(score["total_points"], 3);
    assert_eq!(score["correct_scores"], 1);
}

#[tokio::test]
async fn reopening_a_match_withdraws_its_points() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let user = create_test_user_and_login(&test_app.address).await;
    let match_id = create_match(&test_app.address, &admin.token).await;

    submit_prediction(&test_app.address, &user.token, match_id, 2, 0, "home").await;
    finish_match(&test_app.address, &admin.token, match_id, 2, 0).await;
    assert_eq!(user_score(&test_app.address, user.user_id).await["total_points"], 3);

    let response = make_authenticated_request(
        &Client::new(),
        Method::PATCH,
        &format!("{}/admin/matches/{}", &test_app.address, match_id),
        &admin.token,
        Some(json!({"is_finished": false})),
    )
    .await;
    assert_eq!(200, response.status().as_u16());

    let score = user_score(&test_app.address, user.user_id).await;
    assert_eq!(score["total_points"], 0);
    assert_eq!(score["total_predictions"], 0);
}

#[tokio::test]
async fn reset_and_recalculate_scores() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let user = create_test_user_and_login(&test_app.address).await;
    let client = Client::new();

    let first = create_match(&test_app.address, &admin.token).await;
    let second = create_match(&test_app.address, &admin.token).await;
    submit_prediction(&test_app.address, &user.token, first, 1, 0, "home").await;
    submit_prediction(&test_app.address, &user.token, second, 0, 2, "away").await;
    finish_match(&test_app.address, &admin.token, first, 1, 0).await;
    finish_match(&test_app.address, &admin.token, second, 0, 1).await;
    assert_eq!(user_score(&test_app.address, user.user_id).await["total_points"], 4);

    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/admin/scores/reset", &test_app.address),
        &admin.token,
        None,
    )
    .await;
    assert_eq!(200, response.status().as_u16());
    assert_eq!(user_score(&test_app.address, user.user_id).await["total_points"], 0);

    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/admin/scores/recalculate", &test_app.address),
        &admin.token,
        None,
    )
    .await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["predictions_scored"], 2);

    let score = user_score(&test_app.address, user.user_id).await;
    assert_eq!(score["total_points"], 4);
    assert_eq!(score["correct_scores"], 1);
    assert_eq!(score["correct_results"], 2);
}

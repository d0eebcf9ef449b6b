use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Method, Response};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::utils::make_authenticated_request;

pub fn future_kickoff() -> DateTime<Utc> {
    Utc::now() + Duration::days(2)
}

pub async fn create_match_at(
    app_address: &str,
    admin_token: &str,
    kickoff: DateTime<Utc>,
    week: i32,
) -> Uuid {
    let response = make_authenticated_request(
        &Client::new(),
        Method::POST,
        &format!("{}/admin/matches", app_address),
        admin_token,
        Some(json!({
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "match_date": kickoff.to_rfc3339(),
            "week": week,
            "day": "Saturday",
            "home_team_form": "GGBMG",
            "away_team_form": "mbggb"
        })),
    )
    .await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse match response");
    Uuid::parse_str(body["data"]["id"].as_str().expect("No match id")).expect("Invalid match id")
}

pub async fn create_match(app_address: &str, admin_token: &str) -> Uuid {
    create_match_at(app_address, admin_token, future_kickoff(), 1).await
}

pub async fn submit_prediction(
    app_address: &str,
    token: &str,
    match_id: Uuid,
    home: i32,
    away: i32,
    result: &str,
) -> Response {
    make_authenticated_request(
        &Client::new(),
        Method::POST,
        &format!("{}/predictions", app_address),
        token,
        Some(json!({
            "match_id": match_id,
            "predicted_home_score": home,
            "predicted_away_score": away,
            "predicted_result": result
        })),
    )
    .await
}

pub async fn finish_match(
    app_address: &str,
    admin_token: &str,
    match_id: Uuid,
    home: i32,
    away: i32,
) -> Response {
    make_authenticated_request(
        &Client::new(),
        Method::PATCH,
        &format!("{}/admin/matches/{}", app_address, match_id),
        admin_token,
        Some(json!({
            "home_score": home,
            "away_score": away,
            "is_finished": true
        })),
    )
    .await
}

pub async fn user_score(app_address: &str, user_id: Uuid) -> Value {
    let response = Client::new()
        .get(&format!("{}/leaderboard/users/{}", app_address, user_id))
        .send()
        .await
        .expect("Failed to fetch score");
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse score");
    body["data"].clone()
}

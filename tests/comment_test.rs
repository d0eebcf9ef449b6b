use reqwest::{Client, Method};
use serde_json::{json, Value};
use uuid::Uuid;

mod common;
use common::match_helpers::create_match;
use common::utils::{
    create_admin_user_and_login, create_test_user_and_login, get_json, make_authenticated_request,
    spawn_app,
};

async fn post_comment(address: &str, token: &str, match_id: Uuid, content: &str) -> reqwest::Response {
    make_authenticated_request(
        &Client::new(),
        Method::POST,
        &format!("{}/comments", address),
        token,
        Some(json!({"match_id": match_id, "content": content})),
    )
    .await
}

#[tokio::test]
async fn comments_are_listed_newest_first_with_author() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let user = create_test_user_and_login(&test_app.address).await;
    let match_id = create_match(&test_app.address, &admin.token).await;

    let first = post_comment(&test_app.address, &user.token, match_id, "Arsenal to win").await;
    assert_eq!(201, first.status().as_u16());
    let second = post_comment(&test_app.address, &user.token, match_id, "Actually, a draw").await;
    assert_eq!(201, second.status().as_u16());

    let body = get_json(&Client::new(), &format!("{}/matches/{}/comments", &test_app.address, match_id)).await;
    let comments = body["data"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "Actually, a draw");
    assert_eq!(comments[0]["username"], user.username.as_str());

    let limited = get_json(&Client::new(), &format!("{}/matches/{}/comments?limit=1", &test_app.address, match_id)).await;
    assert_eq!(limited["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_comments_are_rejected() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let user = create_test_user_and_login(&test_app.address).await;
    let match_id = create_match(&test_app.address, &admin.token).await;

    let empty = post_comment(&test_app.address, &user.token, match_id, "   ").await;
    assert_eq!(400, empty.status().as_u16());

    let too_long = post_comment(&test_app.address, &user.token, match_id, &"a".repeat(1001)).await;
    assert_eq!(400, too_long.status().as_u16());

    let unknown_match = post_comment(&test_app.address, &user.token, Uuid::new_v4(), "Hello").await;
    assert_eq!(404, unknown_match.status().as_u16());

    let anonymous = Client::new()
        .post(&format!("{}/comments", &test_app.address))
        .json(&json!({"match_id": match_id, "content": "Hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(401, anonymous.status().as_u16());
}

#[tokio::test]
async fn only_author_or_admin_can_delete_comments() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let author = create_test_user_and_login(&test_app.address).await;
    let stranger = create_test_user_and_login(&test_app.address).await;
    let match_id = create_match(&test_app.address, &admin.token).await;
    let client = Client::new();

    let mut comment_ids = Vec::new();
    for content in ["first", "second"] {
        let response = post_comment(&test_app.address, &author.token, match_id, content).await;
        let body: Value = response.json().await.unwrap();
        comment_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let url = |id: &str| format!("{}/comments/{}", &test_app.address, id);

    let denied = make_authenticated_request(&client, Method::DELETE, &url(&comment_ids[0]), &stranger.token, None).await;
    assert_eq!(403, denied.status().as_u16());

    let by_author = make_authenticated_request(&client, Method::DELETE, &url(&comment_ids[0]), &author.token, None).await;
    assert_eq!(200, by_author.status().as_u16());

    let by_admin = make_authenticated_request(&client, Method::DELETE, &url(&comment_ids[1]), &admin.token, None).await;
    assert_eq!(200, by_admin.status().as_u16());

    let gone = make_authenticated_request(&client, Method::DELETE, &url(&comment_ids[1]), &admin.token, None).await;
    assert_eq!(404, gone.status().as_u16());
}

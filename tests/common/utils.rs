use secrecy::ExposeSecret;
use serde_json::{json, Value};
use sqlx::{PgPool, PgConnection, Connection, Executor};
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;
use reqwest::{Client, Method, Response};

use predictor_backend::run;
use predictor_backend::config::settings::{get_config, DatabaseSettings, get_jwt_settings};
use predictor_backend::services::MinIOService;
use predictor_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool
}

pub struct UserRegLoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database)
        .await;
    let jwt_settings = get_jwt_settings(&configuration);
    let minio_service = MinIOService::new(configuration.minio.clone());

    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings,
        minio_service,
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);
    TestApp {
        address,
        db_pool: connection_pool
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(
            &config.connection_string_without_db()
        )
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

pub fn unique_username(prefix: &str) -> String {
    format!("{}{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

pub async fn register_user(app_address: &str, username: &str, password: &str) -> Response {
    Client::new()
        .post(&format!("{}/register_user", app_address))
        .json(&json!({
            "username": username,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to register user.")
}

pub async fn login_user(app_address: &str, username: &str, password: &str) -> Response {
    Client::new()
        .post(&format!("{}/login", app_address))
        .json(&json!({
            "username": username,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to execute login request.")
}

async fn login_token(app_address: &str, username: &str, password: &str) -> (String, Uuid) {
    let response = login_user(app_address, username, password).await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    let user_id = body["user"]["id"].as_str().expect("No user id in response");

    (token, Uuid::parse_str(user_id).expect("Invalid user id"))
}

pub async fn create_test_user_and_login(app_address: &str) -> UserRegLoginResponse {
    let username = unique_username("user");
    let password = "password123";

    let response = register_user(app_address, &username, password).await;
    assert_eq!(200, response.status().as_u16());

    let (token, user_id) = login_token(app_address, &username, password).await;
    UserRegLoginResponse { token, user_id, username }
}

/// Register a user, promote it through the database and log in again so the
/// token carries the admin role
pub async fn create_admin_user_and_login(test_app: &TestApp) -> UserRegLoginResponse {
    let username = unique_username("admin");
    let password = "password123";

    let response = register_user(&test_app.address, &username, password).await;
    assert_eq!(200, response.status().as_u16());

    sqlx::query("UPDATE users SET role = 'admin' WHERE username = $1")
        .bind(&username)
        .execute(&test_app.db_pool)
        .await
        .expect("Failed to promote user to admin");

    let (token, user_id) = login_token(&test_app.address, &username, password).await;
    UserRegLoginResponse { token, user_id, username }
}

pub async fn make_authenticated_request(
    client: &Client,
    method: Method,
    url: &str,
    token: &str,
    body: Option<Value>,
) -> Response {
    let mut request = client
        .request(method, url)
        .header("Authorization", format!("Bearer {}", token));

    if let Some(body) = body {
        request = request.json(&body);
    }

    request.send().await.expect("Failed to execute request.")
}

pub async fn get_json(client: &Client, url: &str) -> Value {
    let response = client.get(url).send().await.expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16(), "GET {} failed", url);
    response.json().await.expect("Failed to parse response")
}

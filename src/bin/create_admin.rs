//! Bootstrap an administrator account.
//!
//! Creates the account with the admin role, or promotes an existing account
//! and resets its password.

use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use predictor_backend::config::settings::get_config;
use predictor_backend::db::users::{find_user_by_username, insert_user, promote_with_password};
use predictor_backend::models::user::{RegistrationRequest, UserRole};
use predictor_backend::telemetry::{get_subscriber, init_subscriber};
use predictor_backend::utils::password::hash_password;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "create-admin")]
#[command(about = "Create or promote an administrator account", long_about = None)]
struct Cli {
    /// Account to create or promote
    username: String,

    /// Password to set; prefer the environment variable over the flag
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// Display name for a new account
    #[arg(long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let Cli { username, password, name } = Cli::parse();

    let config = get_config()?;
    init_subscriber(get_subscriber(
        "create-admin".into(),
        config.application.log_level.clone(),
        std::io::stdout,
    ));

    let request = RegistrationRequest {
        username: username.trim().to_string(),
        password: SecretString::new(password.into_boxed_str()),
        name,
    };
    request.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect(config.database.connection_string().expose_secret())
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let password_hash = hash_password(request.password.expose_secret())?;

    let admin = match find_user_by_username(&pool, &request.username).await? {
        Some(_) => promote_with_password(&pool, &request.username, &password_hash)
            .await?
            .ok_or("user vanished while promoting")?,
        None => {
            insert_user(
                &pool,
                &request.username,
                &password_hash,
                &request.display_name(),
                UserRole::Admin,
            )
            .await?
        }
    };

    tracing::info!("Admin account ready: {} ({})", admin.username, admin.id);
    println!("Admin account ready: {} ({})", admin.username, admin.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn password_and_name_are_flags() {
        let cli = Cli::try_parse_from(["create-admin", "root", "--password", "s3cret!", "--name", "Root"]).unwrap();
        assert_eq!(cli.username, "root");
        assert_eq!(cli.password, "s3cret!");
        assert_eq!(cli.name.as_deref(), Some("Root"));
    }

    #[test]
    fn positional_password_is_not_accepted() {
        assert!(Cli::try_parse_from(["create-admin", "root", "s3cret!", "--password", "x"]).is_err());
    }
}

use std::sync::{Arc, Once};

use anyhow::Context;
use sqlx::{any::AnyPoolOptions, AnyPool};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::config::{AppConfig, DatabaseType};

/// Shared state handed to every handler: the pool plus the startup config.
#[derive(Clone)]
pub struct AppState {
    pub db: AnyPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = connect(&config).await?;
        Ok(Self {
            db,
            config: Arc::new(config),
        })
    }
}

static INSTALL_DRIVERS: Once = Once::new();

pub async fn connect(config: &AppConfig) -> anyhow::Result<AnyPool> {
    INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

    let url = connection_url(config.database_type, &config.database_url);
    // A pooled in-memory SQLite database must stay on a single connection;
    // every further connection would see its own empty database.
    let max_connections = if url.contains(":memory:") { 1 } else { 10 };

    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// Normalize the configured URL into something the Any driver can dispatch
/// on. Bare SQLite paths become `sqlite://<path>?mode=rwc` so a missing file
/// is created instead of refused.
fn connection_url(database_type: DatabaseType, raw: &str) -> String {
    match database_type {
        DatabaseType::Postgres => raw.to_string(),
        DatabaseType::Sqlite => {
            if raw == ":memory:" {
                "sqlite::memory:".to_string()
            } else if raw.starts_with("sqlite:") {
                raw.to_string()
            } else {
                format!("sqlite://{raw}?mode=rwc")
            }
        }
    }
}

/// Timestamps are persisted as RFC 3339 TEXT so both engines store them
/// identically.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("formatting the current time as RFC 3339 cannot fail")
}

const CREATE_USERS: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    session_id  TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
)";

const CREATE_MEALS: &str = "\
CREATE TABLE IF NOT EXISTS meals (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users (id),
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    date        TEXT NOT NULL,
    on_diet     INTEGER,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
)";

/// Idempotent schema setup, portable across both engines.
pub async fn migrate(db: &AnyPool) -> anyhow::Result<()> {
    sqlx::query(CREATE_USERS)
        .execute(db)
        .await
        .context("create users table")?;
    sqlx::query(CREATE_MEALS)
        .execute(db)
        .await
        .context("create meals table")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_urls_pass_through_untouched() {
        assert_eq!(
            connection_url(DatabaseType::Postgres, "postgres://localhost/diet"),
            "postgres://localhost/diet"
        );
    }

    #[test]
    fn bare_sqlite_paths_gain_scheme_and_create_mode() {
        assert_eq!(
            connection_url(DatabaseType::Sqlite, "./db/app.db"),
            "sqlite://./db/app.db?mode=rwc"
        );
    }

    #[test]
    fn explicit_sqlite_urls_are_kept_as_given() {
        assert_eq!(
            connection_url(DatabaseType::Sqlite, "sqlite://diet.db?mode=ro"),
            "sqlite://diet.db?mode=ro"
        );
    }

    #[test]
    fn memory_shorthand_maps_to_the_sqlx_form() {
        assert_eq!(
            connection_url(DatabaseType::Sqlite, ":memory:"),
            "sqlite::memory:"
        );
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        let now = now_rfc3339();
        assert!(OffsetDateTime::parse(&now, &Rfc3339).is_ok());
    }
}

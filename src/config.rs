use std::fmt;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3333;

/// Which database engine the pool should dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Sqlite,
    Postgres,
}

impl DatabaseType {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "sqlite" => Some(DatabaseType::Sqlite),
            "postgres" | "pg" => Some(DatabaseType::Postgres),
            _ => None,
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseType::Sqlite => write!(f, "sqlite"),
            DatabaseType::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Dev,
    Prod,
    Test,
}

impl RunMode {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "dev" => Some(RunMode::Dev),
            "prod" => Some(RunMode::Prod),
            "test" => Some(RunMode::Test),
            _ => None,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Dev => write!(f, "dev"),
            RunMode::Prod => write!(f, "prod"),
            RunMode::Test => write!(f, "test"),
        }
    }
}

/// All startup configuration, read from the environment once and passed
/// around by reference from there on.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub database_type: DatabaseType,
    pub run_mode: RunMode,
}

/// Every violation found while reading the environment, reported together so
/// a broken deployment surfaces all of its problems in one pass.
#[derive(Debug, Error)]
#[error("invalid environment configuration: {}", .violations.join("; "))]
pub struct ConfigError {
    pub violations: Vec<String>,
}

/// The raw environment values before validation.
struct RawConfig {
    port: Option<String>,
    database_url: Option<String>,
    database_type: Option<String>,
    app_env: Option<String>,
}

impl RawConfig {
    fn from_env() -> Self {
        Self {
            port: env_var("PORT"),
            database_url: env_var("DATABASE_URL"),
            database_type: env_var("DATABASE_TYPE"),
            app_env: env_var("APP_ENV"),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(RawConfig::from_env())
    }

    fn build(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut violations = Vec::new();

        let port = match raw.port {
            None => DEFAULT_PORT,
            Some(value) => value.parse::<u16>().unwrap_or_else(|_| {
                violations.push(format!("PORT: '{value}' is not a valid port number"));
                DEFAULT_PORT
            }),
        };

        let database_type = match raw.database_type {
            None => DatabaseType::Sqlite,
            Some(value) => DatabaseType::parse(&value).unwrap_or_else(|| {
                violations.push(format!(
                    "DATABASE_TYPE: '{value}' is not one of sqlite, postgres"
                ));
                DatabaseType::Sqlite
            }),
        };

        let run_mode = match raw.app_env {
            None => RunMode::Dev,
            Some(value) => RunMode::parse(&value).unwrap_or_else(|| {
                violations.push(format!("APP_ENV: '{value}' is not one of dev, prod, test"));
                RunMode::Dev
            }),
        };

        let database_url = match raw.database_url {
            Some(value) => value,
            None => {
                violations.push("DATABASE_URL is required".to_string());
                String::new()
            }
        };

        if !database_url.is_empty() {
            if let Some(problem) = scheme_mismatch(database_type, &database_url) {
                violations.push(problem);
            }
        }

        if violations.is_empty() {
            Ok(AppConfig {
                port,
                database_url,
                database_type,
                run_mode,
            })
        } else {
            Err(ConfigError { violations })
        }
    }
}

/// The Any driver dispatches on the URL scheme, so the scheme has to agree
/// with the selected engine. Bare paths count as SQLite files.
fn scheme_mismatch(database_type: DatabaseType, url: &str) -> Option<String> {
    let scheme = url.split_once("://").map(|(scheme, _)| scheme);
    match (database_type, scheme) {
        (DatabaseType::Postgres, Some("postgres" | "postgresql")) => None,
        (DatabaseType::Postgres, _) => Some(
            "DATABASE_URL: DATABASE_TYPE postgres requires a postgres:// connection string"
                .to_string(),
        ),
        (DatabaseType::Sqlite, None | Some("sqlite")) => None,
        (DatabaseType::Sqlite, Some(other)) => Some(format!(
            "DATABASE_URL: scheme '{other}://' does not match DATABASE_TYPE sqlite"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawConfig {
        RawConfig {
            port: None,
            database_url: Some("./db/app.db".to_string()),
            database_type: None,
            app_env: None,
        }
    }

    #[test]
    fn defaults_apply_when_only_the_url_is_given() {
        let config = AppConfig::build(raw()).expect("valid config");
        assert_eq!(config.port, 3333);
        assert_eq!(config.database_type, DatabaseType::Sqlite);
        assert_eq!(config.run_mode, RunMode::Dev);
        assert_eq!(config.database_url, "./db/app.db");
    }

    #[test]
    fn missing_url_is_the_only_required_value() {
        let err = AppConfig::build(RawConfig {
            database_url: None,
            ..raw()
        })
        .unwrap_err();
        assert_eq!(err.violations, vec!["DATABASE_URL is required"]);
    }

    #[test]
    fn all_violations_are_reported_together() {
        let err = AppConfig::build(RawConfig {
            port: Some("http".to_string()),
            database_url: None,
            database_type: Some("mongo".to_string()),
            app_env: Some("staging".to_string()),
        })
        .unwrap_err();
        assert_eq!(err.violations.len(), 4);
        let rendered = err.to_string();
        assert!(rendered.contains("PORT"));
        assert!(rendered.contains("DATABASE_TYPE"));
        assert!(rendered.contains("APP_ENV"));
        assert!(rendered.contains("DATABASE_URL"));
    }

    #[test]
    fn pg_is_accepted_as_a_postgres_alias() {
        let config = AppConfig::build(RawConfig {
            database_type: Some("pg".to_string()),
            database_url: Some("postgres://localhost/diet".to_string()),
            ..raw()
        })
        .expect("valid config");
        assert_eq!(config.database_type, DatabaseType::Postgres);
    }

    #[test]
    fn url_scheme_must_agree_with_the_engine() {
        let err = AppConfig::build(RawConfig {
            database_type: Some("sqlite".to_string()),
            database_url: Some("postgres://localhost/diet".to_string()),
            ..raw()
        })
        .unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert!(err.violations[0].contains("does not match DATABASE_TYPE sqlite"));

        let err = AppConfig::build(RawConfig {
            database_type: Some("postgres".to_string()),
            database_url: Some("./db/app.db".to_string()),
            ..raw()
        })
        .unwrap_err();
        assert!(err.violations[0].contains("postgres:// connection string"));
    }

    #[test]
    fn sqlite_urls_and_memory_form_pass_the_scheme_check() {
        for url in ["sqlite://diet.db", "sqlite::memory:", ":memory:", "diet.db"] {
            assert!(
                scheme_mismatch(DatabaseType::Sqlite, url).is_none(),
                "rejected {url}"
            );
        }
    }
}

//! Database connection setup

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

/// Open a pooled connection described by `config`
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(config.connect_timeout)
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to {}", redact(&config.url)))?;

    tracing::debug!(
        backend = ?db.get_database_backend(),
        max_connections = config.max_connections,
        "Database connection established"
    );
    Ok(db)
}

/// Strip credentials from a connection URL before it is logged
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

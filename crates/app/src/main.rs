use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kasa={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let mut builder = engine::Engine::builder();
    match &settings.server.database {
        Some(path) => {
            let db = match connect_database(path).await {
                Ok(db) => db,
                Err(err) => {
                    tracing::error!("failed to initialize database: {err}");
                    return Ok(());
                }
            };
            builder = builder.database(db);
        }
        None => tracing::info!("No database configured, keeping accounts in memory..."),
    }
    let engine = builder.build();

    let bind = settings.server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return Ok(());
        }
    };

    let secure_cookies = settings.server.secure_cookies.unwrap_or(false);
    if let Err(err) = server::run_with_listener(engine, secure_cookies, listener).await {
        tracing::error!("server failed: {err}");
    }

    Ok(())
}

async fn connect_database(
    path: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = if path == "memory" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{}?mode=rwc", path)
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

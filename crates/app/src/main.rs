use clap::Parser;
use migration::{Migrator, MigratorTrait};
use settings::{Cli, Database, Settings};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::new(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kibubu={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    if settings.auth.jwt_secret == server::ServerConfig::default().jwt_secret {
        tracing::warn!("using the default JWT secret, set auth.jwt_secret");
    }

    let db = parse_database(&settings.server.database).await?;
    let mut builder = engine::Engine::builder().database(db);
    if let Some(cost) = settings.auth.password_cost {
        builder = builder.password_cost(cost);
    }
    let engine = builder.build().await?;

    let config = server::ServerConfig {
        jwt_secret: settings.auth.jwt_secret,
        jwt_expiry_minutes: settings.auth.jwt_expiry_minutes,
        cors_origins: settings.server.cors_origins,
    };
    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    server::run_with_listener(engine, config, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}

//! Application settings.
//!
//! Read from an optional `settings.toml` (path set with `--config`) and
//! overridden by `KIBUBU__SECTION__KEY` environment variables, e.g.
//! `KIBUBU__SERVER__PORT=9000`.

use clap::Parser;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "kibubu", about = "Personal finance backend")]
pub struct Cli {
    /// Config file path, with or without the `.toml` extension.
    #[arg(long, env = "KIBUBU_CONFIG")]
    pub config: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    /// bcrypt cost; the engine default is used when absent.
    pub password_cost: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub auth: Auth,
}

impl Settings {
    pub fn new(cli: &Cli) -> Result<Self, ConfigError> {
        let path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let builder = defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("KIBUBU")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app.level", "info")?
        .set_default("server.bind", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.database", "memory")?
        .set_default("server.cors_origins", vec!["http://localhost:5173"])?
        .set_default("auth.jwt_secret", server::ServerConfig::default().jwt_secret)?
        .set_default("auth.jwt_expiry_minutes", 15)
}

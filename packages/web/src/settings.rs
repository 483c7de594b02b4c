use auth::Credentials;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// Externally visible origin; callbacks are `{redirect_base}/{provider}/callback`.
    pub redirect_base: String,
    pub http_timeout_secs: u64,
    pub state_max_age_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub name: String,
    /// Hex-encoded signing secret, at least 64 bytes.
    #[serde(default)]
    pub secret: String,
    pub secure: bool,
    pub max_age_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub auth: Auth,
    pub session: Session,
    #[serde(default)]
    pub google: Credentials,
    #[serde(default)]
    pub facebook: Credentials,
}

impl Settings {
    /// Defaults, then `config.toml` if present, then `APP__*` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::builder()?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse settings from a TOML document layered over the defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults. Credentials and the session secret have none.
    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.address", "localhost:8080")?
            .set_default("auth.redirect_base", "http://localhost:8080")?
            .set_default("auth.http_timeout_secs", 10)?
            .set_default("auth.state_max_age_secs", 600)?
            .set_default("session.name", "example-oauth-app")?
            .set_default("session.secure", false)
    }
}

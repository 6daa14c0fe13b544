use std::time::Duration as StdDuration;

use crate::error::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
    pub credentials: CredentialServiceSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Token signing and lifetime settings
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
    /// Refuse access tokens on the refresh endpoint
    #[serde(default)]
    pub require_refresh_kind: bool,
}

impl AuthSettings {
    /// # Errors
    /// Returns error if the lifetime is not positive or out of range
    pub fn access_lifetime(&self) -> Result<chrono::Duration, ConfigError> {
        lifetime(
            "auth.access_token_expire_minutes",
            self.access_token_expire_minutes,
            chrono::Duration::try_minutes,
        )
    }

    /// # Errors
    /// Returns error if the lifetime is not positive or out of range
    pub fn refresh_lifetime(&self) -> Result<chrono::Duration, ConfigError> {
        lifetime(
            "auth.refresh_token_expire_days",
            self.refresh_token_expire_days,
            chrono::Duration::try_days,
        )
    }

    /// # Errors
    /// Returns error if the secret is missing or a lifetime is unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("auth.secret_key".to_string()));
        }
        self.access_lifetime()?;
        self.refresh_lifetime()?;
        Ok(())
    }
}

fn lifetime(
    key: &str,
    value: i64,
    to_duration: fn(i64) -> Option<chrono::Duration>,
) -> Result<chrono::Duration, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::InvalidValue(format!("{} must be positive", key)));
    }
    to_duration(value)
        .ok_or_else(|| ConfigError::InvalidValue(format!("{} is out of range", key)))
}

/// Identity lookup service used by login
#[derive(serde::Deserialize, Clone)]
pub struct CredentialServiceSettings {
    pub user_exist_endpoint: String,
    pub timeout_milliseconds: u64,
}

impl CredentialServiceSettings {
    pub fn timeout(&self) -> StdDuration {
        StdDuration::from_millis(self.timeout_milliseconds)
    }
}

/// Load settings: defaults, then `configuration.*`, then `APP__*` env vars
///
/// e.g. `APP__AUTH__SECRET_KEY=...` overrides `auth.secret_key`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 8000)?
        .set_default("auth.algorithm", "HS256")?
        .set_default("auth.access_token_expire_minutes", 30)?
        .set_default("auth.refresh_token_expire_days", 7)?
        .set_default("auth.require_refresh_kind", false)?
        .set_default("credentials.timeout_milliseconds", 5000)?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;
    Ok(settings.try_deserialize::<Settings>()?)
}

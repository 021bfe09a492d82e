use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub booking: BookingRules,
    pub payments: PaymentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Base URL used when building self/next/prev links in responses.
    pub public_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    /// How long a pending booking holds its seat before payment must land.
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u64,
}

fn default_hold_seconds() -> u64 {
    3600
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    /// Approval probability of the simulated processor, in [0, 1].
    #[serde(default = "default_approval_rate")]
    pub approval_rate: f64,
}

fn default_approval_rate() -> f64 {
    0.9
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of VELARO)
            // Eg.. `VELARO__SERVER__PORT=8081` would set the server port
            .add_source(config::Environment::with_prefix("VELARO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

//! Configuration loading for infrastructure services
//!
//! Before layering, dotenv files are read into the process environment:
//! `.env.<environment>` for the environment named by `ENVIRONMENT` (default
//! development), then `.env`. Neither overrides variables already set.
//!
//! Layers, lowest precedence first:
//! 1. `AppConfig` defaults for the detected environment plus the flat
//!    variables read by `AppConfig::from_env` (`SPAM_CHECK_*`, `SITE_NAME`, ...)
//! 2. An optional file named by `NODEBBS_CONFIG` (any format `config` supports)
//! 3. Nested `NODEBBS__SECTION__KEY` variables, e.g. `NODEBBS__SPAM_CHECK__BLOCK_THRESHOLD=60`

use nb_shared::config::{AppConfig, Environment};

use crate::InfrastructureError;

/// Prefix of nested environment overrides
pub const ENV_PREFIX: &str = "NODEBBS";

/// Variable naming an optional configuration file
pub const CONFIG_FILE_VAR: &str = "NODEBBS_CONFIG";

/// Dotenv files read for `environment`, highest precedence first
pub fn dotenv_files(environment: Environment) -> [&'static str; 2] {
    [environment.env_file(), ".env"]
}

/// Load application configuration, reading the dotenv files first if present
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    let environment = Environment::from_env();
    for file in dotenv_files(environment) {
        if dotenvy::from_filename(file).is_ok() {
            tracing::debug!(file, %environment, "Loaded dotenv file");
        }
    }

    let file = std::env::var(CONFIG_FILE_VAR).ok();
    load_config_with(AppConfig::from_env(), file.as_deref())
}

/// Layer an optional file and `NODEBBS__*` overrides on top of `base`
pub fn load_config_with(
    base: AppConfig,
    file: Option<&str>,
) -> Result<AppConfig, InfrastructureError> {
    let mut builder = ::config::Config::builder().add_source(::config::Config::try_from(&base)?);

    if let Some(path) = file {
        builder = builder.add_source(::config::File::with_name(path).required(false));
    }

    let settings = builder
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("spam_check.check_types"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;

    if config.spam_check.block_threshold > 100 {
        return Err(InfrastructureError::Config(format!(
            "spam_check.block_threshold must be within 0-100, got {}",
            config.spam_check.block_threshold
        )));
    }

    tracing::debug!(
        environment = %config.environment,
        spam_check_enabled = config.spam_check.enabled,
        "Configuration loaded"
    );

    Ok(config)
}

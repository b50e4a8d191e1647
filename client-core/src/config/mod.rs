use crate::error::ApiError;
use config::{Config as Cfg, File};
use serde::de::DeserializeOwned;

/// Load settings from the optional `configuration` file with `APP`-prefixed
/// environment overrides (`APP_API__BASE_URL` maps to `api.base_url`).
pub fn load<T: DeserializeOwned>() -> Result<T, ApiError> {
    dotenvy::dotenv().ok();

    let config = Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

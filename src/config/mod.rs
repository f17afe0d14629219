mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{AmplifierSettings, ServerSettings, Settings};

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the server and amplifier configurations
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        amplifier: AmplifierSettings {
            factor: partial
                .amplifier
                .as_ref()
                .and_then(|a| a.factor)
                .unwrap_or(default.amplifier.factor),
            max_backpressure_bytes: partial
                .amplifier
                .as_ref()
                .and_then(|a| a.max_backpressure_bytes)
                .unwrap_or(default.amplifier.max_backpressure_bytes),
        },
    })
}

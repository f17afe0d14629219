use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for both the server listener and the amplifier.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub amplifier: AmplifierSettings,
}

/// Configuration settings for the server listener.
///
/// Defines the host and port the server will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Configuration settings for the amplification pipeline.
///
/// `factor` is the number of replies generated per inbound message;
/// `max_backpressure_bytes` is the per-connection outbound buffer ceiling.
#[derive(Debug, Deserialize, Clone)]
pub struct AmplifierSettings {
    pub factor: usize,
    pub max_backpressure_bytes: usize,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub amplifier: Option<PartialAmplifierSettings>,
}

/// Partial server settings.
///
/// Used when loading server configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Partial amplifier settings.
///
/// Used for amplifier configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialAmplifierSettings {
    pub factor: Option<usize>,
    pub max_backpressure_bytes: Option<usize>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            amplifier: AmplifierSettings {
                factor: 2,
                max_backpressure_bytes: 256 * 1024,
            },
        }
    }
}

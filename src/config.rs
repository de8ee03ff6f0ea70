use ::config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_CONFIG_FILE: &str = "kiosk.toml";
const CONFIG_PATH_VAR: &str = "KIOSK_CONFIG";

/// Layered kiosk settings: built-in defaults, then an optional TOML file,
/// then `KIOSK_`-prefixed environment variables (`__` separates sections).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    pub stream: StreamSettings,
    pub window: WindowSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl LoggingSettings {
    pub fn max_level(&self) -> Level {
        Level::from_str(self.level.trim()).unwrap_or(Level::INFO)
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_with(File::with_name(&path).required(false))
    }

    pub fn load_with<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Self::load_layers(file, environment())
    }

    fn load_layers<S>(file: S, env: Environment) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("backend.base_url", "http://localhost:8000")?
            .set_default("backend.request_timeout_ms", 5000_i64)?
            .set_default("stream.url", "ws://localhost:8000/ws")?
            .set_default("window.title", "Donut Tray Checkout")?
            .set_default("window.width", 1280.0)?
            .set_default("window.height", 720.0)?
            .set_default("logging.level", "info")?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

/// `KIOSK_BACKEND__BASE_URL` overrides `backend.base_url`.
fn environment() -> Environment {
    Environment::with_prefix("KIOSK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::FileFormat;
    use ::config::Map;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load_with(File::with_name("does-not-exist").required(false))
            .expect("defaults should deserialize");
        assert_eq!(settings.backend.base_url, "http://localhost:8000");
        assert_eq!(settings.stream.url, "ws://localhost:8000/ws");
        assert_eq!(settings.backend.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.window.width, 1280.0);
    }

    #[test]
    fn file_overrides_defaults() {
        let toml = r#"
            [backend]
            base_url = "http://tray-backend:9000"
            request_timeout_ms = 250

            [logging]
            level = "debug"
        "#;
        let settings = Settings::load_with(File::from_str(toml, FileFormat::Toml))
            .expect("file should deserialize");
        assert_eq!(settings.backend.base_url, "http://tray-backend:9000");
        assert_eq!(settings.backend.request_timeout_ms, 250);
        assert_eq!(settings.logging.max_level(), Level::DEBUG);
        assert_eq!(settings.window.title, "Donut Tray Checkout");
    }

    #[test]
    fn environment_overrides_file() {
        let toml = r#"
            [backend]
            base_url = "http://from-file:9000"
        "#;
        let vars = Map::from([
            (
                "KIOSK_BACKEND__BASE_URL".to_string(),
                "http://tray-backend:9100".to_string(),
            ),
            ("KIOSK_BACKEND__REQUEST_TIMEOUT_MS".to_string(), "750".to_string()),
            ("KIOSK_STREAM__URL".to_string(), "ws://camera:8001/ws".to_string()),
        ]);
        let settings = Settings::load_layers(
            File::from_str(toml, FileFormat::Toml),
            environment().source(Some(vars)),
        )
        .expect("environment should deserialize");
        assert_eq!(settings.backend.base_url, "http://tray-backend:9100");
        assert_eq!(settings.backend.request_timeout(), Duration::from_millis(750));
        assert_eq!(settings.stream.url, "ws://camera:8001/ws");
    }

    #[test]
    fn environment_needs_kiosk_prefix() {
        let vars = Map::from([(
            "BACKEND__BASE_URL".to_string(),
            "http://elsewhere:1".to_string(),
        )]);
        let settings = Settings::load_layers(
            File::from_str("", FileFormat::Toml),
            environment().source(Some(vars)),
        )
        .expect("defaults should deserialize");
        assert_eq!(settings.backend.base_url, "http://localhost:8000");
    }

    #[test]
    fn unparseable_log_level_is_info() {
        let logging = LoggingSettings {
            level: "chatty".to_string(),
        };
        assert_eq!(logging.max_level(), Level::INFO);
    }
}

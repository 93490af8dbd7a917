use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Имя интерфейса фиксировано: клиенты ищут именно его
pub const INTERFACE_NAME: &str = "org.gnome.Shell.Extensions.WindowMonitorPro";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub dbus: DbusConfig,
    pub window_manager: WindowManagerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DbusConfig {
    pub bus_name: String,
    pub object_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    pub backend: String,
    pub dry_run_interval_ms: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            filter: "window_monitor=info".to_string(),
        }
    }
}

impl Default for DbusConfig {
    fn default() -> Self {
        Self {
            bus_name: INTERFACE_NAME.to_string(),
            object_path: "/org/gnome/Shell/Extensions/WindowMonitorPro".to_string(),
        }
    }
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            backend: "x11".to_string(),
            dry_run_interval_ms: 5000,
        }
    }
}

impl WindowManagerConfig {
    pub fn dry_run_interval(&self) -> Duration {
        Duration::from_millis(self.dry_run_interval_ms)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("WINDOW_MONITOR_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация адресов D-Bus
        zbus::names::WellKnownName::try_from(self.dbus.bus_name.as_str())
            .with_context(|| format!("Неверное имя на шине D-Bus: {}", self.dbus.bus_name))?;

        zbus::zvariant::ObjectPath::try_from(self.dbus.object_path.as_str())
            .with_context(|| format!("Неверный путь объекта D-Bus: {}", self.dbus.object_path))?;

        // Валидация источника окон
        match self.window_manager.backend.as_str() {
            "x11" | "dry_run" => {}
            _ => anyhow::bail!(
                "Неверный источник окон: {}",
                self.window_manager.backend
            ),
        }

        if self.window_manager.dry_run_interval_ms < 100 {
            anyhow::bail!("dry_run_interval_ms должно быть минимум 100");
        }

        Ok(())
    }
}

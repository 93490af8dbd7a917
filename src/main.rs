use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use std::sync::Arc;
mod config;
mod error;
mod events;
mod services;
#[cfg(test)]
mod test_support;
mod utils;

use config::Config;
use services::{create_window_manager, DbusTransport, FocusTracker};

#[derive(Parser, Debug)]
#[command(name = "window-monitor")]
#[command(about = "Сообщает об активном окне и смене фокуса через D-Bus")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "window-monitor.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция окон вместо X11)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает настройки из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    init_tracing(&config, args.log_level.as_deref())?;

    info!("Запуск window-monitor v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - окна эмулируются");
    }

    // Инициализация компонентов
    let window_manager = create_window_manager(&config, args.dry_run)?;
    let transport = Arc::new(DbusTransport::connect(&config.dbus).await?);
    let mut tracker = FocusTracker::new(window_manager, transport);

    tracker.enable().await?;
    info!("Сервис запущен");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");
    tracker.disable().await;

    info!("window-monitor завершил работу");
    Ok(())
}

fn init_tracing(config: &Config, level_override: Option<&str>) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let directives = match level_override {
        Some(level) => level.to_string(),
        None => format!("{},{}", config.logging.level, config.logging.filter),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directives))?;

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }

    Ok(())
}

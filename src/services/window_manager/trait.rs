use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

use super::dry_run::DryRunWindowManager;
use super::signal::{FocusSubscription, SubscriptionId};
use super::x11::X11WindowManager;

/// Живое окно оконного менеджера. Каждый вызов читает текущее состояние
pub trait WindowHandle: Send + Sync {
    fn id(&self) -> u64;
    fn title(&self) -> String;
    fn wm_class(&self) -> String;
    fn pid(&self) -> Option<u32>;
    fn is_maximized(&self) -> bool;
    fn has_focus(&self) -> bool;
}

/// Источник окон и уведомлений о смене фокуса
pub trait WindowManager: Send + Sync {
    /// Все окна, которыми сейчас управляет оконный менеджер, в его порядке
    fn windows(&self) -> Result<Vec<Box<dyn WindowHandle>>>;

    /// Подписка на "focus changed". Уведомления приходят в порядке доставки
    fn connect_focus_changed(&self) -> Result<FocusSubscription>;

    /// Снять подписку. Повторный вызов с тем же id ничего не делает
    fn disconnect(&self, id: SubscriptionId);
}

/// Factory function to create a window manager backend based on config and the dry_run flag
pub fn create_window_manager(config: &Config, dry_run: bool) -> Result<Arc<dyn WindowManager>> {
    if dry_run || config.window_manager.backend == "dry_run" {
        let manager = Arc::new(DryRunWindowManager::demo());
        let interval = config.window_manager.dry_run_interval();
        info!("Источник окон: dry-run (смена фокуса каждые {:?})", interval);
        tokio::spawn(manager.clone().run_demo(interval));
        Ok(manager)
    } else {
        info!("Источник окон: X11 (EWMH)");
        Ok(Arc::new(X11WindowManager::connect()?))
    }
}

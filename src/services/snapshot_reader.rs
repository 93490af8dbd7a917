use crate::debug_if_enabled;
use crate::events::WindowInfo;
use crate::services::window_manager::WindowManager;
use std::sync::Arc;
use tracing::warn;

/// Читает полный снимок окон. Без кэша: каждый вызов опрашивает оконный менеджер
#[derive(Clone)]
pub struct SnapshotReader {
    window_manager: Arc<dyn WindowManager>,
}

impl SnapshotReader {
    pub fn new(window_manager: Arc<dyn WindowManager>) -> Self {
        Self { window_manager }
    }

    /// Недоступный оконный менеджер даёт пустой список, а не ошибку
    pub fn list_windows(&self) -> Vec<WindowInfo> {
        let handles = match self.window_manager.windows() {
            Ok(handles) => handles,
            Err(e) => {
                warn!("Оконный менеджер недоступен, снимок пуст: {}", e);
                return Vec::new();
            }
        };

        let windows: Vec<WindowInfo> = handles
            .iter()
            .map(|handle| WindowInfo {
                id: handle.id(),
                title: handle.title(),
                class: handle.wm_class(),
                pid: handle.pid(),
                maximized: handle.is_maximized(),
                focused: handle.has_focus(),
            })
            .collect();

        debug_if_enabled!("Снимок окон: {} шт.", windows.len());
        windows
    }
}

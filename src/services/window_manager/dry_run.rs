use crate::error::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

use super::r#trait::{WindowHandle, WindowManager};
use super::signal::{FocusSignal, FocusSubscription, SubscriptionId};

/// Окно эмулируемого оконного менеджера
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunWindow {
    pub id: u64,
    pub title: String,
    pub class: String,
    pub pid: Option<u32>,
    pub maximized: bool,
}

impl DryRunWindow {
    pub fn new(id: u64, title: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            class: class.into(),
            pid: None,
            maximized: false,
        }
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn with_maximized(mut self, maximized: bool) -> Self {
        self.maximized = maximized;
        self
    }
}

#[derive(Debug, Default)]
struct DryRunState {
    windows: Vec<DryRunWindow>,
    focused: Option<u64>,
}

impl DryRunState {
    fn window(&self, id: u64) -> Option<&DryRunWindow> {
        self.windows.iter().find(|w| w.id == id)
    }
}

/// Оконный менеджер в памяти: режим `--dry-run` и сценарии в тестах
pub struct DryRunWindowManager {
    state: Arc<RwLock<DryRunState>>,
    signal: FocusSignal,
}

impl Default for DryRunWindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunWindowManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(DryRunState::default())),
            signal: FocusSignal::new(),
        }
    }

    pub fn with_windows(windows: Vec<DryRunWindow>) -> Self {
        let manager = Self::new();
        manager.state.write().windows = windows;
        manager
    }

    /// Набор окон для режима сухого запуска
    pub fn demo() -> Self {
        Self::with_windows(vec![
            DryRunWindow::new(1, "Terminal - dry_run", "DryRun.Terminal").with_pid(1001),
            DryRunWindow::new(2, "Browser - dry_run", "DryRun.Browser")
                .with_pid(1002)
                .with_maximized(true),
            DryRunWindow::new(3, "Editor - dry_run", "DryRun.Editor").with_pid(1003),
        ])
    }

    #[allow(dead_code)]
    pub fn open_window(&self, window: DryRunWindow) {
        debug!("Dry-run: открыто окно #{} \"{}\"", window.id, window.title);
        self.state.write().windows.push(window);
    }

    /// Закрыть окно. Если оно было активным, фокус уходит на рабочий стол
    #[allow(dead_code)]
    pub fn close_window(&self, id: u64) -> bool {
        let focus_lost = {
            let mut state = self.state.write();
            let before = state.windows.len();
            state.windows.retain(|w| w.id != id);
            if state.windows.len() == before {
                return false;
            }
            if state.focused == Some(id) {
                state.focused = None;
                true
            } else {
                false
            }
        };

        if focus_lost {
            self.signal.emit();
        }
        true
    }

    /// Передать фокус окну (или никому). Уведомляет только при реальной смене
    pub fn set_focus(&self, id: Option<u64>) -> bool {
        {
            let mut state = self.state.write();
            if let Some(id) = id {
                if state.window(id).is_none() {
                    warn!("Dry-run: окно #{} не существует, фокус не изменён", id);
                    return false;
                }
            }
            if state.focused == id {
                return false;
            }
            state.focused = id;
        }

        self.signal.emit();
        true
    }

    #[allow(dead_code)]
    pub fn focused(&self) -> Option<u64> {
        self.state.read().focused
    }

    #[allow(dead_code)]
    pub fn subscriber_count(&self) -> usize {
        self.signal.subscriber_count()
    }

    /// Циклически переключает фокус по всем окнам, затем на пустой рабочий стол
    pub async fn run_demo(self: Arc<Self>, period: Duration) {
        info!("Dry-run режим - оконный менеджер работает в режиме эмуляции");

        let mut ticker = interval(period);
        let mut step = 0usize;

        loop {
            ticker.tick().await;

            let ids: Vec<u64> = self.state.read().windows.iter().map(|w| w.id).collect();
            let target = ids.get(step % (ids.len() + 1)).copied();

            match target {
                Some(id) => info!("Dry-run: эмулируем фокус на окне #{}", id),
                None => info!("Dry-run: эмулируем пустой рабочий стол"),
            }
            self.set_focus(target);

            step = step.wrapping_add(1);
        }
    }
}

impl WindowManager for DryRunWindowManager {
    fn windows(&self) -> Result<Vec<Box<dyn WindowHandle>>> {
        let state = self.state.read();
        Ok(state
            .windows
            .iter()
            .map(|w| {
                Box::new(DryRunHandle {
                    id: w.id,
                    state: self.state.clone(),
                }) as Box<dyn WindowHandle>
            })
            .collect())
    }

    fn connect_focus_changed(&self) -> Result<FocusSubscription> {
        Ok(self.signal.connect())
    }

    fn disconnect(&self, id: SubscriptionId) {
        self.signal.disconnect(id);
    }
}

/// Ссылка на окно: атрибуты читаются из общего состояния в момент вызова
struct DryRunHandle {
    id: u64,
    state: Arc<RwLock<DryRunState>>,
}

impl DryRunHandle {
    fn read<T: Default>(&self, f: impl FnOnce(&DryRunWindow) -> T) -> T {
        self.state.read().window(self.id).map(f).unwrap_or_default()
    }
}

impl WindowHandle for DryRunHandle {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> String {
        self.read(|w| w.title.clone())
    }

    fn wm_class(&self) -> String {
        self.read(|w| w.class.clone())
    }

    fn pid(&self) -> Option<u32> {
        self.read(|w| w.pid)
    }

    fn is_maximized(&self) -> bool {
        self.read(|w| w.maximized)
    }

    fn has_focus(&self) -> bool {
        self.state.read().focused == Some(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_read_live_state() {
        let manager = DryRunWindowManager::demo();
        let windows = manager.windows().unwrap();
        assert_eq!(windows.len(), 3);
        assert!(windows.iter().all(|w| !w.has_focus()));

        manager.set_focus(Some(2));
        // Уже выданные ссылки видят новый фокус
        assert!(windows[1].has_focus());
        assert_eq!(windows[1].title(), "Browser - dry_run");
        assert_eq!(windows[1].wm_class(), "DryRun.Browser");
        assert_eq!(windows[1].pid(), Some(1002));
        assert!(windows[1].is_maximized());
    }

    #[test]
    fn set_focus_notifies_only_on_change() {
        let manager = DryRunWindowManager::demo();
        let mut subscription = manager.connect_focus_changed().unwrap();

        assert!(manager.set_focus(Some(1)));
        assert!(!manager.set_focus(Some(1)));
        assert!(!manager.set_focus(Some(99)));
        assert!(manager.set_focus(None));

        assert!(subscription.notifications.try_recv().is_ok());
        assert!(subscription.notifications.try_recv().is_ok());
        assert!(subscription.notifications.try_recv().is_err());
    }

    #[test]
    fn closing_focused_window_clears_focus() {
        let manager = DryRunWindowManager::demo();
        manager.set_focus(Some(3));
        let mut subscription = manager.connect_focus_changed().unwrap();

        assert!(manager.close_window(3));
        assert_eq!(manager.focused(), None);
        assert!(subscription.notifications.try_recv().is_ok());
        assert!(!manager.close_window(3));
        assert_eq!(manager.windows().unwrap().len(), 2);
    }

    #[test]
    fn disconnected_subscription_gets_nothing() {
        let manager = DryRunWindowManager::demo();
        let mut subscription = manager.connect_focus_changed().unwrap();
        manager.disconnect(subscription.id);

        manager.set_focus(Some(1));
        assert!(subscription.notifications.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn demo_cycles_through_windows_and_desktop() {
        let manager = Arc::new(DryRunWindowManager::with_windows(vec![DryRunWindow::new(
            5, "Only", "Only.App",
        )]));
        let demo = tokio::spawn(manager.clone().run_demo(Duration::from_secs(1)));

        // Первый тик срабатывает сразу
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(manager.focused(), Some(5));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(manager.focused(), None);

        demo.abort();
    }
}

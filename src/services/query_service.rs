use crate::services::focus_resolver::{
    resolve_focus_class, resolve_focus_id, resolve_focus_pid, resolve_focus_title,
};
use crate::services::SnapshotReader;
use tracing::{debug, error};

/// Обработчики запросов клиентов. Каждый вызов снимает свежий снимок окон
#[derive(Clone)]
pub struct QueryService {
    reader: SnapshotReader,
}

impl QueryService {
    pub fn new(reader: SnapshotReader) -> Self {
        Self { reader }
    }

    /// Все окна одним JSON-массивом
    pub fn list(&self) -> String {
        let windows = self.reader.list_windows();
        let entries: Vec<_> = windows.iter().map(|w| w.list_entry()).collect();

        match serde_json::to_string(&entries) {
            Ok(json) => json,
            Err(e) => {
                // Сериализация строк и чисел не падает, но ответ всё равно нужен
                error!("Не удалось сериализовать список окон: {}", e);
                "[]".to_string()
            }
        }
    }

    pub fn focus_title(&self) -> String {
        let title = resolve_focus_title(&self.reader.list_windows());
        debug!("FocusTitle -> {:?}", title);
        title
    }

    pub fn focus_pid(&self) -> String {
        resolve_focus_pid(&self.reader.list_windows())
    }

    pub fn focus_id(&self) -> String {
        resolve_focus_id(&self.reader.list_windows())
    }

    pub fn focus_class(&self) -> String {
        resolve_focus_class(&self.reader.list_windows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::window_manager::{DryRunWindow, DryRunWindowManager};
    use std::sync::Arc;

    fn service_for(manager: &Arc<DryRunWindowManager>) -> QueryService {
        QueryService::new(SnapshotReader::new(manager.clone()))
    }

    #[test]
    fn focused_fields_for_editor_and_browser() {
        let manager = Arc::new(DryRunWindowManager::with_windows(vec![
            DryRunWindow::new(1, "Editor", "Ed.App").with_pid(100),
            DryRunWindow::new(2, "Browser", "Br.App").with_pid(200),
        ]));
        manager.set_focus(Some(2));
        let service = service_for(&manager);

        assert_eq!(service.focus_title(), "Browser");
        assert_eq!(service.focus_id(), "2");
        assert_eq!(service.focus_pid(), "200");
        assert_eq!(service.focus_class(), "Br.App");
    }

    #[test]
    fn no_windows_gives_empty_answers() {
        let manager = Arc::new(DryRunWindowManager::new());
        let service = service_for(&manager);

        assert_eq!(service.list(), "[]");
        assert_eq!(service.focus_title(), "");
        assert_eq!(service.focus_pid(), "");
        assert_eq!(service.focus_id(), "");
        assert_eq!(service.focus_class(), "");
    }

    #[test]
    fn list_is_json_array_of_all_windows() {
        let manager = Arc::new(DryRunWindowManager::demo());
        manager.set_focus(Some(1));
        let service = service_for(&manager);

        let parsed: serde_json::Value = serde_json::from_str(&service.list()).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0]["id"], 1);
        assert_eq!(entries[0]["pid"], 1001);
        assert_eq!(entries[0]["focus"], true);
        assert_eq!(entries[0]["title"], "Terminal - dry_run");
        assert_eq!(entries[1]["maximized"], true);
        assert_eq!(entries[1]["class"], "DryRun.Browser");
        assert_eq!(entries[2]["focus"], false);
    }

    #[test]
    fn consecutive_calls_observe_live_focus() {
        let manager = Arc::new(DryRunWindowManager::demo());
        let service = service_for(&manager);

        manager.set_focus(Some(1));
        assert_eq!(service.focus_id(), "1");
        manager.set_focus(Some(3));
        assert_eq!(service.focus_id(), "3");
        manager.set_focus(None);
        assert_eq!(service.focus_id(), "");
    }
}

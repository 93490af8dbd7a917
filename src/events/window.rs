use serde::Serialize;
use std::fmt;

/// pid, который оконный менеджер сообщает для окон без известного процесса
pub const UNKNOWN_PID: i64 = -1;

/// Информация об окне, прочитанная из оконного менеджера в момент снимка
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowInfo {
    pub id: u64,
    pub title: String,
    pub class: String,
    pub pid: Option<u32>,
    pub maximized: bool,
    pub focused: bool,
}

impl WindowInfo {
    #[allow(dead_code)]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            class: String::new(),
            pid: None,
            maximized: false,
            focused: false,
        }
    }

    #[allow(dead_code)]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    #[allow(dead_code)]
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    #[allow(dead_code)]
    pub fn with_maximized(mut self, maximized: bool) -> Self {
        self.maximized = maximized;
        self
    }

    #[allow(dead_code)]
    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// pid в числовом виде; неизвестный процесс даёт `-1`
    pub fn pid_value(&self) -> i64 {
        self.pid.map(i64::from).unwrap_or(UNKNOWN_PID)
    }

    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    pub fn pid_string(&self) -> String {
        self.pid_value().to_string()
    }

    /// Запись для JSON-ответа `List()`: id и pid остаются числами
    pub fn list_entry(&self) -> ListEntry<'_> {
        ListEntry {
            class: &self.class,
            pid: self.pid_value(),
            id: self.id,
            maximized: self.maximized,
            focus: self.focused,
            title: &self.title,
        }
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class.is_empty() {
            write!(f, "#{} \"{}\"", self.id, self.title)
        } else {
            write!(f, "#{} \"{}\" ({})", self.id, self.title, self.class)
        }
    }
}

/// Элемент массива, который отдаёт `List()`
#[derive(Debug, Serialize)]
pub struct ListEntry<'a> {
    pub class: &'a str,
    pub pid: i64,
    pub id: u64,
    pub maximized: bool,
    pub focus: bool,
    pub title: &'a str,
}

/// Результат разрешения фокуса: конкретное окно или пустой рабочий стол
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Window(WindowInfo),
    Desktop,
}

impl Focus {
    /// Строковое представление для сигнала `WindowFocusChanged`
    pub fn snapshot(&self) -> FocusSnapshot {
        match self {
            Focus::Window(window) => FocusSnapshot {
                id: window.id_string(),
                title: window.title.clone(),
                class: window.class.clone(),
                pid: window.pid_string(),
            },
            Focus::Desktop => FocusSnapshot::desktop(),
        }
    }
}

/// Поля сигнала смены фокуса в фиксированном порядке: id, title, class, pid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSnapshot {
    pub id: String,
    pub title: String,
    pub class: String,
    pub pid: String,
}

impl FocusSnapshot {
    pub const DESKTOP_ID: &'static str = "0";
    pub const DESKTOP_NAME: &'static str = "Desktop";
    pub const DESKTOP_PID: &'static str = "0";

    /// Заглушка «нет активного окна». Это не настоящее окно, её узнают по id "0"
    pub fn desktop() -> Self {
        Self {
            id: Self::DESKTOP_ID.to_string(),
            title: Self::DESKTOP_NAME.to_string(),
            class: Self::DESKTOP_NAME.to_string(),
            pid: Self::DESKTOP_PID.to_string(),
        }
    }

    pub fn is_desktop(&self) -> bool {
        self.id == Self::DESKTOP_ID
    }
}

impl fmt::Display for FocusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={} title=\"{}\" class={} pid={}",
            self.id, self.title, self.class, self.pid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_info_creation() {
        let window = WindowInfo::new(7, "Test Window")
            .with_class("TestApp")
            .with_pid(1234)
            .with_focus(true);

        assert_eq!(window.title, "Test Window");
        assert_eq!(window.class, "TestApp");
        assert_eq!(window.pid, Some(1234));
        assert_eq!(window.pid_string(), "1234");
        assert_eq!(window.id_string(), "7");
        assert!(window.focused);
        assert!(!window.maximized);
    }

    #[test]
    fn test_unknown_pid_renders_as_minus_one() {
        let window = WindowInfo::new(3, "No pid");
        assert_eq!(window.pid_value(), UNKNOWN_PID);
        assert_eq!(window.pid_string(), "-1");
    }

    #[test]
    fn test_list_entry_keeps_numbers_and_keys() {
        let window = WindowInfo::new(2, "Browser")
            .with_class("Br.App")
            .with_pid(200)
            .with_maximized(true)
            .with_focus(true);

        let json = serde_json::to_value(window.list_entry()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "class": "Br.App",
                "pid": 200,
                "id": 2,
                "maximized": true,
                "focus": true,
                "title": "Browser",
            })
        );
    }

    #[test]
    fn test_desktop_snapshot_literals() {
        let snapshot = Focus::Desktop.snapshot();
        assert_eq!(snapshot.id, "0");
        assert_eq!(snapshot.title, "Desktop");
        assert_eq!(snapshot.class, "Desktop");
        assert_eq!(snapshot.pid, "0");
        assert!(snapshot.is_desktop());
    }

    #[test]
    fn test_window_snapshot_uses_string_fields() {
        let window = WindowInfo::new(42, "Editor").with_class("Ed.App").with_pid(100);
        let snapshot = Focus::Window(window).snapshot();
        assert_eq!(
            snapshot,
            FocusSnapshot {
                id: "42".to_string(),
                title: "Editor".to_string(),
                class: "Ed.App".to_string(),
                pid: "100".to_string(),
            }
        );
        assert!(!snapshot.is_desktop());
    }
}

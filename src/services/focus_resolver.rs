//! Разрешение фокуса по снимку окон.
//!
//! Два вида ответа: полный (`resolve_focus`) с заглушкой `Desktop` для сигнала
//! и однопольные (`resolve_focus_*`), которые при отсутствии фокуса отдают `""`.

use crate::events::{Focus, WindowInfo};
use tracing::warn;

/// Первое окно с фокусом в порядке перечисления
fn focused_window(snapshot: &[WindowInfo]) -> Option<&WindowInfo> {
    let mut focused = snapshot.iter().filter(|w| w.focused);
    let first = focused.next()?;

    let extra = focused.count();
    if extra > 0 {
        warn!(
            "Аномалия: фокус у {} окон одновременно, выбрано первое {}",
            extra + 1,
            first
        );
    }

    Some(first)
}

pub fn resolve_focus(snapshot: &[WindowInfo]) -> Focus {
    match focused_window(snapshot) {
        Some(window) => Focus::Window(window.clone()),
        None => Focus::Desktop,
    }
}

pub fn resolve_focus_title(snapshot: &[WindowInfo]) -> String {
    focused_window(snapshot)
        .map(|w| w.title.clone())
        .unwrap_or_default()
}

pub fn resolve_focus_pid(snapshot: &[WindowInfo]) -> String {
    focused_window(snapshot)
        .map(WindowInfo::pid_string)
        .unwrap_or_default()
}

pub fn resolve_focus_id(snapshot: &[WindowInfo]) -> String {
    focused_window(snapshot)
        .map(WindowInfo::id_string)
        .unwrap_or_default()
}

pub fn resolve_focus_class(snapshot: &[WindowInfo]) -> String {
    focused_window(snapshot)
        .map(|w| w.class.clone())
        .unwrap_or_default()
}

pub mod window;

pub use window::{Focus, FocusSnapshot, WindowInfo};

/// Уведомление оконного менеджера о смене фокуса.
///
/// Не несёт данных: получатель сам снимает свежий снимок окон.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChanged;

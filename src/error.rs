use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка D-Bus: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Ошибка подключения к X11: {0}")]
    X11Connect(#[from] x11rb::errors::ConnectError),

    #[error("Ошибка соединения X11: {0}")]
    X11Connection(#[from] x11rb::errors::ConnectionError),

    #[error("Ошибка запроса X11: {0}")]
    X11Reply(#[from] x11rb::errors::ReplyError),

    #[error("Трекер фокуса уже включён")]
    AlreadyEnabled,

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl MonitorError {
    pub fn service_unavailable<T>(msg: impl Into<String>) -> Result<T> {
        Err(MonitorError::ServiceUnavailable(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! monitor_error {
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::MonitorError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::MonitorError::Internal(format!($($arg)*))
    };
}

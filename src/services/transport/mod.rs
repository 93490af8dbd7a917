//! Transport service: publishes the query interface and delivers focus signals.
//!
//! Только доставка. Что и когда отправлять, решает FocusTracker.

mod dbus;
mod r#trait;

pub use self::dbus::DbusTransport;
pub use self::r#trait::Transport;

//! WindowManager service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for talking to the window
//! manager: enumerating live windows, reading their attributes and delivering raw
//! "focus changed" notifications. They MUST NOT decide which window is focused for
//! clients or format anything for D-Bus; that belongs to the focus resolver and
//! the query service.

mod dry_run;
mod signal;
mod x11;
mod r#trait;

#[cfg(test)]
pub use self::dry_run::{DryRunWindow, DryRunWindowManager};
#[cfg(test)]
pub use self::r#trait::WindowHandle;
pub use self::r#trait::{create_window_manager, WindowManager};
#[cfg(test)]
pub use self::signal::FocusSubscription;
pub use self::signal::SubscriptionId;

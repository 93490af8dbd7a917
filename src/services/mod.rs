pub mod focus_resolver;
pub mod focus_tracker;
pub mod query_service;
pub mod snapshot_reader;
pub mod transport;
pub mod window_manager;

pub use focus_tracker::FocusTracker;
pub use query_service::QueryService;
pub use snapshot_reader::SnapshotReader;
pub use transport::DbusTransport;
pub use window_manager::create_window_manager;

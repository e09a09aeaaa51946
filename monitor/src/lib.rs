pub mod config;
pub mod cooldown;
pub mod dispatch;
pub mod engine;
pub mod retry;
pub mod state;
pub mod visibility;

mod pass;

pub use config::MonitorConfig;
pub use dispatch::NotificationCallback;
pub use engine::AlertMonitor;
pub use state::CheckerSnapshot;
pub use visibility::VisibilityHandle;

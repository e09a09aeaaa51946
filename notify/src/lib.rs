pub mod channel;
pub mod error;
pub mod log_channel;
pub mod permission;

pub use channel::{Notification, NotificationChannel};
pub use error::NotifyError;
pub use log_channel::LogChannel;
pub use permission::{PermissionGate, PermissionStatus, StaticGate};

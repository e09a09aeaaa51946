use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification permission denied")]
    PermissionDenied,

    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

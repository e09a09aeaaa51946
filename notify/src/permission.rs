use async_trait::async_trait;

/// Platform notification permission, mirroring the usual
/// granted / denied / not-yet-asked triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Never requested.
    Default,
}

/// Seam around the platform's permission prompt.
#[async_trait]
pub trait PermissionGate: Send + Sync + 'static {
    /// Current state, without prompting the user.
    fn status(&self) -> PermissionStatus;

    /// Prompt the user once; resolves to the final state. Denial is a
    /// configuration condition, not an error.
    async fn request(&self) -> PermissionStatus;
}

/// Gate with a fixed answer. Useful for headless embedders and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticGate(pub PermissionStatus);

#[async_trait]
impl PermissionGate for StaticGate {
    fn status(&self) -> PermissionStatus {
        self.0
    }

    async fn request(&self) -> PermissionStatus {
        self.0
    }
}

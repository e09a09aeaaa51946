use uuid::Uuid;

/// Correlation ID that follows one monitoring pass or dispatch chain.
#[derive(Clone, Debug)]
pub struct TraceId(String);

impl TraceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self(Uuid::new_v4().as_hyphenated().to_string())
    }
}

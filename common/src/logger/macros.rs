use tracing::{Span, field};

use super::TraceId;

/// Create a root span for one monitoring pass or job.
///
/// `market_id` and `alert_id` are declared empty so inner code can record
/// them once they are known.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id.as_str(),
        market_id = field::Empty,
        alert_id = field::Empty
    )
}

/// Create a child span (inherits trace_id automatically).
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name)
}

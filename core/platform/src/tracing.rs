use tracing::{span, Level, Span};
use uuid::Uuid;

/// Span covering one tool invocation; every log line of the run carries the id.
pub fn correlation_span(correlation_id: Uuid, operation: &str) -> Span {
    span!(
        Level::INFO,
        "operation",
        %operation,
        correlation_id = %correlation_id,
    )
}

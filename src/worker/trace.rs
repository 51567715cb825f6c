//! Trace context carried onto operation threads.
//!
//! An external operation runs on its own thread, where the UI thread's span
//! stack is not visible. The trace and span ids are captured on the UI thread
//! and recorded on the operation's root span so both ends can be linked in the
//! exported trace file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace id, 32 hex digits.
    pub trace_id: String,

    /// Span id of the span that started the operation, 16 hex digits.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the ids of the current span, if it is backed by a valid
    /// OpenTelemetry context.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to propagate");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

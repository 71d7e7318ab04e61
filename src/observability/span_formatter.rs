//! OTLP JSON span formatter.
//!
//! This module converts OpenTelemetry span data into OTLP (OpenTelemetry
//! Protocol) JSON format for file export. The output is compatible with OTLP
//! trace collectors and analysis tools.

use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde_json::Value as JsonValue;
use std::time::SystemTime;

/// Instrumentation scope name reported in every batch.
const SCOPE_NAME: &str = "linkdeck";

/// OTLP JSON span formatter.
///
/// Formats batches of spans into complete OTLP JSON documents with resource
/// attributes, scope information, and span details. The resource attributes
/// never change after construction, so they are serialized once up front and
/// reused for every batch.
pub struct SpanFormatter {
    /// Pre-serialized resource attributes (service name, etc.).
    resource_attrs: Vec<JsonValue>,
}

impl SpanFormatter {
    /// Creates a new span formatter with resource metadata.
    pub fn new(resource: &Resource) -> Self {
        let resource_attrs = resource
            .iter()
            .map(|(k, v)| {
                serde_json::json!({
                    "key": k.to_string(),
                    "value": Self::format_attribute_value(v)
                })
            })
            .collect();

        Self { resource_attrs }
    }

    /// Formats a batch of spans as an OTLP JSON document.
    ///
    /// # OTLP Format
    ///
    /// ```json
    /// {
    ///   "resourceSpans": [{
    ///     "resource": {
    ///       "attributes": [{"key": "service.name", "value": {"stringValue": "linkdeck"}}]
    ///     },
    ///     "scopeSpans": [{
    ///       "scope": {"name": "linkdeck"},
    ///       "spans": [...]
    ///     }]
    ///   }]
    /// }
    /// ```
    ///
    /// The returned `JsonValue` can be serialized to a string with
    /// `.to_string()` and written as one line.
    pub fn format_batch(&self, batch: &[SpanData]) -> JsonValue {
        let spans_json: Vec<JsonValue> = batch.iter().map(Self::format_span).collect();

        serde_json::json!({
            "resourceSpans": [{
                "resource": {
                    "attributes": self.resource_attrs
                },
                "scopeSpans": [{
                    "scope": {
                        "name": SCOPE_NAME,
                    },
                    "spans": spans_json
                }]
            }]
        })
    }

    /// Formats a single span as OTLP JSON.
    ///
    /// Converts all span fields to OTLP format:
    /// - IDs as hex strings (trace ID: 32 chars, span ID: 16 chars)
    /// - Timestamps as nanoseconds since Unix epoch
    /// - Attributes, events, links as arrays
    /// - Status code as integer (0=unset, 1=ok, 2=error)
    fn format_span(span: &SpanData) -> JsonValue {
        let (status_code, status_message) = Self::format_status(&span.status);

        serde_json::json!({
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": if span.parent_span_id == opentelemetry::trace::SpanId::INVALID {
                String::new()
            } else {
                format!("{:016x}", span.parent_span_id)
            },
            "name": span.name,
            "kind": Self::span_kind_to_int(&span.span_kind),
            "startTimeUnixNano": unix_nanos(span.start_time),
            "endTimeUnixNano": unix_nanos(span.end_time),
            "attributes": Self::format_attributes(&span.attributes),
            "events": Self::format_events(&span.events),
            "links": Self::format_links(&span.links),
            "status": {
                "code": status_code,
                "message": status_message,
            },
        })
    }

    /// Converts span kind to OTLP integer code.
    ///
    /// # Mapping
    ///
    /// - Internal: 1
    /// - Server: 2
    /// - Client: 3
    /// - Producer: 4
    /// - Consumer: 5
    const fn span_kind_to_int(kind: &opentelemetry::trace::SpanKind) -> u8 {
        match kind {
            opentelemetry::trace::SpanKind::Internal => 1,
            opentelemetry::trace::SpanKind::Server => 2,
            opentelemetry::trace::SpanKind::Client => 3,
            opentelemetry::trace::SpanKind::Producer => 4,
            opentelemetry::trace::SpanKind::Consumer => 5,
        }
    }

    /// Formats span attributes as an OTLP JSON array.
    ///
    /// Each attribute is converted to `{"key": "...", "value": {...}}` format.
    fn format_attributes(attributes: &[opentelemetry::KeyValue]) -> Vec<JsonValue> {
        attributes
            .iter()
            .map(|kv| {
                serde_json::json!({
                    "key": kv.key.to_string(),
                    "value": Self::format_attribute_value(&kv.value)
                })
            })
            .collect()
    }

    /// Formats an attribute value as OTLP JSON.
    ///
    /// Maps OpenTelemetry value types to OTLP value types:
    /// - Bool → `{"boolValue": true}`
    /// - I64 → `{"intValue": "123"}` (as string)
    /// - F64 → `{"doubleValue": 1.23}`
    /// - String → `{"stringValue": "..."}`
    /// - Array → `{"stringValue": "[debug format]"}` (fallback)
    fn format_attribute_value(value: &opentelemetry::Value) -> JsonValue {
        use opentelemetry::Value;

        match value {
            Value::Bool(b) => serde_json::json!({ "boolValue": b }),
            Value::I64(i) => serde_json::json!({ "intValue": i.to_string() }),
            Value::F64(f) => serde_json::json!({ "doubleValue": f }),
            Value::String(s) => serde_json::json!({ "stringValue": s.to_string() }),
            Value::Array(_) => serde_json::json!({ "stringValue": format!("{value:?}") }),
        }
    }

    /// Formats span events as an OTLP JSON array.
    ///
    /// Events include timestamp, name, and attributes.
    fn format_events(events: &[opentelemetry::trace::Event]) -> Vec<JsonValue> {
        events
            .iter()
            .map(|event| {
                serde_json::json!({
                    "timeUnixNano": unix_nanos(event.timestamp),
                    "name": event.name,
                    "attributes": Self::format_attributes(&event.attributes),
                })
            })
            .collect()
    }

    /// Formats span links as an OTLP JSON array.
    ///
    /// Links include trace ID, span ID, and attributes.
    fn format_links(links: &[opentelemetry::trace::Link]) -> Vec<JsonValue> {
        links
            .iter()
            .map(|link| {
                serde_json::json!({
                    "traceId": format!("{:032x}", link.span_context.trace_id()),
                    "spanId": format!("{:016x}", link.span_context.span_id()),
                    "attributes": Self::format_attributes(&link.attributes),
                })
            })
            .collect()
    }

    /// Formats span status as OTLP code and message.
    ///
    /// # Returns
    ///
    /// A tuple of `(code, message)`:
    /// - Unset: `(0, "")`
    /// - Ok: `(1, "")`
    /// - Error: `(2, "error description")`
    fn format_status(status: &opentelemetry::trace::Status) -> (u8, String) {
        match status {
            opentelemetry::trace::Status::Unset => (0, String::new()),
            opentelemetry::trace::Status::Ok => (1, String::new()),
            opentelemetry::trace::Status::Error { description } => (2, description.to_string()),
        }
    }
}

/// Renders a timestamp as nanoseconds since the Unix epoch, as a string.
///
/// OTLP carries nanosecond timestamps as strings to avoid JSON number
/// precision loss. Times before the epoch clamp to zero.
fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .to_string()
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter").finish()
    }
}

//! Decoding of host-delivered HTTP results into typed outcomes.
//!
//! The host reports every finished web request as an event carrying the HTTP
//! status, the raw body, and the context map the request was dispatched with.
//! [`decode`] routes that event back to a typed [`ApiOutcome`] using the
//! context's operation tag, or returns `None` for events that do not belong
//! to this plugin's protocol (another plugin's requests share the same event
//! stream in principle; an unknown tag is not an error).

use std::collections::BTreeMap;

use crate::api::requests::{ApiOp, CONTEXT_GENERATION, CONTEXT_LINK_ID, CONTEXT_OP};
use crate::domain::{ApiError, ClickRecord, Link, Session};

/// A finished backend operation, typed and correlated.
///
/// Every variant carries the generation the request was stamped with; the
/// application layer feeds it into the matching lifecycle wrapper, which is
/// where superseded generations get discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    SessionOpened {
        generation: u64,
        result: Result<Session, ApiError>,
    },
    SessionClosed {
        generation: u64,
        result: Result<(), ApiError>,
    },
    LinksFetched {
        generation: u64,
        result: Result<Vec<Link>, ApiError>,
    },
    ClicksFetched {
        generation: u64,
        result: Result<Vec<ClickRecord>, ApiError>,
    },
    LinkCreated {
        generation: u64,
        result: Result<Link, ApiError>,
    },
    LinkDeleted {
        generation: u64,
        link_id: String,
        result: Result<(), ApiError>,
    },
    QrDownloaded {
        generation: u64,
        link_id: String,
        result: Result<Vec<u8>, ApiError>,
    },
}

/// Routes a web request result back to a typed outcome.
///
/// Returns `None` when the context does not carry this plugin's operation tag
/// and generation, which means the event is not ours to handle. Transport
/// failures surface as status `0` from the host and decode like any other
/// non-2xx response, with the host's error text as the message.
#[must_use]
pub fn decode(status: u16, body: &[u8], context: &BTreeMap<String, String>) -> Option<ApiOutcome> {
    let op = ApiOp::parse(context.get(CONTEXT_OP)?)?;
    let generation = context.get(CONTEXT_GENERATION)?.parse::<u64>().ok()?;
    let link_id = || {
        context
            .get(CONTEXT_LINK_ID)
            .cloned()
            .unwrap_or_default()
    };

    let success = (200..300).contains(&status);
    tracing::debug!(
        op = op.as_str(),
        generation = generation,
        status = status,
        "decoding backend response"
    );

    let outcome = match op {
        ApiOp::Login => ApiOutcome::SessionOpened {
            generation,
            result: typed_result(success, status, body),
        },
        ApiOp::Logout => ApiOutcome::SessionClosed {
            generation,
            result: empty_result(success, status, body),
        },
        ApiOp::FetchLinks => ApiOutcome::LinksFetched {
            generation,
            result: typed_result(success, status, body),
        },
        ApiOp::FetchClicks => ApiOutcome::ClicksFetched {
            generation,
            result: typed_result(success, status, body),
        },
        ApiOp::CreateLink => ApiOutcome::LinkCreated {
            generation,
            result: typed_result(success, status, body),
        },
        ApiOp::DeleteLink => ApiOutcome::LinkDeleted {
            generation,
            link_id: link_id(),
            result: empty_result(success, status, body),
        },
        ApiOp::DownloadQr => ApiOutcome::QrDownloaded {
            generation,
            link_id: link_id(),
            result: if success {
                Ok(body.to_vec())
            } else {
                Err(extract_error(status, body))
            },
        },
    };

    Some(outcome)
}

/// Parses a 2xx body into `T`, or folds any failure into an [`ApiError`].
fn typed_result<T: serde::de::DeserializeOwned>(
    success: bool,
    status: u16,
    body: &[u8],
) -> Result<T, ApiError> {
    if !success {
        return Err(extract_error(status, body));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::new(status, format!("unreadable response: {e}")))
}

/// Result for operations whose success carries no payload.
fn empty_result(success: bool, status: u16, body: &[u8]) -> Result<(), ApiError> {
    if success {
        Ok(())
    } else {
        Err(extract_error(status, body))
    }
}

/// Extracts the most useful message a failure body offers.
///
/// Backends answer rejections with `{"message": ...}` or `{"error": ...}`;
/// transport failures deliver plain text from the host. Anything else falls
/// back to the raw body, or a generic message when the body is empty.
fn extract_error(status: u16, body: &[u8]) -> ApiError {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(serde_json::Value::as_str) {
                return ApiError::new(status, message);
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        ApiError::new(status, "request failed")
    } else {
        ApiError::new(status, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(op: &str, generation: &str) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(CONTEXT_OP.to_string(), op.to_string());
        map.insert(CONTEXT_GENERATION.to_string(), generation.to_string());
        map
    }

    #[test]
    fn login_success_decodes_a_session() {
        let body = br#"{
            "access_token": "tok",
            "user": {"id": "u1", "email": "user@example.com"},
            "expires_at": 1893456000
        }"#;
        let outcome = decode(200, body, &context("login", "1")).unwrap();

        match outcome {
            ApiOutcome::SessionOpened { generation, result } => {
                assert_eq!(generation, 1);
                let session = result.unwrap();
                assert_eq!(session.user.email, "user@example.com");
                assert_eq!(session.expires_at, Some(1893456000));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn rejection_message_is_extracted_from_json() {
        let outcome = decode(
            401,
            br#"{"message": "Invalid login credentials"}"#,
            &context("login", "2"),
        )
        .unwrap();

        match outcome {
            ApiOutcome::SessionOpened { result, .. } => {
                let error = result.unwrap_err();
                assert_eq!(error.status, 401);
                assert_eq!(error.message, "Invalid login credentials");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn error_key_variant_is_also_understood() {
        let outcome = decode(
            409,
            br#"{"error": "duplicate alias"}"#,
            &context("create_link", "4"),
        )
        .unwrap();

        match outcome {
            ApiOutcome::LinkCreated { result, .. } => {
                assert_eq!(result.unwrap_err().message, "duplicate alias");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn transport_failure_is_status_zero_with_raw_text() {
        let outcome = decode(
            0,
            b"dns error: no such host",
            &context("fetch_links", "3"),
        )
        .unwrap();

        match outcome {
            ApiOutcome::LinksFetched { result, .. } => {
                let error = result.unwrap_err();
                assert!(error.is_transport());
                assert_eq!(error.message, "dns error: no such host");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn empty_failure_body_gets_a_generic_message() {
        let outcome = decode(500, b"", &context("delete_link", "9")).unwrap();
        match outcome {
            ApiOutcome::LinkDeleted { result, .. } => {
                assert_eq!(result.unwrap_err().message, "request failed");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn malformed_success_body_fails_softly() {
        let outcome = decode(200, b"<html>gateway</html>", &context("fetch_links", "5")).unwrap();
        match outcome {
            ApiOutcome::LinksFetched { result, .. } => {
                let error = result.unwrap_err();
                assert_eq!(error.status, 200);
                assert!(error.message.starts_with("unreadable response"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn delete_echoes_the_link_id() {
        let mut ctx = context("delete_link", "6");
        ctx.insert(CONTEXT_LINK_ID.to_string(), "l42".to_string());

        let outcome = decode(204, b"", &ctx).unwrap();
        match outcome {
            ApiOutcome::LinkDeleted {
                link_id, result, ..
            } => {
                assert_eq!(link_id, "l42");
                assert!(result.is_ok());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn qr_success_passes_bytes_through() {
        let mut ctx = context("download_qr", "7");
        ctx.insert(CONTEXT_LINK_ID.to_string(), "l1".to_string());

        let outcome = decode(200, &[0x89, b'P', b'N', b'G'], &ctx).unwrap();
        match outcome {
            ApiOutcome::QrDownloaded {
                link_id, result, ..
            } => {
                assert_eq!(link_id, "l1");
                assert_eq!(result.unwrap(), vec![0x89, b'P', b'N', b'G']);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn foreign_events_are_not_ours() {
        // No context at all.
        assert!(decode(200, b"{}", &BTreeMap::new()).is_none());

        // Unknown tag.
        assert!(decode(200, b"{}", &context("open_pane", "1")).is_none());

        // Unparseable generation.
        assert!(decode(200, b"{}", &context("login", "not-a-number")).is_none());
    }
}

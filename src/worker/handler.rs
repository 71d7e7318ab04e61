//! Worker thread implementation for asynchronous cache operations.
//!
//! This module implements the Zellij worker thread interface, handling all
//! filesystem access (session cache, QR images) asynchronously to avoid
//! blocking the main plugin rendering loop. It includes distributed tracing
//! support for cross-thread observability.

use serde::{Deserialize, Serialize};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

use crate::domain::error::{LinkdeckError, Result};
use crate::infrastructure::paths;
use crate::storage::backend::Storage;
use crate::storage::models::StoredSession;
use crate::storage::JsonCache;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Worker thread state for handling cache operations.
///
/// This struct runs on a separate thread spawned by Zellij and processes
/// messages sent from the main plugin thread. The cache backend is
/// initialized lazily on first message receipt.
#[derive(Serialize, Deserialize, Default)]
pub struct LinkdeckWorker {
    /// Cache backend, initialized lazily on first use.
    #[serde(skip)]
    storage: Option<Box<dyn Storage>>,
}

impl LinkdeckWorker {
    /// Creates a new worker with the default JSON cache under the data dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let storage: Box<dyn Storage> = Box::new(JsonCache::new(
            paths::session_cache_file(),
            paths::qr_image_dir(),
        )?);
        Ok(Self {
            storage: Some(storage),
        })
    }

    /// Creates a worker over an explicit cache backend.
    ///
    /// Used by tests to point the worker at a temporary directory instead of
    /// the sandbox data dir.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// Returns a mutable reference to the cache backend, failing if not initialized.
    fn get_storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        self.storage
            .as_mut()
            .ok_or_else(|| LinkdeckError::Worker("Cache not initialized".to_string()))
    }

    /// Helper for handling cache operation results with consistent logging.
    ///
    /// This function standardizes error handling and success logging across
    /// all cache operations in the worker.
    fn handle_cache_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "cache operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "cache operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Handles the `LoadSession` message.
    ///
    /// Expired sessions are filtered out by the cache itself, so a `Some`
    /// here is always usable.
    fn handle_load_session(&mut self) -> WorkerResponse {
        let now = chrono::Utc::now().timestamp();

        Self::handle_cache_result(
            "load session",
            self.get_storage()
                .and_then(|storage| storage.load_session(now)),
            |session| {
                tracing::debug!(found = session.is_some(), "session cache checked");
                WorkerResponse::SessionLoaded { session }
            },
        )
    }

    /// Handles the `StoreSession` message.
    fn handle_store_session(&mut self, session: &StoredSession) -> WorkerResponse {
        Self::handle_cache_result(
            "store session",
            self.get_storage()
                .and_then(|storage| storage.store_session(session)),
            |()| {
                tracing::debug!(user_id = %session.user_id, "session cached");
                WorkerResponse::SessionStored
            },
        )
    }

    /// Handles the `ClearSession` message.
    fn handle_clear_session(&mut self) -> WorkerResponse {
        Self::handle_cache_result(
            "clear session",
            self.get_storage()
                .and_then(|storage| storage.clear_session()),
            |()| {
                tracing::debug!("session cache cleared");
                WorkerResponse::SessionCleared
            },
        )
    }

    /// Handles the `SaveQrImage` message.
    fn handle_save_qr_image(&mut self, file_name: &str, bytes: &[u8]) -> WorkerResponse {
        Self::handle_cache_result(
            "save qr image",
            self.get_storage()
                .and_then(|storage| storage.save_qr_image(file_name, bytes)),
            |path| {
                tracing::debug!(path = ?path, "QR image written");
                WorkerResponse::QrImageSaved {
                    path: path.to_string_lossy().into_owned(),
                }
            },
        )
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// This function reconstructs the OpenTelemetry context from the
    /// serialized trace information in the message, allowing spans created in
    /// the worker thread to be linked to their parent spans in the main
    /// thread.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_context = match message {
            WorkerMessage::LoadSession { trace_context }
            | WorkerMessage::StoreSession { trace_context, .. }
            | WorkerMessage::ClearSession { trace_context }
            | WorkerMessage::SaveQrImage { trace_context, .. } => trace_context,
        }
        .as_ref()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the appropriate response.
    ///
    /// This is the main message handling entry point, dispatching to specific
    /// handlers based on the message variant. Automatically attaches trace
    /// context and creates a tracing span for the operation.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span =
            tracing::debug_span!("worker_handle_message", message_type = message_name(&message));
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadSession { .. } => self.handle_load_session(),

            WorkerMessage::StoreSession { session, .. } => self.handle_store_session(&session),

            WorkerMessage::ClearSession { .. } => self.handle_clear_session(),

            WorkerMessage::SaveQrImage {
                file_name, bytes, ..
            } => self.handle_save_qr_image(&file_name, &bytes),
        }
    }
}

/// Short message name for span fields, without payload bytes.
fn message_name(message: &WorkerMessage) -> &'static str {
    match message {
        WorkerMessage::LoadSession { .. } => "LoadSession",
        WorkerMessage::StoreSession { .. } => "StoreSession",
        WorkerMessage::ClearSession { .. } => "ClearSession",
        WorkerMessage::SaveQrImage { .. } => "SaveQrImage",
    }
}

/// Initializes tracing for the worker thread.
///
/// Sets up the same tracing configuration as the main thread, ensuring logs
/// from both threads are written to the same file.
fn init_worker_tracing() {
    use crate::observability;
    use crate::Config;

    let config = Config::default();
    observability::init_tracing(&config);
}

/// Tracks whether worker tracing has been initialized.
///
/// Used to ensure tracing is only set up once per worker thread lifetime.
static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for LinkdeckWorker {
    /// Handles incoming messages from the main plugin thread.
    ///
    /// This is the Zellij worker interface entry point. It:
    /// 1. Initializes tracing on first message (once per worker lifetime)
    /// 2. Lazy-initializes the cache backend if needed
    /// 3. Deserializes the message payload
    /// 4. Processes the message via `handle_message`
    /// 5. Serializes and sends the response back to the main thread
    ///
    /// # Arguments
    ///
    /// * `message` - Message name used for routing the response
    /// * `payload` - JSON-serialized `WorkerMessage`
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.load(std::sync::atomic::Ordering::Relaxed) {
            init_worker_tracing();
            WORKER_TRACING_INITIALIZED.store(true, std::sync::atomic::Ordering::Relaxed);
        }

        if self.storage.is_none() {
            match Self::new() {
                Ok(worker) => {
                    self.storage = worker.storage;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "failed to initialize cache");
                    let error_response = WorkerResponse::Error {
                        message: format!("Failed to initialize cache: {e}"),
                    };
                    if let Ok(payload) = serde_json::to_string(&error_response) {
                        post_message_to_plugin(PluginMessage {
                            name: message,
                            payload,
                            worker_name: None,
                        });
                    }
                    return;
                }
            }
        }

        let worker_message: WorkerMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.handle_message(worker_message);

        match serde_json::to_string(&response) {
            Ok(payload) => {
                let plugin_message = PluginMessage {
                    name: message,
                    payload,
                    worker_name: None,
                };
                post_message_to_plugin(plugin_message);
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker response");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker_in(dir: &tempfile::TempDir) -> LinkdeckWorker {
        let cache =
            JsonCache::new(dir.path().join("session.json"), dir.path().join("qr")).unwrap();
        LinkdeckWorker::with_storage(Box::new(cache))
    }

    fn stored_session() -> StoredSession {
        StoredSession {
            access_token: "tok".to_string(),
            user_id: "u1".to_string(),
            email: "user@example.com".to_string(),
            expires_at: None,
            stored_at: 0,
        }
    }

    #[test]
    fn load_on_empty_cache_reports_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker_in(&dir);

        let response = worker.handle_message(WorkerMessage::load_session());
        assert_eq!(response, WorkerResponse::SessionLoaded { session: None });
    }

    #[test]
    fn store_then_load_then_clear_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker_in(&dir);

        let response = worker.handle_message(WorkerMessage::store_session(stored_session()));
        assert_eq!(response, WorkerResponse::SessionStored);

        let response = worker.handle_message(WorkerMessage::load_session());
        assert_eq!(
            response,
            WorkerResponse::SessionLoaded {
                session: Some(stored_session())
            }
        );

        let response = worker.handle_message(WorkerMessage::clear_session());
        assert_eq!(response, WorkerResponse::SessionCleared);

        let response = worker.handle_message(WorkerMessage::load_session());
        assert_eq!(response, WorkerResponse::SessionLoaded { session: None });
    }

    #[test]
    fn expired_session_is_not_handed_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker_in(&dir);

        let mut session = stored_session();
        session.expires_at = Some(1);
        worker.handle_message(WorkerMessage::store_session(session));

        let response = worker.handle_message(WorkerMessage::load_session());
        assert_eq!(response, WorkerResponse::SessionLoaded { session: None });
    }

    #[test]
    fn qr_image_save_reports_the_written_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker_in(&dir);

        let response = worker.handle_message(WorkerMessage::save_qr_image(
            "docs.png".to_string(),
            vec![0x89, b'P'],
        ));

        match response {
            WorkerResponse::QrImageSaved { path } => {
                assert!(path.ends_with("qr/docs.png"));
                assert_eq!(std::fs::read(path).unwrap(), vec![0x89, b'P']);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn bad_image_names_surface_as_worker_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker_in(&dir);

        let response = worker
            .handle_message(WorkerMessage::save_qr_image("../up.png".to_string(), vec![1]));
        assert!(matches!(response, WorkerResponse::Error { .. }));
    }
}

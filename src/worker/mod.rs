//! Background worker thread for cache I/O.
//!
//! This module implements the worker thread that touches the filesystem (the
//! session cache and downloaded QR images) so the main plugin thread never
//! blocks on disk. It uses Zellij's worker API for cross-thread communication
//! and includes distributed tracing support for observability.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::LinkdeckWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};

//! Actions representing side effects to be executed by the plugin runtime.
//!
//! This module defines the [`Action`] type, which represents imperative commands
//! produced by the event handler after processing user input or system events.
//! Actions bridge pure state transformations and effectful operations like
//! dispatching HTTP requests or communicating with the background worker.
//!
//! # Architecture
//!
//! The event handler returns a `Vec<Action>` after processing each event, allowing
//! multiple side effects to be queued atomically. The plugin runtime executes
//! these actions in sequence via the action processor.

use crate::api::ApiCall;
use crate::domain::Session;
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the plugin runtime.
///
/// Actions are produced by the event handler and executed by the action processor.
/// They represent the boundary between pure state transformations and effectful
/// operations like network requests and worker communication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Closes the focused floating pane, hiding the plugin UI.
    ///
    /// Sent when the user explicitly requests to exit the plugin (e.g., pressing 'q').
    CloseFocus,

    /// Posts a message to the background worker thread.
    ///
    /// Enables filesystem operations like session caching and QR image writes
    /// without blocking the main event loop.
    PostToWorker(WorkerMessage),

    /// Dispatches an API request over the host's HTTP bridge.
    ///
    /// Carries the session snapshot taken when the request was issued so the
    /// call stays authenticated even if the in-memory session changes before
    /// the runtime executes the action (logout tears the session down first).
    CallApi {
        /// The operation to perform.
        call: ApiCall,
        /// Request generation stamped into the call's context for matching
        /// the response against the issuing state.
        generation: u64,
        /// Session active when the request was issued, if any.
        session: Option<Session>,
    },
}

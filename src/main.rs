//! Zellij plugin wrapper and entry point.
//!
//! This module provides the thin integration layer between the Linkdeck library
//! and the Zellij plugin system. It implements the `ZellijPlugin` and
//! `ZellijWorker` traits to handle Zellij events and lifecycle.
//!
//! # Architecture
//!
//! The plugin uses Zellij's worker thread support for background processing:
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │  LinkdeckWorker  │   │  ← Background processing
//! │  │ (worker thread)  │   │  ← Session cache, QR files
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! Backend calls never block either thread: they go through Zellij's
//! non-blocking `web_request` shim and come back as `WebRequestResult`
//! events carrying the request's context map.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for Key, `CustomMessage`, `WebRequestResult` events
//! 3. **Session Restore**: Once permissions land, ask the worker for the cached session
//! 4. **Update**: Handle events, delegate to library layer
//! 5. **Render**: Call library render function
//!
//! # Worker Communication
//!
//! Messages between plugin and worker use JSON serialization:
//!
//! - Plugin → Worker: [`WorkerMessage`] (`LoadSession`, `SaveQrImage`, etc.)
//! - Worker → Plugin: [`WorkerResponse`] (`SessionLoaded`, error details)
//!
//! # Event Mapping
//!
//! Zellij events are translated to library events:
//!
//! - `Key(Down)` → `Event::KeyDown`
//! - `Key(Enter)` → `Event::Enter` (submit form, or accept the filter)
//! - `Key(Esc)` → `Event::Escape` (dismiss dialog/filter/banner)
//! - `WebRequestResult` → `Event::ApiOutcome` via the response decoder
//! - `CustomMessage` → `Event::WorkerResponse`
//!
//! # Keybindings
//!
//! Global (all modes):
//! - `Ctrl+n`: Move down
//! - `Ctrl+p`: Move up
//!
//! In normal mode (dashboard):
//! - `j`/`Down`: Move down
//! - `k`/`Up`: Move up
//! - `/`: Filter links by title
//! - `n`: New short link
//! - `d`: Delete selected link
//! - `g`: Download QR image for selected link
//! - `r`: Refresh the link list
//! - `L` (shift): Sign out
//! - `q`: Close plugin
//! - `Esc`: Dismiss status banner
//!
//! In filter mode:
//! - `j`/`k`/etc.: Type characters
//! - `Up`/`Down`: Move selection
//! - `Enter`: Keep the filter, return keys to navigation
//! - `Esc`: Clear the filter
//!
//! In the create dialog and on the login screen:
//! - `Tab`/`Shift+Tab`: Move between fields
//! - `Enter`: Submit
//! - `Esc`: Cancel (dialog) / close plugin (login)

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use linkdeck::api::{decode, ApiClient};
use linkdeck::worker::{LinkdeckWorker, WorkerMessage, WorkerResponse};
use linkdeck::{handle_event, Action, Config, Event, InputMode, Screen};

// Register plugin and worker with Zellij
register_plugin!(State);
register_worker!(LinkdeckWorker, linkdeck_worker, LINKDECK_WORKER);

/// Permissions requested on load.
///
/// `WebAccess` covers every backend call; `FullHdAccess` lets the worker keep
/// the session cache and QR images under the host's data directory.
const REQUESTED_PERMISSIONS: [PermissionType; 2] =
    [PermissionType::WebAccess, PermissionType::FullHdAccess];

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with Zellij-specific concerns like worker
/// communication and the backend client.
struct State {
    /// Core application state from library layer.
    app: linkdeck::app::AppState,

    /// Backend request builder and dispatcher.
    client: ApiClient,

    /// Worker thread identifier for IPC messaging.
    worker_name: String,
}

impl Default for State {
    fn default() -> Self {
        let default_config = Config::default();
        Self {
            app: linkdeck::initialize(&default_config),
            client: ApiClient::new(&default_config.api_base_url),
            worker_name: "linkdeck".to_string(),
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// Called once during plugin startup. Parses configuration, initializes
    /// application state, requests permissions, and subscribes to events. The
    /// cached session lookup waits until the permission result arrives.
    ///
    /// # Tracing
    ///
    /// The entire load process is instrumented with OpenTelemetry spans.
    ///
    /// # Permissions
    ///
    /// Requests:
    /// - `WebAccess`: Call the shortener backend over HTTP
    /// - `FullHdAccess`: Persist the session cache and QR images
    ///
    /// # Subscriptions
    ///
    /// - `Key`: Keyboard input
    /// - `CustomMessage`: Worker responses
    /// - `WebRequestResult`: Backend responses
    /// - `PermissionRequestResult`: Permission grant, used as the boot signal
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        linkdeck::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!("plugin loading started");
        tracing::debug!(api_base_url = %config.api_base_url, "parsed configuration");
        self.app = linkdeck::initialize(&config);
        self.client = ApiClient::new(&config.api_base_url);
        tracing::debug!("app state initialized");

        tracing::debug!("requesting permissions");
        request_permission(&REQUESTED_PERMISSIONS);

        tracing::debug!("subscribing to events");
        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Translates Zellij events to library events, delegates to `handle_event`,
    /// and executes resulting actions. Returns `true` if the UI should re-render.
    ///
    /// # Tracing
    ///
    /// Each event is traced with its type for observability.
    ///
    /// # Parameters
    ///
    /// * `event` - Zellij event to process
    ///
    /// # Returns
    ///
    /// - `true` if the plugin UI should re-render
    /// - `false` if the event was ignored or resulted in no state changes
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let span = tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name);
        let _guard = span.entered();

        tracing::debug!(event = %event_name, "processing event");

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match decode(status, &body, &context) {
                    Some(outcome) => Event::ApiOutcome(outcome),
                    None => {
                        tracing::debug!(status = status, "web request result without our context");
                        return false;
                    }
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                Self::map_permission_result(status)
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for a in actions {
                    self.execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Renders the plugin UI.
    ///
    /// Delegates to the library's rendering layer.
    ///
    /// # Parameters
    ///
    /// * `rows` - Terminal height in rows
    /// * `cols` - Terminal width in columns
    fn render(&mut self, rows: usize, cols: usize) {
        linkdeck::ui::render(&self.app, rows, cols);
    }
}

impl State {
    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    ///
    /// Whether a plain character is a command or typed text depends on where
    /// the user is: on the login screen and in filter or dialog mode every
    /// character goes into the focused input, while dashboard navigation gets
    /// the single-letter commands.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyUp);
        }
        if key.bare_key == BareKey::Tab && key.has_modifiers(&[KeyModifier::Shift]) {
            return Some(Event::BackTab);
        }

        let typing =
            self.app.screen == Screen::Login || self.app.input_mode != InputMode::Normal;

        Some(match key.bare_key {
            BareKey::Down => Event::KeyDown,
            BareKey::Up => Event::KeyUp,
            BareKey::Tab => Event::Tab,
            BareKey::Enter => Event::Enter,
            BareKey::Esc => Event::Escape,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) if typing => Event::Char(c),
            BareKey::Char('j') => Event::KeyDown,
            BareKey::Char('k') => Event::KeyUp,
            BareKey::Char('/') => Event::StartFilter,
            BareKey::Char('n') => Event::OpenCreateDialog,
            BareKey::Char('d') => Event::DeleteSelected,
            BareKey::Char('g') => Event::DownloadQr,
            BareKey::Char('r') => Event::RefreshLinks,
            BareKey::Char('L') => Event::Logout,
            BareKey::Char('q') => Event::CloseFocus,
            _ => return None,
        })
    }

    /// Maps the permission result to an application event.
    ///
    /// Zellij grants or denies the requested set as a whole, so a grant is
    /// reported as the full requested list.
    fn map_permission_result(status: PermissionStatus) -> Event {
        match status {
            PermissionStatus::Granted => {
                tracing::debug!("permissions granted");
                Event::PermissionsResult {
                    granted: REQUESTED_PERMISSIONS.to_vec(),
                }
            }
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - plugin functionality limited");
                Event::PermissionsResult {
                    granted: Vec::new(),
                }
            }
        }
    }

    /// Maps custom message events to application events.
    fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message == self.worker_name {
            match serde_json::from_str::<WorkerResponse>(payload) {
                Ok(response) => {
                    tracing::debug!(response = ?response, "worker response received");
                    Some(Event::WorkerResponse(response))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "failed to deserialize worker response");
                    None
                }
            }
        } else {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            None
        }
    }

    /// Posts a message to the worker thread.
    ///
    /// Serializes the message as JSON and sends via Zellij's IPC system.
    ///
    /// # Parameters
    ///
    /// * `message` - Worker message to send
    ///
    /// # Errors
    ///
    /// Logs serialization errors but does not propagate them.
    fn post_worker_message(&self, message: &WorkerMessage) {
        match serde_json::to_string(&message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(self.worker_name.clone()),
                    name: self.worker_name.clone(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Executes an action returned from event handling.
    ///
    /// Translates library actions to Zellij API calls.
    ///
    /// # Actions
    ///
    /// - `CloseFocus`: Close plugin pane
    /// - `CallApi`: Dispatch a backend request through `web_request`
    /// - `PostToWorker`: Send IPC message to worker thread
    ///
    /// # Parameters
    ///
    /// * `action` - Action to execute
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::CallApi {
                ref call,
                generation,
                ref session,
            } => {
                self.client.dispatch(call, session.as_ref(), *generation);
            }
            Action::PostToWorker(ref message) => {
                tracing::debug!(message = ?message, "posting message to worker");
                self.post_worker_message(message);
            }
        }
    }
}

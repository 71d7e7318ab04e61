//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! API responses, and worker responses, translating them into state changes
//! and action sequences. It serves as the primary control flow coordinator
//! for the application.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the plugin runtime or worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! Events fall into several categories:
//! - **Navigation**: `KeyDown`, `KeyUp`, `Tab`, `BackTab`
//! - **Input**: `Char`, `Backspace`, `Enter`, `Escape`
//! - **Commands**: `OpenCreateDialog`, `StartFilter`, `DeleteSelected`,
//!   `DownloadQr`, `RefreshLinks`, `Logout`
//! - **System**: `PermissionsResult`, `ApiOutcome` with settled request results
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Stale Responses
//!
//! Every API response carries the request generation it was issued under.
//! Settling is delegated to the matching [`RemoteData`](crate::domain::RemoteData)
//! wrapper; when the wrapper reports the response as superseded, the handler
//! returns without touching any other state, so only the latest issued request
//! ever lands.
//!
//! # Example
//!
//! ```rust
//! use linkdeck::app::handler::{handle_event, Event};
//! use linkdeck::app::AppState;
//! use linkdeck::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default(), "tinyurlx.in".to_string());
//! let (redraw, actions) = handle_event(&mut state, &Event::KeyDown)?;
//! assert!(actions.is_empty());
//! # Ok::<(), linkdeck::domain::LinkdeckError>(())
//! ```

use crate::api::{ApiCall, ApiOutcome};
use crate::app::modes::{InputMode, Screen};
use crate::app::state::StatusLine;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::Link;
use crate::storage::StoredSession;
use crate::worker::{WorkerMessage, WorkerResponse};
use zellij_tile::prelude::PermissionType;

/// Events triggered by user input, API responses, or worker responses.
///
/// Each event represents a discrete occurrence that may cause state changes
/// and action emissions. The event handler processes these sequentially,
/// ensuring deterministic state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Appends a character to the focused form field or the filter query.
    Char(char),
    /// Removes the last character from the focused field or the filter query.
    Backspace,
    /// Submits the focused form, or accepts the filter.
    Enter,
    /// Dismisses the current focus: dialog, filter, status banner, or plugin.
    Escape,
    /// Moves form focus to the next field.
    Tab,
    /// Moves form focus to the previous field.
    BackTab,
    /// Moves selection cursor down by one position (wraps to top).
    KeyDown,
    /// Moves selection cursor up by one position (wraps to bottom).
    KeyUp,
    /// Closes the floating pane and hides the plugin UI.
    CloseFocus,

    /// Opens the create-link dialog.
    OpenCreateDialog,
    /// Enters filter mode with an empty query.
    StartFilter,
    /// Requests deletion of the selected link.
    DeleteSelected,
    /// Downloads the QR image of the selected link.
    DownloadQr,
    /// Refetches the link list.
    RefreshLinks,
    /// Signs out: clears local state and notifies the backend.
    Logout,

    /// Reports granted Zellij permissions after the permission request.
    ///
    /// Used as the boot signal: once permissions are in, the cached session
    /// lookup is posted to the worker.
    PermissionsResult {
        /// Permissions granted by the user.
        granted: Vec<PermissionType>,
    },

    /// Wraps a decoded API response.
    ///
    /// Each outcome carries the generation of the request that produced it,
    /// which the handler settles against the matching request wrapper.
    ApiOutcome(ApiOutcome),

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// This is the primary event handler that coordinates all state transitions and
/// side effects. It pattern-matches on event types, calls state mutation methods,
/// and collects actions to be executed by the plugin runtime.
///
/// # Parameters
///
/// * `state` - Mutable reference to application state
/// * `event` - Event to process
///
/// # Returns
///
/// A tuple of (whether the UI should re-render, actions to execute in
/// sequence). The action list may be empty if the event requires no side
/// effects.
///
/// # Errors
///
/// Returns errors from state mutation methods. Input routing itself is
/// infallible; the `Result` keeps the signature uniform with fallible flows.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event type for debugging.
#[allow(clippy::cognitive_complexity, clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Char(c) => match (state.screen, state.input_mode) {
            (Screen::Login, _) => {
                state.login_form.input_char(*c);
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Filter) => {
                state.filter_query.push(*c);
                tracing::trace!(query = %state.filter_query, "filter query updated");
                state.apply_filter();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Dialog) => {
                state.create_form.input_char(*c);
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Normal) => Ok((false, vec![])),
        },
        Event::Backspace => match (state.screen, state.input_mode) {
            (Screen::Login, _) => {
                state.login_form.backspace();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Filter) => {
                state.filter_query.pop();
                state.apply_filter();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Dialog) => {
                state.create_form.backspace();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Normal) => Ok((false, vec![])),
        },
        Event::Tab => match (state.screen, state.input_mode) {
            (Screen::Login, _) => {
                state.login_form.focus_next();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Dialog) => {
                state.create_form.focus_next();
                Ok((true, vec![]))
            }
            _ => Ok((false, vec![])),
        },
        Event::BackTab => match (state.screen, state.input_mode) {
            (Screen::Login, _) => {
                state.login_form.focus_prev();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Dialog) => {
                state.create_form.focus_prev();
                Ok((true, vec![]))
            }
            _ => Ok((false, vec![])),
        },
        Event::KeyDown => match (state.screen, state.input_mode) {
            (Screen::Login, _) => {
                state.login_form.focus_next();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Dialog) => {
                state.create_form.focus_next();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, _) => {
                state.move_selection_down();
                Ok((true, vec![]))
            }
        },
        Event::KeyUp => match (state.screen, state.input_mode) {
            (Screen::Login, _) => {
                state.login_form.focus_prev();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Dialog) => {
                state.create_form.focus_prev();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, _) => {
                state.move_selection_up();
                Ok((true, vec![]))
            }
        },
        Event::Enter => match (state.screen, state.input_mode) {
            (Screen::Login, _) => submit_login(state),
            (Screen::Dashboard, InputMode::Filter) => {
                // Keep the query active, return keys to navigation.
                state.input_mode = InputMode::Normal;
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Dialog) => submit_create(state),
            (Screen::Dashboard, InputMode::Normal) => Ok((false, vec![])),
        },
        Event::Escape => match (state.screen, state.input_mode) {
            (Screen::Login, _) => Ok((false, vec![Action::CloseFocus])),
            (Screen::Dashboard, InputMode::Filter) => {
                state.input_mode = InputMode::Normal;
                state.filter_query.clear();
                state.apply_filter();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Dialog) => {
                tracing::debug!("create dialog dismissed");
                state.input_mode = InputMode::Normal;
                state.create_form.reset();
                state.create_request.reset();
                Ok((true, vec![]))
            }
            (Screen::Dashboard, InputMode::Normal) => {
                if state.status.is_some() {
                    state.status = None;
                    Ok((true, vec![]))
                } else {
                    Ok((false, vec![]))
                }
            }
        },
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::OpenCreateDialog => {
            if state.screen != Screen::Dashboard || state.input_mode != InputMode::Normal {
                return Ok((false, vec![]));
            }
            tracing::debug!("opening create dialog");
            state.input_mode = InputMode::Dialog;
            state.create_form.reset();
            state.create_request.reset();
            Ok((true, vec![]))
        }
        Event::StartFilter => {
            if state.screen != Screen::Dashboard || state.input_mode != InputMode::Normal {
                return Ok((false, vec![]));
            }
            tracing::debug!("entering filter mode");
            state.input_mode = InputMode::Filter;
            state.filter_query.clear();
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::DeleteSelected => {
            if state.screen != Screen::Dashboard || state.input_mode != InputMode::Normal {
                return Ok((false, vec![]));
            }
            if state.pending_delete.is_some() {
                tracing::debug!("delete already in flight");
                return Ok((false, vec![]));
            }
            let Some(link) = state.selected_link() else {
                tracing::debug!("no link selected to delete");
                return Ok((false, vec![]));
            };
            let link_id = link.id.clone();
            let Some(session) = state.session.clone() else {
                return Ok((false, vec![]));
            };

            tracing::debug!(link_id = %link_id, "deleting link");
            let generation = state.delete_request.begin();
            state.pending_delete = Some(link_id.clone());
            state.status = None;
            Ok((
                true,
                vec![Action::CallApi {
                    call: ApiCall::DeleteLink { id: link_id },
                    generation,
                    session: Some(session),
                }],
            ))
        }
        Event::DownloadQr => {
            if state.screen != Screen::Dashboard || state.input_mode != InputMode::Normal {
                return Ok((false, vec![]));
            }
            let Some(link) = state.selected_link() else {
                tracing::debug!("no link selected for QR download");
                return Ok((false, vec![]));
            };
            let link_id = link.id.clone();
            let qr_url = link.qr.clone();

            let Some(url) = qr_url else {
                state.status = Some(StatusLine::info("No QR image for this link"));
                return Ok((true, vec![]));
            };
            let Some(session) = state.session.clone() else {
                return Ok((false, vec![]));
            };

            tracing::debug!(link_id = %link_id, "downloading QR image");
            let generation = state.qr_request.begin();
            state.status = None;
            Ok((
                true,
                vec![Action::CallApi {
                    call: ApiCall::DownloadQr { link_id, url },
                    generation,
                    session: Some(session),
                }],
            ))
        }
        Event::RefreshLinks => {
            if state.screen != Screen::Dashboard || state.input_mode != InputMode::Normal {
                return Ok((false, vec![]));
            }
            state.status = None;
            let actions = begin_links_fetch(state).into_iter().collect();
            Ok((true, actions))
        }
        Event::Logout => {
            if state.screen != Screen::Dashboard || state.input_mode != InputMode::Normal {
                return Ok((false, vec![]));
            }
            let Some(session) = state.session.take() else {
                return Ok((false, vec![]));
            };

            tracing::debug!(user = %session.user.email, "signing out");

            // Notify the backend with the departing session, then tear local
            // state down without waiting for the reply. The reset below means
            // the sign-out response settles against a fresh wrapper and is
            // discarded on arrival.
            let generation = state.logout_request.begin();
            let actions = vec![
                Action::CallApi {
                    call: ApiCall::Logout,
                    generation,
                    session: Some(session),
                },
                Action::PostToWorker(WorkerMessage::clear_session()),
            ];
            state.reset_for_logout();
            Ok((true, actions))
        }
        Event::PermissionsResult { granted } => {
            let has_web_access = granted.contains(&PermissionType::WebAccess);
            tracing::debug!(
                granted_count = granted.len(),
                web_access = has_web_access,
                "permissions granted"
            );

            if has_web_access && state.session.is_none() {
                Ok((false, vec![Action::PostToWorker(WorkerMessage::load_session())]))
            } else {
                Ok((false, vec![]))
            }
        }
        Event::ApiOutcome(outcome) => handle_api_outcome(state, outcome),
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

/// Validates the login form and issues the sign-in request.
///
/// Validation failures re-render with per-field messages and no side effects.
/// Repeated submissions while a sign-in is already in flight are ignored.
fn submit_login(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    if state.login_request.is_loading() {
        tracing::debug!("sign-in already in flight");
        return Ok((false, vec![]));
    }

    let Some(credentials) = state.login_form.validate() else {
        tracing::debug!(
            error_count = state.login_form.errors.len(),
            "login form invalid"
        );
        return Ok((true, vec![]));
    };

    let generation = state.login_request.begin();
    Ok((
        true,
        vec![Action::CallApi {
            call: ApiCall::Login {
                email: credentials.email,
                password: credentials.password,
            },
            generation,
            session: None,
        }],
    ))
}

/// Validates the create-link dialog and issues the create request.
///
/// The dialog stays open until the backend accepts the link, so rejections
/// (e.g. an alias already in use) are shown in place.
fn submit_create(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    if state.create_request.is_loading() {
        tracing::debug!("create already in flight");
        return Ok((false, vec![]));
    }
    let Some(session) = state.session.clone() else {
        tracing::debug!("no session for create");
        return Ok((false, vec![]));
    };

    let Some(new_link) = state.create_form.validate() else {
        tracing::debug!(
            error_count = state.create_form.errors.len(),
            "create form invalid"
        );
        return Ok((true, vec![]));
    };

    let generation = state.create_request.begin();
    Ok((
        true,
        vec![Action::CallApi {
            call: ApiCall::CreateLink {
                title: new_link.title,
                original_url: new_link.original_url,
                custom_url: new_link.custom_url,
                user_id: session.user.id.clone(),
            },
            generation,
            session: Some(session),
        }],
    ))
}

/// Starts a link list fetch for the signed-in user.
///
/// Returns `None` when no session is present. An already-running fetch is
/// superseded: the new generation wins and the older response is discarded
/// when it settles.
fn begin_links_fetch(state: &mut AppState) -> Option<Action> {
    let session = state.session.clone()?;
    let generation = state.links_request.begin();
    Some(Action::CallApi {
        call: ApiCall::FetchLinks {
            user_id: session.user.id.clone(),
        },
        generation,
        session: Some(session),
    })
}

/// Settles a decoded API response against the matching request wrapper and
/// applies its effects.
///
/// Every arm settles first; when the wrapper reports the response as stale
/// (superseded or arriving after a reset) the handler returns immediately and
/// no other state is touched.
#[allow(clippy::too_many_lines)]
fn handle_api_outcome(state: &mut AppState, outcome: &ApiOutcome) -> Result<(bool, Vec<Action>)> {
    match outcome {
        ApiOutcome::SessionOpened { generation, result } => {
            if !state.login_request.settle(*generation, result.clone()) {
                return Ok((false, vec![]));
            }
            match result {
                Ok(session) => {
                    tracing::debug!(user = %session.user.email, "signed in");
                    state.session = Some(session.clone());
                    state.login_form.reset();
                    state.screen = Screen::Dashboard;
                    state.input_mode = InputMode::Normal;

                    let stored =
                        StoredSession::from_session(session, chrono::Utc::now().timestamp());
                    let mut actions =
                        vec![Action::PostToWorker(WorkerMessage::store_session(stored))];
                    actions.extend(begin_links_fetch(state));
                    Ok((true, actions))
                }
                Err(error) => {
                    tracing::debug!(status = error.status, "sign-in rejected");
                    Ok((true, vec![]))
                }
            }
        }
        ApiOutcome::SessionClosed { generation, result } => {
            // Logout tears local state down before the backend replies, so
            // this normally settles against a reset wrapper and is dropped.
            if !state.logout_request.settle(*generation, result.clone()) {
                return Ok((false, vec![]));
            }
            if let Err(error) = result {
                tracing::debug!(status = error.status, "sign-out rejected by backend");
            }
            Ok((false, vec![]))
        }
        ApiOutcome::LinksFetched { generation, result } => {
            if !state.links_request.settle(*generation, result.clone()) {
                return Ok((false, vec![]));
            }
            match result {
                Ok(links) => {
                    tracing::debug!(link_count = links.len(), "links fetched");
                    state.replace_links(links.clone());
                    if let Some(id) = state.last_created.take() {
                        state.select_link(&id);
                    }

                    let mut actions = vec![];
                    if state.links.is_empty() {
                        state.click_counts.clear();
                        state.total_clicks = 0;
                    } else if let Some(session) = state.session.clone() {
                        let link_ids: Vec<String> =
                            state.links.iter().map(|link| link.id.clone()).collect();
                        let generation = state.clicks_request.begin();
                        actions.push(Action::CallApi {
                            call: ApiCall::FetchClicks { link_ids },
                            generation,
                            session: Some(session),
                        });
                    }
                    Ok((true, actions))
                }
                Err(error) => {
                    // Displayed links stay as they were.
                    state.status = Some(StatusLine::error(format!(
                        "Couldn't load links: {}",
                        error.message
                    )));
                    Ok((true, vec![]))
                }
            }
        }
        ApiOutcome::ClicksFetched { generation, result } => {
            if !state.clicks_request.settle(*generation, result.clone()) {
                return Ok((false, vec![]));
            }
            match result {
                Ok(records) => {
                    tracing::debug!(click_count = records.len(), "clicks fetched");
                    state.rebuild_click_stats(records);
                }
                Err(error) => {
                    // Stale counts are better than an error wall; keep them.
                    tracing::debug!(status = error.status, "click fetch failed");
                }
            }
            Ok((true, vec![]))
        }
        ApiOutcome::LinkCreated { generation, result } => {
            if !state.create_request.settle(*generation, result.clone()) {
                return Ok((false, vec![]));
            }
            match result {
                Ok(link) => {
                    tracing::debug!(link_id = %link.id, "link created");
                    state.last_created = Some(link.id.clone());
                    state.input_mode = InputMode::Normal;
                    state.create_form.reset();
                    state.create_request.reset();
                    state.status = Some(StatusLine::info(format!(
                        "Short link created: {}",
                        link.short_address(&state.short_domain)
                    )));

                    let actions = begin_links_fetch(state).into_iter().collect();
                    Ok((true, actions))
                }
                Err(error) => {
                    tracing::debug!(status = error.status, "create rejected");
                    // Dialog stays open; the wrapper error renders in place.
                    Ok((true, vec![]))
                }
            }
        }
        ApiOutcome::LinkDeleted {
            generation,
            link_id,
            result,
        } => {
            if !state.delete_request.settle(*generation, result.clone()) {
                return Ok((false, vec![]));
            }
            state.pending_delete = None;
            match result {
                Ok(()) => {
                    tracing::debug!(link_id = %link_id, "link deleted");
                    state.status = Some(StatusLine::info("Link deleted"));
                    let actions = begin_links_fetch(state).into_iter().collect();
                    Ok((true, actions))
                }
                Err(error) => {
                    state.status = Some(StatusLine::error(format!(
                        "Delete failed: {}",
                        error.message
                    )));
                    Ok((true, vec![]))
                }
            }
        }
        ApiOutcome::QrDownloaded {
            generation,
            link_id,
            result,
        } => {
            if !state.qr_request.settle(*generation, result.clone()) {
                return Ok((false, vec![]));
            }
            match result {
                Ok(bytes) => {
                    let file_name = state
                        .links
                        .iter()
                        .find(|link| &link.id == link_id)
                        .map_or_else(|| format!("{link_id}.png"), Link::qr_file_name);

                    tracing::debug!(
                        link_id = %link_id,
                        file_name = %file_name,
                        byte_count = bytes.len(),
                        "QR image downloaded"
                    );
                    state.qr_request.reset();
                    Ok((
                        true,
                        vec![Action::PostToWorker(WorkerMessage::save_qr_image(
                            file_name,
                            bytes.clone(),
                        ))],
                    ))
                }
                Err(error) => {
                    state.status = Some(StatusLine::error(format!(
                        "QR download failed: {}",
                        error.message
                    )));
                    Ok((true, vec![]))
                }
            }
        }
    }
}

/// Applies a worker response to application state.
fn handle_worker_response(
    state: &mut AppState,
    response: &WorkerResponse,
) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::SessionLoaded { session } => match session {
            Some(stored) => {
                if state.session.is_some() {
                    tracing::debug!("already signed in, ignoring cached session");
                    return Ok((false, vec![]));
                }
                tracing::debug!(user = %stored.email, "cached session restored");
                state.session = Some(stored.clone().into_session());
                state.screen = Screen::Dashboard;
                state.input_mode = InputMode::Normal;

                let actions = begin_links_fetch(state).into_iter().collect();
                Ok((true, actions))
            }
            None => {
                tracing::debug!("no cached session, staying on login screen");
                Ok((false, vec![]))
            }
        },
        WorkerResponse::SessionStored => {
            tracing::debug!("session cached");
            Ok((false, vec![]))
        }
        WorkerResponse::SessionCleared => {
            tracing::debug!("session cache cleared");
            Ok((false, vec![]))
        }
        WorkerResponse::QrImageSaved { path } => {
            let display_path = crate::infrastructure::strip_host_prefix(path);
            state.status = Some(StatusLine::info(format!("QR image saved to {display_path}")));
            Ok((true, vec![]))
        }
        WorkerResponse::Error { message } => {
            tracing::error!("Worker error: {}", message);
            state.status = Some(StatusLine::error(format!("Storage error: {message}")));
            Ok((true, vec![]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::StatusKind;
    use crate::domain::{ApiError, ClickRecord, Session, User};
    use crate::ui::theme::Theme;

    fn make_link(id: &str, title: &str) -> Link {
        Link {
            id: id.to_string(),
            title: title.to_string(),
            original_url: format!("https://example.com/{id}"),
            short_url: format!("s-{id}"),
            custom_url: None,
            qr: None,
            user_id: "u1".to_string(),
            created_at: "2024-01-15T10:30:00Z".to_string(),
        }
    }

    fn make_session() -> Session {
        Session {
            access_token: "tok".to_string(),
            user: User {
                id: "u1".to_string(),
                email: "user@example.com".to_string(),
            },
            expires_at: None,
        }
    }

    fn login_state() -> AppState {
        AppState::new(Theme::default(), "tinyurlx.in".to_string())
    }

    fn dashboard_state() -> AppState {
        let mut state = login_state();
        state.screen = Screen::Dashboard;
        state.session = Some(make_session());
        state
    }

    fn dashboard_with_links(links: Vec<Link>) -> AppState {
        let mut state = dashboard_state();
        state.replace_links(links);
        state
    }

    #[test]
    fn test_invalid_login_form_does_not_call_api() {
        let mut state = login_state();

        let (redraw, actions) = handle_event(&mut state, &Event::Enter).unwrap();

        assert!(redraw);
        assert!(actions.is_empty());
        assert!(!state.login_request.is_loading());
        assert_eq!(state.login_form.errors.len(), 2);
    }

    #[test]
    fn test_valid_login_form_issues_sign_in() {
        let mut state = login_state();
        state.login_form.email = "user@example.com".to_string();
        state.login_form.password = "hunter22".to_string();

        let (_, actions) = handle_event(&mut state, &Event::Enter).unwrap();

        assert_eq!(
            actions,
            vec![Action::CallApi {
                call: ApiCall::Login {
                    email: "user@example.com".to_string(),
                    password: "hunter22".to_string(),
                },
                generation: 1,
                session: None,
            }]
        );
        assert!(state.login_request.is_loading());

        // A second Enter while in flight is ignored.
        let (_, actions) = handle_event(&mut state, &Event::Enter).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_sign_in_success_opens_dashboard_and_chains_fetch() {
        let mut state = login_state();
        state.login_form.email = "user@example.com".to_string();
        state.login_form.password = "hunter22".to_string();
        handle_event(&mut state, &Event::Enter).unwrap();

        let outcome = ApiOutcome::SessionOpened {
            generation: 1,
            result: Ok(make_session()),
        };
        let (redraw, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();

        assert!(redraw);
        assert_eq!(state.screen, Screen::Dashboard);
        assert!(state.session.is_some());
        assert!(state.login_form.email.is_empty());

        assert_eq!(actions.len(), 2);
        assert!(matches!(
            &actions[0],
            Action::PostToWorker(WorkerMessage::StoreSession { session, .. })
                if session.email == "user@example.com"
        ));
        assert!(matches!(
            &actions[1],
            Action::CallApi {
                call: ApiCall::FetchLinks { user_id },
                generation: 1,
                ..
            } if user_id == "u1"
        ));
        assert!(state.links_request.is_loading());
    }

    #[test]
    fn test_sign_in_rejection_stays_on_login_screen() {
        let mut state = login_state();
        state.login_form.email = "user@example.com".to_string();
        state.login_form.password = "wrong-password".to_string();
        handle_event(&mut state, &Event::Enter).unwrap();

        let outcome = ApiOutcome::SessionOpened {
            generation: 1,
            result: Err(ApiError::new(401, "invalid credentials")),
        };
        let (redraw, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();

        assert!(redraw);
        assert!(actions.is_empty());
        assert_eq!(state.screen, Screen::Login);
        assert!(state.session.is_none());
        assert_eq!(
            state.login_request.error().map(|e| e.message.as_str()),
            Some("invalid credentials")
        );
    }

    #[test]
    fn test_superseded_links_fetch_is_discarded() {
        let mut state = dashboard_with_links(vec![make_link("a", "Alpha")]);

        handle_event(&mut state, &Event::RefreshLinks).unwrap();
        handle_event(&mut state, &Event::RefreshLinks).unwrap();

        // First response arrives late and must not land.
        let stale = ApiOutcome::LinksFetched {
            generation: 1,
            result: Ok(vec![make_link("stale", "Stale")]),
        };
        let (redraw, actions) = handle_event(&mut state, &Event::ApiOutcome(stale)).unwrap();
        assert!(!redraw);
        assert!(actions.is_empty());
        assert_eq!(state.links[0].id, "a");
        assert!(state.links_request.is_loading());

        // The latest-issued response lands.
        let fresh = ApiOutcome::LinksFetched {
            generation: 2,
            result: Ok(vec![make_link("fresh", "Fresh")]),
        };
        let (redraw, _) = handle_event(&mut state, &Event::ApiOutcome(fresh)).unwrap();
        assert!(redraw);
        assert_eq!(state.links[0].id, "fresh");
        assert!(!state.links_request.is_loading());
    }

    #[test]
    fn test_links_fetch_chains_click_fetch() {
        let mut state = dashboard_state();
        handle_event(&mut state, &Event::RefreshLinks).unwrap();

        let outcome = ApiOutcome::LinksFetched {
            generation: 1,
            result: Ok(vec![make_link("a", "Alpha"), make_link("b", "Beta")]),
        };
        let (_, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();

        assert_eq!(actions.len(), 1);
        assert!(matches!(
            &actions[0],
            Action::CallApi {
                call: ApiCall::FetchClicks { link_ids },
                ..
            } if link_ids.len() == 2
        ));
        assert!(state.clicks_request.is_loading());
    }

    #[test]
    fn test_links_fetch_failure_keeps_displayed_links() {
        let mut state = dashboard_with_links(vec![make_link("a", "Alpha")]);
        handle_event(&mut state, &Event::RefreshLinks).unwrap();

        let outcome = ApiOutcome::LinksFetched {
            generation: 1,
            result: Err(ApiError::new(500, "server exploded")),
        };
        let (redraw, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();

        assert!(redraw);
        assert!(actions.is_empty());
        assert_eq!(state.links.len(), 1);
        let status = state.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("server exploded"));
    }

    #[test]
    fn test_clicks_fetched_rebuilds_stats() {
        let mut state = dashboard_with_links(vec![make_link("a", "Alpha")]);
        let generation = state.clicks_request.begin();

        let records = vec![
            ClickRecord {
                id: "c1".to_string(),
                url_id: "a".to_string(),
                city: None,
                device: None,
                created_at: "2024-03-01T00:00:00Z".to_string(),
            },
            ClickRecord {
                id: "c2".to_string(),
                url_id: "a".to_string(),
                city: None,
                device: None,
                created_at: "2024-03-02T00:00:00Z".to_string(),
            },
        ];
        let outcome = ApiOutcome::ClicksFetched {
            generation,
            result: Ok(records),
        };
        handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();

        assert_eq!(state.clicks_for("a"), 2);
        assert_eq!(state.total_clicks, 2);
    }

    #[test]
    fn test_create_dialog_flow() {
        let mut state = dashboard_state();

        handle_event(&mut state, &Event::OpenCreateDialog).unwrap();
        assert_eq!(state.input_mode, InputMode::Dialog);

        // Submitting the empty dialog validates and stays put.
        let (_, actions) = handle_event(&mut state, &Event::Enter).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.create_form.errors.len(), 2);

        for c in "Docs".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        handle_event(&mut state, &Event::Tab).unwrap();
        for c in "https://example.com/docs".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }

        let (_, actions) = handle_event(&mut state, &Event::Enter).unwrap();
        assert_eq!(
            actions,
            vec![Action::CallApi {
                call: ApiCall::CreateLink {
                    title: "Docs".to_string(),
                    original_url: "https://example.com/docs".to_string(),
                    custom_url: None,
                    user_id: "u1".to_string(),
                },
                generation: 1,
                session: Some(make_session()),
            }]
        );
        assert!(state.create_request.is_loading());
    }

    #[test]
    fn test_create_success_closes_dialog_and_selects_new_link() {
        let mut state = dashboard_state();
        handle_event(&mut state, &Event::OpenCreateDialog).unwrap();
        let generation = state.create_request.begin();

        let created = make_link("new1", "Docs");
        let outcome = ApiOutcome::LinkCreated {
            generation,
            result: Ok(created.clone()),
        };
        let (_, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();

        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.last_created.as_deref(), Some("new1"));
        let status = state.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        assert!(status.text.contains("https://tinyurlx.in/s-new1"));
        assert!(matches!(
            &actions[0],
            Action::CallApi {
                call: ApiCall::FetchLinks { .. },
                ..
            }
        ));

        // The refetch lands and the selection moves onto the new link.
        let list = ApiOutcome::LinksFetched {
            generation: state.links_request.generation(),
            result: Ok(vec![make_link("old", "Old"), created]),
        };
        handle_event(&mut state, &Event::ApiOutcome(list)).unwrap();
        assert_eq!(state.selected_link().map(|l| l.id.as_str()), Some("new1"));
        assert!(state.last_created.is_none());
    }

    #[test]
    fn test_create_rejection_keeps_dialog_open() {
        let mut state = dashboard_state();
        handle_event(&mut state, &Event::OpenCreateDialog).unwrap();
        state.create_form.title = "Docs".to_string();
        state.create_form.long_url = "https://example.com/docs".to_string();
        state.create_form.custom_url = "docs".to_string();
        handle_event(&mut state, &Event::Enter).unwrap();

        let outcome = ApiOutcome::LinkCreated {
            generation: 1,
            result: Err(ApiError::new(409, "duplicate alias")),
        };
        let (redraw, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();

        assert!(redraw);
        assert!(actions.is_empty());
        assert_eq!(state.input_mode, InputMode::Dialog);
        assert_eq!(state.create_form.title, "Docs");
        assert_eq!(
            state.create_request.error().map(|e| e.message.as_str()),
            Some("duplicate alias")
        );

        // Esc discards the dialog and its error.
        handle_event(&mut state, &Event::Escape).unwrap();
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.create_request.error().is_none());
    }

    #[test]
    fn test_delete_flow_guards_and_refetches() {
        let mut state = dashboard_with_links(vec![make_link("a", "Alpha")]);

        let (_, actions) = handle_event(&mut state, &Event::DeleteSelected).unwrap();
        assert!(matches!(
            &actions[0],
            Action::CallApi {
                call: ApiCall::DeleteLink { id },
                ..
            } if id == "a"
        ));
        assert_eq!(state.pending_delete.as_deref(), Some("a"));

        // A second delete while one is in flight is ignored.
        let (_, actions) = handle_event(&mut state, &Event::DeleteSelected).unwrap();
        assert!(actions.is_empty());

        let outcome = ApiOutcome::LinkDeleted {
            generation: 1,
            link_id: "a".to_string(),
            result: Ok(()),
        };
        let (_, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();
        assert!(state.pending_delete.is_none());
        assert_eq!(state.status.as_ref().unwrap().text, "Link deleted");
        assert!(matches!(
            &actions[0],
            Action::CallApi {
                call: ApiCall::FetchLinks { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_delete_failure_reports_and_unblocks() {
        let mut state = dashboard_with_links(vec![make_link("a", "Alpha")]);
        handle_event(&mut state, &Event::DeleteSelected).unwrap();

        let outcome = ApiOutcome::LinkDeleted {
            generation: 1,
            link_id: "a".to_string(),
            result: Err(ApiError::new(404, "not found")),
        };
        let (_, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();

        assert!(actions.is_empty());
        assert!(state.pending_delete.is_none());
        assert_eq!(state.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn test_qr_download_without_image_shows_notice() {
        let mut state = dashboard_with_links(vec![make_link("a", "Alpha")]);

        let (redraw, actions) = handle_event(&mut state, &Event::DownloadQr).unwrap();

        assert!(redraw);
        assert!(actions.is_empty());
        assert_eq!(
            state.status.as_ref().unwrap().text,
            "No QR image for this link"
        );
    }

    #[test]
    fn test_qr_download_flow_saves_via_worker() {
        let mut link = make_link("a", "Alpha");
        link.qr = Some("https://cdn.tinyurlx.in/qr/a.png".to_string());
        let mut state = dashboard_with_links(vec![link]);

        let (_, actions) = handle_event(&mut state, &Event::DownloadQr).unwrap();
        assert!(matches!(
            &actions[0],
            Action::CallApi {
                call: ApiCall::DownloadQr { link_id, url },
                ..
            } if link_id == "a" && url.ends_with("a.png")
        ));

        let outcome = ApiOutcome::QrDownloaded {
            generation: 1,
            link_id: "a".to_string(),
            result: Ok(vec![0x89, 0x50, 0x4e, 0x47]),
        };
        let (_, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();
        assert!(matches!(
            &actions[0],
            Action::PostToWorker(WorkerMessage::SaveQrImage { file_name, bytes, .. })
                if file_name == "s-a.png" && bytes.len() == 4
        ));
        assert!(!state.qr_request.is_loading());

        let saved = WorkerResponse::QrImageSaved {
            path: "/host/.local/share/zellij/linkdeck/qr/s-a.png".to_string(),
        };
        handle_event(&mut state, &Event::WorkerResponse(saved)).unwrap();
        assert_eq!(
            state.status.as_ref().unwrap().text,
            "QR image saved to ~/.local/share/zellij/linkdeck/qr/s-a.png"
        );
    }

    #[test]
    fn test_filter_mode_typing_and_exit() {
        let mut state = dashboard_with_links(vec![
            make_link("a", "My Blog"),
            make_link("b", "Slides"),
        ]);

        handle_event(&mut state, &Event::StartFilter).unwrap();
        assert_eq!(state.input_mode, InputMode::Filter);

        for c in "blog".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        assert_eq!(state.filtered_links.len(), 1);

        // Enter keeps the filter, Esc clears it.
        handle_event(&mut state, &Event::Enter).unwrap();
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.filter_query, "blog");
        assert_eq!(state.filtered_links.len(), 1);

        handle_event(&mut state, &Event::StartFilter).unwrap();
        handle_event(&mut state, &Event::Escape).unwrap();
        assert!(state.filter_query.is_empty());
        assert_eq!(state.filtered_links.len(), 2);
    }

    #[test]
    fn test_chars_ignored_in_normal_mode() {
        let mut state = dashboard_with_links(vec![make_link("a", "Alpha")]);

        let (redraw, actions) = handle_event(&mut state, &Event::Char('x')).unwrap();

        assert!(!redraw);
        assert!(actions.is_empty());
        assert!(state.filter_query.is_empty());
    }

    #[test]
    fn test_logout_tears_down_and_discards_late_response() {
        let mut state = dashboard_with_links(vec![make_link("a", "Alpha")]);

        let (_, actions) = handle_event(&mut state, &Event::Logout).unwrap();

        assert_eq!(actions.len(), 2);
        assert!(matches!(
            &actions[0],
            Action::CallApi {
                call: ApiCall::Logout,
                generation: 1,
                session: Some(session),
            } if session.user.id == "u1"
        ));
        assert!(matches!(
            &actions[1],
            Action::PostToWorker(WorkerMessage::ClearSession { .. })
        ));
        assert_eq!(state.screen, Screen::Login);
        assert!(state.session.is_none());
        assert!(state.links.is_empty());

        // The backend reply lands after teardown and is dropped.
        let outcome = ApiOutcome::SessionClosed {
            generation: 1,
            result: Ok(()),
        };
        let (redraw, actions) = handle_event(&mut state, &Event::ApiOutcome(outcome)).unwrap();
        assert!(!redraw);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_cached_session_restores_dashboard() {
        let mut state = login_state();
        let stored = StoredSession::from_session(&make_session(), 1_700_000_000);

        let response = WorkerResponse::SessionLoaded {
            session: Some(stored),
        };
        let (redraw, actions) = handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();

        assert!(redraw);
        assert_eq!(state.screen, Screen::Dashboard);
        assert_eq!(
            state.session.as_ref().map(|s| s.user.email.as_str()),
            Some("user@example.com")
        );
        assert!(matches!(
            &actions[0],
            Action::CallApi {
                call: ApiCall::FetchLinks { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_no_cached_session_stays_on_login() {
        let mut state = login_state();

        let response = WorkerResponse::SessionLoaded { session: None };
        let (redraw, actions) = handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();

        assert!(!redraw);
        assert!(actions.is_empty());
        assert_eq!(state.screen, Screen::Login);
    }

    #[test]
    fn test_permission_grant_triggers_session_lookup() {
        let mut state = login_state();

        let event = Event::PermissionsResult {
            granted: vec![PermissionType::WebAccess],
        };
        let (_, actions) = handle_event(&mut state, &event).unwrap();

        assert!(matches!(
            &actions[0],
            Action::PostToWorker(WorkerMessage::LoadSession { .. })
        ));
    }

    #[test]
    fn test_escape_dismisses_status_banner() {
        let mut state = dashboard_with_links(vec![make_link("a", "Alpha")]);
        state.status = Some(StatusLine::info("Link deleted"));

        let (redraw, _) = handle_event(&mut state, &Event::Escape).unwrap();
        assert!(redraw);
        assert!(state.status.is_none());

        // With nothing to dismiss, Esc is a no-op in normal mode.
        let (redraw, actions) = handle_event(&mut state, &Event::Escape).unwrap();
        assert!(!redraw);
        assert!(actions.is_empty());
    }
}

//! Screen and input mode state types for the application.
//!
//! This module defines the state machine enums that control which screen the
//! plugin presents and how keyboard input is routed within the dashboard.
//! These types determine which keybindings are active, how input is processed,
//! and which footer hints are displayed.
//!
//! # State Machine
//!
//! The plugin presents one of two screens:
//! - **Login**: Sign-in form shown until a session is established
//! - **Dashboard**: Link overview shown once the user is signed in
//!
//! Within the dashboard, input is interpreted according to the mode:
//! - **Normal**: Default navigation and command mode
//! - **Filter**: Typed characters narrow the link table by title
//! - **Dialog**: Typed characters go to the create-link dialog fields

/// Top-level screen the plugin is currently presenting.
///
/// Transitions: `Login` → `Dashboard` on successful sign-in or when a cached
/// session is restored by the background worker, and `Dashboard` → `Login`
/// on logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Sign-in form. All keyboard input is routed to the login form fields.
    #[default]
    Login,

    /// Main link dashboard with stats, filter bar, and the link table.
    Dashboard,
}

/// Current input handling mode within the dashboard.
///
/// Controls which keybindings are active and how user input is processed.
/// Determines the displayed footer text and available commands. The login
/// screen has no modes; its input always goes to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Default navigation and command mode.
    ///
    /// Available keybindings: j/k (navigate), / (filter), n (new link),
    /// d (delete), g (download QR), r (refresh), L (logout), q (quit).
    #[default]
    Normal,

    /// Active filter mode.
    ///
    /// Character input edits the filter query and the table narrows as the
    /// user types. Enter keeps the filter and returns to Normal; Esc clears it.
    Filter,

    /// Create-link dialog mode.
    ///
    /// Character input edits the focused dialog field. Tab cycles fields,
    /// Enter submits, Esc discards the dialog.
    Dialog,
}

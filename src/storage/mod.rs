//! Cache layer for the session and downloaded QR images.
//!
//! This module persists the one piece of state the plugin keeps across loads,
//! the authenticated session, so users are not asked to sign in every time
//! the pane opens. It also owns the directory downloaded QR images are saved
//! into. Everything else the dashboard shows is refetched from the backend.
//!
//! # Modules
//!
//! - `backend`: Cache trait abstraction for backend implementations
//! - `json`: JSON file-based cache implementation
//! - `models`: Cache record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::Storage;
pub use json::JsonCache;
pub use models::StoredSession;

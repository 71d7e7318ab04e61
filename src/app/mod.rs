//! Application layer coordinating state, events, and actions.
//!
//! This module defines the core application logic layer, sitting between the
//! plugin runtime (main.rs) and the domain/storage/worker layers. It implements
//! the event-driven architecture that powers the interactive UI.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──── API / Worker Responses ──────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`forms`]: Editable form buffers with validation for login and create
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Screen and input mode state machine types
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use linkdeck::app::{handle_event, AppState, Event};
//! use linkdeck::ui::theme::Theme;
//!
//! let mut state = AppState::new(Theme::default(), "tinyurlx.in".to_string());
//! let (redraw, actions) = handle_event(&mut state, &Event::Tab)?;
//! assert!(redraw);
//! assert!(actions.is_empty());
//! # Ok::<(), linkdeck::domain::LinkdeckError>(())
//! ```

pub mod actions;
pub mod forms;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use forms::{CreateLinkForm, LoginForm};
pub use handler::{handle_event, Event};
pub use modes::{InputMode, Screen};
pub use state::{AppState, StatusKind, StatusLine};

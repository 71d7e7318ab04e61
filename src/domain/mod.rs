//! Domain layer for the Linkdeck plugin.
//!
//! This module contains the core domain types and business logic for the plugin,
//! independent of Zellij-specific APIs or infrastructure concerns. It follows
//! domain-driven design principles by keeping business rules isolated from external
//! dependencies.
//!
//! # Organization
//!
//! - [`error`]: Error types, result alias, and the backend failure value
//! - [`link`]: Shortened links and their click records
//! - [`remote`]: Lifecycle tracking for non-blocking backend requests
//! - [`session`]: The authenticated session handed around explicitly
//!
//! # Examples
//!
//! ```
//! use linkdeck::domain::{ApiError, RemoteData, Session};
//!
//! // One wrapper per backend operation; the session travels by reference.
//! let mut login: RemoteData<Session, ApiError> = RemoteData::new();
//! let generation = login.begin();
//! assert!(login.is_loading());
//! let _ = generation;
//! ```

pub mod error;
pub mod link;
pub mod remote;
pub mod session;

pub use error::{ApiError, LinkdeckError, Result};
pub use link::{ClickRecord, Link};
pub use remote::{Phase, RemoteData};
pub use session::{Session, User};

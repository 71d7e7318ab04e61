//! Backend API layer: thin wrappers over the host's non-blocking HTTP shim.
//!
//! All business logic (auth, link creation, click counting, redirects) lives
//! in the hosted backend; this layer only describes calls, builds requests,
//! and decodes results. The split is deliberate:
//!
//! - [`requests`]: call descriptions and the correlation protocol
//! - [`client`]: pure request preparation plus the single dispatch point
//! - [`responses`]: decoding result events back into typed outcomes
//!
//! Preparation and decoding are pure functions, tested without a host. The
//! only side-effecting call in the layer is [`ApiClient::dispatch`].

pub mod client;
pub mod requests;
pub mod responses;

pub use client::{ApiClient, PreparedRequest};
pub use requests::{ApiCall, ApiOp};
pub use responses::{decode, ApiOutcome};

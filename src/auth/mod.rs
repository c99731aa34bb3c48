//! Auth token handling.
//!
//! The token is an opaque string handed out by the archive service. It is
//! kept in a [`TokenHolder`] and persisted to the durable store between
//! runs; checking it against the server is [`crate::api::AuthApi`]'s job.

mod secure;
mod token;

pub use secure::SecureString;
pub use token::{TokenHolder, TOKEN_KEY};

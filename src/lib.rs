//! Client-side state layer for browsing a paginated message archive.
//!
//! The pieces, leaves first:
//! - [`storage`]: durable and session-scoped key-value stores
//! - [`auth`]: the auth token holder
//! - [`api`]: HTTP fetcher for message pages and the token check
//! - [`messages`]: the state container that merges, deduplicates and sorts
//!   pages and publishes snapshots to subscribers

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod messages;
pub mod model;
pub mod mvi;
pub mod observe;
pub mod storage;

//! # HeapMind SSO (sign-in portal)
//!
//! `heapmind-sso` serves the sign-in, sign-up and password-reset flows of the
//! HeapMind portal and coordinates the global loading indicator shown while
//! those flows run.
//!
//! ## Loading coordination
//!
//! A single [`loading::LoadingStore`] drives the progress bar. It simulates
//! progress while an operation runs, keeps the bar visible for a minimum
//! duration so fast operations do not flicker, and holds the completed state
//! briefly before resetting. Navigation transitions are merged with the store
//! into one combined view (`GET /loading`).
//!
//! ## Auth flows
//!
//! The `/auth/*` form actions validate their input, report field errors as
//! JSON and otherwise simulate the backend call inside a loading episode
//! before redirecting to `/dashboard`. There is no credential store behind
//! them.
//!
//! ## Portal extras
//!
//! - Meta descriptors and structured data for the auth pages (`/seo/{page}`).
//! - `robots.txt` and `sitemap.xml`.
//! - Theme preference persisted in the `theme` cookie.

pub mod cli;
pub mod errors;
pub mod forms;
pub mod loading;
pub mod portal;
pub mod seo;
pub mod theme;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

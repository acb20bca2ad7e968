//! HTTP client and page controllers for the LegalEase backend.
//!
//! [`api::LegalEaseApi`] is the only type that talks to the network. The
//! controllers in [`upload`], [`listing`] and [`detail`] own the state of
//! one screen each; [`auth`] manages the session lifecycle.

pub mod api;
pub mod auth;
pub mod detail;
pub mod listing;
pub mod upload;

pub use api::{ApiError, LegalEaseApi};

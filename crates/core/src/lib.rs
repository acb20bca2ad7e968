//! Domain types and rules for the LegalEase lease-abstraction client.
//!
//! Holds the wire records shared with the backend, upload validation and
//! naming, list ordering, the abstract-view model, feedback and export
//! descriptors, and session persistence. Nothing here touches the network.

pub mod abstract_view;
pub mod document;
pub mod error;
pub mod export;
pub mod feedback;
pub mod lease;
pub mod listing;
pub mod session;
pub mod types;
pub mod upload;
pub mod user;

//! Business logic behind the HTTP surface.
//!
//! - [`application`] - review lifecycle and dashboard operations
//! - [`badge`] - badge issuance, renewal and public verification
//! - [`notification`] - outbound message templates and dispatch
//! - [`reminder`] - the periodic needs-info sweep

pub mod application;
pub mod badge;
pub mod notification;
pub mod reminder;

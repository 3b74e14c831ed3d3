//! Webflow form-submission integration.
//!
//! - [`extract`] - envelope resolution across the delivery shapes Webflow
//!   and its forwarders produce
//! - [`normalize`] - field-name normalization and typed accessors
//! - [`mapper`] - alias-driven mapping onto a canonical application
//! - [`handler`] - the ingestion pipeline (map, persist, notify)
//! - [`routes`] - HTTP endpoint handlers, including signature verification
//! - [`security`] - HMAC-SHA256 signature checks over the raw body

pub mod extract;
pub mod handler;
pub mod mapper;
pub mod normalize;
pub mod routes;
pub mod security;

pub use routes::{echo, receive};

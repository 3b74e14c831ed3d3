//! Webhook handlers for external integrations.
//!
//! Currently holds the Webflow form-submission receiver. The layout leaves
//! room for other intake sources to land as sibling modules.

pub mod routes;
pub mod webflow;

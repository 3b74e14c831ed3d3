use ntex::web;

/// Configures the Webflow webhook routes. These are public endpoints;
/// authenticity is checked per request via the payload signature.
///
/// # Routes
/// - `POST /webhooks/webflow` - form-submission receiver
/// - `POST /webhooks/webflow/test` - envelope-resolution diagnostic
pub fn webflow(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhooks/webflow").service((super::webflow::receive, super::webflow::echo)),
    );
}

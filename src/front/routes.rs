//! HTTP route configuration.
//!
//! Routes are grouped by resource; static path segments register before
//! dynamic ones inside each scope.

use super::{application, badge};
use ntex::web;

/// Application review routes.
///
/// # Routes
/// - `POST /applications` - create an application manually
/// - `GET /applications` - list, with optional `?status=` filter
/// - `GET /applications/stats` - per-status counts
/// - `GET /applications/{application_id}` - fetch one application
/// - `PATCH /applications/{application_id}/status` - lifecycle transition
pub fn applications(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/applications").service((
        application::stats,
        application::create,
        application::list,
        application::update_status,
        application::get_by_id,
    )));
}

/// Badge issuance and lookup routes.
///
/// # Routes
/// - `POST /badges` - issue a badge for a qualified application
/// - `GET /badges/code/{code}` - public verification by code
/// - `GET /badges/seller/{seller_id}` - all badges held by a seller
/// - `GET /badges/{badge_id}` - fetch one badge
/// - `POST /badges/{badge_id}/renew` - extend validity, reactivate
/// - `POST /badges/{badge_id}/suspend` - temporarily disable
/// - `POST /badges/{badge_id}/revoke` - permanently disable
pub fn badges(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/badges").service((
        badge::issue,
        badge::verify,
        badge::list_by_seller,
        badge::renew,
        badge::suspend,
        badge::revoke,
        badge::get_by_id,
    )));
}

/// Seller lookup routes.
///
/// # Routes
/// - `GET /sellers/{seller_id}` - seller profile with their badges
pub fn sellers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/sellers").service((badge::seller_profile,)));
}

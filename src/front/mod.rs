pub mod application;
pub mod badge;
pub mod errors;
pub mod routes;
pub mod server;

use crate::{repo, services};

pub struct AppState {
    pub repo: repo::ImplAppRepo,
    pub notification_sink: services::ImplNotificationSink,
}

//! # Needs-Info Reminder Sweep
//!
//! Periodically nudges sellers whose applications have been waiting in
//! `needs_info`. Each application gets at most one reminder; the sweep
//! only picks up rows where none has been recorded yet.

use crate::{api::notification, consts, repo, services};
use chrono::{Duration, Utc};

/// One pass over the overdue applications. Returns how many reminders were
/// recorded; a failure on one application does not stop the rest.
pub async fn run_needs_info_sweep(
    repo: &repo::ImplAppRepo,
    sink: &services::ImplNotificationSink,
) -> anyhow::Result<usize> {
    let cutoff = Utc::now() - Duration::hours(consts::NEEDS_INFO_REMINDER_CUTOFF_HOURS);
    let due = repo.applications_needing_info_reminder(cutoff).await?;

    if due.is_empty() {
        return Ok(0);
    }

    log::info!("Reminder sweep found {} overdue applications", due.len());

    let mut sent = 0;
    for application in &due {
        notification::notify_needs_info_reminder(application, sink).await;

        // recorded even when delivery failed, reminders are single-shot
        if let Err(e) = repo.set_needs_info_reminder_sent(application.id).await {
            log::error!(
                "Failed to record reminder for application {}: {}",
                application.id,
                e
            );
            continue;
        }
        sent += 1;
    }

    Ok(sent)
}

/// Runs the sweep on a fixed interval until the process exits.
pub async fn reminder_loop(repo: repo::ImplAppRepo, sink: services::ImplNotificationSink) {
    let mut interval =
        tokio::time::interval(std::time::Duration::from_secs(consts::REMINDER_SWEEP_INTERVAL_SECS));
    // first tick completes immediately, run a sweep at startup
    loop {
        interval.tick().await;
        match run_needs_info_sweep(&repo, &sink).await {
            Ok(0) => {}
            Ok(sent) => log::info!("Reminder sweep sent {} reminders", sent),
            Err(e) => log::error!("Reminder sweep failed: {}", e),
        }
    }
}

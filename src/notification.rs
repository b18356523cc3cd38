//! Desktop notification for completed print jobs.

use crate::config::Config;

/// Announce newly processed jobs. Fire and forget.
#[cfg(feature = "notifications")]
pub fn notify_jobs_printed(config: &Config, count: u64, subject: Option<&str>) {
    if !config.notifications.enabled || count == 0 {
        return;
    }

    let summary = if count == 1 {
        "FlowPrint: job printed".to_string()
    } else {
        format!("FlowPrint: {} jobs printed", count)
    };

    let body = subject.map(|s| {
        if s.chars().count() > 100 {
            let head: String = s.chars().take(97).collect();
            format!("{}...", head)
        } else {
            s.to_string()
        }
    });

    if let Err(e) = send_notification(&summary, body.as_deref()) {
        tracing::warn!("Failed to send desktop notification: {}", e);
    }
}

#[cfg(not(feature = "notifications"))]
pub fn notify_jobs_printed(_config: &Config, _count: u64, _subject: Option<&str>) {}

#[cfg(feature = "notifications")]
fn send_notification(summary: &str, body: Option<&str>) -> Result<(), notify_rust::error::Error> {
    use notify_rust::Notification;

    let mut notification = Notification::new();
    notification
        .summary(summary)
        .appname("flowdash")
        .timeout(notify_rust::Timeout::Milliseconds(5000));

    if let Some(body) = body {
        notification.body(body);
    }

    notification.icon("printer");

    notification.show()?;
    Ok(())
}

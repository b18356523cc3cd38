//! Mode-aware banner resolution.
//!
//! Pure function from (mode, processing, status text) to what the
//! banner area shows while the service is running.

use crate::api::types::OperationMode;

/// Visual class of the banner, mapped to a style by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Service stopped.
    Stopped,
    /// Email polling active; countdown area shown.
    Active,
    /// Webhook modes at rest; no countdown.
    Waiting,
    /// A webhook submission is being processed right now.
    Processing,
}

/// Resolved banner content for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub caption: String,
    pub kind: BannerKind,
    /// Whether the countdown / next-check area is shown at all.
    pub show_countdown: bool,
}

impl Banner {
    pub fn stopped() -> Self {
        Banner {
            caption: "Stopped".to_string(),
            kind: BannerKind::Stopped,
            show_countdown: false,
        }
    }
}

/// Resolve the banner for a running service.
///
/// Precedence: an in-flight webhook always wins, then webhook-centric
/// modes override the server's status text, and email-centric modes
/// show the text verbatim.
pub fn resolve(mode: OperationMode, processing: bool, status: &str) -> Banner {
    if processing {
        return Banner {
            caption: "Processing Webhook".to_string(),
            kind: BannerKind::Processing,
            show_countdown: false,
        };
    }

    match mode {
        OperationMode::WebhookOnly => Banner {
            caption: "Waiting for Webhook".to_string(),
            kind: BannerKind::Waiting,
            show_countdown: false,
        },
        OperationMode::WebhookPrimary => Banner {
            caption: "Waiting for Webhook (Email Fallback Active)".to_string(),
            kind: BannerKind::Waiting,
            show_countdown: false,
        },
        OperationMode::EmailOnly | OperationMode::EmailPrimary => Banner {
            caption: status.to_string(),
            kind: BannerKind::Active,
            show_countdown: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_overrides_every_mode() {
        for mode in [
            OperationMode::EmailOnly,
            OperationMode::EmailPrimary,
            OperationMode::WebhookOnly,
            OperationMode::WebhookPrimary,
        ] {
            let banner = resolve(mode, true, "Idle - Waiting for next check");
            assert_eq!(banner.caption, "Processing Webhook");
            assert_eq!(banner.kind, BannerKind::Processing);
            assert!(!banner.show_countdown);
        }
    }

    #[test]
    fn webhook_only_hides_countdown() {
        let banner = resolve(OperationMode::WebhookOnly, false, "whatever");
        assert_eq!(banner.caption, "Waiting for Webhook");
        assert!(!banner.show_countdown);
    }

    #[test]
    fn webhook_primary_names_the_fallback() {
        let banner = resolve(OperationMode::WebhookPrimary, false, "whatever");
        assert_eq!(banner.caption, "Waiting for Webhook (Email Fallback Active)");
        assert_eq!(banner.kind, BannerKind::Waiting);
    }

    #[test]
    fn email_modes_show_status_verbatim_with_countdown() {
        for mode in [OperationMode::EmailOnly, OperationMode::EmailPrimary] {
            let banner = resolve(mode, false, "Scanning inbox...");
            assert_eq!(banner.caption, "Scanning inbox...");
            assert_eq!(banner.kind, BannerKind::Active);
            assert!(banner.show_countdown);
        }
    }
}

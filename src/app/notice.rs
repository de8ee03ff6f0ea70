use crate::error::NetworkError;
use std::time::{Duration, Instant};

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Alert,
    Failure,
}

/// A blocking message for the operator. Controls stay disabled until it is
/// dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn tray_alert() -> Self {
        Self::new(NoticeKind::Alert, "Alert!", "Donut Is Laying Down")
    }

    pub fn checkout_succeeded() -> Self {
        Self::new(NoticeKind::Success, "Checkout!", "Continue To Payment")
    }

    pub fn tray_cleared() -> Self {
        Self::new(NoticeKind::Success, "Reset!", "List Has Been Cleared")
    }

    pub fn poll_failed(error: &NetworkError) -> Self {
        Self::new(
            NoticeKind::Failure,
            "Error!",
            format!("Failed to get tray data: {error}"),
        )
    }

    pub fn checkout_failed() -> Self {
        Self::new(NoticeKind::Failure, "Error!", "Failed to send checkout data")
    }
}

/// Informational message that closes itself after [`TOAST_DURATION`] and
/// never blocks the controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    shown_at: Instant,
}

impl Toast {
    pub fn no_donuts() -> Self {
        Self {
            message: "No Donuts Detected".to_string(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_DURATION
    }

    /// Fraction of the display time left, for the progress bar.
    pub fn remaining_at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.shown_at);
        1.0 - (elapsed.as_secs_f32() / TOAST_DURATION.as_secs_f32()).min(1.0)
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.

use crate::ui::design_tokens::palette;
use iced::Color;
use std::time::{Duration, Instant};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity level determines display duration and visual styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Operation completed successfully (green, 3s).
    #[default]
    Success,
    /// Non-blocking problem (orange, 5s).
    Warning,
    /// Failed operation (red, manual dismiss).
    Error,
}

impl Severity {
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Severity::Success => palette::SUCCESS_500,
            Severity::Warning => palette::WARNING_500,
            Severity::Error => palette::ERROR_500,
        }
    }

    /// Glyph shown next to the message.
    #[must_use]
    pub fn glyph(&self) -> &'static str {
        match self {
            Severity::Success => "\u{2714}",
            Severity::Warning | Severity::Error => "\u{26a0}",
        }
    }

    /// Returns `None` for errors, which stay until dismissed.
    #[must_use]
    pub fn auto_dismiss_duration(&self) -> Option<Duration> {
        match self {
            Severity::Success => Some(Duration::from_secs(3)),
            Severity::Warning => Some(Duration::from_secs(5)),
            Severity::Error => None,
        }
    }
}

/// A notification to be displayed to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    severity: Severity,
    /// i18n key resolved at render time.
    message_key: String,
    message_args: Vec<(String, String)>,
    /// Technical detail recorded in diagnostics, never shown.
    detail: Option<String>,
    created_at: Instant,
}

impl Notification {
    pub fn new(severity: Severity, message_key: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            severity,
            message_key: message_key.into(),
            message_args: Vec::new(),
            detail: None,
            created_at: Instant::now(),
        }
    }

    pub fn success(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Success, message_key)
    }

    pub fn warning(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message_key)
    }

    pub fn error(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Error, message_key)
    }

    /// Adds an argument for message interpolation.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.push((key.into(), value.into()));
        self
    }

    /// Attaches the underlying error text for diagnostics.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    #[must_use]
    pub fn message_args(&self) -> &[(String, String)] {
        &self.message_args
    }

    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Whether the notification has outlived its severity's display time.
    #[must_use]
    pub fn should_auto_dismiss(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        self.severity
            .auto_dismiss_duration()
            .is_some_and(|d| now.saturating_duration_since(self.created_at) >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_ids_are_unique() {
        let n1 = Notification::success("test");
        let n2 = Notification::success("test");
        assert_ne!(n1.id(), n2.id());
    }

    #[test]
    fn severity_colors_are_distinct() {
        assert_ne!(Severity::Success.color(), Severity::Warning.color());
        assert_ne!(Severity::Warning.color(), Severity::Error.color());
    }

    #[test]
    fn error_severity_has_no_auto_dismiss() {
        assert!(Severity::Error.auto_dismiss_duration().is_none());
        let error = Notification::error("x");
        assert!(!error.is_expired_at(Instant::now() + Duration::from_secs(3600)));
    }

    #[test]
    fn warning_expires_after_its_duration() {
        let warning = Notification::warning("x");
        assert!(!warning.is_expired_at(warning.created_at + Duration::from_secs(4)));
        assert!(warning.is_expired_at(warning.created_at + Duration::from_secs(5)));
    }

    #[test]
    fn builder_collects_args_and_detail() {
        let notification = Notification::error("notification-export-error")
            .with_arg("path", "/tmp/a.png")
            .with_detail("disk full");

        assert_eq!(notification.severity(), Severity::Error);
        assert_eq!(notification.message_args().len(), 1);
        assert_eq!(notification.detail(), Some("disk full"));
    }
}

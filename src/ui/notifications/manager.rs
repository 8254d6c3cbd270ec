// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! The `Manager` limits the number of visible toasts, queues the rest and
//! expires them on tick. Warnings and errors are mirrored into diagnostics.

use super::notification::{Notification, NotificationId, Severity};
use crate::diagnostics::DiagnosticsHandle;
use std::collections::VecDeque;

/// Maximum number of notifications visible at once.
const MAX_VISIBLE: usize = 3;

/// Key prefix shared by every upload failure.
const UPLOAD_ERROR_PREFIX: &str = "notification-upload-";

#[derive(Debug, Clone)]
pub enum Message {
    Dismiss(NotificationId),
    Tick,
}

#[derive(Debug, Default)]
pub struct Manager {
    /// Newest first.
    visible: VecDeque<Notification>,
    queue: VecDeque<Notification>,
    diagnostics: Option<DiagnosticsHandle>,
}

impl Manager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Shows `notification`, or queues it while [`MAX_VISIBLE`] are showing.
    pub fn push(&mut self, notification: Notification) {
        if let Some(handle) = &self.diagnostics {
            let message = match notification.detail() {
                Some(detail) => format!("{}: {}", notification.message_key(), detail),
                None => notification.message_key().to_string(),
            };
            match notification.severity() {
                Severity::Warning => handle.log_warning(message),
                Severity::Error => handle.log_error(message),
                Severity::Success => {}
            }
        }

        if self.visible.len() < MAX_VISIBLE {
            self.visible.push_front(notification);
        } else {
            self.queue.push_back(notification);
        }
    }

    /// Returns `true` if the notification was found and removed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(pos) = self.visible.iter().position(|n| n.id() == id) {
            self.visible.remove(pos);
            self.promote_from_queue();
            return true;
        }
        if let Some(pos) = self.queue.iter().position(|n| n.id() == id) {
            self.queue.remove(pos);
            return true;
        }
        false
    }

    /// Dismisses expired notifications.
    pub fn tick(&mut self) {
        let expired: Vec<NotificationId> = self
            .visible
            .iter()
            .filter(|n| n.should_auto_dismiss())
            .map(Notification::id)
            .collect();
        for id in expired {
            self.dismiss(id);
        }
    }

    pub fn handle_message(&mut self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
            Message::Tick => self.tick(),
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.visible.is_empty() || !self.queue.is_empty()
    }

    /// Drops stale upload failures once a photo loads successfully.
    pub fn clear_upload_errors(&mut self) {
        let visible_before = self.visible.len();
        self.visible
            .retain(|n| !n.message_key().starts_with(UPLOAD_ERROR_PREFIX));
        self.queue
            .retain(|n| !n.message_key().starts_with(UPLOAD_ERROR_PREFIX));
        if self.visible.len() < visible_before {
            self.promote_from_queue();
        }
    }

    fn promote_from_queue(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            match self.queue.pop_front() {
                Some(notification) => self.visible.push_back(notification),
                None => break,
            }
        }
    }
}

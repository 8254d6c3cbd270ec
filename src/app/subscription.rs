// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Pointer input for the frame is handled by the editor canvas itself; only
//! window-level events and global shortcuts are routed from here.

use super::Message;
use iced::keyboard::{self, Key};
use iced::{event, time, Subscription};
use std::time::Duration;

/// Routes dropped files and the diagnostics shortcut (Ctrl+Shift+D).
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, _window_id| {
        if let event::Event::Window(iced::window::Event::FileDropped(path)) = &event {
            return Some(Message::FileDropped(path.clone()));
        }

        // Shortcuts must not fire while a text input has focus
        if status == event::Status::Captured {
            return None;
        }

        match event {
            event::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. })
                if is_diagnostics_shortcut(&key, modifiers) =>
            {
                Some(Message::ExportDiagnostics)
            }
            _ => None,
        }
    })
}

fn is_diagnostics_shortcut(key: &Key, modifiers: keyboard::Modifiers) -> bool {
    let is_d = match key {
        Key::Character(c) => c.eq_ignore_ascii_case("d"),
        _ => false,
    };
    is_d && modifiers.control() && modifiers.shift()
}

/// Creates the periodic tick that expires toasts and drains diagnostics.
///
/// Ticks quickly while toasts are visible so they disappear on time.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    let interval = if has_notifications {
        Duration::from_millis(100)
    } else {
        Duration::from_secs(1)
    };
    time::every(interval).map(Message::Tick)
}

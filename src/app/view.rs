// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The frame editor fills the window; toasts float above it.

use super::Message;
use crate::i18n::fluent::I18n;
use crate::ui::frame_editor::{self, ViewContext as EditorViewContext};
use crate::ui::notifications::{self, Toast};
use iced::widget::{Container, Stack};
use iced::{Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub editor: &'a frame_editor::State,
    pub notifications: &'a notifications::Manager,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let editor = frame_editor::view(ctx.editor, EditorViewContext { i18n: ctx.i18n })
        .map(Message::Editor);

    let toasts = Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification);

    Container::new(
        Stack::new()
            .push(editor)
            .push(toasts)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

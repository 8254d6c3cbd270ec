// SPDX-License-Identifier: MPL-2.0
//! Toast widget for rendering individual notifications.

use super::manager::{Manager, Message};
use super::notification::Notification;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{border, opacity, palette, radius, shadow, sizing, spacing, typography};
use iced::widget::{button, container, text, Column, Container, Row, Text};
use iced::{alignment, Color, Element, Length, Theme};

pub struct Toast;

impl Toast {
    /// Renders a single toast.
    pub fn view<'a>(notification: &'a Notification, i18n: &'a I18n) -> Element<'a, Message> {
        let accent_color = notification.severity().color();

        let message_text = if notification.message_args().is_empty() {
            i18n.tr(notification.message_key())
        } else {
            let args: Vec<(&str, &str)> = notification
                .message_args()
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            i18n.tr_with_args(notification.message_key(), &args)
        };

        let glyph = Text::new(notification.severity().glyph())
            .size(typography::TITLE_SM)
            .style(move |_theme: &Theme| text::Style {
                color: Some(accent_color),
            });

        let message_widget = Text::new(message_text)
            .size(typography::BODY)
            .style(|theme: &Theme| text::Style {
                color: Some(theme.palette().text),
            });

        let dismiss_button = button(Text::new("\u{2715}").size(typography::CAPTION))
            .on_press(Message::Dismiss(notification.id()))
            .padding(spacing::XXS)
            .style(dismiss_button_style);

        let content = Row::new()
            .spacing(spacing::SM)
            .align_y(alignment::Vertical::Center)
            .push(glyph)
            .push(
                Container::new(message_widget)
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Left),
            )
            .push(dismiss_button);

        Container::new(content)
            .width(Length::Fixed(sizing::TOAST_WIDTH))
            .padding(spacing::SM)
            .style(move |theme: &Theme| toast_container_style(theme, accent_color))
            .into()
    }

    /// Renders all visible toasts stacked in the bottom-right corner.
    pub fn view_overlay<'a>(manager: &'a Manager, i18n: &'a I18n) -> Element<'a, Message> {
        let toasts: Vec<Element<'a, Message>> = manager
            .visible()
            .map(|notification| Self::view(notification, i18n))
            .collect();

        if toasts.is_empty() {
            return Container::new(text(""))
                .width(Length::Shrink)
                .height(Length::Shrink)
                .into();
        }

        Container::new(
            Column::with_children(toasts)
                .spacing(spacing::XS)
                .align_x(alignment::Horizontal::Right),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Right)
        .align_y(alignment::Vertical::Bottom)
        .padding(spacing::MD)
        .into()
    }
}

fn toast_container_style(theme: &Theme, accent_color: Color) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(
            theme.extended_palette().background.base.color,
        )),
        border: iced::Border {
            color: accent_color,
            width: border::WIDTH_MD,
            radius: radius::MD.into(),
        },
        shadow: shadow::MD,
        text_color: Some(theme.palette().text),
        ..Default::default()
    }
}

fn dismiss_button_style(theme: &Theme, status: button::Status) -> button::Style {
    let base = theme.extended_palette().background.base;
    let hover_alpha = match status {
        button::Status::Hovered => Some(opacity::OVERLAY_SUBTLE),
        button::Status::Pressed => Some(opacity::OVERLAY_MEDIUM),
        button::Status::Active | button::Status::Disabled => None,
    };

    button::Style {
        background: hover_alpha.map(|a| iced::Background::Color(Color { a, ..palette::GRAY_400 })),
        text_color: base.text,
        border: iced::Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        shadow: shadow::NONE,
        snap: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_container_style_uses_accent_color() {
        let accent = palette::SUCCESS_500;
        let style = toast_container_style(&Theme::Light, accent);
        assert_eq!(style.border.color, accent);
        assert!(style.background.is_some());
    }

    #[test]
    fn dismiss_button_highlights_on_hover_only() {
        assert!(dismiss_button_style(&Theme::Light, button::Status::Active)
            .background
            .is_none());
        assert!(dismiss_button_style(&Theme::Light, button::Status::Hovered)
            .background
            .is_some());
    }
}

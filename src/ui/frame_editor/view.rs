// SPDX-License-Identifier: MPL-2.0
//! Editor view composition.

use super::{Message, State};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{border, palette, radius, sizing, spacing, typography};
use iced::widget::{
    button, canvas, column, container, image, row, slider, text, text_input, Column, Stack,
};
use iced::{
    alignment, font, Background, Border, Color, ContentFit, Element, Font, Length, Padding, Theme,
};

/// Contextual data needed to render the editor view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

pub fn view<'a>(state: &'a State, ctx: ViewContext<'a>) -> Element<'a, Message> {
    let title = text(ctx.i18n.tr("editor-title"))
        .size(typography::TITLE_LG)
        .font(Font {
            weight: font::Weight::Bold,
            ..Font::DEFAULT
        })
        .style(|_theme: &Theme| text::Style {
            color: Some(palette::ACCENT_500),
        });

    let body = row![preview(state, &ctx), controls(state, &ctx)]
        .spacing(spacing::LG)
        .align_y(alignment::Vertical::Top);

    container(
        column![title, body]
            .spacing(spacing::MD)
            .align_x(alignment::Horizontal::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .padding(spacing::LG)
    .align_x(alignment::Horizontal::Center)
    .into()
}

fn preview<'a>(state: &'a State, ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let side = Length::Fixed(sizing::FRAME_PREVIEW);

    let picture: Element<'a, Message> = match state.preview() {
        Some(handle) => image(handle.clone())
            .width(side)
            .height(side)
            .content_fit(ContentFit::Fill)
            .into(),
        None => container(text("")).width(side).height(side).into(),
    };

    let mut layers = Stack::new().width(side).height(side).push(picture);
    if !state.has_photo() {
        layers = layers.push(upload_placeholder(state, ctx));
    }
    layers = layers.push(canvas(state.overlay()).width(side).height(side));

    container(layers)
        .style(|_theme: &Theme| container::Style {
            border: Border {
                color: palette::GRAY_200,
                width: border::WIDTH_SM,
                radius: 0.0.into(),
            },
            ..Default::default()
        })
        .into()
}

/// "+ / Click to upload" label centered on the empty circle.
fn upload_placeholder<'a>(state: &'a State, ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let layout = state.layout();
    let display_scale = sizing::FRAME_PREVIEW / layout.width;
    let circle = layout.mask_circle();
    let diameter = circle.radius * 2.0 * display_scale;
    let left = (circle.center_x - circle.radius) * display_scale;
    let top = (circle.center_y - circle.radius) * display_scale;

    let label = column![
        text(ctx.i18n.tr("editor-upload-plus")).size(typography::TITLE_LG),
        text(ctx.i18n.tr("editor-upload-placeholder")).size(typography::BODY),
    ]
    .spacing(spacing::XXS)
    .align_x(alignment::Horizontal::Center);

    let centered = container(label)
        .width(Length::Fixed(diameter))
        .height(Length::Fixed(diameter))
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .style(|_theme: &Theme| container::Style {
            text_color: Some(palette::GRAY_700),
            ..Default::default()
        });

    container(centered)
        .padding(Padding {
            top,
            right: 0.0,
            bottom: 0.0,
            left,
        })
        .width(Length::Fixed(sizing::FRAME_PREVIEW))
        .height(Length::Fixed(sizing::FRAME_PREVIEW))
        .into()
}

fn controls<'a>(state: &'a State, ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let captions = state.captions();

    let name_input = text_input(&ctx.i18n.tr("editor-name-placeholder"), &captions.name)
        .on_input(Message::NameChanged)
        .padding(spacing::XS)
        .size(typography::BODY);
    let info_input = text_input(&ctx.i18n.tr("editor-info-placeholder"), &captions.info)
        .on_input(Message::InfoChanged)
        .padding(spacing::XS)
        .size(typography::BODY);

    let mut content = Column::new()
        .spacing(spacing::MD)
        .width(Length::Fixed(sizing::CONTROLS_WIDTH))
        .push(name_input)
        .push(info_input);

    if state.has_photo() {
        content = content.push(image_controls(state, ctx));
    }

    let save_label = if state.is_exporting() {
        ctx.i18n.tr("editor-saving-button")
    } else {
        ctx.i18n.tr("editor-save-button")
    };
    let can_save = state.has_photo() && !state.is_exporting();
    let save_button =
        button(container(text(save_label).size(typography::BODY)).center_x(Length::Fill))
            .on_press_maybe(can_save.then_some(Message::SavePressed))
            .width(Length::Fill)
            .height(Length::Fixed(sizing::BUTTON_HEIGHT))
            .style(primary_button_style);
    content = content.push(save_button);

    if !state.has_photo() {
        content = content.push(
            text(ctx.i18n.tr("editor-export-hint"))
                .size(typography::CAPTION)
                .style(|_theme: &Theme| text::Style {
                    color: Some(palette::GRAY_700),
                }),
        );
    }

    content.into()
}

/// Zoom slider and photo actions, shown once a photo is loaded.
fn image_controls<'a>(state: &'a State, ctx: &ViewContext<'a>) -> Element<'a, Message> {
    use crate::domain::frame::zoom_bounds;

    let zoom = state.zoom().value();
    let zoom_text = format!("{:.1}", zoom);
    let zoom_row = row![
        text(ctx.i18n.tr("editor-zoom-label")).size(typography::BODY),
        text(
            ctx.i18n
                .tr_with_args("editor-zoom-value", &[("zoom", zoom_text.as_str())])
        )
        .size(typography::BODY),
    ]
    .spacing(spacing::XS);

    let zoom_slider = slider(zoom_bounds::MIN..=zoom_bounds::MAX, zoom, Message::ZoomChanged)
        .step(zoom_bounds::STEP);

    let actions = row![
        button(text(ctx.i18n.tr("editor-change-image")).size(typography::BODY))
            .on_press(Message::UploadPressed)
            .style(primary_button_style),
        button(text(ctx.i18n.tr("editor-reset-position")).size(typography::BODY))
            .on_press(Message::ResetPosition)
            .style(button::secondary),
    ]
    .spacing(spacing::XS);

    container(
        column![
            text(ctx.i18n.tr("editor-controls-title")).size(typography::TITLE_SM),
            zoom_row,
            zoom_slider,
            actions,
        ]
        .spacing(spacing::SM),
    )
    .width(Length::Fill)
    .padding(spacing::MD)
    .style(panel_style)
    .into()
}

fn panel_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::GRAY_50)),
        border: Border {
            color: palette::GRAY_200,
            width: border::WIDTH_SM,
            radius: radius::MD.into(),
        },
        text_color: Some(palette::BLACK),
        ..Default::default()
    }
}

fn primary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Active => palette::PRIMARY_500,
        button::Status::Hovered | button::Status::Pressed => palette::PRIMARY_700,
        button::Status::Disabled => Color {
            a: 0.5,
            ..palette::PRIMARY_500
        },
    };
    button::Style {
        background: Some(Background::Color(background)),
        text_color: palette::WHITE,
        border: Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

// SPDX-License-Identifier: MPL-2.0

//! Shared widgets for the taxonomy picker pages.

use crate::app::{Message, Notification, NotificationLevel};
use crate::picker::highlight::highlight;
use cosmic::iced::{Alignment, Length};
use cosmic::prelude::*;
use cosmic::widget::{self, icon};

/// Text with every occurrence of `query` drawn in the accent color.
pub fn highlighted_text<'a, M: 'static>(text: &str, query: &str) -> Element<'a, M> {
    let segments = highlight(text, query);
    let mut row = widget::row::with_capacity(segments.len());

    for segment in segments {
        let part = widget::text::body(segment.text);
        row = row.push(if segment.matched {
            part.class(cosmic::style::Text::Accent)
        } else {
            part
        });
    }

    row.into()
}

/// Notification toast widget
pub fn notification_toast(notification: &Notification) -> Element<'_, Message> {
    let id = notification.id;

    let level_icon = match notification.level {
        NotificationLevel::Info => icon::from_name("dialog-information-symbolic").size(20),
        NotificationLevel::Success => icon::from_name("object-select-symbolic").size(20),
        NotificationLevel::Error => icon::from_name("dialog-error-symbolic").size(20),
    };

    let content = widget::row::with_capacity(4)
        .push(level_icon)
        .push(
            widget::column::with_capacity(2)
                .push(widget::text::body(&notification.title))
                .push_maybe(if notification.message.is_empty() {
                    None
                } else {
                    Some(widget::text::caption(&notification.message))
                })
                .spacing(2)
                .width(Length::Fill),
        )
        .push(
            widget::button::icon(icon::from_name("edit-copy-symbolic"))
                .on_press(Message::CopyNotification(id))
                .class(cosmic::theme::Button::Standard),
        )
        .push(
            widget::button::icon(icon::from_name("window-close-symbolic"))
                .on_press(Message::DismissNotification(id))
                .class(cosmic::theme::Button::Standard),
        )
        .spacing(8)
        .align_y(Alignment::Center);

    widget::container(content)
        .padding(12)
        .width(Length::Fixed(400.0))
        .class(cosmic::style::Container::Card)
        .into()
}

// SPDX-License-Identifier: MPL-2.0

//! Grouped display of the current selection: collapsible Top groups, Mid
//! sub-headings and removable badges.

use crate::api::LeafDetail;
use crate::fl;
use crate::picker::grouping::{self, TopGroup};
use crate::picker::{Picker, PickerMsg};
use cosmic::iced::{Alignment, Length};
use cosmic::prelude::*;
use cosmic::widget::{self, icon, tooltip};

pub fn view<'a, Message: Clone + 'static>(
    picker: &'a Picker,
    on_message: impl Fn(PickerMsg) -> Message + Copy + 'a,
    space_s: u16,
) -> Element<'a, Message> {
    let grouping = picker.grouping();

    if grouping.total() == 0 {
        let placeholder = if picker.options.placeholder.is_empty() {
            fl!("nothing-selected")
        } else {
            picker.options.placeholder.clone()
        };
        return widget::text::body(placeholder).into();
    }

    let header = widget::row::with_capacity(2)
        .push(widget::text::caption(grouping.summary()).width(Length::Fill))
        .push(
            widget::button::text(fl!("clear-all"))
                .on_press(on_message(PickerMsg::ClearAll)),
        )
        .align_y(Alignment::Center);

    let mut content = widget::column::with_capacity(grouping.groups.len() + 1)
        .push(header)
        .spacing(space_s);

    for group in &grouping.groups {
        content = content.push(top_group(
            group,
            picker.collapse.is_expanded(group.name),
            on_message,
            space_s,
        ));
    }

    content.into()
}

fn top_group<'a, Message: Clone + 'static>(
    group: &TopGroup<'_>,
    expanded: bool,
    on_message: impl Fn(PickerMsg) -> Message + Copy + 'a,
    space_s: u16,
) -> Element<'a, Message> {
    let chevron = if expanded {
        "go-down-symbolic"
    } else {
        "go-next-symbolic"
    };

    let count_badge = widget::container(widget::text::caption(group.count().to_string()))
        .padding([2, 8])
        .class(cosmic::style::Container::Primary);

    let title = widget::mouse_area(
        widget::row::with_capacity(3)
            .push(icon::from_name(chevron).size(16))
            .push(widget::text::title4(group.name.to_string()).width(Length::Fill))
            .push(count_badge)
            .spacing(8)
            .align_y(Alignment::Center),
    )
    .on_press(on_message(PickerMsg::ToggleGroup(group.name.to_string())));

    let mut column = widget::column::with_capacity(group.mids.len() + 1)
        .push(title)
        .spacing(space_s);

    if expanded {
        for mid in &group.mids {
            let badges: Vec<Element<'a, Message>> = mid
                .leaves
                .iter()
                .map(|detail| badge(detail, on_message))
                .collect();

            column = column
                .push(
                    widget::text::caption(mid.name.to_string())
                        .class(cosmic::style::Text::Accent),
                )
                .push(widget::flex_row(badges).row_spacing(4).column_spacing(4));
        }
    }

    widget::container(column)
        .padding(space_s)
        .width(Length::Fill)
        .class(cosmic::style::Container::Card)
        .into()
}

/// A removable leaf badge with the full path as its tooltip.
fn badge<'a, Message: Clone + 'static>(
    detail: &LeafDetail,
    on_message: impl Fn(PickerMsg) -> Message + Copy + 'a,
) -> Element<'a, Message> {
    let content = widget::container(
        widget::row::with_capacity(2)
            .push(widget::text::caption(detail.name.clone()))
            .push(
                widget::button::icon(icon::from_name("window-close-symbolic"))
                    .on_press(on_message(PickerMsg::Remove(detail.id)))
                    .class(cosmic::theme::Button::Standard),
            )
            .spacing(4)
            .align_y(Alignment::Center),
    )
    .padding([2, 4, 2, 10])
    .class(cosmic::style::Container::Primary);

    widget::tooltip(
        content,
        widget::text::caption(grouping::tooltip(detail)),
        tooltip::Position::Top,
    )
    .into()
}

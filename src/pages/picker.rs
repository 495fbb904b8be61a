// SPDX-License-Identifier: MPL-2.0

//! Open picker view: the desktop dropdown or the compact step wizard, plus
//! the global search panel shared by both.

use crate::api::source::is_searchable;
use crate::fl;
use crate::pages::widgets::highlighted_text;
use crate::picker::layout::WizardStep;
use crate::picker::search::SearchKey;
use crate::picker::{Picker, PickerMsg};
use crate::widgets::cascade_columns::CascadeColumns;
use cosmic::iced::{Alignment, Length};
use cosmic::prelude::*;
use cosmic::widget::{self, icon};

/// Height of the desktop dropdown.
const DROPDOWN_HEIGHT: f32 = 420.0;

pub fn view<'a, Message: Clone + 'static>(
    picker: &'a Picker,
    on_message: impl Fn(PickerMsg) -> Message + Copy + 'a,
    space_s: u16,
    space_m: u16,
) -> Element<'a, Message> {
    if picker.presentation.is_compact() {
        wizard_view(picker, on_message, space_s)
    } else {
        dropdown_view(picker, on_message, space_s, space_m)
    }
}

fn done_cancel<'a, Message: Clone + 'static>(
    on_message: impl Fn(PickerMsg) -> Message + Copy + 'a,
    space_s: u16,
) -> Element<'a, Message> {
    widget::row::with_capacity(2)
        .push(widget::button::standard(fl!("cancel")).on_press(on_message(PickerMsg::Cancel)))
        .push(widget::button::suggested(fl!("done")).on_press(on_message(PickerMsg::Done)))
        .spacing(space_s)
        .into()
}

/// Three columns side by side with a persistent search panel.
fn dropdown_view<'a, Message: Clone + 'static>(
    picker: &'a Picker,
    on_message: impl Fn(PickerMsg) -> Message + Copy + 'a,
    space_s: u16,
    space_m: u16,
) -> Element<'a, Message> {
    let columns: Element<'a, Message> =
        CascadeColumns::new(&picker.cascade, picker.labels, on_message)
            .is_checked(move |leaf| picker.is_checked(leaf))
            .column_width(Length::FillPortion(1))
            .spacing(space_s)
            .into();

    let body = widget::row::with_capacity(2)
        .push(widget::container(columns).width(Length::FillPortion(3)))
        .push(
            widget::container(search_panel(picker, on_message, space_s))
                .width(Length::FillPortion(1))
                .height(Length::Fill)
                .padding(space_s)
                .class(cosmic::style::Container::Card),
        )
        .spacing(space_s)
        .height(Length::Fixed(DROPDOWN_HEIGHT));

    let footer = widget::row::with_capacity(2)
        .push(widget::Space::with_width(Length::Fill))
        .push(done_cancel(on_message, space_s))
        .align_y(Alignment::Center);

    widget::container(
        widget::column::with_capacity(2)
            .push(body)
            .push(footer)
            .spacing(space_m),
    )
    .padding(space_s)
    .width(Length::Fill)
    .into()
}

/// One level per step, with the search panel as an overlay.
fn wizard_view<'a, Message: Clone + 'static>(
    picker: &'a Picker,
    on_message: impl Fn(PickerMsg) -> Message + Copy + 'a,
    space_s: u16,
) -> Element<'a, Message> {
    let wizard = &picker.presentation.wizard;
    let step = wizard.step;

    let header = widget::row::with_capacity(3)
        .push(
            widget::button::icon(icon::from_name("go-previous-symbolic"))
                .on_press_maybe(
                    wizard
                        .can_go_back()
                        .then(|| on_message(PickerMsg::StepBack)),
                ),
        )
        .push(
            widget::text::title4(fl!(
                "wizard-step",
                step = step.number(),
                count = WizardStep::COUNT,
                level = picker.labels.of(step.level())
            ))
            .width(Length::Fill),
        )
        .push(
            widget::button::icon(icon::from_name("system-search-symbolic"))
                .on_press(on_message(PickerMsg::ToggleSearchOverlay))
                .class(if wizard.search_overlay {
                    cosmic::theme::Button::Suggested
                } else {
                    cosmic::theme::Button::Standard
                }),
        )
        .spacing(space_s)
        .align_y(Alignment::Center);

    let column: Element<'a, Message> =
        CascadeColumns::new(&picker.cascade, picker.labels, on_message)
            .is_checked(move |leaf| picker.is_checked(leaf))
            .only(step.level())
            .column_width(Length::Fill)
            .column_height(Length::Fixed(DROPDOWN_HEIGHT))
            .into();

    let footer = widget::row::with_capacity(3)
        .push(done_cancel(on_message, space_s))
        .push(widget::Space::with_width(Length::Fill))
        .push(
            widget::button::standard(fl!("next"))
                .on_press_maybe(
                    wizard
                        .can_advance(&picker.cascade)
                        .then(|| on_message(PickerMsg::StepForward)),
                ),
        )
        .align_y(Alignment::Center);

    let content: Element<'a, Message> = widget::column::with_capacity(3)
        .push(header)
        .push(column)
        .push(footer)
        .spacing(space_s)
        .into();

    if !wizard.search_overlay {
        return content;
    }

    let overlay: Element<'a, Message> = widget::dialog()
        .title(fl!("search-all"))
        .control(
            widget::container(search_panel(picker, on_message, space_s))
                .height(Length::Fixed(DROPDOWN_HEIGHT)),
        )
        .secondary_action(
            widget::button::standard(fl!("close"))
                .on_press(on_message(PickerMsg::ToggleSearchOverlay)),
        )
        .into();

    widget::popover(content).modal(true).popup(overlay).into()
}

/// Search box, status line and ranked results.
pub fn search_panel<'a, Message: Clone + 'static>(
    picker: &'a Picker,
    on_message: impl Fn(PickerMsg) -> Message + Copy + 'a,
    space_s: u16,
) -> Element<'a, Message> {
    let search = &picker.search;

    let input = widget::text_input(fl!("search-placeholder"), &search.query)
        .on_input(move |query| on_message(PickerMsg::SearchInput(query)))
        .on_submit(move |_| on_message(PickerMsg::SearchKey(SearchKey::Enter)))
        .width(Length::Fill);

    let status = if search.is_searching {
        Some(fl!("searching"))
    } else if search.query.trim().is_empty() {
        None
    } else if !is_searchable(&search.query) {
        Some(fl!("search-too-short"))
    } else if search.results.is_empty() {
        Some(fl!("no-results"))
    } else {
        None
    };

    let mut results = widget::column::with_capacity(search.results.len()).spacing(2);
    for (index, (result, selected)) in search.annotated(&picker.selection).enumerate() {
        let mut text = widget::column::with_capacity(3)
            .push(highlighted_text(&result.name, &search.query))
            .push(widget::text::caption(format!(
                "{} → {}",
                result.top.name, result.mid.name
            )))
            .width(Length::Fill);
        if let Some(description) = result.description.as_deref().filter(|d| !d.is_empty()) {
            text = text.push(highlighted_text(description, &search.query));
        }

        let row = widget::row::with_capacity(2)
            .push(text)
            .push_maybe(selected.then(|| {
                widget::row::with_capacity(2)
                    .push(icon::from_name("object-select-symbolic").size(16))
                    .push(widget::text::caption(fl!("already-selected")))
                    .spacing(4)
                    .align_y(Alignment::Center)
            }))
            .spacing(8)
            .align_y(Alignment::Center);

        let item = widget::container(row)
            .padding(8)
            .width(Length::Fill)
            .class(if search.focused == Some(index) {
                cosmic::style::Container::Primary
            } else {
                cosmic::style::Container::default()
            });

        results = results.push(if selected {
            widget::mouse_area(item)
        } else {
            widget::mouse_area(item).on_press(on_message(PickerMsg::SearchPick(index)))
        });
    }

    widget::column::with_capacity(3)
        .push(input)
        .push_maybe(status.map(widget::text::caption))
        .push(widget::scrollable(results).height(Length::Fill))
        .spacing(space_s)
        .into()
}

// SPDX-License-Identifier: MPL-2.0

//! A form field that owns one taxonomy picker.
//!
//! The field keeps its own copy of the value and updates it from the
//! picker's change events, the way any page embedding the picker would.

use crate::api::{Deployment, TaxonomySource};
use crate::app::Message;
use crate::config::Config;
use crate::fl;
use crate::helpers;
use crate::pages;
use crate::picker::{Outcome, Picker, PickerEvent, PickerMsg, PickerOptions};
use cosmic::iced::{Alignment, Length};
use cosmic::prelude::*;
use cosmic::widget::{self, icon};
use std::sync::Arc;

pub struct TaxonomyField {
    pub deployment: Deployment,
    pub source: Arc<dyn TaxonomySource>,
    pub picker: Picker,
    pub value: Vec<String>,
}

impl TaxonomyField {
    /// Builds the field from the saved value and the service settings.
    pub fn new(deployment: Deployment, config: &Config) -> (Self, Outcome) {
        let initial_value = config.value(deployment).to_vec();
        let options = match deployment {
            Deployment::ResearchAreas => PickerOptions {
                initial_value,
                required: true,
                label: fl!("research-areas"),
                placeholder: fl!("research-areas-placeholder"),
            },
            Deployment::Skills => PickerOptions {
                initial_value,
                required: false,
                label: fl!("skills"),
                placeholder: fl!("skills-placeholder"),
            },
        };

        let (picker, outcome) = Picker::new(options, deployment.labels(), config.breakpoint());

        // Invalid saved ids were dropped by the picker.
        let field = Self {
            deployment,
            source: helpers::build_source(config, deployment),
            value: picker.value(),
            picker: picker.with_search_limit(config.search_limit()),
        };

        (field, outcome)
    }

    /// Applies a picker event to the owned value. Returns true if the user
    /// finished editing.
    pub fn absorb(&mut self, event: &PickerEvent) -> bool {
        match event {
            PickerEvent::Changed(value) => {
                self.value = value.clone();
                false
            }
            PickerEvent::Done(value) => {
                self.value = value.clone();
                true
            }
            PickerEvent::Cancelled => false,
        }
    }

    /// Replaces the value from outside the picker.
    pub fn set_value(&mut self, value: Vec<String>) -> Outcome {
        let outcome = self.picker.update(PickerMsg::SetValue(value));
        self.value = self.picker.value();
        outcome
    }

    /// True if a value is required but none is selected.
    pub fn is_missing(&self) -> bool {
        self.picker.options.required && self.value.is_empty()
    }
}

pub fn view(field: &TaxonomyField, space_s: u16, space_m: u16) -> Element<'_, Message> {
    let deployment = field.deployment;
    let on_message = move |msg| Message::Picker(deployment, msg);
    let options = &field.picker.options;

    let title = if options.required {
        format!("{} *", options.label)
    } else {
        options.label.clone()
    };

    let actions = widget::row::with_capacity(2)
        .push(
            widget::button::icon(icon::from_name("edit-copy-symbolic"))
                .on_press_maybe((!field.value.is_empty()).then_some(Message::CopyValue(deployment)))
                .class(cosmic::theme::Button::Standard),
        )
        .push(
            widget::button::suggested(fl!("edit-selection"))
                .on_press_maybe((!field.picker.is_open).then(|| on_message(PickerMsg::Open))),
        )
        .spacing(space_s)
        .align_y(Alignment::Center);

    let header = widget::row::with_capacity(2)
        .push(widget::text::title4(title).width(Length::Fill))
        .push(actions)
        .align_y(Alignment::Center);

    let hint = field.is_missing().then(|| {
        widget::row::with_capacity(2)
            .push(icon::from_name("dialog-warning-symbolic").size(16))
            .push(widget::text::caption(fl!("required-hint")))
            .spacing(4)
            .align_y(Alignment::Center)
    });

    let value_line = if field.value.is_empty() {
        fl!("value-empty")
    } else {
        fl!("value", value = field.value.join(", "))
    };

    let card = widget::container(
        widget::column::with_capacity(4)
            .push(header)
            .push_maybe(hint)
            .push(pages::selection::view(&field.picker, on_message, space_s))
            .push(widget::text::caption(value_line))
            .spacing(space_s),
    )
    .padding(space_m)
    .width(Length::Fill)
    .class(cosmic::style::Container::Card);

    let content = widget::column::with_capacity(3)
        .push(widget::text::title1(options.label.clone()))
        .push(card)
        .push_maybe(
            field
                .picker
                .is_open
                .then(|| pages::picker::view(&field.picker, on_message, space_s, space_m)),
        )
        .spacing(space_m);

    widget::scrollable(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

// SPDX-License-Identifier: MPL-2.0

//! Cascade columns widget builder and rendering.

use crate::api::{Level, LevelLabels, NodeId, TaxonomyNode};
use crate::fl;
use crate::picker::PickerMsg;
use crate::picker::cascade::{Cascade, ColumnState, LevelColumn};
use cosmic::iced::{Alignment, Length};
use cosmic::prelude::*;
use cosmic::widget::{self, icon};
use std::rc::Rc;

/// Builder for the cascade columns widget.
///
/// # Type Parameters
///
/// - `Message`: The parent's message type
pub struct CascadeColumns<'a, Message>
where
    Message: Clone + 'static,
{
    cascade: &'a Cascade,
    labels: LevelLabels,
    on_message: Rc<dyn Fn(PickerMsg) -> Message + 'a>,
    is_checked: Box<dyn Fn(NodeId) -> bool + 'a>,
    levels: Vec<Level>,
    column_width: Length,
    column_height: Length,
    spacing: u16,
}

impl<'a, Message> CascadeColumns<'a, Message>
where
    Message: Clone + 'static,
{
    /// Creates a widget showing all three levels.
    ///
    /// # Arguments
    ///
    /// - `cascade`: The cascade state (owned by the picker)
    /// - `labels`: Level names used for headers and placeholders
    /// - `on_message`: Function to wrap `PickerMsg` into the parent's `Message` type
    pub fn new(
        cascade: &'a Cascade,
        labels: LevelLabels,
        on_message: impl Fn(PickerMsg) -> Message + 'a,
    ) -> Self {
        Self {
            cascade,
            labels,
            on_message: Rc::new(on_message),
            is_checked: Box::new(|_| false),
            levels: Level::ALL.to_vec(),
            column_width: Length::Fixed(240.0),
            column_height: Length::Fill,
            spacing: 4,
        }
    }

    /// Sets the predicate that marks leaves already in the selection.
    pub fn is_checked(mut self, checked: impl Fn(NodeId) -> bool + 'a) -> Self {
        self.is_checked = Box::new(checked);
        self
    }

    /// Shows a single level only.
    pub fn only(mut self, level: Level) -> Self {
        self.levels = vec![level];
        self
    }

    /// Sets the column width strategy.
    ///
    /// Default is `Length::Fixed(240.0)`.
    pub fn column_width(mut self, width: Length) -> Self {
        self.column_width = width;
        self
    }

    /// Sets the column height strategy.
    pub fn column_height(mut self, height: Length) -> Self {
        self.column_height = height;
        self
    }

    /// Sets the spacing between columns.
    pub fn spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    fn message(&self, msg: PickerMsg) -> Message {
        (self.on_message)(msg)
    }

    fn parent_label(&self, level: Level) -> &'static str {
        match level {
            Level::Top | Level::Mid => self.labels.top,
            Level::Leaf => self.labels.mid,
        }
    }

    fn is_selected(&self, level: Level, id: NodeId) -> bool {
        match level {
            Level::Top => self.cascade.selected_top() == Some(id),
            Level::Mid => self.cascade.selected_mid() == Some(id),
            Level::Leaf => (self.is_checked)(id),
        }
    }

    fn render_item(&self, level: Level, node: &TaxonomyNode) -> Element<'a, Message> {
        let is_selected = self.is_selected(level, node.id);

        let mut label = widget::column::with_capacity(2)
            .push(widget::text::body(node.name.clone()))
            .width(Length::Fill);
        if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
            label = label.push(widget::text::caption(description.to_string()));
        }

        let row = match level {
            Level::Leaf => {
                let check = if is_selected {
                    "checkbox-checked-symbolic"
                } else {
                    "checkbox-symbolic"
                };
                widget::row::with_capacity(2)
                    .push(icon::from_name(check).size(16))
                    .push(label)
            }
            Level::Top | Level::Mid => widget::row::with_capacity(2)
                .push(label)
                .push(icon::from_name("go-next-symbolic").size(16)),
        }
        .align_y(Alignment::Center)
        .spacing(8);

        // Checked leaves keep the plain style; the check mark carries the state.
        let container_class = if is_selected && level != Level::Leaf {
            cosmic::style::Container::Primary
        } else {
            cosmic::style::Container::default()
        };

        let msg = match level {
            Level::Top => PickerMsg::SelectTop(node.id),
            Level::Mid => PickerMsg::SelectMid(node.id),
            Level::Leaf => PickerMsg::ToggleLeaf(node.id),
        };

        widget::mouse_area(
            widget::container(row)
                .padding(8)
                .width(Length::Fill)
                .class(container_class),
        )
        .on_press(self.message(msg))
        .into()
    }

    fn render_notice(text: String) -> Element<'a, Message> {
        widget::container(widget::text::caption(text))
            .padding(16)
            .width(Length::Fill)
            .align_x(cosmic::iced::alignment::Horizontal::Center)
            .into()
    }

    fn render_error(&self, level: Level, error: &str) -> Element<'a, Message> {
        widget::container(
            widget::column::with_capacity(4)
                .push(icon::from_name("dialog-error-symbolic").size(24))
                .push(widget::text::body(fl!("load-failed")))
                .push(widget::text::caption(error.to_string()))
                .push(
                    widget::button::standard(fl!("retry"))
                        .on_press(self.message(PickerMsg::Retry(level))),
                )
                .spacing(8)
                .align_x(Alignment::Center),
        )
        .padding(16)
        .width(Length::Fill)
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .into()
    }

    fn render_body(&self, level: Level, column: &LevelColumn) -> Element<'a, Message> {
        match &column.state {
            ColumnState::NotLoaded => Self::render_notice(fl!(
                "choose-parent-first",
                parent = self.parent_label(level)
            )),
            ColumnState::Loading => Self::render_notice(fl!("loading")),
            ColumnState::Error(error) => self.render_error(level, error),
            ColumnState::Loaded(nodes) if nodes.is_empty() => {
                Self::render_notice(fl!("no-items"))
            }
            ColumnState::Loaded(_) => {
                let visible = column.visible();
                if visible.is_empty() {
                    return Self::render_notice(fl!("no-matches"));
                }
                let mut list = widget::column::with_capacity(visible.len()).spacing(2);
                for node in visible {
                    list = list.push(self.render_item(level, node));
                }
                widget::scrollable(list).height(Length::Fill).into()
            }
        }
    }

    /// Renders one level: header, filter box and body.
    fn render_column(&self, level: Level) -> Element<'a, Message> {
        let column = self.cascade.column(level);
        let label = self.labels.of(level);
        let on_message = Rc::clone(&self.on_message);

        let filter = widget::text_input(fl!("filter-placeholder", level = label), &column.filter)
            .on_input(move |text| on_message(PickerMsg::Filter(level, text)))
            .width(Length::Fill);

        let content = widget::column::with_capacity(3)
            .push(widget::text::title4(label))
            .push_maybe(column.state.nodes().map(|_| filter))
            .push(self.render_body(level, column))
            .spacing(8)
            .padding(8);

        widget::container(content)
            .width(self.column_width)
            .height(self.column_height)
            .class(cosmic::style::Container::Card)
            .into()
    }

    /// Builds the widget and returns it as an Element.
    pub fn build(self) -> Element<'a, Message> {
        let mut row = widget::row::with_capacity(self.levels.len()).spacing(self.spacing);

        for level in &self.levels {
            row = row.push(self.render_column(*level));
        }

        widget::container(row)
            .width(Length::Fill)
            .height(self.column_height)
            .into()
    }
}

impl<'a, Message> From<CascadeColumns<'a, Message>> for Element<'a, Message>
where
    Message: Clone + 'static,
{
    fn from(columns: CascadeColumns<'a, Message>) -> Self {
        columns.build()
    }
}

// SPDX-License-Identifier: MPL-2.0

use crate::api::Deployment;
use crate::config::Config;
use crate::fl;
use crate::helpers;
use crate::pages;
use crate::pages::field::TaxonomyField;
use crate::pages::settings::SettingsForm;
use crate::picker::PickerMsg;
use crate::picker::search::SearchKey;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::keyboard::{self, Key, key::Named};
use cosmic::iced::{Event, Length, Subscription, event, window};
use cosmic::prelude::*;
use cosmic::widget::{self, about::About, icon, menu, nav_bar};
use std::collections::HashMap;

const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");
const APP_ICON: &[u8] = include_bytes!("../resources/icons/hicolor/scalable/apps/icon.svg");

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    context_page: ContextPage,
    /// The about page for this app.
    about: About,
    /// Contains items assigned to the nav bar panel.
    nav: nav_bar::Model,
    /// Key bindings for the application's menu bar.
    key_binds: HashMap<menu::KeyBind, MenuAction>,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Cosmic config context for saving
    config_context: Option<cosmic_config::Config>,

    // === App-specific state ===
    /// One picker field per deployment, in `Deployment::ALL` order
    pub fields: Vec<TaxonomyField>,
    /// Last known main window width
    pub window_width: Option<f32>,
    /// Settings inputs (before saving)
    pub settings_form: SettingsForm,
    /// Settings save status
    pub settings_status: SettingsStatus,
    /// Result of the last connection test
    pub connection_status: ConnectionStatus,
    /// Active notifications to display
    pub notifications: Vec<Notification>,
    /// Counter for generating unique notification IDs
    pub notification_id_counter: u32,
}

#[derive(Debug, Clone, Default)]
pub enum SettingsStatus {
    #[default]
    Idle,
    Saved,
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Checking,
    Reachable,
    Error(String),
}

/// Notification level/type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A notification message to display to the user
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u32,
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation & UI
    LaunchUrl(String),
    ToggleContextPage(ContextPage),
    UpdateConfig(Config),
    WindowResized(f32),
    SearchKey(SearchKey),

    // Pickers
    Picker(Deployment, PickerMsg),
    CopyValue(Deployment),

    // Settings inputs
    ResearchUrlChanged(String),
    SkillsUrlChanged(String),
    AuthTokenChanged(String),
    BreakpointChanged(String),
    SearchTimeoutChanged(String),
    SearchLimitChanged(String),
    SaveSettings,
    TestConnection,
    ConnectionResult(Result<(), String>),

    // Notifications
    AddNotification(NotificationLevel, String, String),
    DismissNotification(u32),
    CopyNotification(u32),
}

/// Create a COSMIC application from the app model
impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.hojjatabdollahi.TaxonomyPicker";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // One page per deployment plus settings
        let mut nav = nav_bar::Model::default();

        nav.insert()
            .text(fl!("research-areas"))
            .data::<Page>(Page::Taxonomy(Deployment::ResearchAreas))
            .icon(icon::from_name("accessories-dictionary-symbolic"))
            .activate();

        nav.insert()
            .text(fl!("skills"))
            .data::<Page>(Page::Taxonomy(Deployment::Skills))
            .icon(icon::from_name("applications-science-symbolic"));

        nav.insert()
            .text(fl!("settings"))
            .data::<Page>(Page::Settings)
            .icon(icon::from_name("preferences-system-symbolic"));

        // Create the about widget
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("CARGO_PKG_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let config_context = cosmic_config::Config::new(Self::APP_ID, Config::VERSION).ok();
        let config = config_context
            .as_ref()
            .map(|context| match Config::get_entry(context) {
                Ok(config) => config,
                Err((errors, config)) => {
                    for error in errors {
                        tracing::warn!("config entry error: {}", error);
                    }
                    config
                }
            })
            .unwrap_or_default();

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            nav,
            key_binds: HashMap::new(),
            settings_form: SettingsForm::from_config(&config),
            config,
            config_context,
            fields: Vec::new(),
            window_width: None,
            settings_status: SettingsStatus::Idle,
            connection_status: ConnectionStatus::Unknown,
            notifications: Vec::new(),
            notification_id_counter: 0,
        };

        let load = app.rebuild_fields();
        let title = app.update_title();

        (app, cosmic::task::batch(vec![load, title]))
    }

    /// Elements to pack at the start of the header bar.
    fn header_start(&self) -> Vec<Element<'_, Self::Message>> {
        let menu_bar = menu::bar(vec![menu::Tree::with_children(
            menu::root(fl!("view")).apply(Element::from),
            menu::items(
                &self.key_binds,
                vec![menu::Item::Button(fl!("about"), None, MenuAction::About)],
            ),
        )]);

        vec![menu_bar.into()]
    }

    /// Enables the COSMIC application to create a nav bar with this model.
    fn nav_model(&self) -> Option<&nav_bar::Model> {
        Some(&self.nav)
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match &self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        let space_s = cosmic::theme::spacing().space_s;
        let space_m = cosmic::theme::spacing().space_m;

        let page_content: Element<_> = match self.active_page() {
            Page::Taxonomy(deployment) => match self.field(deployment) {
                Some(field) => pages::field::view(field, space_s, space_m),
                None => widget::text::body(fl!("loading")).into(),
            },
            Page::Settings => pages::settings::view(self, space_s, space_m),
        };

        let mut content_column = widget::column::with_capacity(2).spacing(space_s);

        if !self.notifications.is_empty() {
            let notifications_row = widget::row::with_children(
                self.notifications
                    .iter()
                    .map(pages::widgets::notification_toast),
            )
            .spacing(space_s);
            content_column = content_column.push(notifications_row);
        }

        content_column = content_column.push(page_content);

        widget::container(content_column)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(space_m)
            .into()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        Subscription::batch(vec![
            // Watch for application configuration changes.
            self.core()
                .watch_config::<Config>(Self::APP_ID)
                .map(|update| Message::UpdateConfig(update.config)),
            // Window size for the layout choice, navigation keys for search.
            event::listen_with(window_event),
        ])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        match message {
            Message::ToggleContextPage(context_page) => {
                if self.context_page == context_page {
                    self.core.window.show_context = !self.core.window.show_context;
                } else {
                    self.context_page = context_page;
                    self.core.window.show_context = true;
                }
            }

            Message::UpdateConfig(config) => return self.apply_config(config),

            Message::LaunchUrl(url) => {
                if let Err(err) = open::that_detached(&url) {
                    tracing::warn!("failed to open {:?}: {}", url, err);
                }
            }

            Message::WindowResized(width) => {
                self.window_width = Some(width);
                for field in &mut self.fields {
                    field.picker.update(PickerMsg::Resized(width));
                }
            }

            Message::SearchKey(key) => {
                // Keys go to the open picker of the visible page only.
                if let Page::Taxonomy(deployment) = self.active_page() {
                    if self.field(deployment).is_some_and(|f| f.picker.is_open) {
                        return self.update_picker(deployment, PickerMsg::SearchKey(key));
                    }
                }
            }

            Message::Picker(deployment, msg) => return self.update_picker(deployment, msg),

            Message::CopyValue(deployment) => {
                if let Some(field) = self.field(deployment) {
                    let text = field.value.join(", ");
                    return cosmic::task::future(async move {
                        match helpers::copy_to_clipboard(text).await {
                            Ok(()) => cosmic::Action::App(Message::AddNotification(
                                NotificationLevel::Success,
                                fl!("value-copied"),
                                String::new(),
                            )),
                            Err(e) => cosmic::Action::App(Message::AddNotification(
                                NotificationLevel::Error,
                                fl!("error"),
                                e,
                            )),
                        }
                    });
                }
            }

            // Settings inputs
            Message::ResearchUrlChanged(url) => {
                self.settings_form.research_url = url;
            }

            Message::SkillsUrlChanged(url) => {
                self.settings_form.skills_url = url;
            }

            Message::AuthTokenChanged(token) => {
                self.settings_form.auth_token = token;
            }

            Message::BreakpointChanged(value) => {
                self.settings_form.compact_breakpoint = value;
            }

            Message::SearchTimeoutChanged(value) => {
                self.settings_form.search_timeout_ms = value;
            }

            Message::SearchLimitChanged(value) => {
                self.settings_form.search_limit = value;
            }

            Message::SaveSettings => match self.settings_form.apply(&self.config) {
                Ok(config) => {
                    let rebuild = !config.same_services(&self.config);
                    self.config = config;
                    if let Err(e) = self.write_config() {
                        self.settings_status = SettingsStatus::Error(e.clone());
                        return self.update(Message::AddNotification(
                            NotificationLevel::Error,
                            fl!("error"),
                            e,
                        ));
                    }
                    self.settings_status = SettingsStatus::Saved;
                    let notify = self.update(Message::AddNotification(
                        NotificationLevel::Success,
                        fl!("settings-saved"),
                        String::new(),
                    ));
                    if rebuild {
                        return cosmic::task::batch(vec![notify, self.rebuild_fields()]);
                    }
                    return notify;
                }
                Err(e) => {
                    self.settings_status = SettingsStatus::Error(e);
                }
            },

            Message::TestConnection => match self.settings_form.apply(&self.config) {
                Ok(config) => {
                    self.connection_status = ConnectionStatus::Checking;
                    return cosmic::task::future(async move {
                        let result = helpers::test_connection(config).await;
                        cosmic::Action::App(Message::ConnectionResult(result))
                    });
                }
                Err(e) => {
                    self.connection_status = ConnectionStatus::Error(e);
                }
            },

            Message::ConnectionResult(result) => {
                self.connection_status = match result {
                    Ok(()) => ConnectionStatus::Reachable,
                    Err(e) => {
                        tracing::info!("connection test failed: {}", e);
                        ConnectionStatus::Error(e)
                    }
                };
            }

            // Notifications
            Message::AddNotification(level, title, message) => {
                self.notification_id_counter += 1;
                self.notifications.push(Notification {
                    id: self.notification_id_counter,
                    level,
                    title,
                    message,
                });
            }

            Message::DismissNotification(id) => {
                self.notifications.retain(|n| n.id != id);
            }

            Message::CopyNotification(id) => {
                if let Some(notification) = self.notifications.iter().find(|n| n.id == id) {
                    let text = format!("{}: {}", notification.title, notification.message);
                    return cosmic::task::future(async move {
                        if let Err(e) = helpers::copy_to_clipboard(text).await {
                            tracing::warn!("failed to copy notification: {}", e);
                        }
                        cosmic::Action::App(Message::AddNotification(
                            NotificationLevel::Info,
                            fl!("notification-copied"),
                            String::new(),
                        ))
                    });
                }
            }
        }
        Task::none()
    }

    /// Called when a nav item is selected.
    fn on_nav_select(&mut self, id: nav_bar::Id) -> Task<cosmic::Action<Self::Message>> {
        self.nav.activate(id);
        self.update_title()
    }
}

impl AppModel {
    /// Updates the header and window titles.
    pub fn update_title(&mut self) -> Task<cosmic::Action<Message>> {
        let mut window_title = fl!("app-title");

        if let Some(page) = self.nav.text(self.nav.active()) {
            window_title.push_str(" — ");
            window_title.push_str(page);
        }

        if let Some(id) = self.core.main_window_id() {
            self.set_window_title(window_title, id)
        } else {
            Task::none()
        }
    }

    fn active_page(&self) -> Page {
        self.nav.active_data::<Page>().copied().unwrap_or_default()
    }

    fn field(&self, deployment: Deployment) -> Option<&TaxonomyField> {
        self.fields.iter().find(|f| f.deployment == deployment)
    }

    /// Recreates both pickers from the current config and starts loading them.
    fn rebuild_fields(&mut self) -> Task<cosmic::Action<Message>> {
        let mut tasks = Vec::with_capacity(Deployment::ALL.len());
        let mut fields = Vec::with_capacity(Deployment::ALL.len());

        for deployment in Deployment::ALL {
            let (mut field, outcome) = TaxonomyField::new(deployment, &self.config);
            if let Some(width) = self.window_width {
                field.picker.update(PickerMsg::Resized(width));
            }
            tasks.push(helpers::run_effects(&field.source, deployment, outcome.effects));
            fields.push(field);
        }

        tracing::info!("loaded taxonomy pickers");
        self.fields = fields;
        cosmic::task::batch(tasks)
    }

    /// Feeds a message to one picker, runs its effects and applies its events.
    fn update_picker(
        &mut self,
        deployment: Deployment,
        msg: PickerMsg,
    ) -> Task<cosmic::Action<Message>> {
        let Some(field) = self.fields.iter_mut().find(|f| f.deployment == deployment) else {
            return Task::none();
        };

        let outcome = field.picker.update(msg);
        let effects = helpers::run_effects(&field.source, deployment, outcome.effects);

        let mut finished = false;
        for event in &outcome.events {
            finished |= field.absorb(event);
        }

        if finished {
            return cosmic::task::batch(vec![effects, self.save_value(deployment)]);
        }
        effects
    }

    /// Persists the committed value of one picker.
    fn save_value(&mut self, deployment: Deployment) -> Task<cosmic::Action<Message>> {
        let Some(value) = self.field(deployment).map(|f| f.value.clone()) else {
            return Task::none();
        };
        let count = value.len();
        *self.config.value_mut(deployment) = value;

        match self.write_config() {
            Ok(()) => self.update(Message::AddNotification(
                NotificationLevel::Success,
                fl!("selection-saved"),
                fl!("selection-count", count = count),
            )),
            Err(e) => self.update(Message::AddNotification(
                NotificationLevel::Error,
                fl!("error"),
                e,
            )),
        }
    }

    fn write_config(&self) -> Result<(), String> {
        let Some(context) = self.config_context.as_ref() else {
            return Ok(());
        };
        self.config.write_entry(context).map_err(|e| {
            tracing::warn!("failed to save config: {}", e);
            format!("Failed to save: {}", e)
        })
    }

    /// Applies a config change made outside the settings page.
    fn apply_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        if config == self.config {
            return Task::none();
        }

        let rebuild = !config.same_services(&self.config);
        self.config = config;
        self.settings_form = SettingsForm::from_config(&self.config);

        if rebuild {
            return self.rebuild_fields();
        }

        // The owner replaced the value; pickers follow without reporting back.
        let mut tasks = Vec::with_capacity(self.fields.len());
        for field in &mut self.fields {
            let outcome = field.set_value(self.config.value(field.deployment).to_vec());
            tasks.push(helpers::run_effects(
                &field.source,
                field.deployment,
                outcome.effects,
            ));
        }
        cosmic::task::batch(tasks)
    }
}

/// Maps runtime events to app messages.
fn window_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size.width)),
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: Key::Named(named),
            ..
        }) => {
            let key = match named {
                Named::ArrowDown => SearchKey::Down,
                Named::ArrowUp => SearchKey::Up,
                Named::Escape => SearchKey::Escape,
                _ => return None,
            };
            Some(Message::SearchKey(key))
        }
        _ => None,
    }
}

/// The page to display in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Taxonomy(Deployment),
    Settings,
}

impl Default for Page {
    fn default() -> Self {
        Page::Taxonomy(Deployment::default())
    }
}

/// The context page to display in the context drawer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuAction {
    About,
}

impl menu::action::MenuAction for MenuAction {
    type Message = Message;

    fn message(&self) -> Self::Message {
        match self {
            MenuAction::About => Message::ToggleContextPage(ContextPage::About),
        }
    }
}

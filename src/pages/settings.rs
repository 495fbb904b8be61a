// SPDX-License-Identifier: MPL-2.0

//! Settings page view for the taxonomy picker application.

use crate::app::{AppModel, ConnectionStatus, Message, SettingsStatus};
use crate::config::Config;
use crate::fl;
use cosmic::iced::{Alignment, Length};
use cosmic::prelude::*;
use cosmic::widget;

/// Unsaved contents of the settings inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub research_url: String,
    pub skills_url: String,
    pub auth_token: String,
    pub compact_breakpoint: String,
    pub search_timeout_ms: String,
    pub search_limit: String,
}

impl SettingsForm {
    pub fn from_config(config: &Config) -> Self {
        Self {
            research_url: config.research_url.clone(),
            skills_url: config.skills_url.clone(),
            auth_token: config.auth_token.clone(),
            compact_breakpoint: config.compact_breakpoint.to_string(),
            search_timeout_ms: config.search_timeout_ms.to_string(),
            search_limit: config.search_limit.to_string(),
        }
    }

    /// Returns `config` with the form applied, or the first invalid input.
    pub fn apply(&self, config: &Config) -> Result<Config, String> {
        let research_url = self.research_url.trim();
        let skills_url = self.skills_url.trim();
        for url in [research_url, skills_url] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{}: {}", fl!("invalid-url"), url));
            }
        }

        let number = |text: &str, name: String| {
            text.trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("{}: {}", fl!("invalid-number"), name))
        };
        let compact_breakpoint = number(&self.compact_breakpoint, fl!("compact-breakpoint"))?;
        let search_timeout_ms = number(&self.search_timeout_ms, fl!("search-timeout"))?;
        let search_limit = number(&self.search_limit, fl!("search-limit"))?;

        Ok(Config {
            research_url: research_url.to_string(),
            skills_url: skills_url.to_string(),
            auth_token: self.auth_token.trim().to_string(),
            compact_breakpoint: u32::try_from(compact_breakpoint).map_err(|e| e.to_string())?,
            search_timeout_ms,
            search_limit: u32::try_from(search_limit).map_err(|e| e.to_string())?,
            ..config.clone()
        })
    }
}

/// View for the Settings page
pub fn view(app: &AppModel, space_s: u16, space_m: u16) -> Element<'_, Message> {
    let header = widget::text::title1(fl!("settings"));
    let form = &app.settings_form;

    let services_section = cosmic::widget::settings::section()
        .title(fl!("services"))
        .add(
            cosmic::widget::settings::item::builder(fl!("research-url"))
                .description(fl!("research-url-description"))
                .control(
                    widget::text_input(fl!("url-placeholder"), &form.research_url)
                        .on_input(Message::ResearchUrlChanged)
                        .width(Length::Fixed(300.0)),
                ),
        )
        .add(
            cosmic::widget::settings::item::builder(fl!("skills-url"))
                .description(fl!("skills-url-description"))
                .control(
                    widget::text_input(fl!("url-placeholder"), &form.skills_url)
                        .on_input(Message::SkillsUrlChanged)
                        .width(Length::Fixed(300.0)),
                ),
        )
        .add(
            cosmic::widget::settings::item::builder(fl!("auth-token"))
                .description(fl!("auth-token-description"))
                .control(
                    widget::secure_input(
                        fl!("auth-token-placeholder"),
                        &form.auth_token,
                        None,
                        true,
                    )
                    .on_input(Message::AuthTokenChanged)
                    .width(Length::Fixed(300.0)),
                ),
        );

    let picker_section = cosmic::widget::settings::section()
        .title(fl!("picker"))
        .add(
            cosmic::widget::settings::item::builder(fl!("compact-breakpoint"))
                .description(fl!("compact-breakpoint-description"))
                .control(
                    widget::text_input("768", &form.compact_breakpoint)
                        .on_input(Message::BreakpointChanged)
                        .width(Length::Fixed(120.0)),
                ),
        )
        .add(
            cosmic::widget::settings::item::builder(fl!("search-timeout"))
                .description(fl!("search-timeout-description"))
                .control(
                    widget::text_input("5000", &form.search_timeout_ms)
                        .on_input(Message::SearchTimeoutChanged)
                        .width(Length::Fixed(120.0)),
                ),
        )
        .add(
            cosmic::widget::settings::item::builder(fl!("search-limit"))
                .description(fl!("search-limit-description"))
                .control(
                    widget::text_input("20", &form.search_limit)
                        .on_input(Message::SearchLimitChanged)
                        .width(Length::Fixed(120.0)),
                ),
        );

    let connection_status_text = match &app.connection_status {
        ConnectionStatus::Unknown => String::new(),
        ConnectionStatus::Checking => fl!("status-checking"),
        ConnectionStatus::Reachable => fl!("status-reachable"),
        ConnectionStatus::Error(e) => format!("{}: {}", fl!("status-error"), e),
    };

    let save_status_text = match &app.settings_status {
        SettingsStatus::Idle => String::new(),
        SettingsStatus::Saved => fl!("settings-saved"),
        SettingsStatus::Error(e) => e.clone(),
    };

    let test_button = if matches!(app.connection_status, ConnectionStatus::Checking) {
        widget::button::standard(fl!("test-connection"))
    } else {
        widget::button::standard(fl!("test-connection")).on_press(Message::TestConnection)
    };

    let mut buttons = widget::row::with_capacity(4)
        .push(widget::button::suggested(fl!("save")).on_press(Message::SaveSettings))
        .push(test_button)
        .push(widget::text::body(connection_status_text))
        .spacing(space_s)
        .align_y(Alignment::Center);

    if !save_status_text.is_empty() {
        let status_style = match &app.settings_status {
            SettingsStatus::Saved => cosmic::theme::Button::Suggested,
            SettingsStatus::Error(_) => cosmic::theme::Button::Destructive,
            SettingsStatus::Idle => cosmic::theme::Button::Standard,
        };
        buttons = buttons.push(
            widget::button::custom(widget::text::caption(save_status_text)).class(status_style),
        );
    }

    widget::scrollable(
        widget::column::with_capacity(4)
            .push(header)
            .push(services_section)
            .push(picker_section)
            .push(buttons)
            .spacing(space_m)
            .width(Length::Fill),
    )
    .height(Length::Fill)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_round_trips_config() {
        let config = Config::default();
        let form = SettingsForm::from_config(&config);
        assert_eq!(form.apply(&config), Ok(config));
    }

    #[test]
    fn test_form_rejects_bad_input() {
        let config = Config::default();
        let mut form = SettingsForm::from_config(&config);
        form.search_limit = "many".into();
        assert!(form.apply(&config).is_err());

        let mut form = SettingsForm::from_config(&config);
        form.compact_breakpoint = "0".into();
        assert!(form.apply(&config).is_err());

        let mut form = SettingsForm::from_config(&config);
        form.skills_url = "localhost:8080".into();
        assert!(form.apply(&config).is_err());
    }

    #[test]
    fn test_form_keeps_saved_values() {
        let mut config = Config::default();
        config.research_value = vec!["1-2-3".into()];
        let mut form = SettingsForm::from_config(&config);
        form.research_url = " https://taxonomy.example.org/api ".into();

        let applied = form.apply(&config).unwrap();
        assert_eq!(applied.research_url, "https://taxonomy.example.org/api");
        assert_eq!(applied.research_value, vec!["1-2-3"]);
    }
}

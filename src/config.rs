// SPDX-License-Identifier: MPL-2.0

use crate::api::Deployment;
use crate::api::source::SEARCH_LIMIT;
use crate::api::taxonomy::DEFAULT_SEARCH_TIMEOUT;
use crate::picker::layout::COMPACT_BREAKPOINT;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use std::time::Duration;

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq)]
#[version = 1]
pub struct Config {
    /// Base URL of the research-area taxonomy service
    pub research_url: String,
    /// Base URL of the skills taxonomy service
    pub skills_url: String,
    /// Bearer token sent to both services (empty for none)
    pub auth_token: String,
    /// Window width below which the compact wizard is used
    pub compact_breakpoint: u32,
    /// Client-side timeout for search requests
    pub search_timeout_ms: u64,
    /// Maximum number of search results
    pub search_limit: u32,
    /// Last value committed on the research areas page
    pub research_value: Vec<String>,
    /// Last value committed on the skills page
    pub skills_value: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            research_url: String::from("http://localhost:8080/api"),
            skills_url: String::from("http://localhost:8080/api"),
            auth_token: String::new(),
            compact_breakpoint: COMPACT_BREAKPOINT as u32,
            search_timeout_ms: DEFAULT_SEARCH_TIMEOUT.as_millis() as u64,
            search_limit: SEARCH_LIMIT as u32,
            research_value: Vec::new(),
            skills_value: Vec::new(),
        }
    }
}

impl Config {
    pub fn base_url(&self, deployment: Deployment) -> &str {
        match deployment {
            Deployment::ResearchAreas => &self.research_url,
            Deployment::Skills => &self.skills_url,
        }
    }

    pub fn value(&self, deployment: Deployment) -> &[String] {
        match deployment {
            Deployment::ResearchAreas => &self.research_value,
            Deployment::Skills => &self.skills_value,
        }
    }

    pub fn value_mut(&mut self, deployment: Deployment) -> &mut Vec<String> {
        match deployment {
            Deployment::ResearchAreas => &mut self.research_value,
            Deployment::Skills => &mut self.skills_value,
        }
    }

    pub fn search_timeout(&self) -> Duration {
        if self.search_timeout_ms == 0 {
            return DEFAULT_SEARCH_TIMEOUT;
        }
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn breakpoint(&self) -> f32 {
        if self.compact_breakpoint == 0 {
            return COMPACT_BREAKPOINT;
        }
        self.compact_breakpoint as f32
    }

    pub fn search_limit(&self) -> usize {
        (self.search_limit as usize).max(1)
    }

    /// True if both configs talk to the services the same way.
    pub fn same_services(&self, other: &Config) -> bool {
        self.research_url == other.research_url
            && self.skills_url == other.skills_url
            && self.auth_token == other.auth_token
            && self.compact_breakpoint == other.compact_breakpoint
            && self.search_timeout_ms == other.search_timeout_ms
            && self.search_limit == other.search_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let config = Config {
            compact_breakpoint: 0,
            search_timeout_ms: 0,
            search_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.breakpoint(), COMPACT_BREAKPOINT);
        assert_eq!(config.search_timeout(), DEFAULT_SEARCH_TIMEOUT);
        assert_eq!(config.search_limit(), 1);
    }

    #[test]
    fn test_value_per_deployment() {
        let mut config = Config::default();
        config
            .value_mut(Deployment::Skills)
            .push("1-2-3".to_string());
        assert!(config.value(Deployment::ResearchAreas).is_empty());
        assert_eq!(config.value(Deployment::Skills), ["1-2-3".to_string()]);
        assert!(config.same_services(&Config::default()));
    }
}

// SPDX-License-Identifier: MPL-2.0

//! Async helper functions for the taxonomy picker application.
//! These connect picker effects to the taxonomy services.

use crate::api::source::UnavailableSource;
use crate::api::{Deployment, TaxonomyClient, TaxonomySource};
use crate::app::Message;
use crate::config::Config;
use crate::picker::{Effect, effects};
use cosmic::prelude::*;
use std::sync::Arc;

/// Builds the taxonomy source for a deployment from the saved settings.
pub fn build_source(config: &Config, deployment: Deployment) -> Arc<dyn TaxonomySource> {
    match TaxonomyClient::new(
        config.base_url(deployment),
        &config.auth_token,
        deployment,
        config.search_timeout(),
    ) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            tracing::warn!(
                "cannot create {} client: {}",
                deployment.as_str(),
                error
            );
            Arc::new(UnavailableSource { error })
        }
    }
}

/// Runs picker effects in the background and routes the results back to the
/// picker of `deployment`.
pub fn run_effects(
    source: &Arc<dyn TaxonomySource>,
    deployment: Deployment,
    pending: Vec<Effect>,
) -> Task<cosmic::Action<Message>> {
    if pending.is_empty() {
        return Task::none();
    }

    let tasks: Vec<_> = pending
        .into_iter()
        .map(|effect| {
            let source = Arc::clone(source);
            cosmic::task::future(async move {
                let msg = effects::perform(source, effect).await;
                cosmic::Action::App(Message::Picker(deployment, msg))
            })
        })
        .collect();

    cosmic::task::batch(tasks)
}

/// Puts text on the system clipboard.
pub async fn copy_to_clipboard(text: String) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(text).map_err(|e| e.to_string())
}

/// Checks that both taxonomy services answer a Top list request.
pub async fn test_connection(config: Config) -> Result<(), String> {
    for deployment in Deployment::ALL {
        build_source(&config, deployment)
            .list_top()
            .await
            .map_err(|e| format!("{}: {}", deployment.as_str(), e))?;
    }
    Ok(())
}

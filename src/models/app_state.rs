use std::time::Duration;

use crate::interfaces::Converter;
use crate::settings::Settings;
use crate::storage::MemoryStore;
use crate::utils::http::RemoteTemplates;

/// Application state structure for the web server
#[derive(Debug)]
pub struct AppState<T = RemoteTemplates, S = MemoryStore> {
    /// Converts stored submissions, owns the template source
    pub converter: Converter<T>,

    /// Where submissions live until they expire
    pub store: S,

    /// Time-to-live given to new submissions
    pub submission_ttl: Duration,
}

impl<T, S> AppState<T, S> {
    pub fn new(converter: Converter<T>, store: S, submission_ttl: Duration) -> Self {
        Self {
            converter,
            store,
            submission_ttl,
        }
    }
}

impl AppState {
    /// Build the production state: remote templates and an in-memory store
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Converter::new(RemoteTemplates::from_settings(&settings.templates)),
            MemoryStore::new(),
            Duration::from_secs(settings.storage.ttl),
        )
    }
}

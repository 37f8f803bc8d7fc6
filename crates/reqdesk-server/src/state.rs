use chrono::NaiveDate;
use reqdesk_core::classifier::Classifier;
use reqdesk_core::config::Config;
use reqdesk_core::document::Synthesizer;
use reqdesk_core::id::IdAllocator;
use reqdesk_core::webhook::Dispatcher;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
///
/// Catalog and related-specs tables are built once from config and shared
/// read-only; the id allocator is the only interior mutability.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Classifier,
    pub synthesizer: Synthesizer,
    pub dispatcher: Dispatcher,
    pub ids: Arc<IdAllocator>,
}

impl AppState {
    pub fn from_config(config: &Config) -> reqdesk_core::Result<Self> {
        let catalog = Arc::new(config.catalog()?);
        let classifier = Classifier::new(catalog);
        Ok(Self {
            dispatcher: Dispatcher::new(classifier.clone()),
            classifier,
            synthesizer: Synthesizer::new(Arc::new(config.related_specs())),
            ids: Arc::new(IdAllocator::new(config.ids.policy)),
        })
    }

    /// Calendar day stamped on generated documents and ids.
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

impl Default for AppState {
    fn default() -> Self {
        let classifier = Classifier::default();
        Self {
            dispatcher: Dispatcher::new(classifier.clone()),
            classifier,
            synthesizer: Synthesizer::default(),
            ids: Arc::new(IdAllocator::default()),
        }
    }
}

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::api::NotificationEvent;
use crate::clients::JobSpyClient;
use crate::config::Config;
use crate::services::{JobSearchService, SearchDispatcher};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub search_service: Arc<dyn JobSearchService>,

    pub dispatcher: SearchDispatcher,

    pub event_bus: broadcast::Sender<NotificationEvent>,
}

impl SharedState {
    /// Builds state backed by the configured JobSpy API.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = JobSpyClient::new(&config.service)?;
        Ok(Self::with_service(config, Arc::new(client)))
    }

    /// Builds state around any [`JobSearchService`], e.g. a stub in tests.
    #[must_use]
    pub fn with_service(config: Config, search_service: Arc<dyn JobSearchService>) -> Self {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size.max(1));
        let dispatcher =
            SearchDispatcher::new(search_service.clone()).with_event_bus(event_bus.clone());

        Self {
            config: Arc::new(config),
            search_service,
            dispatcher,
            event_bus,
        }
    }
}

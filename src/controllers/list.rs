use crate::config::Timings;
use crate::domain::{Satellite, SatelliteRepository};
use crate::errors::ErrorMessageProvider;
use crate::mvi::{debounce, EffectQueue, EventBus, Scope, StateCell, StateStream};
use serde::Serialize;
use std::sync::Arc;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    LoadSatellites,
    SearchQueryChanged(String),
}

/// State of the satellite list screen.
///
/// `filtered_satellites` is the subset of `satellites` whose name contains
/// `search_query`, ignoring case; all of them when the query is blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListUiState {
    pub is_loading: bool,
    pub satellites: Vec<Satellite>,
    pub filtered_satellites: Vec<Satellite>,
    pub search_query: String,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum ListEffect {
    ShowError(String),
}

pub fn filter_satellites(satellites: &[Satellite], query: &str) -> Vec<Satellite> {
    if query.trim().is_empty() {
        return satellites.to_vec();
    }
    let needle = query.to_lowercase();
    satellites
        .iter()
        .filter(|satellite| satellite.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

struct ListContext {
    state: StateCell<ListUiState>,
    effects: EffectQueue<ListEffect>,
    repository: Arc<dyn SatelliteRepository>,
    messages: Arc<dyn ErrorMessageProvider>,
    scope: Scope,
}

impl ListContext {
    fn handle_event(self: &Arc<Self>, event: ListEvent) {
        debug!(?event, "list event");
        match event {
            ListEvent::LoadSatellites => {
                let context = self.clone();
                self.scope.launch(async move { context.load_satellites().await });
            }
            ListEvent::SearchQueryChanged(query) => self.state.update(|s| ListUiState {
                search_query: query,
                ..s.clone()
            }),
        }
    }

    async fn load_satellites(&self) {
        self.state.update(|s| ListUiState {
            is_loading: true,
            error_message: None,
            ..s.clone()
        });

        match self.repository.get_satellites().await {
            Ok(satellites) => {
                info!(count = satellites.len(), "satellites loaded");
                self.state.update(|s| {
                    let filtered_satellites = filter_satellites(&satellites, &s.search_query);
                    ListUiState {
                        is_loading: false,
                        satellites,
                        filtered_satellites,
                        error_message: None,
                        ..s.clone()
                    }
                });
            }
            Err(failure) => {
                let message = self.messages.from_failure(&failure);
                warn!(%failure, "loading satellites failed");
                // The previously loaded list stays visible.
                self.state.update(|s| ListUiState {
                    is_loading: false,
                    error_message: Some(message.clone()),
                    ..s.clone()
                });
                self.effects.send(ListEffect::ShowError(message));
            }
        }
    }

    fn apply_filter(&self, query: &str) {
        self.state.update(|s| ListUiState {
            filtered_satellites: filter_satellites(&s.satellites, query),
            ..s.clone()
        });
        debug!(query, "satellite filter applied");
    }
}

/// Controller of the satellite list screen
pub struct ListController {
    context: Arc<ListContext>,
    events: EventBus<ListEvent>,
}

impl ListController {
    /// Must be called from within a tokio runtime.
    pub fn new(
        repository: Arc<dyn SatelliteRepository>,
        messages: Arc<dyn ErrorMessageProvider>,
        timings: Timings,
    ) -> Self {
        let context = Arc::new(ListContext {
            state: StateCell::new(ListUiState::default()),
            effects: EffectQueue::new(),
            repository,
            messages,
            scope: Scope::new(),
        });
        let events = EventBus::new();

        let mut intents = events.subscribe();
        let handler = context.clone();
        context.scope.launch(async move {
            while let Some(event) = intents.next().await {
                handler.handle_event(event);
            }
        });

        let queries = events.subscribe().filter_map(|event| match event {
            ListEvent::SearchQueryChanged(query) => Some(query),
            ListEvent::LoadSatellites => None,
        });
        let filter = context.clone();
        context.scope.launch(async move {
            let debounced = debounce(queries, timings.search_debounce);
            tokio::pin!(debounced);
            while let Some(query) = debounced.next().await {
                filter.apply_filter(&query);
            }
        });

        Self { context, events }
    }

    pub fn dispatch(&self, event: ListEvent) {
        self.events.emit(event);
    }

    pub fn state(&self) -> ListUiState {
        self.context.state.current()
    }

    pub fn subscribe(&self) -> StateStream<ListUiState> {
        self.context.state.subscribe()
    }

    pub fn effects(&self) -> impl Stream<Item = ListEffect> + Send + 'static {
        self.context.effects.effects()
    }

    pub async fn next_effect(&self) -> Option<ListEffect> {
        self.context.effects.next().await
    }

    pub fn try_next_effect(&self) -> Option<ListEffect> {
        self.context.effects.try_next()
    }

    /// Cancel all work and wait for it to stop
    pub async fn close(self) {
        self.context.scope.shutdown().await;
        debug!("list controller closed");
    }
}

impl Drop for ListController {
    fn drop(&mut self) {
        self.context.scope.cancel();
    }
}

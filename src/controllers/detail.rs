use crate::config::Timings;
use crate::domain::{Position, SatelliteDetail, SatelliteId, SatelliteRepository};
use crate::errors::ErrorMessageProvider;
use crate::mvi::{EffectQueue, EventBus, Scope, StateCell, StateStream};
use async_stream::stream;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEvent {
    LoadSatelliteDetail,
}

/// State of the satellite detail screen.
///
/// The detail fetch and the position replay write disjoint fields, except
/// `error`, which either of them may set without touching the other's data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailUiState {
    pub is_loading: bool,
    pub satellite_detail: Option<SatelliteDetail>,
    pub current_position: Option<Position>,
    pub error: Option<String>,
}

impl Default for DetailUiState {
    fn default() -> Self {
        Self {
            is_loading: true,
            satellite_detail: None,
            current_position: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum DetailEffect {
    ShowError(String),
}

/// Replay a recorded trajectory: the first position right away, each next
/// one after `interval`. Finite; consumes the positions.
pub fn position_ticks(
    positions: Vec<Position>,
    interval: Duration,
) -> impl Stream<Item = Position> + Send {
    stream! {
        let mut first = true;
        for position in positions {
            if !first {
                tokio::time::sleep(interval).await;
            }
            first = false;
            yield position;
        }
    }
}

struct DetailContext {
    satellite_id: SatelliteId,
    position_interval: Duration,
    state: StateCell<DetailUiState>,
    effects: EffectQueue<DetailEffect>,
    repository: Arc<dyn SatelliteRepository>,
    messages: Arc<dyn ErrorMessageProvider>,
    scope: Scope,
}

impl DetailContext {
    fn handle_event(self: &Arc<Self>, event: DetailEvent) {
        debug!(?event, satellite_id = self.satellite_id, "detail event");
        match event {
            DetailEvent::LoadSatelliteDetail => {
                let context = self.clone();
                self.scope.launch(async move { context.fetch_detail().await });
                let context = self.clone();
                self.scope.launch(async move { context.stream_positions().await });
            }
        }
    }

    async fn fetch_detail(&self) {
        self.state.update(|s| DetailUiState {
            is_loading: true,
            ..s.clone()
        });

        match self.repository.get_satellite_detail(self.satellite_id).await {
            Ok(detail) => {
                info!(satellite_id = self.satellite_id, "satellite detail loaded");
                self.state.update(|s| DetailUiState {
                    is_loading: false,
                    satellite_detail: Some(detail),
                    ..s.clone()
                });
            }
            Err(failure) => {
                warn!(satellite_id = self.satellite_id, %failure, "loading satellite detail failed");
                let message = self.messages.from_failure(&failure);
                self.state.update(|s| DetailUiState {
                    is_loading: false,
                    error: Some(message.clone()),
                    ..s.clone()
                });
                self.effects.send(DetailEffect::ShowError(message));
            }
        }
    }

    async fn stream_positions(&self) {
        match self.repository.get_positions(self.satellite_id).await {
            Ok(list) => {
                info!(
                    satellite_id = self.satellite_id,
                    count = list.positions.len(),
                    "replaying positions"
                );
                let ticks = position_ticks(list.positions, self.position_interval);
                tokio::pin!(ticks);
                while let Some(position) = ticks.next().await {
                    self.state.update(|s| DetailUiState {
                        current_position: Some(position),
                        ..s.clone()
                    });
                }
                debug!(satellite_id = self.satellite_id, "position replay finished");
            }
            Err(failure) => {
                warn!(satellite_id = self.satellite_id, %failure, "loading positions failed");
                let message = self.messages.from_failure(&failure);
                self.state.update(|s| DetailUiState {
                    error: Some(message.clone()),
                    ..s.clone()
                });
                self.effects.send(DetailEffect::ShowError(message));
            }
        }
    }
}

/// Controller of the satellite detail screen.
///
/// Bound to one satellite for its whole life. Position replay stops when the
/// controller is dropped or closed.
pub struct DetailController {
    context: Arc<DetailContext>,
    events: EventBus<DetailEvent>,
}

impl DetailController {
    /// Must be called from within a tokio runtime.
    pub fn new(
        satellite_id: SatelliteId,
        repository: Arc<dyn SatelliteRepository>,
        messages: Arc<dyn ErrorMessageProvider>,
        timings: Timings,
    ) -> Self {
        let context = Arc::new(DetailContext {
            satellite_id,
            position_interval: timings.position_interval,
            state: StateCell::new(DetailUiState::default()),
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

        Self { context, events }
    }

    pub fn satellite_id(&self) -> SatelliteId {
        self.context.satellite_id
    }

    pub fn dispatch(&self, event: DetailEvent) {
        self.events.emit(event);
    }

    pub fn state(&self) -> DetailUiState {
        self.context.state.current()
    }

    pub fn subscribe(&self) -> StateStream<DetailUiState> {
        self.context.state.subscribe()
    }

    pub fn effects(&self) -> impl Stream<Item = DetailEffect> + Send + 'static {
        self.context.effects.effects()
    }

    pub async fn next_effect(&self) -> Option<DetailEffect> {
        self.context.effects.next().await
    }

    pub fn try_next_effect(&self) -> Option<DetailEffect> {
        self.context.effects.try_next()
    }

    /// Cancel the replay and any pending fetch, and wait for them to stop.
    /// No state update happens after this returns.
    pub async fn close(self) {
        self.context.scope.shutdown().await;
        debug!(satellite_id = self.context.satellite_id, "detail controller closed");
    }
}

impl Drop for DetailController {
    fn drop(&mut self) {
        self.context.scope.cancel();
    }
}

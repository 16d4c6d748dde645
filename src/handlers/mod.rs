/// HTTP view adapter: turns requests into intents and renders state snapshots
use crate::config::Timings;
use crate::controllers::{
    DetailController, DetailEffect, DetailEvent, DetailUiState, ListController, ListEffect,
    ListEvent, ListUiState,
};
use crate::domain::{SatelliteId, SatelliteRepository};
use crate::errors::{ErrorMessageProvider, ViewError};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub list: Arc<ListController>,
    /// Detail screen currently navigated to, if any
    pub detail: Arc<Mutex<Option<DetailController>>>,
    pub repository: Arc<dyn SatelliteRepository>,
    pub messages: Arc<dyn ErrorMessageProvider>,
    pub timings: Timings,
}

impl AppState {
    pub fn new(
        list: ListController,
        repository: Arc<dyn SatelliteRepository>,
        messages: Arc<dyn ErrorMessageProvider>,
        timings: Timings,
    ) -> Self {
        Self {
            list: Arc::new(list),
            detail: Arc::new(Mutex::new(None)),
            repository,
            messages,
            timings,
        }
    }
}

/// Successful response wrapper
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct Closed {
    pub closed: Option<SatelliteId>,
}

/// One-shot effects drained from both screens
#[derive(Debug, Default, Serialize)]
pub struct PendingEffects {
    pub list: Vec<ListEffect>,
    pub detail: Vec<DetailEffect>,
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

pub async fn list_state(State(state): State<AppState>) -> Json<SuccessResponse<ListUiState>> {
    Json(SuccessResponse::new(state.list.state()))
}

pub async fn load_satellites(
    State(state): State<AppState>,
) -> Json<SuccessResponse<ListUiState>> {
    state.list.dispatch(ListEvent::LoadSatellites);
    Json(SuccessResponse::new(state.list.state()))
}

pub async fn search_satellites(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Json<SuccessResponse<ListUiState>> {
    state.list.dispatch(ListEvent::SearchQueryChanged(params.q));
    Json(SuccessResponse::new(state.list.state()))
}

/// Navigate to the detail screen of `id`, leaving the previous one
pub async fn open_detail(
    Path(id): Path<SatelliteId>,
    State(state): State<AppState>,
) -> Json<SuccessResponse<DetailUiState>> {
    let mut open = state.detail.lock().await;
    if let Some(previous) = open.take() {
        info!(from = previous.satellite_id(), to = id, "leaving detail screen");
        previous.close().await;
    }

    let controller = DetailController::new(
        id,
        state.repository.clone(),
        state.messages.clone(),
        state.timings,
    );
    controller.dispatch(DetailEvent::LoadSatelliteDetail);
    let snapshot = controller.state();
    *open = Some(controller);

    Json(SuccessResponse::new(snapshot))
}

pub async fn detail_state(
    Path(id): Path<SatelliteId>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<DetailUiState>>, ViewError> {
    let open = state.detail.lock().await;
    match open.as_ref() {
        Some(controller) if controller.satellite_id() == id => {
            Ok(Json(SuccessResponse::new(controller.state())))
        }
        Some(controller) => Err(ViewError::OtherDetailOpen {
            requested: id,
            open: controller.satellite_id(),
        }),
        None => Err(ViewError::NoDetailOpen),
    }
}

/// Navigate back from the detail screen
pub async fn close_detail(State(state): State<AppState>) -> Json<SuccessResponse<Closed>> {
    let previous = state.detail.lock().await.take();
    let closed = match previous {
        Some(controller) => {
            let id = controller.satellite_id();
            controller.close().await;
            Some(id)
        }
        None => None,
    };
    Json(SuccessResponse::new(Closed { closed }))
}

pub async fn drain_effects(State(state): State<AppState>) -> Json<SuccessResponse<PendingEffects>> {
    let mut pending = PendingEffects::default();
    while let Some(effect) = state.list.try_next_effect() {
        pending.list.push(effect);
    }
    if let Some(controller) = state.detail.lock().await.as_ref() {
        while let Some(effect) = controller.try_next_effect() {
            pending.detail.push(effect);
        }
    }
    Json(SuccessResponse::new(pending))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::{sample_detail, wait_for, FakeRepository};
    use crate::domain::Satellite;
    use crate::errors::{DefaultErrorMessages, Failure};

    fn app_state(repository: FakeRepository) -> AppState {
        let repository: Arc<dyn SatelliteRepository> = Arc::new(repository);
        let messages: Arc<dyn ErrorMessageProvider> = Arc::new(DefaultErrorMessages);
        let list = ListController::new(repository.clone(), messages.clone(), Timings::default());
        AppState::new(list, repository, messages, Timings::default())
    }

    #[tokio::test]
    async fn test_load_dispatches_and_list_state_reflects_result() {
        let state = app_state(
            FakeRepository::new().with_satellites(vec![Ok(vec![Satellite::new(1, "GPS", true)])]),
        );
        let mut states = state.list.subscribe();

        let Json(response) = load_satellites(State(state.clone())).await;
        assert!(response.ok);
        wait_for(&mut states, |s| !s.satellites.is_empty()).await;

        let Json(response) = list_state(State(state)).await;
        assert_eq!(response.data.satellites, vec![Satellite::new(1, "GPS", true)]);
    }

    #[tokio::test]
    async fn test_detail_state_requires_the_open_screen() {
        let state = app_state(FakeRepository::new().with_detail(Ok(sample_detail(4))));

        assert_eq!(
            detail_state(Path(4), State(state.clone())).await.unwrap_err(),
            ViewError::NoDetailOpen
        );

        open_detail(Path(4), State(state.clone())).await;
        assert!(detail_state(Path(4), State(state.clone())).await.is_ok());
        assert_eq!(
            detail_state(Path(5), State(state.clone())).await.unwrap_err(),
            ViewError::OtherDetailOpen {
                requested: 5,
                open: 4
            }
        );

        let Json(response) = close_detail(State(state.clone())).await;
        assert_eq!(response.data.closed, Some(4));
        assert!(state.detail.lock().await.is_none());
    }

    #[tokio::test]
    async fn test_effects_are_drained_once() {
        let state = app_state(
            FakeRepository::new().with_satellites(vec![Err(Failure::Forbidden)]),
        );
        let mut states = state.list.subscribe();
        state.list.dispatch(ListEvent::LoadSatellites);
        wait_for(&mut states, |s| s.error_message.is_some()).await;

        let Json(first) = drain_effects(State(state.clone())).await;
        assert_eq!(first.data.list.len(), 1);
        let Json(second) = drain_effects(State(state)).await;
        assert!(second.data.list.is_empty());
        assert!(second.data.detail.is_empty());
    }
}

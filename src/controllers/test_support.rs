use crate::domain::{PositionList, Satellite, SatelliteDetail, SatelliteId, SatelliteRepository};
use crate::errors::{ApiResult, Failure};
use crate::mvi::StateStream;
use async_trait::async_trait;
use futures::FutureExt;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Mutex;
use std::time::Duration;
use tokio_stream::StreamExt;

/// Repository answering with canned results
pub(crate) struct FakeRepository {
    satellites: Mutex<VecDeque<ApiResult<Vec<Satellite>>>>,
    detail: ApiResult<SatelliteDetail>,
    positions: ApiResult<PositionList>,
}

impl FakeRepository {
    pub(crate) fn new() -> Self {
        Self {
            satellites: Mutex::new(VecDeque::from([Ok(Vec::new())])),
            detail: Err(Failure::NotFound),
            positions: Err(Failure::NotFound),
        }
    }

    /// Results handed out in order; the last one repeats
    pub(crate) fn with_satellites(self, results: Vec<ApiResult<Vec<Satellite>>>) -> Self {
        Self {
            satellites: Mutex::new(results.into()),
            ..self
        }
    }

    pub(crate) fn with_detail(self, detail: ApiResult<SatelliteDetail>) -> Self {
        Self { detail, ..self }
    }

    pub(crate) fn with_positions(self, positions: ApiResult<PositionList>) -> Self {
        Self { positions, ..self }
    }
}

#[async_trait]
impl SatelliteRepository for FakeRepository {
    async fn get_satellites(&self) -> ApiResult<Vec<Satellite>> {
        let mut queue = self.satellites.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    async fn get_satellite_detail(&self, _id: SatelliteId) -> ApiResult<SatelliteDetail> {
        self.detail.clone()
    }

    async fn get_positions(&self, _satellite_id: SatelliteId) -> ApiResult<PositionList> {
        self.positions.clone()
    }
}

pub(crate) fn sample_detail(id: SatelliteId) -> SatelliteDetail {
    SatelliteDetail {
        id,
        cost_per_launch: 7_200_000,
        first_flight: "2021-12-01".to_string(),
        height: 118,
        mass: 1_167_000,
    }
}

/// Consume states until one matches, failing the test after a minute
pub(crate) async fn wait_for<S, P>(states: &mut StateStream<S>, mut predicate: P) -> S
where
    S: Debug,
    P: FnMut(&S) -> bool,
{
    let found = tokio::time::timeout(Duration::from_secs(60), async {
        while let Some(state) = states.next().await {
            if predicate(&state) {
                return Some(state);
            }
        }
        None
    })
    .await;

    match found {
        Ok(Some(state)) => state,
        Ok(None) => panic!("state stream ended before the expected state"),
        Err(_) => panic!("timed out waiting for state"),
    }
}

/// Everything already published to `states`
pub(crate) fn drain<S>(states: &mut StateStream<S>) -> Vec<S> {
    let mut seen = Vec::new();
    while let Some(Some(state)) = states.next().now_or_never() {
        seen.push(state);
    }
    seen
}

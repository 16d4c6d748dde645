/// Domain models and the repository contract used by the controllers
use crate::errors::ApiResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type SatelliteId = i32;

/// Entry of the satellite list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Satellite {
    pub id: SatelliteId,
    pub name: String,
    pub is_active: bool,
}

impl Satellite {
    pub fn new(id: SatelliteId, name: impl Into<String>, is_active: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_active,
        }
    }
}

/// Static launch data of one satellite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatelliteDetail {
    pub id: SatelliteId,
    pub cost_per_launch: i64,
    /// ISO date, e.g. `2021-12-01`
    pub first_flight: String,
    pub height: i32,
    pub mass: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pre-recorded trajectory of a satellite, replayed in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionList {
    pub satellite_id: String,
    pub positions: Vec<Position>,
}

/// Data access consumed by the screen controllers.
///
/// Implementations classify every error into a [`crate::errors::Failure`];
/// a missing record is reported as `Failure::NotFound`, never as an empty success.
#[async_trait]
pub trait SatelliteRepository: Send + Sync {
    async fn get_satellites(&self) -> ApiResult<Vec<Satellite>>;

    /// Cached detail if present, otherwise loaded from the source and cached
    async fn get_satellite_detail(&self, id: SatelliteId) -> ApiResult<SatelliteDetail>;

    async fn get_positions(&self, satellite_id: SatelliteId) -> ApiResult<PositionList>;
}

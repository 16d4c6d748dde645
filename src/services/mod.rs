/// Repository implementation over a document source and the detail cache
use crate::clients::{DataSource, POSITIONS_DOCUMENT, SATELLITES_DOCUMENT, SATELLITE_DETAIL_DOCUMENT};
use crate::domain::{
    Position, PositionList, Satellite, SatelliteDetail, SatelliteId, SatelliteRepository,
};
use crate::errors::{run_catching, ApiResult, DataError};
use crate::repo::DetailCache;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct SatelliteDto {
    id: SatelliteId,
    active: bool,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SatelliteDetailDto {
    id: SatelliteId,
    cost_per_launch: i64,
    first_flight: String,
    height: i32,
    mass: i32,
}

#[derive(Debug, Deserialize)]
struct PositionsResponseDto {
    list: Vec<PositionListDto>,
}

#[derive(Debug, Deserialize)]
struct PositionListDto {
    id: String,
    positions: Vec<PositionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionDto {
    pos_x: f64,
    pos_y: f64,
}

/// Satellite data service.
///
/// Cache misses for the same id are serialized, so the detail document is read
/// at most once per id while the cache holds it.
pub struct SatelliteService {
    source: Arc<dyn DataSource>,
    cache: DetailCache,
    misses: Mutex<HashMap<SatelliteId, Arc<AsyncMutex<()>>>>,
}

impl SatelliteService {
    pub fn new(source: Arc<dyn DataSource>, cache: DetailCache) -> Self {
        Self {
            source,
            cache,
            misses: Mutex::new(HashMap::new()),
        }
    }

    fn miss_lock(&self, id: SatelliteId) -> Arc<AsyncMutex<()>> {
        self.misses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_default()
            .clone()
    }

    async fn load_satellites(&self) -> Result<Vec<Satellite>, DataError> {
        let raw = self.source.read(SATELLITES_DOCUMENT).await?;
        let dtos: Vec<SatelliteDto> = serde_json::from_str(&raw)?;
        Ok(dtos
            .into_iter()
            .map(|dto| Satellite {
                id: dto.id,
                name: dto.name,
                is_active: dto.active,
            })
            .collect())
    }

    async fn load_detail(&self, id: SatelliteId) -> Result<SatelliteDetail, DataError> {
        if let Some(cached) = self.cache.get(id).await? {
            debug!(id, "satellite detail served from cache");
            return Ok(cached);
        }

        let lock = self.miss_lock(id);
        let _guard = lock.lock().await;
        // Another request may have filled the entry while we waited.
        if let Some(cached) = self.cache.get(id).await? {
            debug!(id, "satellite detail served from cache");
            return Ok(cached);
        }

        let raw = self.source.read(SATELLITE_DETAIL_DOCUMENT).await?;
        let dtos: Vec<SatelliteDetailDto> = serde_json::from_str(&raw)?;
        let detail = dtos
            .into_iter()
            .find(|dto| dto.id == id)
            .map(|dto| SatelliteDetail {
                id: dto.id,
                cost_per_launch: dto.cost_per_launch,
                first_flight: dto.first_flight,
                height: dto.height,
                mass: dto.mass,
            })
            .ok_or_else(|| DataError::NotFound(format!("satellite detail {id}")))?;

        self.cache.put(&detail).await?;
        info!(id, "satellite detail loaded from source");
        Ok(detail)
    }

    async fn load_positions(&self, satellite_id: SatelliteId) -> Result<PositionList, DataError> {
        let raw = self.source.read(POSITIONS_DOCUMENT).await?;
        let response: PositionsResponseDto = serde_json::from_str(&raw)?;
        let key = satellite_id.to_string();
        response
            .list
            .into_iter()
            .find(|entry| entry.id == key)
            .map(|entry| PositionList {
                satellite_id: entry.id,
                positions: entry
                    .positions
                    .into_iter()
                    .map(|p| Position::new(p.pos_x, p.pos_y))
                    .collect(),
            })
            .ok_or_else(|| DataError::NotFound(format!("positions of satellite {satellite_id}")))
    }
}

#[async_trait]
impl SatelliteRepository for SatelliteService {
    async fn get_satellites(&self) -> ApiResult<Vec<Satellite>> {
        run_catching("get_satellites", self.load_satellites()).await
    }

    async fn get_satellite_detail(&self, id: SatelliteId) -> ApiResult<SatelliteDetail> {
        run_catching("get_satellite_detail", self.load_detail(id)).await
    }

    async fn get_positions(&self, satellite_id: SatelliteId) -> ApiResult<PositionList> {
        run_catching("get_positions", self.load_positions(satellite_id)).await
    }
}

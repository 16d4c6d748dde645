/// Local cache of satellite details
use crate::domain::{SatelliteDetail, SatelliteId};
use crate::errors::DataError;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

/// Satellite detail cache keyed by satellite id
#[derive(Clone)]
pub struct DetailCache {
    pool: SqlitePool,
}

impl DetailCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the cache table
    pub async fn init(&self) -> Result<(), DataError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS satellite_details(
                id INTEGER PRIMARY KEY,
                cost_per_launch INTEGER NOT NULL,
                first_flight TEXT NOT NULL,
                height INTEGER NOT NULL,
                mass INTEGER NOT NULL,
                cached_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, id: SatelliteId) -> Result<Option<SatelliteDetail>, DataError> {
        let row = sqlx::query_as::<_, (i64, i64, String, i64, i64)>(
            "SELECT id, cost_per_launch, first_flight, height, mass
             FROM satellite_details WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(id, cost_per_launch, first_flight, height, mass)| SatelliteDetail {
                id: id as SatelliteId,
                cost_per_launch,
                first_flight,
                height: height as i32,
                mass: mass as i32,
            },
        ))
    }

    /// Insert or replace the entry for `detail.id`
    pub async fn put(&self, detail: &SatelliteDetail) -> Result<(), DataError> {
        sqlx::query(
            "INSERT OR REPLACE INTO satellite_details
                (id, cost_per_launch, first_flight, height, mass, cached_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(detail.id)
        .bind(detail.cost_per_launch)
        .bind(&detail.first_flight)
        .bind(detail.height)
        .bind(detail.mass)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        debug!(id = detail.id, "satellite detail cached");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) async fn memory_cache() -> DetailCache {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let cache = DetailCache::new(pool);
    cache.init().await.unwrap();
    cache
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    async fn cached_at(cache: &DetailCache, id: SatelliteId) -> Option<DateTime<Utc>> {
        sqlx::query_as::<_, (DateTime<Utc>,)>("SELECT cached_at FROM satellite_details WHERE id = ?")
            .bind(id)
            .fetch_optional(&cache.pool)
            .await
            .unwrap()
            .map(|(at,)| at)
    }

    fn detail(id: SatelliteId, height: i32) -> SatelliteDetail {
        SatelliteDetail {
            id,
            cost_per_launch: 7_500_000,
            first_flight: "2021-12-01".to_string(),
            height,
            mass: 1300,
        }
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let cache = memory_cache().await;
        assert_eq!(cache.get(42).await.unwrap(), None);
        assert_eq!(cached_at(&cache, 42).await, None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = memory_cache().await;
        cache.put(&detail(1, 118)).await.unwrap();

        assert_eq!(cache.get(1).await.unwrap(), Some(detail(1, 118)));
        assert!(cached_at(&cache, 1).await.is_some());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let cache = memory_cache().await;
        cache.put(&detail(3, 100)).await.unwrap();
        cache.put(&detail(3, 120)).await.unwrap();

        assert_eq!(cache.get(3).await.unwrap().map(|d| d.height), Some(120));
    }
}

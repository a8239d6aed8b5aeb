//! PostgreSQL candidate source

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{CropType, GreenhouseLocation, HarvestCandidate};
use sqlx::PgPool;
use tracing::instrument;

use super::CandidateSource;
use crate::error::AppResult;

/// Reads candidates from `crop_cycles`, `ml_harvest_predictions` and `locations`
#[derive(Debug, Clone)]
pub struct PgCandidateSource {
    db: PgPool,
}

/// Database row for a crop cycle joined with its prediction and location
#[derive(Debug, Clone, sqlx::FromRow)]
struct CandidateRow {
    pub id: i64,
    pub crop: String,
    pub sub_crop: Option<String>,
    pub num_plants: i32,
    pub predicted_yield_g: f64,
    pub confidence_score: f64,
    pub house_number: i32,
    pub x_position: i32,
    pub y_position: i32,
}

impl From<CandidateRow> for HarvestCandidate {
    fn from(row: CandidateRow) -> Self {
        Self {
            id: row.id,
            crop: CropType::new(row.crop),
            sub_crop: row.sub_crop,
            num_plants: row.num_plants,
            predicted_yield_g: row.predicted_yield_g,
            confidence_score: row.confidence_score,
            location: GreenhouseLocation {
                house_number: row.house_number,
                x_position: row.x_position,
                y_position: row.y_position,
            },
        }
    }
}

impl PgCandidateSource {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CandidateSource for PgCandidateSource {
    #[instrument(skip(self, crop_type), fields(crop_type = crop_type.map(|c| c.as_str())), err)]
    async fn fetch_candidates(
        &self,
        date: NaiveDate,
        crop_type: Option<&CropType>,
    ) -> AppResult<Vec<HarvestCandidate>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT cc.id::BIGINT AS id,
                   UPPER(cc.crop) AS crop,
                   cc.sub_crop,
                   COALESCE(cc.num_plants, 0)::INT4 AS num_plants,
                   mhp.predicted_yield_g::DOUBLE PRECISION AS predicted_yield_g,
                   COALESCE(mhp.confidence_score, 0)::DOUBLE PRECISION AS confidence_score,
                   COALESCE(l.house_number, 0)::INT4 AS house_number,
                   COALESCE(l.x_position, 0)::INT4 AS x_position,
                   COALESCE(l.y_position, 0)::INT4 AS y_position
            FROM crop_cycles cc
            JOIN ml_harvest_predictions mhp
              ON mhp.crop_cycle_id = cc.id AND mhp.predicted_harvest_date = $1
            JOIN locations l ON l.id = cc.current_location
            WHERE cc.harvest_timestamp IS NULL
              AND COALESCE(cc.dispose, FALSE) = FALSE
              AND ($2::TEXT IS NULL OR UPPER(cc.crop) = $2)
            ORDER BY UPPER(cc.crop), confidence_score DESC, predicted_yield_g DESC, cc.id
            "#,
        )
        .bind(date)
        .bind(crop_type.map(|c| c.as_str()))
        .fetch_all(&self.db)
        .await?;

        tracing::debug!(count = rows.len(), "Fetched harvest candidates");

        Ok(rows.into_iter().map(HarvestCandidate::from).collect())
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

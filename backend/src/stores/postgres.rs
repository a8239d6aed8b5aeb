//! PostgreSQL plan store backed by the `harvest_plans` table

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::{CommittedPlanEntry, CropType, NewPlanEntry};
use sqlx::PgPool;
use tracing::instrument;

use super::PlanStore;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct PgPlanStore {
    db: PgPool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct PlanRow {
    pub id: i64,
    pub target_date: NaiveDate,
    pub crop_cycle_id: i64,
    pub crop_type: String,
    pub sub_crop: Option<String>,
    pub planned_yield_g: f64,
    pub confidence_score: f64,
    pub house_number: i32,
    pub location_x: i32,
    pub location_y: i32,
    pub created_at: DateTime<Utc>,
}

impl From<PlanRow> for CommittedPlanEntry {
    fn from(row: PlanRow) -> Self {
        Self {
            id: row.id,
            target_date: row.target_date,
            crop_cycle_id: row.crop_cycle_id,
            crop_type: CropType::new(row.crop_type),
            sub_crop: row.sub_crop,
            planned_yield_g: row.planned_yield_g,
            confidence_score: row.confidence_score,
            house_number: row.house_number,
            location_x: row.location_x,
            location_y: row.location_y,
            created_at: row.created_at,
        }
    }
}

impl PgPlanStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

fn duplicate(date: NaiveDate, crop_cycle_id: i64) -> AppError {
    tracing::warn!(%date, crop_cycle_id, "Rejected duplicate plan entry");
    AppError::DuplicateEntry(format!("Crop cycle {} in plan for {}", crop_cycle_id, date))
}

#[async_trait]
impl PlanStore for PgPlanStore {
    #[instrument(skip(self, entry), fields(crop_cycle_id = entry.crop_cycle_id), err)]
    async fn add_entry(&self, date: NaiveDate, entry: &NewPlanEntry) -> AppResult<i64> {
        // (target_date, crop_cycle_id) is unique; a conflicting insert returns no row
        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO harvest_plans (
                target_date, crop_cycle_id, crop_type, sub_crop, planned_yield_g,
                confidence_score, house_number, location_x, location_y
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (target_date, crop_cycle_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(date)
        .bind(entry.crop_cycle_id)
        .bind(entry.crop_type.as_str())
        .bind(&entry.sub_crop)
        .bind(entry.planned_yield_g)
        .bind(entry.confidence_score)
        .bind(entry.house_number)
        .bind(entry.location_x)
        .bind(entry.location_y)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate(date, entry.crop_cycle_id)
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        inserted.ok_or_else(|| duplicate(date, entry.crop_cycle_id))
    }

    #[instrument(skip(self), err)]
    async fn list_entries(&self, date: NaiveDate) -> AppResult<Vec<CommittedPlanEntry>> {
        let rows = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, target_date, crop_cycle_id, crop_type, sub_crop,
                   planned_yield_g, confidence_score, house_number,
                   location_x, location_y, created_at
            FROM harvest_plans
            WHERE target_date = $1
            ORDER BY crop_type, planned_yield_g DESC, id
            "#,
        )
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CommittedPlanEntry::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn remove_entry(&self, date: NaiveDate, crop_cycle_id: i64) -> AppResult<()> {
        let removed: Option<i64> = sqlx::query_scalar(
            "DELETE FROM harvest_plans WHERE target_date = $1 AND crop_cycle_id = $2 RETURNING id",
        )
        .bind(date)
        .bind(crop_cycle_id)
        .fetch_optional(&self.db)
        .await?;

        removed
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Crop cycle {} in plan for {}", crop_cycle_id, date)))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

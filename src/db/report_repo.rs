// src/db/report_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{common::error::AppError, models::billing::Report};

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_balance: Decimal,
        payment_ids: &[i64],
    ) -> Result<Report, AppError> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (user_id, start_date, end_date, total_balance, payment_ids)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .bind(total_balance)
        .bind(payment_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    // PUT = substituição completa: o agregado recalculado troca todos os
    // campos do relatório existente.
    pub async fn replace(
        &self,
        id: i64,
        user_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_balance: Decimal,
        payment_ids: &[i64],
    ) -> Result<Option<Report>, AppError> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET user_id = $2, start_date = $3, end_date = $4,
                total_balance = $5, payment_ids = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .bind(total_balance)
        .bind(payment_ids)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Report>, AppError> {
        let report = sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(report)
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Report>, AppError> {
        let reports = sqlx::query_as::<_, Report>(
            "SELECT * FROM reports WHERE user_id = $1 ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

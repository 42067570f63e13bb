// src/db/invoice_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::billing::Invoice};

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        payer_id: i64,
        invoice_title: &str,
        diagnosis: &str,
        icd10: &[String],
        total_amount: Decimal,
        minimum_due: Decimal,
        due_date: NaiveDate,
    ) -> Result<Invoice, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices
                (user_id, payer_id, invoice_title, diagnosis, icd10,
                 total_amount, minimum_due, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(payer_id)
        .bind(invoice_title)
        .bind(diagnosis)
        .bind(icd10)
        .bind(total_amount)
        .bind(minimum_due)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        payer_id: i64,
        invoice_title: &str,
        diagnosis: &str,
        icd10: &[String],
        total_amount: Decimal,
        minimum_due: Decimal,
        due_date: NaiveDate,
    ) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET user_id = $2, payer_id = $3, invoice_title = $4, diagnosis = $5,
                icd10 = $6, total_amount = $7, minimum_due = $8, due_date = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(payer_id)
        .bind(invoice_title)
        .bind(diagnosis)
        .bind(icd10)
        .bind(total_amount)
        .bind(minimum_due)
        .bind(due_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Efeito colateral de um pagamento: soma o valor ao acumulado e carimba
    /// a data do último pagamento. Roda dentro da transação do serviço de
    /// pagamentos, por isso recebe o executor.
    pub async fn increment_amount_paid<'e, E>(
        &self,
        executor: E,
        id: i64,
        amount: Decimal,
        paid_at: DateTime<Utc>,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET amount_paid = amount_paid + $2, last_payment_date = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(paid_at)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn approve(&self, id: i64) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "UPDATE invoices SET approved = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE user_id = $1 ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    pub async fn search_by_icd10(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT * FROM invoices
            WHERE user_id = $1 AND $2 = ANY(icd10)
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .bind(code)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    pub async fn search_by_diagnosis(
        &self,
        user_id: i64,
        term: &str,
    ) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT * FROM invoices
            WHERE user_id = $1 AND diagnosis ILIKE '%' || $2 || '%'
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

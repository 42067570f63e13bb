// src/db/payment_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::billing::Payment};

// O repositório de pagamentos, responsável por todas as interações com a
// tabela 'payments'. Escritas recebem um executor genérico para poderem
// participar da transação do serviço.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: i64,
        invoice_id: i64,
        amount: Decimal,
        card_num: &str,
        card_exp: &str,
        payment_date: DateTime<Utc>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (user_id, invoice_id, amount, card_num, card_exp, payment_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(invoice_id)
        .bind(amount)
        .bind(card_num)
        .bind(card_exp)
        .bind(payment_date)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    // Substituição completa do registro, no estilo PUT da API.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        user_id: i64,
        invoice_id: i64,
        amount: Decimal,
        card_num: &str,
        card_exp: &str,
        payment_date: DateTime<Utc>,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET user_id = $2, invoice_id = $3, amount = $4,
                card_num = $5, card_exp = $6, payment_date = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(invoice_id)
        .bind(amount)
        .bind(card_num)
        .bind(card_exp)
        .bind(payment_date)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE user_id = $1 ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Pagamentos com data dentro do intervalo fechado [start, end],
    /// na ordem natural de recuperação (id crescente).
    pub async fn find_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE payment_date::date BETWEEN $1 AND $2
            ORDER BY id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

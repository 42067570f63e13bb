// src/services/payment_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};

use crate::{
    common::error::AppError,
    db::{InvoiceRepository, PaymentRepository},
    models::billing::Payment,
};

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    invoice_repo: InvoiceRepository,
}

impl PaymentService {
    pub fn new(payment_repo: PaymentRepository, invoice_repo: InvoiceRepository) -> Self {
        Self {
            payment_repo,
            invoice_repo,
        }
    }

    /// Cria o pagamento e atualiza a fatura vinculada (amount_paid +=
    /// valor, last_payment_date = agora) numa única transação. Se a fatura
    /// não existir, nada é gravado.
    pub async fn create_payment<'a, A>(
        &self,
        conn: A,
        user_id: i64,
        invoice_id: i64,
        amount: Decimal,
        card_num: &str,
        card_exp: &str,
    ) -> Result<Payment, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;
        let now = Utc::now();

        // Atualiza a fatura primeiro: fatura inexistente vira 404 antes de
        // qualquer INSERT em payments.
        self.invoice_repo
            .increment_amount_paid(&mut *tx, invoice_id, amount, now)
            .await?
            .ok_or(AppError::NotFound("Invoice"))?;

        let payment = self
            .payment_repo
            .create(&mut *tx, user_id, invoice_id, amount, card_num, card_exp, now)
            .await?;

        tx.commit().await?;

        tracing::info!(
            payment_id = payment.id,
            invoice_id,
            "Pagamento registrado e fatura atualizada"
        );

        Ok(payment)
    }

    /// Substitui o pagamento e aplica o mesmo efeito colateral na fatura.
    /// O incremento usa o valor submetido, igual ao comportamento original
    /// da API (não é um delta em relação ao valor anterior).
    pub async fn update_payment<'a, A>(
        &self,
        conn: A,
        id: i64,
        user_id: i64,
        invoice_id: i64,
        amount: Decimal,
        card_num: &str,
        card_exp: &str,
    ) -> Result<Payment, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;
        let now = Utc::now();

        self.invoice_repo
            .increment_amount_paid(&mut *tx, invoice_id, amount, now)
            .await?
            .ok_or(AppError::NotFound("Invoice"))?;

        let payment = self
            .payment_repo
            .update(&mut *tx, id, user_id, invoice_id, amount, card_num, card_exp, now)
            .await?
            .ok_or(AppError::NotFound("Payment"))?;

        tx.commit().await?;

        Ok(payment)
    }

    pub async fn get_payment(&self, id: i64) -> Result<Payment, AppError> {
        self.payment_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Payment"))
    }

    pub async fn list_payments(&self, user_id: i64) -> Result<Vec<Payment>, AppError> {
        let payments = self.payment_repo.list_by_user(user_id).await?;
        if payments.is_empty() {
            return Err(AppError::NotFound("Payments"));
        }
        Ok(payments)
    }

    pub async fn delete_payment(&self, id: i64) -> Result<(), AppError> {
        if self.payment_repo.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Payment"))
        }
    }
}

// src/models/billing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Os nomes no fio (paymentID, userID, totalAmount...) seguem o contrato
// que os clientes da API de billing já consomem.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    #[serde(rename = "paymentID")]
    pub id: i64,

    #[serde(rename = "userID")]
    pub user_id: i64,

    #[serde(rename = "invoiceID")]
    pub invoice_id: i64,

    /// Invariante: sempre > 0. A validação rejeita zero e negativos
    /// antes de qualquer escrita.
    #[serde(rename = "totalAmount")]
    pub amount: Decimal,

    #[serde(rename = "paymentDate")]
    pub payment_date: DateTime<Utc>,

    #[serde(rename = "cardNum")]
    pub card_num: String,

    #[serde(rename = "cardExp")]
    pub card_exp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    #[serde(rename = "invoiceID")]
    pub id: i64,

    #[serde(rename = "userID")]
    pub user_id: i64,

    #[serde(rename = "payerID")]
    pub payer_id: i64,

    #[serde(rename = "invoiceTitle")]
    pub invoice_title: String,

    pub diagnosis: String,

    pub icd10: Vec<String>,

    #[serde(rename = "totalAmount")]
    pub total_amount: Decimal,

    #[serde(rename = "minimumDue")]
    pub minimum_due: Decimal,

    #[serde(rename = "dueDate")]
    pub due_date: NaiveDate,

    // Total acumulado dos pagamentos recebidos. Pode ultrapassar
    // total_amount; o sistema original nunca impôs esse teto.
    #[serde(rename = "amountPaid")]
    pub amount_paid: Decimal,

    #[serde(rename = "lastPaymentDate")]
    pub last_payment_date: Option<DateTime<Utc>>,

    pub approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    #[serde(rename = "reportID")]
    pub id: i64,

    #[serde(rename = "userID")]
    pub user_id: i64,

    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,

    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,

    #[serde(rename = "totalBalance")]
    pub total_balance: Decimal,

    // Na ordem natural de recuperação do banco (id crescente).
    #[serde(rename = "paymentIDs")]
    pub payment_ids: Vec<i64>,
}

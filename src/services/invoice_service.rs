// src/services/invoice_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{common::error::AppError, db::InvoiceRepository, models::billing::Invoice};

#[derive(Clone)]
pub struct InvoiceService {
    invoice_repo: InvoiceRepository,
}

/// Datas de vencimento chegam como "12/30/22" ou "12/30/2022".
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%m/%d/%y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .map_err(|_| AppError::InvalidDate)
}

impl InvoiceService {
    pub fn new(invoice_repo: InvoiceRepository) -> Self {
        Self { invoice_repo }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_invoice(
        &self,
        user_id: i64,
        payer_id: i64,
        invoice_title: &str,
        diagnosis: &str,
        icd10: &[String],
        total_amount: Decimal,
        minimum_due: Decimal,
        due_date: &str,
    ) -> Result<Invoice, AppError> {
        let due_date = parse_due_date(due_date)?;
        self.invoice_repo
            .create(
                user_id,
                payer_id,
                invoice_title,
                diagnosis,
                icd10,
                total_amount,
                minimum_due,
                due_date,
            )
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_invoice(
        &self,
        id: i64,
        user_id: i64,
        payer_id: i64,
        invoice_title: &str,
        diagnosis: &str,
        icd10: &[String],
        total_amount: Decimal,
        minimum_due: Decimal,
        due_date: &str,
    ) -> Result<Invoice, AppError> {
        let due_date = parse_due_date(due_date)?;
        self.invoice_repo
            .update(
                id,
                user_id,
                payer_id,
                invoice_title,
                diagnosis,
                icd10,
                total_amount,
                minimum_due,
                due_date,
            )
            .await?
            .ok_or(AppError::NotFound("Invoice"))
    }

    pub async fn approve_invoice(&self, id: i64) -> Result<Invoice, AppError> {
        self.invoice_repo
            .approve(id)
            .await?
            .ok_or(AppError::NotFound("Invoice"))
    }

    pub async fn get_invoice(&self, id: i64) -> Result<Invoice, AppError> {
        self.invoice_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Invoice"))
    }

    pub async fn list_invoices(&self, user_id: i64) -> Result<Vec<Invoice>, AppError> {
        let invoices = self.invoice_repo.list_by_user(user_id).await?;
        if invoices.is_empty() {
            return Err(AppError::NotFound("Invoices"));
        }
        Ok(invoices)
    }

    pub async fn search_by_icd10(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<Vec<Invoice>, AppError> {
        let invoices = self.invoice_repo.search_by_icd10(user_id, code).await?;
        if invoices.is_empty() {
            return Err(AppError::NotFound("Invoices"));
        }
        Ok(invoices)
    }

    pub async fn search_by_diagnosis(
        &self,
        user_id: i64,
        term: &str,
    ) -> Result<Vec<Invoice>, AppError> {
        let invoices = self.invoice_repo.search_by_diagnosis(user_id, term).await?;
        if invoices.is_empty() {
            return Err(AppError::NotFound("Invoices"));
        }
        Ok(invoices)
    }

    pub async fn delete_invoice(&self, id: i64) -> Result<(), AppError> {
        if self.invoice_repo.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Invoice"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_digit_year() {
        assert_eq!(
            parse_due_date("12/30/22").unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 30).unwrap()
        );
    }

    #[test]
    fn parses_four_digit_year() {
        assert_eq!(
            parse_due_date("12/30/2022").unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 30).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_due_date("soon"), Err(AppError::InvalidDate)));
        assert!(matches!(
            parse_due_date("13/45/22"),
            Err(AppError::InvalidDate)
        ));
    }
}

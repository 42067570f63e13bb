// src/services/report_service.rs
//
// O agregador de relatórios: dado um intervalo fechado de datas, soma os
// pagamentos do período com aritmética decimal e persiste o resultado como
// um Report com a lista ordenada de IDs contribuintes.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{PaymentRepository, ReportRepository},
    models::billing::{Payment, Report},
};

#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    payment_repo: PaymentRepository,
}

/// Intervalos chegam como "01/01/2020". Strings que não parseiam e
/// intervalos invertidos (start > end) falham com InvalidDate.
pub fn parse_range(start_raw: &str, end_raw: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = NaiveDate::parse_from_str(start_raw, "%m/%d/%Y")
        .map_err(|_| AppError::InvalidDate)?;
    let end = NaiveDate::parse_from_str(end_raw, "%m/%d/%Y")
        .map_err(|_| AppError::InvalidDate)?;
    if start > end {
        return Err(AppError::InvalidDate);
    }
    Ok((start, end))
}

/// Soma decimal dos valores e lista de IDs na ordem de recuperação.
pub fn summarize(payments: &[Payment]) -> (Decimal, Vec<i64>) {
    let total = payments.iter().map(|p| p.amount).sum();
    let ids = payments.iter().map(|p| p.id).collect();
    (total, ids)
}

impl ReportService {
    pub fn new(report_repo: ReportRepository, payment_repo: PaymentRepository) -> Self {
        Self {
            report_repo,
            payment_repo,
        }
    }

    pub async fn generate_report(
        &self,
        user_id: i64,
        start_raw: &str,
        end_raw: &str,
    ) -> Result<Report, AppError> {
        let (start, end) = parse_range(start_raw, end_raw)?;

        let payments = self.payment_repo.find_in_range(start, end).await?;
        // Política herdada do sistema original: período vazio é erro,
        // não um relatório de saldo zero.
        if payments.is_empty() {
            return Err(AppError::NoMatchingPayments);
        }

        let (total_balance, payment_ids) = summarize(&payments);

        let report = self
            .report_repo
            .create(user_id, start, end, total_balance, &payment_ids)
            .await?;

        tracing::info!(
            report_id = report.id,
            %total_balance,
            matched = payment_ids.len(),
            "Relatório gerado"
        );

        Ok(report)
    }

    /// PUT de relatório = reexecutar a agregação sobre o intervalo
    /// submetido e substituir o registro inteiro.
    pub async fn regenerate_report(
        &self,
        id: i64,
        user_id: i64,
        start_raw: &str,
        end_raw: &str,
    ) -> Result<Report, AppError> {
        let (start, end) = parse_range(start_raw, end_raw)?;

        let payments = self.payment_repo.find_in_range(start, end).await?;
        if payments.is_empty() {
            return Err(AppError::NoMatchingPayments);
        }

        let (total_balance, payment_ids) = summarize(&payments);

        self.report_repo
            .replace(id, user_id, start, end, total_balance, &payment_ids)
            .await?
            .ok_or(AppError::NotFound("Report"))
    }

    pub async fn get_report(&self, id: i64) -> Result<Report, AppError> {
        self.report_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Report"))
    }

    pub async fn list_reports(&self, user_id: i64) -> Result<Vec<Report>, AppError> {
        let reports = self.report_repo.list_by_user(user_id).await?;
        if reports.is_empty() {
            return Err(AppError::NotFound("Reports"));
        }
        Ok(reports)
    }

    pub async fn delete_report(&self, id: i64) -> Result<(), AppError> {
        if self.report_repo.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Report"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn payment(id: i64, amount: &str) -> Payment {
        Payment {
            id,
            user_id: 1000,
            invoice_id: 4,
            amount: amount.parse().unwrap(),
            payment_date: Utc::now(),
            card_num: "1234567812345678".into(),
            card_exp: "1223".into(),
        }
    }

    #[test]
    fn sums_amounts_and_keeps_id_order() {
        let payments = [payment(7, "30"), payment(9, "20")];
        let (total, ids) = summarize(&payments);
        assert_eq!(total, Decimal::from(50));
        assert_eq!(ids, vec![7, 9]);
    }

    #[test]
    fn decimal_sum_has_no_cent_drift() {
        // 0.1 + 0.2 precisa dar exatamente 0.3
        let payments = [payment(1, "0.1"), payment(2, "0.2")];
        let (total, _) = summarize(&payments);
        assert_eq!(total, "0.3".parse::<Decimal>().unwrap());
    }

    #[test]
    fn summarize_of_empty_slice_is_zero() {
        let (total, ids) = summarize(&[]);
        assert_eq!(total, Decimal::ZERO);
        assert!(ids.is_empty());
    }

    #[test]
    fn parses_a_valid_range() {
        let (start, end) = parse_range("01/01/2020", "01/01/2021").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    }

    #[test]
    fn single_day_range_is_valid() {
        assert!(parse_range("06/15/2022", "06/15/2022").is_ok());
    }

    #[test]
    fn rejects_unparsable_dates() {
        assert!(matches!(
            parse_range("não-é-data", "01/01/2021"),
            Err(AppError::InvalidDate)
        ));
        assert!(matches!(
            parse_range("01/01/2020", "2021-01-01"),
            Err(AppError::InvalidDate)
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(matches!(
            parse_range("01/01/2021", "01/01/2020"),
            Err(AppError::InvalidDate)
        ));
    }
}

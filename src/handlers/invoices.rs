// src/handlers/invoices.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    common::{
        error::AppError,
        validation::{field, to_decimal, to_i64, validate_body, Field, FieldKind},
    },
    config::AppState,
    handlers::{parse_path_id, require_user_id, UserQuery},
    middleware::auth::authorize_user,
};

const INVOICE_BODY_MSG: &str = "No body parameters. Must include userID, payerID, \
invoiceTitle, diagnosis, totalAmount, minimumDue, dueDate, and icd10 in body";

const INVOICE_FIELDS: &[Field] = &[
    field("userID", FieldKind::Numeric),
    field("payerID", FieldKind::Numeric),
    field("invoiceTitle", FieldKind::Any),
    field("diagnosis", FieldKind::Any),
    field("totalAmount", FieldKind::Numeric),
    field("minimumDue", FieldKind::Numeric),
    field("dueDate", FieldKind::Any),
    field("icd10", FieldKind::Any),
];

#[derive(Debug)]
struct InvoiceInput {
    user_id: i64,
    payer_id: i64,
    invoice_title: String,
    diagnosis: String,
    icd10: Vec<String>,
    total_amount: Decimal,
    minimum_due: Decimal,
    due_date: String,
}

// icd10 aceita uma lista de códigos ou um código solto.
fn parse_icd10(value: &Value) -> Result<Vec<String>, AppError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or(AppError::InvalidType("icd10"))
            })
            .collect(),
        Value::String(code) => Ok(vec![code.clone()]),
        _ => Err(AppError::InvalidType("icd10")),
    }
}

fn parse_invoice_body(body: &Value) -> Result<InvoiceInput, AppError> {
    validate_body(body, INVOICE_FIELDS).map_err(|e| {
        tracing::debug!("Corpo de fatura rejeitado: {}", e);
        AppError::InvalidBody(INVOICE_BODY_MSG)
    })?;

    let user_id = to_i64(&body["userID"]).ok_or(AppError::InvalidType("userID"))?;
    let payer_id = to_i64(&body["payerID"]).ok_or(AppError::InvalidType("payerID"))?;
    let invoice_title = body["invoiceTitle"]
        .as_str()
        .ok_or(AppError::InvalidType("invoiceTitle"))?
        .to_owned();
    let diagnosis = body["diagnosis"]
        .as_str()
        .ok_or(AppError::InvalidType("diagnosis"))?
        .to_owned();
    let icd10 = parse_icd10(&body["icd10"])?;
    let total_amount =
        to_decimal(&body["totalAmount"]).ok_or(AppError::InvalidType("totalAmount"))?;
    let minimum_due =
        to_decimal(&body["minimumDue"]).ok_or(AppError::InvalidType("minimumDue"))?;
    let due_date = body["dueDate"]
        .as_str()
        .ok_or(AppError::InvalidType("dueDate"))?
        .to_owned();

    Ok(InvoiceInput {
        user_id,
        payer_id,
        invoice_title,
        diagnosis,
        icd10,
        total_amount,
        minimum_due,
        due_date,
    })
}

// GET /billing/invoices?userID=
pub async fn list_invoices(
    State(app_state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = require_user_id(&query)?;
    authorize_user(&app_state, user_id).await?;

    let invoices = app_state.invoice_service.list_invoices(user_id).await?;
    Ok((StatusCode::OK, Json(invoices)))
}

// POST /billing/invoices
pub async fn create_invoice(
    State(app_state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input = parse_invoice_body(&body)?;
    authorize_user(&app_state, input.user_id).await?;

    let invoice = app_state
        .invoice_service
        .create_invoice(
            input.user_id,
            input.payer_id,
            &input.invoice_title,
            &input.diagnosis,
            &input.icd10,
            input.total_amount,
            input.minimum_due,
            &input.due_date,
        )
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// GET /billing/invoices/{id}?userID=
pub async fn get_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid invoice ID")?;
    let user_id = require_user_id(&query)?;
    authorize_user(&app_state, user_id).await?;

    let invoice = app_state.invoice_service.get_invoice(id).await?;
    Ok((StatusCode::OK, Json(invoice)))
}

// PUT /billing/invoices/{id}
pub async fn update_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid invoice ID")?;
    let input = parse_invoice_body(&body)?;
    authorize_user(&app_state, input.user_id).await?;

    let invoice = app_state
        .invoice_service
        .update_invoice(
            id,
            input.user_id,
            input.payer_id,
            &input.invoice_title,
            &input.diagnosis,
            &input.icd10,
            input.total_amount,
            input.minimum_due,
            &input.due_date,
        )
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// PUT /billing/invoices/{id}/approve
pub async fn approve_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid invoice ID")?;
    let user_id = require_user_id(&query)?;
    authorize_user(&app_state, user_id).await?;

    let invoice = app_state.invoice_service.approve_invoice(id).await?;
    Ok((StatusCode::OK, Json(invoice)))
}

// DELETE /billing/invoices/{id}
pub async fn delete_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid invoice ID")?;
    validate_body(&body, &[field("userID", FieldKind::Numeric)])?;
    let user_id = to_i64(&body["userID"]).ok_or(AppError::InvalidType("userID"))?;
    authorize_user(&app_state, user_id).await?;

    app_state.invoice_service.delete_invoice(id).await?;
    Ok((StatusCode::OK, "Invoice deleted"))
}

#[derive(Debug, Deserialize)]
pub struct Icd10Query {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub icd10: Option<String>,
}

// GET /billing/invoices/search/icd10?userID=&icd10=
pub async fn search_by_icd10(
    State(app_state): State<AppState>,
    Query(query): Query<Icd10Query>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = require_user_id(&UserQuery {
        user_id: query.user_id.clone(),
    })?;
    let code = query.icd10.ok_or(AppError::MissingField("icd10"))?;
    authorize_user(&app_state, user_id).await?;

    let invoices = app_state
        .invoice_service
        .search_by_icd10(user_id, &code)
        .await?;
    Ok((StatusCode::OK, Json(invoices)))
}

#[derive(Debug, Deserialize)]
pub struct DiagnosisQuery {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub diagnosis: Option<String>,
}

// GET /billing/invoices/search/diagnosis?userID=&diagnosis=
pub async fn search_by_diagnosis(
    State(app_state): State<AppState>,
    Query(query): Query<DiagnosisQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = require_user_id(&UserQuery {
        user_id: query.user_id.clone(),
    })?;
    let term = query.diagnosis.ok_or(AppError::MissingField("diagnosis"))?;
    authorize_user(&app_state, user_id).await?;

    let invoices = app_state
        .invoice_service
        .search_by_diagnosis(user_id, &term)
        .await?;
    Ok((StatusCode::OK, Json(invoices)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "userID": 1000,
            "payerID": 1001,
            "invoiceTitle": "Integration Test Invoice",
            "diagnosis": "Test",
            "totalAmount": 50,
            "minimumDue": 10,
            "dueDate": "12/30/22",
            "icd10": ["T3.10"],
        })
    }

    #[test]
    fn parses_a_valid_invoice_body() {
        let input = parse_invoice_body(&valid_body()).unwrap();
        assert_eq!(input.payer_id, 1001);
        assert_eq!(input.icd10, vec!["T3.10".to_owned()]);
        assert_eq!(input.total_amount, Decimal::from(50));
        assert_eq!(input.due_date, "12/30/22");
    }

    #[test]
    fn missing_payer_id_yields_the_field_set_message() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("payerID");
        let err = parse_invoice_body(&body).unwrap_err();
        assert_eq!(err.to_string(), INVOICE_BODY_MSG);
    }

    #[test]
    fn a_single_icd10_code_becomes_a_one_element_list() {
        let mut body = valid_body();
        body["icd10"] = json!("T3.10");
        let input = parse_invoice_body(&body).unwrap();
        assert_eq!(input.icd10, vec!["T3.10".to_owned()]);
    }

    #[test]
    fn non_string_icd10_entries_are_rejected() {
        let mut body = valid_body();
        body["icd10"] = json!([42]);
        assert!(matches!(
            parse_invoice_body(&body),
            Err(AppError::InvalidType("icd10"))
        ));
    }

    #[test]
    fn minimum_due_of_zero_is_accepted() {
        let mut body = valid_body();
        body["minimumDue"] = json!(0);
        let input = parse_invoice_body(&body).unwrap();
        assert_eq!(input.minimum_due, Decimal::ZERO);
    }
}

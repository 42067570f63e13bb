// src/handlers/payments.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    common::{
        error::AppError,
        validation::{field, to_decimal, to_i64, to_text, validate_body, Field, FieldKind},
    },
    config::AppState,
    handlers::{parse_path_id, require_user_id, UserQuery},
    middleware::auth::authorize_user,
};

const PAYMENT_BODY_MSG: &str =
    "Invalid body parameters. Must include userID, invoiceID, totalAmount, cardNum, and cardExp";

const PAYMENT_FIELDS: &[Field] = &[
    field("userID", FieldKind::Numeric),
    field("invoiceID", FieldKind::Numeric),
    field("totalAmount", FieldKind::Numeric),
    field("cardNum", FieldKind::Card),
    field("cardExp", FieldKind::Numeric),
];

#[derive(Debug)]
struct PaymentInput {
    user_id: i64,
    invoice_id: i64,
    amount: Decimal,
    card_num: String,
    card_exp: String,
}

fn parse_payment_body(body: &Value) -> Result<PaymentInput, AppError> {
    validate_body(body, PAYMENT_FIELDS).map_err(|e| {
        tracing::debug!("Corpo de pagamento rejeitado: {}", e);
        AppError::InvalidBody(PAYMENT_BODY_MSG)
    })?;

    let user_id = to_i64(&body["userID"]).ok_or(AppError::InvalidType("userID"))?;
    let invoice_id = to_i64(&body["invoiceID"]).ok_or(AppError::InvalidType("invoiceID"))?;
    let amount = to_decimal(&body["totalAmount"]).ok_or(AppError::InvalidType("totalAmount"))?;
    // Invariante: valor sempre positivo. Zero era aceito/recusado por
    // acidente (checagem falsy) na API antiga; aqui é política explícita.
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidType("totalAmount"));
    }
    let card_num = to_text(&body["cardNum"]).ok_or(AppError::InvalidType("cardNum"))?;
    let card_exp = to_text(&body["cardExp"]).ok_or(AppError::InvalidType("cardExp"))?;

    Ok(PaymentInput {
        user_id,
        invoice_id,
        amount,
        card_num,
        card_exp,
    })
}

// GET /billing/payments?userID=
pub async fn list_payments(
    State(app_state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = require_user_id(&query)?;
    authorize_user(&app_state, user_id).await?;

    let payments = app_state.payment_service.list_payments(user_id).await?;
    Ok((StatusCode::OK, Json(payments)))
}

// POST /billing/payments
pub async fn create_payment(
    State(app_state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input = parse_payment_body(&body)?;
    authorize_user(&app_state, input.user_id).await?;

    let payment = app_state
        .payment_service
        .create_payment(
            &app_state.db_pool,
            input.user_id,
            input.invoice_id,
            input.amount,
            &input.card_num,
            &input.card_exp,
        )
        .await?;

    Ok((StatusCode::OK, Json(payment)))
}

// GET /billing/payments/{id}?userID=
pub async fn get_payment(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid payment ID")?;
    let user_id = require_user_id(&query)?;
    authorize_user(&app_state, user_id).await?;

    let payment = app_state.payment_service.get_payment(id).await?;
    Ok((StatusCode::OK, Json(payment)))
}

// PUT /billing/payments/{id}
pub async fn update_payment(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid payment ID")?;
    let input = parse_payment_body(&body)?;
    authorize_user(&app_state, input.user_id).await?;

    let payment = app_state
        .payment_service
        .update_payment(
            &app_state.db_pool,
            id,
            input.user_id,
            input.invoice_id,
            input.amount,
            &input.card_num,
            &input.card_exp,
        )
        .await?;

    Ok((StatusCode::OK, Json(payment)))
}

// DELETE /billing/payments/{id}
pub async fn delete_payment(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid payment ID")?;
    validate_body(&body, &[field("userID", FieldKind::Numeric)])?;
    let user_id = to_i64(&body["userID"]).ok_or(AppError::InvalidType("userID"))?;
    authorize_user(&app_state, user_id).await?;

    app_state.payment_service.delete_payment(id).await?;
    Ok((StatusCode::OK, "Payment deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "userID": 1000,
            "invoiceID": 4,
            "totalAmount": 1,
            "cardNum": "1234567812345678",
            "cardExp": "1223",
        })
    }

    #[test]
    fn parses_a_valid_body_keeping_the_amount() {
        let input = parse_payment_body(&valid_body()).unwrap();
        assert_eq!(input.user_id, 1000);
        assert_eq!(input.invoice_id, 4);
        assert_eq!(input.amount, Decimal::from(1));
        assert_eq!(input.card_num, "1234567812345678");
    }

    #[test]
    fn missing_invoice_id_yields_the_field_set_message() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("invoiceID");
        let err = parse_payment_body(&body).unwrap_err();
        assert_eq!(err.to_string(), PAYMENT_BODY_MSG);
    }

    #[test]
    fn short_card_number_yields_the_field_set_message() {
        let mut body = valid_body();
        body["cardNum"] = json!("1234");
        let err = parse_payment_body(&body).unwrap_err();
        assert_eq!(err.to_string(), PAYMENT_BODY_MSG);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut body = valid_body();
        body["totalAmount"] = json!(0);
        assert!(matches!(
            parse_payment_body(&body),
            Err(AppError::InvalidType("totalAmount"))
        ));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut body = valid_body();
        body["totalAmount"] = json!(-5);
        assert!(parse_payment_body(&body).is_err());
    }

    #[test]
    fn fractional_amount_survives_coercion_exactly() {
        let mut body = valid_body();
        body["totalAmount"] = json!("0.5");
        let input = parse_payment_body(&body).unwrap();
        assert_eq!(input.amount, Decimal::new(5, 1));
    }
}

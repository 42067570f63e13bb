// src/handlers/reports.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::{
    common::{
        error::AppError,
        validation::{field, to_i64, validate_body, Field, FieldKind},
    },
    config::AppState,
    handlers::{parse_path_id, require_user_id, UserQuery},
    middleware::auth::authorize_user,
};

const REPORT_BODY_MSG: &str = "Invalid body. Must include userID, startDate, and endDate in body.";

const REPORT_FIELDS: &[Field] = &[
    field("userID", FieldKind::Numeric),
    field("startDate", FieldKind::Any),
    field("endDate", FieldKind::Any),
];

#[derive(Debug)]
struct ReportInput {
    user_id: i64,
    start_date: String,
    end_date: String,
}

fn parse_report_body(body: &Value) -> Result<ReportInput, AppError> {
    validate_body(body, REPORT_FIELDS).map_err(|e| {
        tracing::debug!("Corpo de relatório rejeitado: {}", e);
        AppError::InvalidBody(REPORT_BODY_MSG)
    })?;

    let user_id = to_i64(&body["userID"]).ok_or(AppError::InvalidType("userID"))?;
    let start_date = body["startDate"]
        .as_str()
        .ok_or(AppError::InvalidDate)?
        .to_owned();
    let end_date = body["endDate"]
        .as_str()
        .ok_or(AppError::InvalidDate)?
        .to_owned();

    Ok(ReportInput {
        user_id,
        start_date,
        end_date,
    })
}

// GET /billing/reports?userID=
pub async fn list_reports(
    State(app_state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = require_user_id(&query)?;
    authorize_user(&app_state, user_id).await?;

    let reports = app_state.report_service.list_reports(user_id).await?;
    Ok((StatusCode::OK, Json(reports)))
}

// POST /billing/reports: dispara o agregador sobre o intervalo submetido.
pub async fn create_report(
    State(app_state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input = parse_report_body(&body)?;
    authorize_user(&app_state, input.user_id).await?;

    let report = app_state
        .report_service
        .generate_report(input.user_id, &input.start_date, &input.end_date)
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /billing/reports/{id}?userID=
pub async fn get_report(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid report ID")?;
    let user_id = require_user_id(&query)?;
    authorize_user(&app_state, user_id).await?;

    let report = app_state.report_service.get_report(id).await?;
    Ok((StatusCode::OK, Json(report)))
}

// PUT /billing/reports/{id}: substituição completa via reagregação.
pub async fn update_report(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid report ID")?;
    let input = parse_report_body(&body)?;
    authorize_user(&app_state, input.user_id).await?;

    let report = app_state
        .report_service
        .regenerate_report(id, input.user_id, &input.start_date, &input.end_date)
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

// DELETE /billing/reports/{id}
pub async fn delete_report(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_path_id(&id, "Invalid report ID")?;
    validate_body(&body, &[field("userID", FieldKind::Numeric)])?;
    let user_id = to_i64(&body["userID"]).ok_or(AppError::InvalidType("userID"))?;
    authorize_user(&app_state, user_id).await?;

    app_state.report_service.delete_report(id).await?;
    Ok((StatusCode::OK, "Report deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_valid_report_body() {
        let body = json!({
            "userID": 1000,
            "startDate": "01/01/2020",
            "endDate": "01/01/2021",
        });
        let input = parse_report_body(&body).unwrap();
        assert_eq!(input.user_id, 1000);
        assert_eq!(input.start_date, "01/01/2020");
        assert_eq!(input.end_date, "01/01/2021");
    }

    #[test]
    fn missing_end_date_yields_the_field_set_message() {
        let body = json!({
            "userID": 1000,
            "startDate": "01/01/2020",
        });
        let err = parse_report_body(&body).unwrap_err();
        assert_eq!(err.to_string(), REPORT_BODY_MSG);
    }

    #[test]
    fn non_string_dates_are_invalid() {
        let body = json!({
            "userID": 1000,
            "startDate": 20200101,
            "endDate": "01/01/2021",
        });
        assert!(matches!(
            parse_report_body(&body),
            Err(AppError::InvalidDate)
        ));
    }
}

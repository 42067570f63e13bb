// src/common/validation.rs
//
// Validação de corpo de requisição antes de qualquer chamada ao banco.
// Livre de efeitos colaterais: recebe o JSON cru e um esquema de campos,
// devolve a primeira falha encontrada.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Qualquer valor presente (não nulo) serve.
    Any,
    /// Precisa ser coercível a número: número JSON ou string numérica.
    Numeric,
    /// Número de cartão: exatamente 16 dígitos ASCII.
    Card,
}

pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

pub const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` is not of the expected type")]
    InvalidType(&'static str),
}

impl From<ValidationError> for crate::common::error::AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingField(name) => Self::MissingField(name),
            ValidationError::InvalidType(name) => Self::InvalidType(name),
        }
    }
}

/// Verifica presença e tipo de cada campo do esquema, na ordem declarada.
/// Um corpo ausente ou que não seja objeto JSON conta como "sem parâmetros":
/// reportamos o primeiro campo do esquema como faltante.
pub fn validate_body(body: &Value, schema: &[Field]) -> Result<(), ValidationError> {
    let map = match body.as_object() {
        Some(map) => map,
        None => {
            // Esquema vazio não exige nada, nem mesmo um objeto.
            return match schema.first() {
                Some(first) => Err(ValidationError::MissingField(first.name)),
                None => Ok(()),
            };
        }
    };

    for field in schema {
        let value = match map.get(field.name) {
            Some(Value::Null) | None => return Err(ValidationError::MissingField(field.name)),
            Some(value) => value,
        };

        let ok = match field.kind {
            FieldKind::Any => true,
            FieldKind::Numeric => is_numeric(value),
            FieldKind::Card => is_card_number(value),
        };
        if !ok {
            return Err(ValidationError::InvalidType(field.name));
        }
    }

    Ok(())
}

/// Coercível a número: número JSON, ou string que parseia como decimal.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && Decimal::from_str(s).is_ok()
        }
        _ => false,
    }
}

/// Número de cartão válido: a forma textual tem exatamente 16 dígitos.
pub fn is_card_number(value: &Value) -> bool {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return false,
    };
    text.len() == 16 && text.bytes().all(|b| b.is_ascii_digit())
}

/// Coerção para inteiro (IDs). Aceita número JSON inteiro ou string numérica.
pub fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Coerção para Decimal (valores monetários). Nunca passa por f64 binário
/// quando o cliente manda string; números JSON usam a forma textual exata.
pub fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Forma textual de um campo (cardNum pode chegar como string ou número).
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAYMENT_FIELDS: &[Field] = &[
        field("userID", FieldKind::Numeric),
        field("invoiceID", FieldKind::Numeric),
        field("totalAmount", FieldKind::Numeric),
        field("cardNum", FieldKind::Card),
        field("cardExp", FieldKind::Numeric),
    ];

    #[test]
    fn accepts_a_complete_payment_body() {
        let body = json!({
            "userID": 1000,
            "invoiceID": 4,
            "totalAmount": 1,
            "cardNum": "1234567812345678",
            "cardExp": "1223",
        });
        assert_eq!(validate_body(&body, PAYMENT_FIELDS), Ok(()));
    }

    #[test]
    fn reports_the_first_missing_field() {
        let body = json!({
            "userID": 1000,
            "totalAmount": 1,
            "cardNum": "1234567812345678",
            "cardExp": "1223",
        });
        assert_eq!(
            validate_body(&body, PAYMENT_FIELDS),
            Err(ValidationError::MissingField("invoiceID"))
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let body = json!({
            "userID": null,
            "invoiceID": 4,
            "totalAmount": 1,
            "cardNum": "1234567812345678",
            "cardExp": "1223",
        });
        assert_eq!(
            validate_body(&body, PAYMENT_FIELDS),
            Err(ValidationError::MissingField("userID"))
        );
    }

    #[test]
    fn non_object_body_reports_first_schema_field() {
        assert_eq!(
            validate_body(&Value::Null, PAYMENT_FIELDS),
            Err(ValidationError::MissingField("userID"))
        );
    }

    #[test]
    fn empty_schema_accepts_any_body() {
        assert_eq!(validate_body(&Value::Null, &[]), Ok(()));
        assert_eq!(validate_body(&json!({}), &[]), Ok(()));
    }

    #[test]
    fn numeric_strings_coerce() {
        let body = json!({
            "userID": "1000",
            "invoiceID": "4",
            "totalAmount": "0.5",
            "cardNum": "1234567812345678",
            "cardExp": 1223,
        });
        assert_eq!(validate_body(&body, PAYMENT_FIELDS), Ok(()));
    }

    #[test]
    fn rejects_non_numeric_user_id() {
        let body = json!({
            "userID": "abc",
            "invoiceID": 4,
            "totalAmount": 1,
            "cardNum": "1234567812345678",
            "cardExp": "1223",
        });
        assert_eq!(
            validate_body(&body, PAYMENT_FIELDS),
            Err(ValidationError::InvalidType("userID"))
        );
    }

    #[test]
    fn rejects_short_card_number() {
        let body = json!({
            "userID": 1000,
            "invoiceID": 4,
            "totalAmount": 1,
            "cardNum": "123456781234567",
            "cardExp": "1223",
        });
        assert_eq!(
            validate_body(&body, PAYMENT_FIELDS),
            Err(ValidationError::InvalidType("cardNum"))
        );
    }

    #[test]
    fn rejects_card_number_with_letters() {
        assert!(!is_card_number(&json!("123456781234567a")));
    }

    #[test]
    fn decimal_coercion_is_exact() {
        assert_eq!(to_decimal(&json!("0.1")), Some(Decimal::new(1, 1)));
        assert_eq!(to_decimal(&json!(30)), Some(Decimal::from(30)));
        assert_eq!(to_decimal(&json!([])), None);
    }

    #[test]
    fn id_coercion() {
        assert_eq!(to_i64(&json!(1000)), Some(1000));
        assert_eq!(to_i64(&json!("1000")), Some(1000));
        assert_eq!(to_i64(&json!(1.5)), None);
        assert_eq!(to_i64(&json!("abc")), None);
    }
}

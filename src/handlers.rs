pub mod invoices;
pub mod payments;
pub mod reports;

use serde::Deserialize;

use crate::common::error::AppError;

// Helpers compartilhados pelos três recursos: IDs chegam como texto (path
// ou query) e precisam virar inteiros antes de qualquer consulta.

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
}

pub(crate) fn require_user_id(query: &UserQuery) -> Result<i64, AppError> {
    query
        .user_id
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .ok_or(AppError::InvalidId("Invalid user ID"))
}

/// "Invalid payment ID" / "Invalid invoice ID" / "Invalid report ID"
pub(crate) fn parse_path_id(raw: &str, message: &'static str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::InvalidId(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_path_ids_parse() {
        assert_eq!(parse_path_id("42", "Invalid payment ID").unwrap(), 42);
    }

    #[test]
    fn non_numeric_path_id_is_rejected_with_the_resource_message() {
        let err = parse_path_id("abc", "Invalid payment ID").unwrap_err();
        assert_eq!(err.to_string(), "Invalid payment ID");
    }

    #[test]
    fn missing_user_id_query_is_rejected() {
        let query = UserQuery { user_id: None };
        assert!(matches!(
            require_user_id(&query),
            Err(AppError::InvalidId("Invalid user ID"))
        ));
    }

    #[test]
    fn non_numeric_user_id_query_is_rejected() {
        let query = UserQuery {
            user_id: Some("abc".into()),
        };
        assert!(require_user_id(&query).is_err());
    }

    #[test]
    fn numeric_user_id_query_parses() {
        let query = UserQuery {
            user_id: Some("1000".into()),
        };
        assert_eq!(require_user_id(&query).unwrap(), 1000);
    }
}

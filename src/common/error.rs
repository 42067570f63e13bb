use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As mensagens visíveis ao cliente são texto puro, no formato que a API
// de billing sempre respondeu.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required field {0}")]
    MissingField(&'static str),

    #[error("Invalid value for field {0}")]
    InvalidType(&'static str),

    // Mensagem completa por recurso, ex.:
    // "Invalid body parameters. Must include userID, invoiceID, ..."
    #[error("{0}")]
    InvalidBody(&'static str),

    #[error("Invalid date")]
    InvalidDate,

    // "Invalid payment ID", "Invalid invoice ID", "Invalid report ID", ...
    #[error("{0}")]
    InvalidId(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("No payments found within the date range")]
    NoMatchingPayments,

    #[error("Client not authorized")]
    Unauthorized,

    #[error("User is not authorized to perform this action")]
    Forbidden,

    // Variante para erros de banco de dados (sqlx)
    #[error("Internal server error")]
    StoreError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingField(_)
            | AppError::InvalidType(_)
            | AppError::InvalidBody(_)
            | AppError::InvalidDate
            | AppError::InvalidId(_) => StatusCode::BAD_REQUEST,

            AppError::NotFound(_) | AppError::NoMatchingPayments => StatusCode::NOT_FOUND,

            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,

            AppError::StoreError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,

            // Todos os outros erros viram 500. O `tracing` loga o detalhe,
            // o cliente recebe só a mensagem genérica.
            ref e => {
                tracing::error!("Erro interno do servidor: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        for err in [
            AppError::MissingField("userID"),
            AppError::InvalidType("totalAmount"),
            AppError::InvalidBody("Invalid body."),
            AppError::InvalidDate,
            AppError::InvalidId("Invalid payment ID"),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn absent_records_map_to_404() {
        assert_eq!(
            AppError::NotFound("Payment").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NoMatchingPayments.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn unexpected_errors_map_to_500() {
        let err = AppError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(AppError::NotFound("Invoice").to_string(), "Invoice not found");
    }
}

// src/middleware/auth.rs

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::env;

use crate::{common::error::AppError, config::AppState};

// A interface plugável de autorização: verifica o chamador (chave de
// cliente no header) e autoriza a ação do usuário sobre o recurso.
// Substitui as comparações fixas (`clientID !== "123abc"`) da API antiga.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Chave apresentada no header `x-client-key` é de um cliente conhecido?
    async fn verify_client(&self, client_key: &str) -> bool;

    /// O usuário pode operar sobre recursos de billing?
    async fn authorize_user(&self, user_id: i64) -> bool;
}

/// Implementação por variáveis de ambiente: CLIENT_KEY obrigatória,
/// ALLOWED_USER_ID opcional (ausente = todos os usuários autorizados).
pub struct EnvAuthorizer {
    client_key: String,
    allowed_user: Option<i64>,
}

impl EnvAuthorizer {
    pub fn from_env() -> anyhow::Result<Self> {
        let client_key = env::var("CLIENT_KEY")
            .map_err(|_| anyhow::anyhow!("CLIENT_KEY deve ser definida"))?;
        let allowed_user = match env::var("ALLOWED_USER_ID") {
            Ok(raw) => Some(raw.parse::<i64>().map_err(|_| {
                anyhow::anyhow!("ALLOWED_USER_ID deve ser um inteiro")
            })?),
            Err(_) => None,
        };
        Ok(Self {
            client_key,
            allowed_user,
        })
    }
}

#[async_trait]
impl Authorizer for EnvAuthorizer {
    async fn verify_client(&self, client_key: &str) -> bool {
        client_key == self.client_key
    }

    async fn authorize_user(&self, user_id: i64) -> bool {
        match self.allowed_user {
            Some(allowed) => user_id == allowed,
            None => true,
        }
    }
}

// O middleware em si: barra na porta qualquer requisição sem uma chave de
// cliente válida (401). A autorização por usuário fica nos handlers, que
// é onde o userID aparece.
pub async fn client_guard(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client_key = request
        .headers()
        .get("x-client-key")
        .and_then(|value| value.to_str().ok());

    if let Some(key) = client_key {
        if app_state.authorizer.verify_client(key).await {
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::Unauthorized)
}

/// Helper usado pelos handlers depois de extrair o userID.
pub async fn authorize_user(app_state: &AppState, user_id: i64) -> Result<(), AppError> {
    if app_state.authorizer.authorize_user(user_id).await {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorizer(allowed_user: Option<i64>) -> EnvAuthorizer {
        EnvAuthorizer {
            client_key: "123abc".into(),
            allowed_user,
        }
    }

    #[tokio::test]
    async fn verifies_the_configured_client_key() {
        let auth = authorizer(None);
        assert!(auth.verify_client("123abc").await);
        assert!(!auth.verify_client("outra-chave").await);
    }

    #[tokio::test]
    async fn without_restriction_every_user_is_authorized() {
        let auth = authorizer(None);
        assert!(auth.authorize_user(1000).await);
    }

    #[tokio::test]
    async fn restriction_limits_to_the_configured_user() {
        let auth = authorizer(Some(123));
        assert!(auth.authorize_user(123).await);
        assert!(!auth.authorize_user(1000).await);
    }
}

// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::{
    db::{InvoiceRepository, PaymentRepository, ReportRepository},
    middleware::auth::{Authorizer, EnvAuthorizer},
    services::{InvoiceService, PaymentService, ReportService},
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub payment_service: PaymentService,
    pub invoice_service: InvoiceService,
    pub report_service: ReportService,
    pub authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let invoice_repo = InvoiceRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let payment_service = PaymentService::new(payment_repo.clone(), invoice_repo.clone());
        let invoice_service = InvoiceService::new(invoice_repo);
        let report_service = ReportService::new(report_repo, payment_repo);

        let authorizer: Arc<dyn Authorizer> = Arc::new(EnvAuthorizer::from_env()?);

        Ok(Self {
            db_pool,
            payment_service,
            invoice_service,
            report_service,
            authorizer,
        })
    }
}

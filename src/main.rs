// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::client_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let payment_routes = Router::new()
        .route(
            "/payments",
            get(handlers::payments::list_payments).post(handlers::payments::create_payment),
        )
        .route(
            "/payments/{id}",
            get(handlers::payments::get_payment)
                .put(handlers::payments::update_payment)
                .delete(handlers::payments::delete_payment),
        );

    let invoice_routes = Router::new()
        .route(
            "/invoices",
            get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
        )
        // As buscas vêm antes de /invoices/{id} só por legibilidade; o
        // roteamento do Axum casa os caminhos literais primeiro.
        .route(
            "/invoices/search/icd10",
            get(handlers::invoices::search_by_icd10),
        )
        .route(
            "/invoices/search/diagnosis",
            get(handlers::invoices::search_by_diagnosis),
        )
        .route(
            "/invoices/{id}",
            get(handlers::invoices::get_invoice)
                .put(handlers::invoices::update_invoice)
                .delete(handlers::invoices::delete_invoice),
        )
        .route(
            "/invoices/{id}/approve",
            put(handlers::invoices::approve_invoice),
        );

    let report_routes = Router::new()
        .route(
            "/reports",
            get(handlers::reports::list_reports).post(handlers::reports::create_report),
        )
        .route(
            "/reports/{id}",
            get(handlers::reports::get_report)
                .put(handlers::reports::update_report)
                .delete(handlers::reports::delete_report),
        );

    // Tudo sob /billing passa pelo guard de cliente (401 sem chave válida)
    let billing_routes = Router::new()
        .merge(payment_routes)
        .merge(invoice_routes)
        .merge(report_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            client_guard,
        ));

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/billing", billing_routes)
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
